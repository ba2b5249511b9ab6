pub mod enumerate;
pub mod providers;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use subscope_common::Domain;

#[derive(Parser)]
#[command(name = "subscope", version)]
#[command(about = "Passive subdomain enumeration across public data sources.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Read settings from a TOML file. Flags override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reduce output. Repeat to print results only.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Increase log verbosity.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Skip the startup banner.
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enumerate subdomains of one or more domains
    #[command(alias = "e")]
    Enumerate(EnumerateArgs),
    /// List the available data providers
    #[command(alias = "p")]
    Providers,
}

#[derive(Args)]
pub struct EnumerateArgs {
    /// Target domains, comma separated.
    #[arg(short, long, value_delimiter = ',')]
    pub targets: Vec<Domain>,

    /// File with one target domain per line.
    #[arg(short = 'f', long)]
    pub targets_file: Option<PathBuf>,

    /// Providers to query, comma separated. Defaults to every usable one.
    #[arg(short, long, value_delimiter = ',')]
    pub providers: Vec<String>,

    /// Maximum number of provider queries in flight.
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Write every discovered subdomain to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Repeat the enumeration every N seconds. Zero runs once.
    #[arg(short, long, allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// API key for VirusTotal.
    #[arg(long, env = "VIRUSTOTAL_API_KEY", hide_env_values = true)]
    pub virustotal_api_key: Option<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
