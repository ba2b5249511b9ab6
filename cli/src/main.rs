mod commands;
mod output;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, enumerate, providers};
use enumerate::Outcome;
use subscope_common::config::Config;
use terminal::{logging, print, spinner};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

const ABORTED_EXIT_CODE: u8 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    spinner::init(commands.quiet == 0);
    logging::init(commands.quiet, commands.verbose);
    print::banner(commands.no_banner, commands.quiet);

    let mut cfg = match &commands.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    cfg.quiet = commands.quiet;

    match commands.command {
        Commands::Providers => {
            print::header("available providers", cfg.quiet);
            providers::list(&cfg)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Enumerate(args) => {
            print::header("getting ready for enumeration", cfg.quiet);
            let cfg = enumerate::apply_args(cfg, &args);
            let targets = enumerate::collect_targets(&args)?;

            let cancel = CancellationToken::new();
            watch_interrupt(cancel.clone());

            match enumerate::enumerate(targets, &cfg, cancel).await? {
                Outcome::Completed => {
                    if cfg.quiet == 0 {
                        print::end_of_program();
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Outcome::Aborted => {
                    error!("Subdomain enumeration aborted by user. Exiting...");
                    Ok(ExitCode::from(ABORTED_EXIT_CODE))
                }
            }
        }
    }
}

/// Cancels `token` on the first Ctrl-C.
fn watch_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => token.cancel(),
            Err(e) => warn!("Unable to listen for Ctrl-C: {e}"),
        }
    });
}
