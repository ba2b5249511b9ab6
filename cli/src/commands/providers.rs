use colored::*;
use subscope_common::{ConfigError, config::Config};
use subscope_core::providers;

use crate::terminal::{colors, print};

pub fn list(cfg: &Config) -> anyhow::Result<()> {
    let client = providers::http_client(cfg)?;
    let width = providers::NAMES.iter().map(|name| name.len()).max().unwrap_or(0);
    print::GLOBAL_KEY_WIDTH.set(width);

    for name in providers::NAMES {
        let status: ColoredString = match providers::build(name, cfg, &client) {
            Ok(_) => "ready".green(),
            Err(ConfigError::MissingCredential { .. }) => "needs API key".yellow(),
            Err(e) => e.to_string().red(),
        };
        print::aligned_line(name, status);
    }

    print::print_status(format!(
        "API keys are read from {} or the config file",
        "VIRUSTOTAL_API_KEY".color(colors::ACCENT)
    ));
    Ok(())
}
