//! `invman config` command - inspect effective configuration

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::load_config;
use crate::cli::output::print_structured;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration after file, environment and flag overrides
    Show,

    /// Print the config file location
    Path,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = load_config(global)?;
            let format = match global.format {
                OutputFormat::Json => OutputFormat::Json,
                _ => OutputFormat::Yaml,
            };
            print_structured(&config, format)?;
            Ok(())
        }
        ConfigCommands::Path => {
            let path = Config::config_path()
                .ok_or_else(|| miette::miette!("No config directory on this platform"))?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
