//! `quantiv config`: inspect or create the config file.
//!
//! Runs without a loaded `Context` so that `init` works even when the
//! current file does not parse.

use std::path::PathBuf;

use clap::Subcommand;
use quantiv_config::QuantivConfig;
use serde::Serialize;

use crate::util::print_json;
use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective config and resolved data file paths
    Show,

    /// Write a config file with default settings
    #[command(after_help = "\
Examples:
  quantiv config init
  quantiv config init --config ./quantiv.toml --force")]
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    config_path: String,
    config_exists: bool,
    config: &'a QuantivConfig,
    roster: String,
    notes: String,
    national: String,
    legacy: String,
}

pub fn cmd_config(
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    json: bool,
    cmd: ConfigCommands,
) -> Result<(), CliError> {
    let path = config.unwrap_or_else(QuantivConfig::config_path);
    match cmd {
        ConfigCommands::Show => {
            let exists = path.exists();
            let mut cfg = if exists {
                QuantivConfig::load_from(&path).map_err(CliError::config)?
            } else {
                QuantivConfig::default()
            };
            if let Some(dir) = data_dir {
                cfg.storage.data_dir = dir;
            }
            let paths = cfg.paths();

            if json {
                return print_json(&ShowOutput {
                    config_path: path.display().to_string(),
                    config_exists: exists,
                    config: &cfg,
                    roster: paths.roster.display().to_string(),
                    notes: paths.notes.display().to_string(),
                    national: paths.national.display().to_string(),
                    legacy: paths.legacy.display().to_string(),
                });
            }

            let text = toml::to_string_pretty(&cfg).map_err(|e| CliError::write(e.to_string()))?;
            println!("# {}{}", path.display(), if exists { "" } else { " (not found, defaults)" });
            print!("{}", text);
            println!();
            println!("# roster:   {}", paths.roster.display());
            println!("# notes:    {}", paths.notes.display());
            println!("# national: {}", paths.national.display());
            println!("# legacy:   {}", paths.legacy.display());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::usage(format!("{} already exists", path.display()))
                    .with_hint("pass --force to overwrite"));
            }
            let mut cfg = QuantivConfig::default();
            if let Some(dir) = data_dir {
                cfg.storage.data_dir = dir;
            }
            cfg.save(&path).map_err(|e| CliError::write(e.to_string()))?;
            eprintln!("wrote {}", path.display());
            Ok(())
        }
    }
}
