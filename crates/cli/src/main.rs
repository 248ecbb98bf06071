// Quantiv CLI - rosters, assessment scores and statistics from the shell

mod exit_codes;
mod legacy;
mod national;
mod notes;
mod report;
mod settings;
mod student;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quantiv_config::{ConfigError, QuantivConfig};
use quantiv_core::ValidationError;
use quantiv_io::{Store, StoreError};

use exit_codes::{store_exit_code, EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE, EXIT_VALIDATION, EXIT_WRITE};

#[derive(Parser)]
#[command(name = "quantiv")]
#[command(about = "Scored assessments for individuals and groups")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/quantiv/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the data files (overrides [storage].data_dir)
    #[arg(long, global = true, env = "QUANTIV_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Machine-readable output on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every individual with group and mean
    #[command(after_help = "\
Examples:
  quantiv list
  quantiv list --group A1
  quantiv list --json | jq '.individuals[].last_name'")]
    List {
        /// Only members of this group
        #[arg(long)]
        group: Option<String>,
    },

    /// List groups with member count, mean and median
    Groups,

    /// Show one individual: scores per assessment and reference values
    #[command(after_help = "\
Examples:
  quantiv show Dupont Jean
  quantiv show Dupont Jean --json")]
    Show {
        last_name: String,
        first_name: String,
    },

    /// Descriptive statistics for an individual, a group or the population
    #[command(subcommand)]
    Stats(report::StatsTarget),

    /// Compare an individual or group against national (and group) statistics
    #[command(subcommand)]
    Compare(report::CompareTarget),

    /// Write the population report (national and per-group summaries) as JSON
    #[command(after_help = "\
Examples:
  quantiv export
  quantiv export -o report.json")]
    Export {
        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Assessment registry (names and national reference values)
    #[command(subcommand)]
    Notes(notes::NotesCommands),

    /// Structured roster records
    #[command(subcommand)]
    Student(student::StudentCommands),

    /// Legacy flat-record file
    #[command(subcommand)]
    Legacy(legacy::LegacyCommands),

    /// National mean override
    #[command(subcommand)]
    National(national::NationalCommands),

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(settings::ConfigCommands),
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nbuild:   ", env!("QUANTIV_BUILD_PROFILE"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Everything a command needs, resolved once from flags and config.
pub struct Context {
    pub store: Store,
    pub config: QuantivConfig,
    pub config_path: PathBuf,
    pub json: bool,
}

impl Context {
    fn resolve(config: Option<PathBuf>, data_dir: Option<PathBuf>, json: bool) -> Result<Self, CliError> {
        let (mut cfg, config_path) = match config {
            Some(path) => (QuantivConfig::load_from(&path).map_err(CliError::config)?, path),
            None => (QuantivConfig::load().map_err(CliError::config)?, QuantivConfig::config_path()),
        };
        if let Some(dir) = data_dir {
            cfg.storage.data_dir = dir;
        }
        log::debug!("data dir: {}", cfg.storage.data_dir.display());
        Ok(Context {
            store: Store::new(cfg.paths()),
            config: cfg,
            config_path,
            json,
        })
    }

    pub fn precision(&self) -> usize {
        self.config.report.precision
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List { group } => report::cmd_list(ctx, group),
        Commands::Groups => report::cmd_groups(ctx),
        Commands::Show { last_name, first_name } => report::cmd_show(ctx, &last_name, &first_name),
        Commands::Stats(target) => report::cmd_stats(ctx, target),
        Commands::Compare(target) => report::cmd_compare(ctx, target),
        Commands::Export { output } => report::cmd_export(ctx, output),
        Commands::Notes(cmd) => notes::cmd_notes(ctx, cmd),
        Commands::Student(cmd) => student::cmd_student(ctx, cmd),
        Commands::Legacy(cmd) => legacy::cmd_legacy(ctx, cmd),
        Commands::National(cmd) => national::cmd_national(ctx, cmd),
        Commands::Config(cmd) => settings::cmd_config(Some(ctx.config_path.clone()), None, ctx.json, cmd),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Config(cmd) => settings::cmd_config(cli.config, cli.data_dir, cli.json, cmd),
        command => Context::resolve(cli.config, cli.data_dir, cli.json).and_then(|ctx| run(&ctx, command)),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self { code: EXIT_NOT_FOUND, message: msg.into(), hint: None }
    }

    pub fn validation(err: ValidationError) -> Self {
        Self { code: EXIT_VALIDATION, message: err.to_string(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    pub fn store(err: StoreError) -> Self {
        let hint = match &err {
            StoreError::Unreadable { path, .. } => {
                Some(format!("fix or move {} aside, then retry", path.display()))
            }
            _ => None,
        };
        Self { code: store_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn config(err: ConfigError) -> Self {
        Self {
            code: EXIT_USAGE,
            message: err.to_string(),
            hint: Some("run `quantiv config init` to write a default config".to_string()),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::store(err)
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["quantiv", "list", "--json", "--data-dir", "/tmp/q"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/q")));
    }

    #[test]
    fn store_error_codes() {
        let err = CliError::from(StoreError::Validation(ValidationError::DuplicateAssessment("DS1".into())));
        assert_eq!(err.code, EXIT_VALIDATION);
        let err = CliError::from(StoreError::Unreadable { path: "students.json".into(), reason: "eof".into() });
        assert_eq!(err.code, EXIT_WRITE);
        assert!(err.hint.is_some());
    }
}
