use std::path::{Path, PathBuf};

mod demo;
mod render;
mod run;
mod script;
mod terminal;
mod users;

use bugtrack::Config;
use clap::ArgAction;
use demo::Demo;
use run::Run;
use users::Users;

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG_PATH: &str = ".bt/config.toml";

/// Exit code for a reference to an issue or user that does not exist.
pub const EXIT_NOT_FOUND: i32 = 2;
/// Exit code for an argument that failed validation.
pub const EXIT_INVALID_ARGUMENT: i32 = 3;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// Path to a TOML configuration file declaring the initial users
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(self.config.as_deref())?;

        self.command
            .unwrap_or_else(|| Command::Demo(Demo::default()))
            .run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Loads the configuration from an explicit path, or from
/// [`DEFAULT_CONFIG_PATH`] if it exists, or falls back to the defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load(path).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.is_file() {
        tracing::debug!("Loading config from {}", default_path.display());
        return Config::load(default_path)
            .map_err(|e| anyhow::anyhow!("{}: {e}", default_path.display()));
    }

    Ok(Config::default())
}

/// Maps an error to the process exit code.
///
/// Missing entities and validation failures get their own codes; everything
/// else (unreadable scripts, bad config) exits with 1.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<bugtrack::Error>() {
        Some(bugtrack::Error::NotFound { .. }) => EXIT_NOT_FOUND,
        Some(bugtrack::Error::InvalidArgument(_)) => EXIT_INVALID_ARGUMENT,
        None => 1,
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Replay the demo session (default)
    Demo(Demo),

    /// Execute a YAML script of operations against a fresh tracker
    ///
    /// Each step creates, updates, searches or reports on issues. State
    /// lives only for the duration of the run.
    Run(Run),

    /// List the users a fresh tracker starts with
    Users(Users),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Demo(command) => command.run(config)?,
            Self::Run(command) => command.run(config)?,
            Self::Users(command) => command.run(config)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bugtrack::{EntityKind, Error};

    use super::*;

    #[test]
    fn exit_codes() {
        let not_found = anyhow::Error::new(Error::NotFound {
            kind: EntityKind::Issue,
            id: "BUG-0001".to_string(),
        })
        .context("step 1 failed");
        assert_eq!(exit_code(&not_found), EXIT_NOT_FOUND);

        let invalid = anyhow::Error::new(Error::InvalidArgument("bad".to_string()));
        assert_eq!(exit_code(&invalid), EXIT_INVALID_ARGUMENT);

        assert_eq!(exit_code(&anyhow::anyhow!("unreadable")), 1);
    }

    #[test]
    fn load_config_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nseed_default_users = false\n")
            .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(!config.seed_default_users);
    }

    #[test]
    fn load_config_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = load_config(Some(&missing)).unwrap_err();
        assert!(error.to_string().contains("missing.toml"));
    }
}
