use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use keystone::Mode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod page;
mod source;
mod utils;

use app::{App, Launch};
use config::Config;
use source::HttpQuoteSource;

/// A minimalistic typing test for your terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding `settings.toml`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Type a single quote as fast as you can
    Sprint,
    /// Type as many quotes as you can before the countdown runs out
    Timed {
        /// Countdown in seconds
        #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
        countdown: u64,
    },
}

impl Command {
    const fn launch(self) -> Launch {
        match self {
            Self::Sprint => Launch {
                mode: Mode::Sprint,
                countdown: Duration::ZERO,
            },
            Self::Timed { countdown } => Launch {
                mode: Mode::Timed,
                countdown: Duration::from_secs(countdown),
            },
        }
    }
}

/// Logs go to a file, the terminal belongs to the UI.
fn init_tracing(config: &Config) -> std::io::Result<()> {
    let path = config.log_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.settings.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::get(cli.config) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = init_tracing(&config) {
        eprintln!("Failed to open log file: {error}");
    }

    let source = match HttpQuoteSource::new(&config.settings.quotes) {
        Ok(source) => Arc::new(source),
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let launch = cli.command.launch();
    info!(mode = %launch.mode, "starting typechan");

    let mut app = match App::new(config, source, launch) {
        Ok(app) => app,
        Err(error) => {
            error!(%error, "startup failed");
            eprintln!("Something went wrong!\n{error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = app.run() {
        error!(%error, "app crashed");
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_modes() {
        let cli = Cli::try_parse_from(["typechan", "timed", "-c", "60"]).unwrap();
        let launch = cli.command.launch();
        assert_eq!(launch.mode, Mode::Timed);
        assert_eq!(launch.countdown, Duration::from_secs(60));

        let cli = Cli::try_parse_from(["typechan", "--config", "/tmp/tc", "sprint"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tc")));
        assert_eq!(cli.command.launch().mode, Mode::Sprint);
    }

    #[test]
    fn test_default_countdown() {
        let cli = Cli::try_parse_from(["typechan", "timed"]).unwrap();
        assert_eq!(cli.command.launch().countdown, Duration::from_secs(300));
    }

    #[test]
    fn test_zero_countdown_is_rejected() {
        assert!(Cli::try_parse_from(["typechan", "timed", "--countdown", "0"]).is_err());
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
