use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use keystone::{InputRules, Mode, SessionConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.toml";
const LOG_FILE: &str = "typechan.log";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteSettings {
    /// Endpoint returning a random quote as `{"content": "..."}`
    pub url: String,
    pub min_length: usize,
    pub timeout_seconds: u64,
    pub retry_delay_millis: u64,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            url: "https://api.quotable.io/random".to_string(),
            min_length: 100,
            timeout_seconds: 10,
            retry_delay_millis: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    pub max_mistyped: usize,
    pub quote_buffer_size: usize,
    pub scroll_threshold: usize,
    pub tick_millis: u64,
    pub enter_matches_newline: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_mistyped: keystone::MAX_MISTYPED,
            quote_buffer_size: 2,
            scroll_threshold: 3,
            tick_millis: 100,
            enter_matches_newline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter, overridden by `RUST_LOG`
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub quotes: QuoteSettings,
    pub session: SessionSettings,
    pub log: LogSettings,
}

#[derive(Debug, From, Error)]
pub enum SettingsError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to prepare config directory: {0}")]
    Io(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("Failed to write default config: {0}")]
    Serialize(toml::ser::Error),
}

#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    pub config_dir: PathBuf,
}

impl Config {
    /// Loads the settings: defaults, then `settings.toml`, then `TYPECHAN_*` variables.
    ///
    /// Writes a `settings.toml` with the defaults if there is none yet.
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, SettingsError> {
        let config_dir = override_path
            .or_else(|| project_dirs().map(|dirs| dirs.config_dir().to_path_buf()))
            .ok_or(SettingsError::NoDirectory)?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let settings_toml = config_dir.join(SETTINGS_FILE);
        if !settings_toml.exists() {
            write_defaults(&settings_toml)?;
        }

        let settings = figment(&settings_toml).extract().map_err(Box::new)?;

        Ok(Self {
            settings,
            config_dir,
        })
    }

    /// Where logs are written. The configured file wins over the project data directory.
    pub fn log_file(&self) -> PathBuf {
        self.settings.log.file.clone().unwrap_or_else(|| {
            project_dirs()
                .map_or_else(|| self.config_dir.clone(), |dirs| dirs.data_dir().to_path_buf())
                .join(LOG_FILE)
        })
    }

    /// The core configuration for a session of `mode` at `width` columns.
    pub fn session_config(&self, mode: Mode, countdown: Duration, width: usize) -> SessionConfig {
        let session = &self.settings.session;
        SessionConfig {
            mode,
            timed_duration: countdown,
            render_width: width,
            max_mistyped: session.max_mistyped,
            quote_buffer_size: session.quote_buffer_size,
            scroll_threshold: session.scroll_threshold,
            tick_interval: Duration::from_millis(session.tick_millis),
            retry_delay: Duration::from_millis(self.settings.quotes.retry_delay_millis),
            input: InputRules {
                enter_matches_newline: session.enter_matches_newline,
            },
        }
    }

    pub const fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.settings.session.tick_millis)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "TypeChan", "typechan")
}

fn figment(settings_toml: &Path) -> Figment {
    Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(settings_toml))
        .merge(Env::prefixed("TYPECHAN_").split("__"))
}

fn write_defaults(path: &Path) -> Result<(), SettingsError> {
    let contents = toml::to_string_pretty(&Settings::default())?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_convert_to_valid_session_config() {
        let config = Config {
            settings: Settings::default(),
            config_dir: PathBuf::from("."),
        };

        let session = config.session_config(Mode::Timed, Duration::from_secs(60), 40);
        assert_eq!(session.mode, Mode::Timed);
        assert_eq!(session.render_width, 40);
        assert_eq!(session.tick_interval, Duration::from_millis(100));
        assert_eq!(session.max_mistyped, keystone::MAX_MISTYPED);
        assert!(session.input.enter_matches_newline);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_layers_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE,
                r#"
                [session]
                max_mistyped = 4

                [quotes]
                url = "http://localhost:8080/random"
                "#,
            )?;
            jail.set_env("TYPECHAN_SESSION__ENTER_MATCHES_NEWLINE", "false");

            let settings: Settings = figment(Path::new(SETTINGS_FILE)).extract()?;
            assert_eq!(settings.session.max_mistyped, 4);
            assert!(!settings.session.enter_matches_newline);
            assert_eq!(settings.quotes.url, "http://localhost:8080/random");
            assert_eq!(settings.quotes.min_length, 100);
            assert_eq!(settings.log, LogSettings::default());
            Ok(())
        });
    }

    #[test]
    fn test_default_file_round_trips() {
        let contents = toml::to_string_pretty(&Settings::default()).unwrap();
        let parsed: Settings = toml::from_str(&contents).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
