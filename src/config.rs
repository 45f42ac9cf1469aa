//! # Configuration Module
//!
//! Process configuration read from environment variables (a `.env` file is
//! loaded by `main` before this runs).
//!
//! | Variable | Default |
//! |---|---|
//! | `TELEGRAM_BOT_TOKEN` | required |
//! | `PROFILE_STORE_PATH` | `user_data.json` |
//! | `STAGING_DIR` | `downloads` |
//! | `YOUTUBE_PROCESSING_DELAY_MS` | `2000` |
//! | `LOG_LEVEL` | `info` |
//! | `LOG_FORMAT` | `text` (`text` or `json`) |
//! | `LOG_DIR` | unset (no log file) |

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;

/// Value shipped in sample configs; treated as missing
pub const PLACEHOLDER_TOKEN: &str = "YOUR_TELEGRAM_BOT_TOKEN_HERE";

pub const DEFAULT_PROFILE_STORE_PATH: &str = "user_data.json";
pub const DEFAULT_STAGING_DIR: &str = "downloads";
pub const DEFAULT_YOUTUBE_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log output format for stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
    /// Directory for the daily rolling log file
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Text,
            dir: None,
        }
    }
}

/// Complete bot configuration
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub profile_store_path: PathBuf,
    pub staging_dir: PathBuf,
    /// Artificial delay before the YouTube result is sent
    pub youtube_delay: Duration,
    pub logging: LoggingConfig,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("profile_store_path", &self.profile_store_path)
            .field("staging_dir", &self.staging_dir)
            .field("youtube_delay", &self.youtube_delay)
            .field("logging", &self.logging)
            .finish()
    }
}

impl BotConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token = match var("TELEGRAM_BOT_TOKEN") {
            None => return Err(ConfigError::MissingToken),
            Some(token) if token.trim() == PLACEHOLDER_TOKEN => {
                return Err(ConfigError::PlaceholderToken)
            }
            Some(token) => token.trim().to_string(),
        };

        let youtube_delay_ms = match var("YOUTUBE_PROCESSING_DELAY_MS") {
            None => DEFAULT_YOUTUBE_DELAY_MS,
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "YOUTUBE_PROCESSING_DELAY_MS",
                    value,
                })?,
        };

        let format = match var("LOG_FORMAT") {
            None => LogFormat::Text,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "text" | "pretty" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "LOG_FORMAT",
                        value,
                    })
                }
            },
        };

        Ok(Self {
            token,
            profile_store_path: var("PROFILE_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_STORE_PATH)),
            staging_dir: var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR)),
            youtube_delay: Duration::from_millis(youtube_delay_ms),
            logging: LoggingConfig {
                level: var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                format,
                dir: var("LOG_DIR").map(PathBuf::from),
            },
        })
    }
}
