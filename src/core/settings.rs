//! Runtime settings.
//!
//! Built once at process start from an [`EnvSource`] and passed by reference
//! to every component.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use crate::core::browser::LaunchOptions;
use crate::core::constants::*;
use crate::core::env::EnvSource;
use crate::error::{ConfigError, Result};

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Site the workflow starts from.
    pub base_url: String,
    /// Default per-operation timeout.
    pub timeout: Duration,
    /// Default browser launch options (before CLI overrides).
    pub browser: LaunchOptions,
    /// Logging destination and level.
    pub logging: LogSettings,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub dir: PathBuf,
    pub file: String,
}

impl LogSettings {
    /// Full path of the append-only log file.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }

    /// Directory screenshots are written to.
    pub fn screenshot_dir(&self) -> PathBuf {
        self.dir.join(SCREENSHOT_DIR)
    }
}

impl Settings {
    /// Read settings from `env`, applying defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the variable when a value is
    /// present but cannot be parsed.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self> {
        let base_url = env
            .get(ENV_BASE_URL)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: ENV_BASE_URL,
                value: base_url,
                reason: "must start with http:// or https://".to_string(),
            }
            .into());
        }

        let timeout_secs = parse_u64(env, ENV_TIMEOUT, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: ENV_TIMEOUT,
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            }
            .into());
        }

        let browser = LaunchOptions {
            headless: env
                .get(ENV_HEADLESS)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            slow_mo: Duration::from_millis(parse_u64(env, ENV_SLOW_MO, DEFAULT_SLOW_MO_MS)?),
            channel: env
                .get(ENV_BROWSER_CHANNEL)
                .or_else(|| cfg!(windows).then(|| "chrome".to_string())),
            executable: env.get(ENV_BROWSER_PATH).map(PathBuf::from),
            args: if cfg!(windows) {
                Vec::new()
            } else {
                vec!["--no-sandbox".to_string()]
            },
        };

        let level_raw = env
            .get(ENV_LOG_LEVEL)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let logging = LogSettings {
            level: parse_level(&level_raw)?,
            dir: env
                .get(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            file: env
                .get(ENV_LOG_FILE)
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        };

        let settings = Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            browser,
            logging,
        };
        debug!(
            base_url = %settings.base_url,
            timeout_secs,
            headless = settings.browser.headless,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Directory screenshots are written to.
    pub fn screenshot_dir(&self) -> PathBuf {
        self.logging.screenshot_dir()
    }

    /// Create the log and screenshot directories if absent.
    pub fn ensure_dirs(&self) -> Result<()> {
        create_dir(&self.logging.dir)?;
        create_dir(&self.screenshot_dir())?;
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

fn parse_u64(env: &dyn EnvSource, var: &'static str, default: u64) -> Result<u64> {
    match env.get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }
            .into()
        }),
    }
}

/// Map a level name to a filter. Accepts the usual names plus `WARNING` and
/// `CRITICAL`, case-insensitively.
pub fn parse_level(raw: &str) -> Result<LevelFilter> {
    let level = match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" | "critical" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => {
            return Err(ConfigError::Invalid {
                var: ENV_LOG_LEVEL,
                value: raw.to_string(),
                reason: "expected TRACE, DEBUG, INFO, WARNING, ERROR or CRITICAL".to_string(),
            }
            .into())
        }
    };
    Ok(level)
}
