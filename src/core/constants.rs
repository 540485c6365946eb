//! Constants used throughout autologin.
//!
//! Centralizes environment variable names, defaults and file naming.

/// Site root the workflow starts from.
pub const ENV_BASE_URL: &str = "BASE_URL";
/// Default operation timeout in seconds.
pub const ENV_TIMEOUT: &str = "TIMEOUT";
/// Explicit browser executable.
pub const ENV_BROWSER_PATH: &str = "BROWSER_PATH";
/// Headless flag (`true` enables headless mode, case-insensitive).
pub const ENV_HEADLESS: &str = "HEADLESS";
/// Delay inserted after each browser action, in milliseconds.
pub const ENV_SLOW_MO: &str = "SLOW_MO";
/// Browser channel (`chrome`, `msedge`, `chromium`).
pub const ENV_BROWSER_CHANNEL: &str = "BROWSER_CHANNEL";
/// Log level for the default filter.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// Log file name inside the log directory.
pub const ENV_LOG_FILE: &str = "LOG_FILE";
/// Log directory.
pub const ENV_LOG_DIR: &str = "LOG_DIR";
/// Symmetric key produced by `autologin encrypt`.
pub const ENV_SAFE_KEY: &str = "SAFE_KEY";
/// Ciphertext produced by `autologin encrypt`.
pub const ENV_ENC_PASSWORD: &str = "ENC_PASSWORD";
/// Login username.
pub const ENV_LOGIN_USER: &str = "LOGIN_USER";
/// Full tracing filter override.
pub const ENV_LOG_FILTER: &str = "AUTOLOGIN_LOG";

pub const DEFAULT_BASE_URL: &str = "https://example.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SLOW_MO_MS: u64 = 500;
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_FILE: &str = "automation.log";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Screenshot directory name inside the log directory.
pub const SCREENSHOT_DIR: &str = "screenshots";

/// Dotenv file read at startup.
pub const ENV_FILE: &str = ".env";

/// Timestamp suffix for screenshots and page dumps (`yyyyMMdd_HHmmss`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Quiet window that counts as "network idle".
pub const NETWORK_IDLE_WINDOW_MS: u64 = 500;

/// Minimum accepted username length.
pub const MIN_USERNAME_LEN: usize = 4;

/// Screenshot tags.
pub mod tags {
    pub const NAVIGATION_ERROR: &str = "navigation_error";
    pub const CLICK_ERROR: &str = "click_error";
    pub const FILL_ERROR: &str = "fill_error";
    pub const FINAL_PAGE: &str = "final_page";
    pub const ERROR_FINAL: &str = "error_final";
}
