//! Error types for autologin.
//!
//! Each subsystem has its own error enum; [`Error`] wraps them so callers can
//! match on the category (configuration vs. security vs. browser) without
//! string inspection.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Errors that are detected before the browser is launched and must
    /// never be retried.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::Security(_) | Error::Credential(_)
        )
    }
}

/// Missing or malformed configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid selector for {page}.{element}: {reason}")]
    Selector {
        page: &'static str,
        element: &'static str,
        reason: String,
    },

    #[error("retry policy needs at least one attempt")]
    ZeroAttempts,
}

/// Integrity and credential-format failures. Never transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("decryption failed: key does not match ciphertext or ciphertext is corrupted")]
    IntegrityCheckFailed,

    #[error("invalid username format: {0}")]
    InvalidUsername(String),
}

/// Any other failure while turning stored credentials into plaintext.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("credential decryption error: {0}")]
    Decrypt(#[source] CipherError),
}

/// Low-level cipher failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("plaintext is not valid UTF-8")]
    InvalidUtf8,
}

/// Browser-phase failures, wrapped with the operation and its target.
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation failed: {url} - {cause}")]
    Navigation { url: String, cause: String },

    #[error("click failed: {selector} - {cause}")]
    Click { selector: String, cause: String },

    #[error("fill failed: {selector} - {cause}")]
    Fill { selector: String, cause: String },

    #[error("timed out after {seconds}s waiting for {what}")]
    Timeout { what: String, seconds: f64 },

    #[error("screenshot failed: {path}: {cause}")]
    Screenshot { path: PathBuf, cause: String },

    #[error("login rejected: {0}")]
    LoginRejected(String),

    #[error("check failed: {0}")]
    Check(String),

    #[error("browser driver error: {0}")]
    Driver(String),

    #[error("browser session already closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;
