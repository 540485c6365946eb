//! Login credentials from the environment.
//!
//! The password is never stored in plaintext: `SAFE_KEY` holds the key and
//! `ENC_PASSWORD` the ciphertext, both produced by `autologin encrypt`.

use tracing::debug;
use unicode_general_category::{get_general_category, GeneralCategory};
use zeroize::Zeroizing;

use crate::core::cipher::{self, SecretKey};
use crate::core::constants::{
    ENV_ENC_PASSWORD, ENV_LOGIN_USER, ENV_SAFE_KEY, MIN_USERNAME_LEN,
};
use crate::core::env::EnvSource;
use crate::error::{CipherError, ConfigError, CredentialError, Result, SecurityError};

/// A decrypted password. Wiped on drop, redacted in `Debug`.
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Credential values captured from the environment at construction.
pub struct CredentialStore {
    key: Option<Zeroizing<String>>,
    ciphertext: Option<String>,
    username: Option<String>,
}

impl CredentialStore {
    /// Snapshot the credential variables from `env`.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            key: env.get(ENV_SAFE_KEY).map(Zeroizing::new),
            ciphertext: env.get(ENV_ENC_PASSWORD),
            username: env.get(ENV_LOGIN_USER),
        }
    }

    /// Decrypt and return the login password.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing("SAFE_KEY")` if no key is configured (checked
    ///   first, before anything is decoded)
    /// - `ConfigError::Missing("ENC_PASSWORD")` if no ciphertext is configured
    /// - `SecurityError::IntegrityCheckFailed` if the ciphertext does not
    ///   authenticate under the key
    /// - `CredentialError::Decrypt` for any other failure, carrying the cause
    pub fn get_password(&self) -> Result<Password> {
        let key = self.key.as_ref().ok_or(ConfigError::Missing(ENV_SAFE_KEY))?;
        let ciphertext = self
            .ciphertext
            .as_ref()
            .ok_or(ConfigError::Missing(ENV_ENC_PASSWORD))?;

        let key = SecretKey::parse(key).map_err(CredentialError::Decrypt)?;
        debug!(key = %key.fingerprint(), "decrypting password");

        match cipher::decrypt(ciphertext, &key) {
            Ok(plaintext) => Ok(Password(plaintext)),
            Err(CipherError::AuthenticationFailed | CipherError::MalformedCiphertext(_)) => {
                Err(SecurityError::IntegrityCheckFailed.into())
            }
            Err(other) => Err(CredentialError::Decrypt(other).into()),
        }
    }

    /// Configured login username.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing("LOGIN_USER")` if unset.
    pub fn username(&self) -> Result<&str> {
        self.username
            .as_deref()
            .ok_or_else(|| ConfigError::Missing(ENV_LOGIN_USER).into())
    }

    /// Username after format validation.
    ///
    /// # Errors
    ///
    /// Returns `SecurityError::InvalidUsername` for names shorter than four
    /// characters or containing control characters.
    pub fn validated_username(&self) -> Result<&str> {
        let username = self.username()?;
        validate_username(username)?;
        Ok(username)
    }

    /// Fingerprint of the configured key, if it parses.
    pub fn key_fingerprint(&self) -> Option<String> {
        self.key
            .as_ref()
            .and_then(|k| SecretKey::parse(k).ok())
            .map(|k| k.fingerprint())
    }
}

/// Check that a username is printable and long enough.
pub fn validate_username(username: &str) -> std::result::Result<(), SecurityError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(SecurityError::InvalidUsername(format!(
            "must be at least {} characters",
            MIN_USERNAME_LEN
        )));
    }
    if !username.chars().all(is_printable) {
        return Err(SecurityError::InvalidUsername(
            "contains non-printable characters".to_string(),
        ));
    }
    Ok(())
}

/// Printable in the sense of Python's `str.isprintable`: nothing from the
/// Other or Separator categories except the ASCII space.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}
