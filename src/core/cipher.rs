//! Symmetric authenticated encryption for stored credentials.
//!
//! Uses XChaCha20-Poly1305 with a random 192-bit nonce per message.
//!
//! ## Encoding
//!
//! - key: URL-safe base64 of 32 random bytes (44 characters)
//! - ciphertext: URL-safe base64 of `nonce (24 bytes) || ciphertext || tag`
//!
//! Both forms are safe to paste into a `.env` file unquoted.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use sha2::{Digest, Sha256};
use tracing::trace;
use zeroize::Zeroizing;

use crate::error::CipherError;

/// Length of the raw key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the XChaCha20 nonce prefix in bytes.
pub const NONCE_LEN: usize = 24;

/// Length of the Poly1305 tag in bytes.
const TAG_LEN: usize = 16;

/// A 256-bit symmetric key, wiped from memory on drop.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<[u8; KEY_LEN]>);

impl SecretKey {
    /// Generate a fresh random key from the OS RNG.
    pub fn generate() -> Self {
        let generated = XChaCha20Poly1305::generate_key(&mut OsRng);
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(&generated);
        Self(bytes)
    }

    /// Parse the text form produced by [`SecretKey::encode`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKey` if the text is not base64 or does
    /// not decode to exactly 32 bytes.
    pub fn parse(encoded: &str) -> Result<Self, CipherError> {
        let decoded = Zeroizing::new(
            URL_SAFE
                .decode(encoded.trim())
                .map_err(|e| CipherError::InvalidKey(e.to_string()))?,
        );
        if decoded.len() != KEY_LEN {
            return Err(CipherError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                decoded.len()
            )));
        }
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Text form for environment files.
    pub fn encode(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(&self.0[..]))
    }

    /// Short SHA-256 fingerprint (first 8 bytes, hex) for display.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.0[..]);
        digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn aead(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.0[..]))
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey({})", self.fingerprint())
    }
}

/// Encrypt `plaintext` under `key`.
///
/// # Errors
///
/// Returns `CipherError::EncryptionFailed` if the AEAD rejects the input.
pub fn encrypt(plaintext: &str, key: &SecretKey) -> Result<String, CipherError> {
    trace!(plaintext_len = plaintext.len(), "encrypting");

    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
    let sealed = key
        .aead()
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CipherError::EncryptionFailed)?;

    let mut framed = Vec::with_capacity(NONCE_LEN + sealed.len());
    framed.extend_from_slice(&nonce);
    framed.extend_from_slice(&sealed);

    let encoded = URL_SAFE.encode(&framed);
    trace!(ciphertext_len = encoded.len(), "encrypted");
    Ok(encoded)
}

/// Decrypt a ciphertext produced by [`encrypt`].
///
/// # Errors
///
/// - `CipherError::MalformedCiphertext` if the text is not base64 or is too
///   short to hold a nonce and tag
/// - `CipherError::AuthenticationFailed` if the key does not match or the
///   ciphertext was modified
/// - `CipherError::InvalidUtf8` if the authenticated plaintext is not UTF-8
pub fn decrypt(ciphertext: &str, key: &SecretKey) -> Result<Zeroizing<String>, CipherError> {
    trace!(ciphertext_len = ciphertext.len(), "decrypting");

    let framed = URL_SAFE
        .decode(ciphertext.trim())
        .map_err(|e| CipherError::MalformedCiphertext(e.to_string()))?;
    if framed.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::MalformedCiphertext(format!(
            "{} bytes is shorter than nonce and tag",
            framed.len()
        )));
    }

    let (nonce, sealed) = framed.split_at(NONCE_LEN);
    let opened = key
        .aead()
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map_err(|_| CipherError::AuthenticationFailed)?;

    let plaintext = String::from_utf8(opened).map_err(|e| {
        // wipe the rejected bytes too
        let _ = Zeroizing::new(e.into_bytes());
        CipherError::InvalidUtf8
    })?;

    trace!(plaintext_len = plaintext.len(), "decrypted");
    Ok(Zeroizing::new(plaintext))
}
