//! Test fixtures and constants.

use std::time::Duration;

use autologin::core::retry::RetryPolicy;

/// Username that passes validation.
pub const USER: &str = "alice@example.com";

/// Password used by the credential round-trip scenarios.
pub const PASSWORD: &str = "hunter2";

/// Title the dashboard check expects by default.
pub const REPORT_TITLE: &str = "Report Dashboard";

/// Retry policy with the production attempt count and no delay.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO).expect("three attempts is valid")
}

/// Split `encrypt` output into `(SAFE_KEY, ENC_PASSWORD)` pairs.
pub fn parse_pairs(output: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut key = None;
    for line in output.lines() {
        if let Some(value) = line.strip_prefix("SAFE_KEY=") {
            key = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("ENC_PASSWORD=") {
            let key = key.take().expect("ENC_PASSWORD before SAFE_KEY");
            pairs.push((key, value.to_string()));
        }
    }
    pairs
}

/// `.env` contents for a fully configured user.
pub fn env_file(key: &str, ciphertext: &str) -> String {
    format!(
        "# test configuration\nLOGIN_USER={}\nSAFE_KEY={}\nENC_PASSWORD=\"{}\"\n",
        USER, key, ciphertext
    )
}

/// Decrypted [`PASSWORD`], obtained the way a run obtains it.
pub fn password() -> autologin::core::credentials::Password {
    use autologin::core::cipher::{self, SecretKey};
    use autologin::core::credentials::CredentialStore;
    use autologin::core::env::MapEnv;

    let key = SecretKey::generate();
    let ciphertext = cipher::encrypt(PASSWORD, &key).unwrap();
    let env = MapEnv::new()
        .with("SAFE_KEY", key.encode().as_str())
        .with("ENC_PASSWORD", ciphertext);
    CredentialStore::from_env(&env).get_password().unwrap()
}
