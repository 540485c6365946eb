//! Encrypt command.
//!
//! Generates one key per invocation and encrypts each password the operator
//! enters under it, printing `SAFE_KEY=` / `ENC_PASSWORD=` lines ready to be
//! pasted into a `.env` file. Nothing is written anywhere but stdout.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Password;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::cipher::{self, SecretKey};
use crate::core::constants::{ENV_ENC_PASSWORD, ENV_SAFE_KEY};
use crate::error::Result;

/// Encrypt passwords until empty input or end of input.
///
/// Piped stdin is read line by line even without `--password-stdin`.
pub fn execute(password_stdin: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let count = if password_stdin || !io::stdin().is_terminal() {
        let stdin = io::stdin();
        let mut lines = stdin.lock();
        encrypt_loop(|| read_line(&mut lines), &mut out)?
    } else {
        output::dimmed("enter an empty password to finish");
        encrypt_loop(prompt, &mut out)?
    };

    debug!(count, "passwords encrypted");
    Ok(())
}

/// Generate a key, then encrypt every password `next_password` yields.
///
/// Returns the number of passwords encrypted. `None` or an empty password
/// ends the loop. The key is printed alongside each ciphertext, so ending
/// before the first password prints nothing at all.
pub fn encrypt_loop<F, W>(mut next_password: F, out: &mut W) -> Result<usize>
where
    F: FnMut() -> Result<Option<Zeroizing<String>>>,
    W: Write,
{
    let key = SecretKey::generate();
    let encoded = key.encode();
    debug!(key = %key.fingerprint(), "generated key");

    let mut count = 0;
    while let Some(password) = next_password()? {
        if password.is_empty() {
            break;
        }
        let ciphertext = cipher::encrypt(&password, &key)?;
        writeln!(out, "{}={}", ENV_SAFE_KEY, encoded.as_str())?;
        writeln!(out, "{}={}", ENV_ENC_PASSWORD, ciphertext)?;
        out.flush()?;
        count += 1;
    }

    Ok(count)
}

fn prompt() -> Result<Option<Zeroizing<String>>> {
    let password = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    Ok(Some(Zeroizing::new(password)))
}

fn read_line(input: &mut impl BufRead) -> Result<Option<Zeroizing<String>>> {
    let mut line = Zeroizing::new(String::new());
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']);
    Ok(Some(Zeroizing::new(trimmed.to_string())))
}
