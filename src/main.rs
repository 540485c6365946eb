//! autologin - browser-driven login automation with encrypted credentials.

use clap::Parser;

use autologin::cli::output;
use autologin::cli::{execute, Cli};
use autologin::error::{ConfigError, Error, SecurityError};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::Missing("SAFE_KEY" | "ENC_PASSWORD")) => {
                Some("run: autologin encrypt")
            }
            Error::Config(ConfigError::Missing("LOGIN_USER")) => {
                Some("set LOGIN_USER in the environment or .env")
            }
            Error::Security(SecurityError::IntegrityCheckFailed) => {
                Some("SAFE_KEY and ENC_PASSWORD must come from the same autologin encrypt run")
            }
            Error::Browser(_) => Some("see the screenshots directory under LOG_DIR"),
            e if e.is_fatal_setup() => Some("run: autologin check"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
