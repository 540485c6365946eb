//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables the binary reads; cleared so the outer environment never
/// leaks into a test.
const ISOLATED_VARS: &[&str] = &[
    "BASE_URL",
    "TIMEOUT",
    "BROWSER_PATH",
    "HEADLESS",
    "SLOW_MO",
    "BROWSER_CHANNEL",
    "LOG_LEVEL",
    "LOG_FILE",
    "LOG_DIR",
    "SAFE_KEY",
    "ENC_PASSWORD",
    "LOGIN_USER",
    "AUTOLOGIN_LOG",
];

impl Test {
    /// Create an autologin command running in the test directory.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("autologin").expect("failed to find autologin binary");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run `autologin encrypt --password-stdin` with one password per line.
    pub fn encrypt(&self, passwords: &[&str]) -> Output {
        let mut input = passwords.join("\n");
        input.push('\n');
        self.cmd()
            .args(["encrypt", "--password-stdin"])
            .write_stdin(input)
            .output()
            .expect("failed to run autologin encrypt")
    }

    /// Encrypt one password and return its `(SAFE_KEY, ENC_PASSWORD)` pair.
    pub fn encrypt_one(&self, password: &str) -> (String, String) {
        let output = self.encrypt(&[password]);
        super::assert_success(&output);
        let pairs = super::parse_pairs(&super::stdout(&output));
        pairs.into_iter().next().expect("encrypt printed no pair")
    }

    /// Shortcut for `autologin check`.
    pub fn check(&self) -> Output {
        self.cmd()
            .arg("check")
            .output()
            .expect("failed to run autologin check")
    }

    /// Shortcut for `autologin check --json`.
    pub fn check_json(&self) -> Output {
        self.cmd()
            .args(["check", "--json"])
            .output()
            .expect("failed to run autologin check --json")
    }

    /// Shortcut for `autologin run` with extra flags.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("run")
            .args(args)
            .output()
            .expect("failed to run autologin run")
    }
}
