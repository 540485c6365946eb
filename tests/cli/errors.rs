//! Tests for error reporting and exit codes.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("encrypt"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_missing_key_is_configuration_error() {
    let t = Test::with_env_file(&format!("LOGIN_USER={}\nENC_PASSWORD=abc\n", USER));

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required environment variable SAFE_KEY");
    assert_stderr_contains(&output, "autologin encrypt");
}

#[test]
fn test_missing_ciphertext_names_variable() {
    let t = Test::new();
    let (key, _) = t.encrypt_one(PASSWORD);
    t.write_env(&format!("LOGIN_USER={}\nSAFE_KEY={}\n", USER, key));

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "ENC_PASSWORD");
}

#[test]
fn test_wrong_key_is_integrity_error() {
    let t = Test::new();
    let (_, ciphertext) = t.encrypt_one(PASSWORD);
    let (other_key, _) = t.encrypt_one(PASSWORD);
    t.write_env(&env_file(&other_key, &ciphertext));

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert_output_excludes(&output, "missing required");
}

#[test]
fn test_tampered_ciphertext_is_integrity_error() {
    let t = Test::new();
    let (key, ciphertext) = t.encrypt_one(PASSWORD);

    // Flip one character in the tag region, keeping valid base64.
    let mut chars: Vec<char> = ciphertext.chars().collect();
    let i = chars.len() - 5;
    chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();
    t.write_env(&env_file(&key, &tampered));

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
}

#[test]
fn test_short_username_rejected() {
    let t = Test::new();
    let (key, ciphertext) = t.encrypt_one(PASSWORD);
    t.write_env(&format!(
        "LOGIN_USER=bob\nSAFE_KEY={}\nENC_PASSWORD={}\n",
        key, ciphertext
    ));

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid username format");
}

#[test]
fn test_invalid_timeout_names_variable() {
    let t = Test::with_env_file("TIMEOUT=soon\n");

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "TIMEOUT");
}

#[test]
fn test_invalid_base_url_rejected() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("check")
        .env("BASE_URL", "ftp://example.com/")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "BASE_URL");
}
