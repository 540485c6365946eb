//! Tests for `autologin run` up to the point a browser would start.

use crate::support::*;

#[test]
fn test_run_without_credentials_fails_before_launch() {
    let t = Test::with_env_file(&format!("LOGIN_USER={}\n", USER));

    let output = t.run(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "SAFE_KEY");

    // Logging is set up before credentials are read.
    assert!(t.path("logs/screenshots").is_dir());
    let log = std::fs::read_to_string(t.path("logs/automation.log")).unwrap();
    assert!(log.contains("starting automation"));
    assert!(log.contains("credential error"));
    assert!(!log.contains("launching browser"));
}

#[test]
fn test_run_wrong_key_never_launches() {
    let t = Test::new();
    let (_, ciphertext) = t.encrypt_one(PASSWORD);
    let (other_key, _) = t.encrypt_one(PASSWORD);
    t.write_env(&env_file(&other_key, &ciphertext));

    let output = t.run(&["--headed"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");

    let log = std::fs::read_to_string(t.path("logs/automation.log")).unwrap();
    assert!(!log.contains("launching browser"));
}

#[test]
fn test_run_respects_log_dir_and_file() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("run")
        .env("LOG_DIR", "out")
        .env("LOG_FILE", "session.log")
        .output()
        .unwrap();
    assert_failure(&output);

    assert!(t.path("out/session.log").is_file());
    assert!(t.path("out/screenshots").is_dir());
    assert!(!t.path("logs").exists());
}

#[test]
fn test_run_log_file_is_appended() {
    let t = Test::new();

    assert_failure(&t.run(&[]));
    assert_failure(&t.run(&[]));

    let log = std::fs::read_to_string(t.path("logs/automation.log")).unwrap();
    assert_eq!(log.matches("starting automation").count(), 2);
}

#[test]
fn test_run_rejects_bad_slow_mo_env() {
    let t = Test::with_env_file("SLOW_MO=fast\n");

    let output = t.run(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "SLOW_MO");
}
