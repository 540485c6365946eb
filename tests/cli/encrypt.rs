//! Tests for `autologin encrypt`.

use crate::support::*;

#[test]
fn test_encrypt_prints_env_lines() {
    let t = Test::new();

    let output = t.encrypt(&[PASSWORD]);
    assert_success(&output);

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2, "got: {}", out);
    assert!(lines[0].starts_with("SAFE_KEY="));
    assert!(lines[1].starts_with("ENC_PASSWORD="));
    assert_eq!(lines[0].len(), "SAFE_KEY=".len() + 44);
    assert_output_excludes(&output, PASSWORD);
}

#[test]
fn test_encrypt_shares_one_key() {
    let t = Test::new();

    let output = t.encrypt(&["first-password", "second-password"]);
    assert_success(&output);

    let pairs = parse_pairs(&stdout(&output));
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].0, pairs[1].0);
    assert_ne!(pairs[0].1, pairs[1].1);
}

#[test]
fn test_encrypt_stops_at_empty_line() {
    let t = Test::new();

    let output = t.encrypt(&["one", "", "two"]);
    assert_success(&output);
    assert_eq!(parse_pairs(&stdout(&output)).len(), 1);
}

#[test]
fn test_encrypt_writes_no_files() {
    let t = Test::new();

    assert_success(&t.encrypt(&[PASSWORD]));
    assert_eq!(std::fs::read_dir(t.dir.path()).unwrap().count(), 0);
}

#[test]
fn test_encrypted_password_passes_check() {
    let t = Test::new();
    let (key, ciphertext) = t.encrypt_one(PASSWORD);
    t.write_env(&env_file(&key, &ciphertext));

    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, "ready to run");
    assert_output_excludes(&output, PASSWORD);
    assert_output_excludes(&output, &key);
}
