//! Tests for `autologin completions`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_autologin"))
        .stdout(predicate::str::contains("complete"));
}

#[test]
fn test_completions_zsh() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef autologin"));
}
