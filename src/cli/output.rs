//! Terminal output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success
//! - Red: errors
//! - Cyan: paths and hints
//! - Bold: headers and values
//! - Dimmed: secondary info

use colored::Colorize;
use std::fmt::Display;

const RULE_WIDTH: usize = 48;

fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ signed in as alice`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", "✓".green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a hint to stderr (cyan).
///
/// Example: `→ run: autologin encrypt`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "→".cyan(), msg.cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold header.
pub fn header(title: &str) {
    if colors_enabled() {
        println!("{}", title.bold());
    } else {
        println!("{}", title);
    }
}

/// Print a key-value pair (label dimmed, value bold).
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", label.dimmed(), value.to_string().bold());
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Print a horizontal rule.
pub fn rule() {
    if colors_enabled() {
        println!("{}", "─".repeat(RULE_WIDTH).dimmed());
    } else {
        println!("{}", "─".repeat(RULE_WIDTH));
    }
}

/// Format a path in cyan for inline use.
pub fn path(p: &str) -> String {
    if colors_enabled() {
        p.cyan().to_string()
    } else {
        p.to_string()
    }
}

/// Print a dimmed message to stderr, so stdout stays pasteable.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        eprintln!("{}", msg.dimmed());
    } else {
        eprintln!("{}", msg);
    }
}

/// Print a section header with a separator line.
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}
