//! Check command.
//!
//! Validates settings and credentials without launching a browser. The
//! password is decrypted to prove the key matches but is never printed.

use colored::Colorize;
use tracing::info;

use crate::cli::{output, Context};
use crate::core::credentials::CredentialStore;
use crate::core::selectors::SiteSelectors;
use crate::error::{Error, Result};

/// Outcome of one credential check.
struct Item {
    name: &'static str,
    detail: std::result::Result<String, Error>,
}

/// Run the checks and report them; the first failure is returned.
pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    let settings = &ctx.settings;
    let store = CredentialStore::from_env(&ctx.env);

    let items = vec![
        Item {
            name: "username",
            detail: store.validated_username().map(str::to_string),
        },
        Item {
            name: "password",
            detail: store.get_password().map(|_| "decrypts".to_string()),
        },
        Item {
            name: "selectors",
            detail: SiteSelectors::load()
                .map(|_| "valid".to_string())
                .map_err(Error::from),
        },
    ];

    let executable = settings
        .browser
        .resolve_executable()
        .map(|p| p.display().to_string());

    if json {
        let checks: serde_json::Map<String, serde_json::Value> = items
            .iter()
            .map(|item| {
                let value = match &item.detail {
                    Ok(detail) => serde_json::json!({ "ok": true, "detail": detail }),
                    Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
                };
                (item.name.to_string(), value)
            })
            .collect();

        let result = serde_json::json!({
            "base_url": settings.base_url,
            "timeout_secs": settings.timeout.as_secs(),
            "headless": settings.browser.headless,
            "channel": settings.browser.channel,
            "executable": executable,
            "log_file": settings.logging.file_path().display().to_string(),
            "key": store.key_fingerprint(),
            "checks": checks,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::section("Configuration");
        output::kv("url:       ", &settings.base_url);
        output::kv("timeout:   ", format!("{}s", settings.timeout.as_secs()));
        output::kv("headless:  ", settings.browser.headless);
        output::kv(
            "browser:   ",
            executable
                .or_else(|| settings.browser.channel.clone())
                .unwrap_or_else(|| "auto-detect".to_string()),
        );
        output::kv(
            "log file:  ",
            output::path(&settings.logging.file_path().display().to_string()),
        );
        if let Some(fingerprint) = store.key_fingerprint() {
            output::kv("key:       ", fingerprint);
        }

        output::section("Checks");
        for item in &items {
            match &item.detail {
                Ok(detail) => println!("  {} {}  {}", "✓".green(), item.name, detail.dimmed()),
                Err(e) => println!("  {} {}  {}", "✗".red(), item.name, e),
            }
        }
        println!();
    }

    let passed = items.iter().filter(|i| i.detail.is_ok()).count();
    info!(passed, total = items.len(), "configuration checked");

    match items.into_iter().find_map(|i| i.detail.err()) {
        Some(e) => Err(e),
        None => {
            if !json {
                output::success("ready to run");
            }
            Ok(())
        }
    }
}
