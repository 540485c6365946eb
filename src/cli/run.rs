//! Run command.
//!
//! Decrypts the password, launches the browser and drives the login
//! workflow. Credential problems are reported before any browser starts.

use std::time::Duration;

use tracing::{error, info};

use crate::cli::{output, Context, RunArgs};
use crate::core::browser::{BrowserSession, ChromeDriver, LaunchOverrides};
use crate::core::credentials::CredentialStore;
use crate::core::selectors::SiteSelectors;
use crate::core::workflow::{self, Login, LoginPlan};
use crate::error::Result;

/// Turn command-line flags into launch overrides.
pub fn overrides(args: &RunArgs) -> LaunchOverrides {
    LaunchOverrides {
        headless: args.headed.then_some(false),
        slow_mo: args.slow_mo.map(Duration::from_millis),
        channel: args.channel.clone(),
        executable: args.browser_path.clone(),
        args: None,
    }
}

/// Run the login workflow.
pub fn execute(ctx: &Context, args: &RunArgs) -> Result<()> {
    let settings = &ctx.settings;
    info!(url = %settings.base_url, "starting automation");

    let store = CredentialStore::from_env(&ctx.env);
    let (username, password) = match store
        .validated_username()
        .and_then(|user| store.get_password().map(|pw| (user, pw)))
    {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "credential error");
            return Err(e);
        }
    };

    let selectors = SiteSelectors::load()?;
    let launch = settings.browser.merged(&overrides(args));

    let driver = ChromeDriver::launch(&launch, settings.timeout)?;
    let mut session = BrowserSession::from_settings(driver, settings)?;

    let plan = LoginPlan {
        menu: args.menu.clone(),
        expected_title: args.expect_title.clone(),
        ..LoginPlan::new(settings.base_url.clone())
    };
    let login = Login {
        username,
        password: &password,
    };

    let screenshot = workflow::run(&mut session, &selectors, &plan, &login)?;

    output::success(&format!("signed in as {}", username));
    output::kv("screenshot:", output::path(&screenshot.display().to_string()));
    Ok(())
}
