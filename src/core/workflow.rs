//! The login workflow.
//!
//! Sequences the session operations against the site's selector tables:
//! open the site, sign in, confirm the dashboard, then run the post-login
//! check under a retry policy.

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::core::browser::{BrowserSession, Driver};
use crate::core::constants::tags;
use crate::core::credentials::Password;
use crate::core::retry::RetryPolicy;
use crate::core::selectors::SiteSelectors;
use crate::error::{BrowserError, Error, Result};

/// What to do once the browser is up.
#[derive(Debug, Clone)]
pub struct LoginPlan {
    /// Page the workflow starts from.
    pub base_url: String,
    /// Sidebar entry opened by the post-login check.
    pub menu: String,
    /// Substring the page title must contain after opening `menu`.
    pub expected_title: String,
    /// Retry policy for the post-login check.
    pub retry: RetryPolicy,
}

impl LoginPlan {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            menu: "Reports".to_string(),
            expected_title: "Report Dashboard".to_string(),
            retry: RetryPolicy::POST_LOGIN,
        }
    }
}

/// Login credentials handed to the workflow.
pub struct Login<'a> {
    pub username: &'a str,
    pub password: &'a Password,
}

/// Run the workflow and always release the browser.
///
/// On failure an `error_final` screenshot is taken before the browser is
/// closed; the workflow error is returned, never the cleanup error.
pub fn run<D: Driver>(
    session: &mut BrowserSession<D>,
    selectors: &SiteSelectors,
    plan: &LoginPlan,
    login: &Login<'_>,
) -> Result<PathBuf> {
    let outcome = sign_in_and_check(session, selectors, plan, login);

    if let Err(e) = &outcome {
        error!(error = %e, "automation failed");
        session.capture_failure(tags::ERROR_FINAL);
    }

    if let Err(e) = session.close() {
        error!(error = %e, "failed to close browser");
    }
    info!("automation finished");

    outcome
}

/// The workflow steps, without cleanup.
pub fn sign_in_and_check<D: Driver>(
    session: &mut BrowserSession<D>,
    selectors: &SiteSelectors,
    plan: &LoginPlan,
    login: &Login<'_>,
) -> Result<PathBuf> {
    session.navigate(&plan.base_url, None)?;

    let form = &selectors.login;
    session.fill(&form.username, login.username, None)?;
    session.fill(&form.password, login.password.expose(), None)?;

    if session.is_visible(&form.remember_me)? {
        session.ensure_checked(&form.remember_me, None)?;
    } else {
        debug!("no remember-me checkbox on page");
    }

    session.click_element(&form.submit, None)?;
    verify_signed_in(session, selectors)?;
    info!(user = login.username, "signed in");

    let menu = selectors.dashboard.menu_item(&plan.menu);
    plan.retry.run(|| -> Result<()> {
        session.click_element(&menu, None)?;
        let title = session.title()?;
        if title.contains(&plan.expected_title) {
            Ok(())
        } else {
            Err(BrowserError::Check(format!(
                "title {:?} does not contain {:?}",
                title, plan.expected_title
            ))
            .into())
        }
    })?;
    info!(menu = %plan.menu, "post-login check passed");

    session.capture_screenshot(tags::FINAL_PAGE)
}

/// Wait for the dashboard; if it never shows, surface the site's own error
/// message when there is one.
fn verify_signed_in<D: Driver>(
    session: &mut BrowserSession<D>,
    selectors: &SiteSelectors,
) -> Result<()> {
    let waited = session.wait_for_selector(&selectors.dashboard.welcome, None);
    let Err(wait_error) = waited else {
        return Ok(());
    };

    let message = &selectors.login.error_message;
    if matches!(session.is_visible(message), Ok(true)) {
        let text = session
            .text_of(message)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        if !text.is_empty() {
            return Err(Error::Browser(BrowserError::LoginRejected(text)));
        }
    }
    Err(wait_error)
}
