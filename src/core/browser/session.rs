//! Logged, screenshot-on-failure wrapper around a [`Driver`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::Driver;
use crate::core::constants::{tags, NETWORK_IDLE_WINDOW_MS, TIMESTAMP_FORMAT};
use crate::core::selectors::Selector;
use crate::core::settings::Settings;
use crate::error::{BrowserError, Result};

/// One page in one browser context, plus where its artifacts go.
///
/// Dropping the session drops the driver, which releases the browser.
pub struct BrowserSession<D: Driver> {
    driver: D,
    screenshot_dir: PathBuf,
    dump_dir: PathBuf,
    timeout: Duration,
    closed: bool,
}

impl<D: Driver> BrowserSession<D> {
    /// Wrap `driver`, creating the artifact directories if needed.
    pub fn new(
        driver: D,
        screenshot_dir: impl Into<PathBuf>,
        dump_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<Self> {
        let screenshot_dir = screenshot_dir.into();
        let dump_dir = dump_dir.into();
        std::fs::create_dir_all(&screenshot_dir)?;
        std::fs::create_dir_all(&dump_dir)?;

        Ok(Self {
            driver,
            screenshot_dir,
            dump_dir,
            timeout,
            closed: false,
        })
    }

    /// Wrap `driver` using the directories and timeout from `settings`.
    pub fn from_settings(driver: D, settings: &Settings) -> Result<Self> {
        Self::new(
            driver,
            settings.screenshot_dir(),
            settings.logging.dir.clone(),
            settings.timeout,
        )
    }

    /// Default timeout for operations called with `None`.
    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    /// Borrow the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Load `url`.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Navigation` with the URL and cause, after
    /// saving a `navigation_error` screenshot.
    pub fn navigate(&mut self, url: &str, timeout: Option<Duration>) -> Result<()> {
        self.ensure_open()?;
        let timeout = timeout.unwrap_or(self.timeout);

        match self.driver.goto(url, timeout) {
            Ok(()) => {
                info!(url, "navigated");
                Ok(())
            }
            Err(e) => {
                self.capture_failure(tags::NAVIGATION_ERROR);
                Err(BrowserError::Navigation {
                    url: url.to_string(),
                    cause: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Wait for `selector` to become visible, then click it.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Click` with the selector and cause, after
    /// saving a `click_error` screenshot.
    pub fn click_element(&mut self, selector: &Selector, timeout: Option<Duration>) -> Result<()> {
        self.ensure_open()?;
        let timeout = timeout.unwrap_or(self.timeout);
        let query = selector.query();

        let outcome = self
            .driver
            .wait_visible(&query, timeout)
            .and_then(|()| self.driver.click(&query));

        match outcome {
            Ok(()) => {
                info!(%selector, "clicked");
                Ok(())
            }
            Err(e) => {
                self.capture_failure(tags::CLICK_ERROR);
                Err(BrowserError::Click {
                    selector: selector.to_string(),
                    cause: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Wait for `selector` to become visible, clear it and type `value`.
    ///
    /// The value itself is never logged.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Fill` after saving a `fill_error` screenshot.
    pub fn fill(&mut self, selector: &Selector, value: &str, timeout: Option<Duration>) -> Result<()> {
        self.ensure_open()?;
        let timeout = timeout.unwrap_or(self.timeout);
        let query = selector.query();

        let outcome = self
            .driver
            .wait_visible(&query, timeout)
            .and_then(|()| self.driver.fill(&query, value));

        match outcome {
            Ok(()) => {
                info!(%selector, chars = value.chars().count(), "filled");
                Ok(())
            }
            Err(e) => {
                self.capture_failure(tags::FILL_ERROR);
                Err(BrowserError::Fill {
                    selector: selector.to_string(),
                    cause: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Block until `selector` is visible.
    pub fn wait_for_selector(&mut self, selector: &Selector, timeout: Option<Duration>) -> Result<()> {
        self.ensure_open()?;
        let timeout = timeout.unwrap_or(self.timeout);
        self.driver.wait_visible(&selector.query(), timeout)?;
        debug!(%selector, "visible");
        Ok(())
    }

    /// Whether `selector` is visible right now.
    pub fn is_visible(&mut self, selector: &Selector) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.driver.is_visible(&selector.query())?)
    }

    /// Tick a checkbox unless it is already ticked.
    ///
    /// Returns `true` if a click was needed.
    pub fn ensure_checked(&mut self, selector: &Selector, timeout: Option<Duration>) -> Result<bool> {
        self.ensure_open()?;
        if self.driver.is_checked(&selector.query())? {
            debug!(%selector, "already checked");
            return Ok(false);
        }
        self.click_element(selector, timeout)?;
        Ok(true)
    }

    /// Current page title.
    pub fn title(&mut self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.driver.title()?)
    }

    /// Rendered text of `selector`.
    pub fn text_of(&mut self, selector: &Selector) -> Result<String> {
        self.ensure_open()?;
        Ok(self.driver.text(&selector.query())?)
    }

    /// Block until the page has had no network activity for 500 ms.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Timeout` if the page never settles.
    pub fn wait_for_network_idle(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.ensure_open()?;
        let timeout = timeout.unwrap_or(self.timeout);
        self.driver
            .wait_for_network_idle(Duration::from_millis(NETWORK_IDLE_WINDOW_MS), timeout)?;
        debug!("network idle");
        Ok(())
    }

    /// Save a full-page PNG as `{name}_{yyyyMMdd_HHmmss}.png`.
    pub fn capture_screenshot(&mut self, name: &str) -> Result<PathBuf> {
        self.ensure_open()?;
        let path = self.screenshot_dir.join(format!("{}_{}.png", name, timestamp()));

        let png = self.driver.screenshot(true)?;
        std::fs::write(&path, png).map_err(|e| BrowserError::Screenshot {
            path: path.clone(),
            cause: e.to_string(),
        })?;

        info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }

    /// Save the page HTML as `{name}_{yyyyMMdd_HHmmss}.html` in the log
    /// directory.
    pub fn save_page_content(&mut self, name: &str) -> Result<PathBuf> {
        self.ensure_open()?;
        let path = self.dump_dir.join(format!("{}_{}.html", name, timestamp()));
        let html = self.driver.content()?;
        std::fs::write(&path, html)?;
        info!(path = %path.display(), "page content saved");
        Ok(path)
    }

    /// Close the browser. Later operations fail with `BrowserError::Closed`.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.driver.close()?;
        info!("browser closed");
        Ok(())
    }

    /// Screenshot for an error path. Failures are logged, never returned, so
    /// the operation error is the one the caller sees.
    pub(crate) fn capture_failure(&mut self, tag: &str) -> Option<PathBuf> {
        match self.capture_screenshot(tag) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(tag, error = %e, "could not capture failure screenshot");
                None
            }
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(BrowserError::Closed.into());
        }
        Ok(())
    }
}

fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
