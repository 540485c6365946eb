//! Browser automation.
//!
//! [`BrowserSession`] adds logging, failure screenshots and error context on
//! top of a [`Driver`], which performs the raw page operations. The
//! production driver is [`ChromeDriver`] (Chrome DevTools Protocol via
//! chromiumoxide); tests plug in a scripted driver.
//!
//! ## Adding a New Driver
//!
//! 1. Implement the `Driver` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use std::time::Duration;

use crate::core::selectors::Query;
use crate::error::BrowserError;

mod chrome;
mod options;
mod session;

pub use chrome::ChromeDriver;
pub use options::{LaunchOptions, LaunchOverrides};
pub use session::BrowserSession;

/// Result type for raw driver operations.
pub type DriverResult<T> = std::result::Result<T, BrowserError>;

/// Raw page operations against one page of one browser context.
///
/// Every call blocks until the browser reports completion. Operations that
/// take a `timeout` return `BrowserError::Timeout` when it elapses.
pub trait Driver {
    /// Load `url` and wait for the load event.
    fn goto(&mut self, url: &str, timeout: Duration) -> DriverResult<()>;

    /// Wait until the element exists and is rendered with a non-zero box.
    fn wait_visible(&mut self, query: &Query, timeout: Duration) -> DriverResult<()>;

    /// Check visibility once, without waiting.
    fn is_visible(&mut self, query: &Query) -> DriverResult<bool>;

    /// Click the element.
    fn click(&mut self, query: &Query) -> DriverResult<()>;

    /// Clear the element's value and type `value` into it.
    fn fill(&mut self, query: &Query, value: &str) -> DriverResult<()>;

    /// Whether a checkbox or radio element is checked.
    fn is_checked(&mut self, query: &Query) -> DriverResult<bool>;

    /// Rendered text of the element.
    fn text(&mut self, query: &Query) -> DriverResult<String>;

    /// Current document title.
    fn title(&mut self) -> DriverResult<String>;

    /// Current document HTML.
    fn content(&mut self) -> DriverResult<String>;

    /// PNG screenshot of the page.
    fn screenshot(&mut self, full_page: bool) -> DriverResult<Vec<u8>>;

    /// Wait until no network activity is seen for `quiet`.
    fn wait_for_network_idle(&mut self, quiet: Duration, timeout: Duration) -> DriverResult<()>;

    /// Close page, context and browser, in that order. Idempotent.
    fn close(&mut self) -> DriverResult<()>;
}
