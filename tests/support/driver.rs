//! Scripted in-memory driver.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use autologin::core::browser::{Driver, DriverResult};
use autologin::core::selectors::Query;
use autologin::error::BrowserError;

/// PNG signature; enough for the session to write a file.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

/// A driver that plays back a scripted page and records every call.
///
/// Elements are visible unless their query contains one of `hidden`.
#[derive(Default)]
pub struct FakeDriver {
    /// Calls in order, e.g. `click css:#submit`.
    pub calls: Vec<String>,
    /// Query substrings that never become visible.
    pub hidden: Vec<String>,
    /// Text returned for queries containing the key.
    pub texts: HashMap<String, String>,
    /// Titles handed out in order; the last one repeats.
    pub titles: VecDeque<String>,
    /// Whether checkboxes start ticked.
    pub checked: bool,
    /// Fail every `goto`.
    pub fail_goto: bool,
    /// Fail every screenshot.
    pub fail_screenshot: bool,
    /// Number of times `close` reached the driver.
    pub closes: usize,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide(mut self, pattern: &str) -> Self {
        self.hidden.push(pattern.to_string());
        self
    }

    pub fn text(mut self, pattern: &str, text: &str) -> Self {
        self.texts.insert(pattern.to_string(), text.to_string());
        self
    }

    pub fn titles(mut self, titles: &[&str]) -> Self {
        self.titles = titles.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Recorded calls whose text starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn visible(&self, query: &Query) -> bool {
        let key = describe(query);
        !self.hidden.iter().any(|h| key.contains(h.as_str()))
    }
}

/// Stable text form of a query.
pub fn describe(query: &Query) -> String {
    match query {
        Query::Css(css) => format!("css:{}", css),
        Query::XPath(xpath) => format!("xpath:{}", xpath),
    }
}

impl Driver for FakeDriver {
    fn goto(&mut self, url: &str, _timeout: Duration) -> DriverResult<()> {
        self.calls.push(format!("goto {}", url));
        if self.fail_goto {
            return Err(BrowserError::Driver("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        Ok(())
    }

    fn wait_visible(&mut self, query: &Query, timeout: Duration) -> DriverResult<()> {
        self.calls.push(format!("wait {}", describe(query)));
        if self.visible(query) {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                what: describe(query),
                seconds: timeout.as_secs_f64(),
            })
        }
    }

    fn is_visible(&mut self, query: &Query) -> DriverResult<bool> {
        self.calls.push(format!("visible? {}", describe(query)));
        Ok(self.visible(query))
    }

    fn click(&mut self, query: &Query) -> DriverResult<()> {
        self.calls.push(format!("click {}", describe(query)));
        Ok(())
    }

    fn fill(&mut self, query: &Query, value: &str) -> DriverResult<()> {
        self.calls
            .push(format!("fill {} ({} chars)", describe(query), value.len()));
        Ok(())
    }

    fn is_checked(&mut self, query: &Query) -> DriverResult<bool> {
        self.calls.push(format!("checked? {}", describe(query)));
        Ok(self.checked)
    }

    fn text(&mut self, query: &Query) -> DriverResult<String> {
        let key = describe(query);
        self.calls.push(format!("text {}", key));
        Ok(self
            .texts
            .iter()
            .find(|(pattern, _)| key.contains(pattern.as_str()))
            .map(|(_, text)| text.clone())
            .unwrap_or_default())
    }

    fn title(&mut self) -> DriverResult<String> {
        self.calls.push("title".to_string());
        let title = if self.titles.len() > 1 {
            self.titles.pop_front()
        } else {
            self.titles.front().cloned()
        };
        Ok(title.unwrap_or_default())
    }

    fn content(&mut self) -> DriverResult<String> {
        self.calls.push("content".to_string());
        Ok("<html><body>fake</body></html>".to_string())
    }

    fn screenshot(&mut self, full_page: bool) -> DriverResult<Vec<u8>> {
        self.calls.push(format!("screenshot full={}", full_page));
        if self.fail_screenshot {
            return Err(BrowserError::Driver("page crashed".to_string()));
        }
        Ok(FAKE_PNG.to_vec())
    }

    fn wait_for_network_idle(&mut self, quiet: Duration, _timeout: Duration) -> DriverResult<()> {
        self.calls
            .push(format!("network idle {}ms", quiet.as_millis()));
        Ok(())
    }

    fn close(&mut self) -> DriverResult<()> {
        self.calls.push("close".to_string());
        self.closes += 1;
        Ok(())
    }
}
