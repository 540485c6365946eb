//! Chrome DevTools Protocol driver.
//!
//! chromiumoxide is async; the driver owns a private current-thread tokio
//! runtime and blocks on it for every call, so callers stay synchronous.
//! The CDP event handler is a task on the same runtime and makes progress
//! whenever a call is blocking on the runtime.

use std::future::Future;
use std::time::{Duration, Instant};

use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams,
};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::{Driver, DriverResult, LaunchOptions};
use crate::core::selectors::Query;
use crate::error::BrowserError;

/// Poll interval while waiting on page state.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A launched browser with one isolated context and one page in it.
pub struct ChromeDriver {
    runtime: Runtime,
    browser: Option<Browser>,
    context: Option<BrowserContextId>,
    page: Option<Page>,
    handler: Option<JoinHandle<()>>,
    slow_mo: Duration,
}

impl ChromeDriver {
    /// Start the browser, create a fresh context and open a blank page.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Launch` if the runtime, the process, the
    /// context or the page cannot be created.
    pub fn launch(options: &LaunchOptions, request_timeout: Duration) -> DriverResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BrowserError::Launch(format!("failed to create runtime: {}", e)))?;

        let mut builder = BrowserConfig::builder().request_timeout(request_timeout);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = options.resolve_executable() {
            builder = builder.chrome_executable(executable);
        }
        for arg in &options.args {
            builder = builder.arg(arg.clone());
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        info!(
            headless = options.headless,
            channel = options.channel.as_deref().unwrap_or("default"),
            "launching browser"
        );

        let (mut browser, mut handler) = runtime
            .block_on(Browser::launch(config))
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = runtime.spawn(async move {
            while let Some(_event) = handler.next().await {
                // Drain CDP events; the browser stalls otherwise
            }
        });

        let context = runtime
            .block_on(browser.create_browser_context(CreateBrowserContextParams::default()))
            .map_err(|e| BrowserError::Launch(format!("failed to create context: {}", e)))?;
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context.clone())
            .build()
            .map_err(BrowserError::Launch)?;
        let page = runtime
            .block_on(browser.new_page(target))
            .map_err(|e| BrowserError::Launch(format!("failed to open page: {}", e)))?;

        debug!("browser context and page ready");

        Ok(Self {
            runtime,
            browser: Some(browser),
            context: Some(context),
            page: Some(page),
            handler: Some(handler),
            slow_mo: options.slow_mo,
        })
    }

    fn page(&self) -> DriverResult<&Page> {
        self.page.as_ref().ok_or(BrowserError::Closed)
    }

    fn pause(&self) {
        if !self.slow_mo.is_zero() {
            self.runtime.block_on(tokio::time::sleep(self.slow_mo));
        }
    }

    async fn find(page: &Page, query: &Query) -> DriverResult<Element> {
        let found = match query {
            Query::Css(css) => page.find_element(css.as_str()).await,
            Query::XPath(xpath) => page.find_xpath(xpath.as_str()).await,
        };
        found.map_err(|e| BrowserError::Driver(format!("element not found: {}", e)))
    }

    async fn eval<T: serde::de::DeserializeOwned>(page: &Page, script: String) -> DriverResult<T> {
        page.evaluate(script)
            .await
            .map_err(|e| BrowserError::Driver(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| BrowserError::Driver(format!("unexpected script result: {}", e)))
    }
}

/// JavaScript expression locating the first element matching `query`.
fn locate_js(query: &Query) -> String {
    // serde_json string encoding doubles as JS string escaping
    match query {
        Query::Css(css) => format!(
            "document.querySelector({})",
            serde_json::Value::from(css.as_str())
        ),
        Query::XPath(xpath) => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            serde_json::Value::from(xpath.as_str())
        ),
    }
}

fn visible_js(query: &Query) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; \
         const s = window.getComputedStyle(el); const r = el.getBoundingClientRect(); \
         return s.visibility !== 'hidden' && s.display !== 'none' && r.width > 0 && r.height > 0; }})()",
        locate_js(query)
    )
}

fn describe(query: &Query) -> String {
    match query {
        Query::Css(s) | Query::XPath(s) => s.clone(),
    }
}

#[derive(Debug, Deserialize)]
struct TextProbe {
    found: bool,
    text: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct NetworkSnapshot {
    state: String,
    resources: u64,
}

/// Poll `probe` until it reports `true`.
///
/// A failed probe counts as "not yet": while the page navigates its
/// execution context goes away and evaluation errors until the new document
/// is up. Only the caller's timeout ends the wait.
async fn poll_until<F, Fut>(mut probe: F, interval: Duration)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DriverResult<bool>>,
{
    loop {
        match probe().await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => trace!(error = %e, "probe failed, polling again"),
        }
        tokio::time::sleep(interval).await;
    }
}

/// Decides when the page has been quiet for long enough.
struct IdleTracker {
    quiet: Duration,
    last: Option<NetworkSnapshot>,
    stable_since: Instant,
}

impl IdleTracker {
    fn new(quiet: Duration, now: Instant) -> Self {
        Self {
            quiet,
            last: None,
            stable_since: now,
        }
    }

    /// Record one sample; `true` once the document is complete and the
    /// resource count has held for `quiet`. A failed sample restarts the
    /// window.
    fn observe(&mut self, sample: DriverResult<NetworkSnapshot>, now: Instant) -> bool {
        let snapshot = match sample {
            Ok(snapshot) => snapshot,
            Err(e) => {
                trace!(error = %e, "network probe failed, polling again");
                self.last = None;
                self.stable_since = now;
                return false;
            }
        };

        if self.last.as_ref() != Some(&snapshot) {
            self.stable_since = now;
            self.last = Some(snapshot);
            return false;
        }
        snapshot.state == "complete" && now.duration_since(self.stable_since) >= self.quiet
    }
}

impl Driver for ChromeDriver {
    fn goto(&mut self, url: &str, timeout: Duration) -> DriverResult<()> {
        let page = self.page()?;
        trace!(url, "goto");
        self.runtime
            .block_on(tokio::time::timeout(timeout, page.goto(url)))
            .map_err(|_| BrowserError::Timeout {
                what: format!("navigation to {}", url),
                seconds: timeout.as_secs_f64(),
            })?
            .map_err(|e| BrowserError::Driver(e.to_string()))?;
        self.pause();
        Ok(())
    }

    fn wait_visible(&mut self, query: &Query, timeout: Duration) -> DriverResult<()> {
        let page = self.page()?;
        let script = visible_js(query);

        let waited = self.runtime.block_on(tokio::time::timeout(
            timeout,
            poll_until(|| Self::eval::<bool>(page, script.clone()), POLL_INTERVAL),
        ));

        waited.map_err(|_| BrowserError::Timeout {
            what: format!("{} to become visible", describe(query)),
            seconds: timeout.as_secs_f64(),
        })
    }

    fn is_visible(&mut self, query: &Query) -> DriverResult<bool> {
        let page = self.page()?;
        self.runtime.block_on(Self::eval::<bool>(page, visible_js(query)))
    }

    fn click(&mut self, query: &Query) -> DriverResult<()> {
        let page = self.page()?;
        self.runtime.block_on(async {
            let element = Self::find(page, query).await?;
            element
                .click()
                .await
                .map_err(|e| BrowserError::Driver(e.to_string()))?;
            Ok::<_, BrowserError>(())
        })?;
        self.pause();
        Ok(())
    }

    fn fill(&mut self, query: &Query, value: &str) -> DriverResult<()> {
        let page = self.page()?;
        self.runtime.block_on(async {
            let element = Self::find(page, query).await?;
            element
                .call_js_fn(
                    "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }",
                    false,
                )
                .await
                .map_err(|e| BrowserError::Driver(e.to_string()))?;
            element
                .click()
                .await
                .map_err(|e| BrowserError::Driver(e.to_string()))?;
            element
                .type_str(value)
                .await
                .map_err(|e| BrowserError::Driver(e.to_string()))?;
            Ok::<_, BrowserError>(())
        })?;
        self.pause();
        Ok(())
    }

    fn is_checked(&mut self, query: &Query) -> DriverResult<bool> {
        let page = self.page()?;
        let script = format!("(() => {{ const el = {}; return !!(el && el.checked); }})()", locate_js(query));
        self.runtime.block_on(Self::eval::<bool>(page, script))
    }

    fn text(&mut self, query: &Query) -> DriverResult<String> {
        let page = self.page()?;
        let script = format!(
            "(() => {{ const el = {}; return {{ found: !!el, text: el ? (el.innerText || el.textContent || '') : '' }}; }})()",
            locate_js(query)
        );
        let probe = self
            .runtime
            .block_on(Self::eval::<TextProbe>(page, script))?;
        if !probe.found {
            return Err(BrowserError::Driver(format!(
                "element not found: {}",
                describe(query)
            )));
        }
        Ok(probe.text)
    }

    fn title(&mut self) -> DriverResult<String> {
        let page = self.page()?;
        self.runtime
            .block_on(Self::eval::<String>(page, "document.title".to_string()))
    }

    fn content(&mut self) -> DriverResult<String> {
        let page = self.page()?;
        self.runtime
            .block_on(page.content())
            .map_err(|e| BrowserError::Driver(e.to_string()))
    }

    fn screenshot(&mut self, full_page: bool) -> DriverResult<Vec<u8>> {
        let page = self.page()?;
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(full_page)
            .build();
        self.runtime
            .block_on(page.screenshot(params))
            .map_err(|e| BrowserError::Driver(e.to_string()))
    }

    fn wait_for_network_idle(&mut self, quiet: Duration, timeout: Duration) -> DriverResult<()> {
        let page = self.page()?;
        // Finished resource entries only grow; idle means the document has
        // loaded and the count held still for the whole quiet window.
        let script = "({ state: document.readyState, resources: performance.getEntriesByType('resource').length })".to_string();

        let waited = self.runtime.block_on(tokio::time::timeout(timeout, async {
            let mut tracker = IdleTracker::new(quiet, Instant::now());
            loop {
                let snapshot = Self::eval::<NetworkSnapshot>(page, script.clone()).await;
                if tracker.observe(snapshot, Instant::now()) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }));

        waited.map_err(|_| BrowserError::Timeout {
            what: "network idle".to_string(),
            seconds: timeout.as_secs_f64(),
        })
    }

    fn close(&mut self) -> DriverResult<()> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };
        let page = self.page.take();
        let context = self.context.take();

        let closed = self.runtime.block_on(async {
            if let Some(page) = page {
                if let Err(e) = page.close().await {
                    debug!(error = %e, "page close failed");
                }
            }
            if let Some(context) = context {
                if let Err(e) = browser.dispose_browser_context(context).await {
                    debug!(error = %e, "context dispose failed");
                }
            }
            let closed = browser.close().await.map(|_| ());
            if let Err(e) = browser.wait().await {
                debug!(error = %e, "browser process wait failed");
            }
            closed
        });

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        closed.map_err(|e| BrowserError::Driver(format!("browser close failed: {}", e)))
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "browser cleanup failed");
        }
    }
}
