//! Page element selectors for the target site.
//!
//! Selectors are grouped per page into typed tables that are parsed and
//! validated once, when [`SiteSelectors::load`] runs, instead of being looked
//! up by name at call time.
//!
//! Three syntaxes are accepted:
//!
//! - CSS (default): `#username`, `button[type='submit']`
//! - XPath: anything starting with `//` or `(`
//! - text: `text=Welcome` matches an element whose own text contains the
//!   string, ignoring ASCII case; `text='Welcome'` (quoted) matches the
//!   whole whitespace-normalized text exactly

use std::fmt;

use crate::error::ConfigError;

/// A parsed element selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Css(String),
    XPath(String),
    Text { text: String, exact: bool },
}

/// How a selector is executed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Css(String),
    XPath(String),
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem for empty input, an empty text
    /// pattern, or unbalanced brackets.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("selector is empty".to_string());
        }

        if let Some(text) = raw.strip_prefix("text=") {
            let text = text.trim();
            let (text, exact) = match unquote(text) {
                Some(inner) => (inner, true),
                None => (text, false),
            };
            if text.trim().is_empty() {
                return Err("text selector has no text".to_string());
            }
            return Ok(Selector::Text {
                text: text.to_string(),
                exact,
            });
        }

        check_balanced(raw)?;

        if raw.starts_with("//") || raw.starts_with('(') {
            Ok(Selector::XPath(raw.to_string()))
        } else {
            Ok(Selector::Css(raw.to_string()))
        }
    }

    /// The CSS or XPath expression the driver should evaluate.
    pub fn query(&self) -> Query {
        match self {
            Selector::Css(css) => Query::Css(css.clone()),
            Selector::XPath(xpath) => Query::XPath(xpath.clone()),
            Selector::Text { text, exact: true } => Query::XPath(format!(
                "//*[text()[normalize-space(.) = {}]]",
                xpath_literal(text.trim())
            )),
            // translate() folds ASCII only
            Selector::Text { text, exact: false } => Query::XPath(format!(
                "//*[text()[contains(translate(normalize-space(.), '{}', '{}'), {})]]",
                ASCII_UPPER,
                ASCII_LOWER,
                xpath_literal(&text.to_lowercase())
            )),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(s) | Selector::XPath(s) => f.write_str(s),
            Selector::Text { text, exact: false } => write!(f, "text={}", text),
            Selector::Text { text, exact: true } if text.contains('\'') => {
                write!(f, "text=\"{}\"", text)
            }
            Selector::Text { text, exact: true } => write!(f, "text='{}'", text),
        }
    }
}

const ASCII_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ASCII_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Inner text of a string wrapped in matching single or double quotes.
fn unquote(raw: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find(|q| raw.len() >= 2 && raw.starts_with(*q) && raw.ends_with(*q))
        .map(|_| &raw[1..raw.len() - 1])
}

fn check_balanced(raw: &str) -> Result<(), String> {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;

    for ch in raw.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '[' | '(' => stack.push(ch),
            ']' if stack.pop() != Some('[') => return Err("unbalanced ']'".to_string()),
            ')' if stack.pop() != Some('(') => return Err("unbalanced ')'".to_string()),
            _ => {}
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if let Some(open) = stack.pop() {
        return Err(format!("unclosed '{}'", open));
    }
    Ok(())
}

/// Quote a string as an XPath 1.0 literal, using `concat()` when it
/// contains both quote kinds.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Page identifiers for table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Login,
    Dashboard,
    Common,
}

impl PageId {
    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Login => "login",
            PageId::Dashboard => "dashboard",
            PageId::Common => "common",
        }
    }
}

/// Login form.
#[derive(Debug, Clone)]
pub struct LoginSelectors {
    pub username: Selector,
    pub password: Selector,
    /// "Remember me" / terms agreement checkbox. Optional on the page.
    pub remember_me: Selector,
    pub submit: Selector,
    pub error_message: Selector,
}

/// Landing page after a successful login.
#[derive(Debug, Clone)]
pub struct DashboardSelectors {
    pub welcome: Selector,
}

impl DashboardSelectors {
    /// Sidebar entry whose label contains `name`.
    pub fn menu_item(&self, name: &str) -> Selector {
        Selector::XPath(format!(
            "//li[contains(@class,'menu-item') and contains(text(),{})]",
            xpath_literal(name)
        ))
    }
}

/// Widgets shared across pages.
#[derive(Debug, Clone)]
pub struct CommonSelectors {
    pub loading: Selector,
    pub notification: Selector,
    pub dialog_confirm: Selector,
    pub dialog_cancel: Selector,
}

/// All selector tables for the site.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub login: LoginSelectors,
    pub dashboard: DashboardSelectors,
    pub common: CommonSelectors,
}

const LOGIN: &[(&str, &str)] = &[
    ("username", "#username"),
    ("password", "#password"),
    ("remember_me", "input[type='checkbox'][name='remember']"),
    ("submit_button", "button[type='submit']"),
    ("error_message", ".error-message"),
];

const DASHBOARD: &[(&str, &str)] = &[("welcome_message", "text=Welcome")];

const COMMON: &[(&str, &str)] = &[
    ("loading", ".spinner"),
    ("notification", ".notyf__message"),
    ("dialog_confirm", "//button[contains(., 'Confirm')]"),
    ("dialog_cancel", "//button[contains(., 'Cancel')]"),
];

fn raw_table(page: PageId) -> &'static [(&'static str, &'static str)] {
    match page {
        PageId::Login => LOGIN,
        PageId::Dashboard => DASHBOARD,
        PageId::Common => COMMON,
    }
}

struct TableParser {
    page: PageId,
}

impl TableParser {
    fn take(&self, element: &'static str) -> Result<Selector, ConfigError> {
        let raw = raw_table(self.page)
            .iter()
            .find(|(name, _)| *name == element)
            .map(|(_, raw)| *raw)
            .ok_or_else(|| ConfigError::Selector {
                page: self.page.as_str(),
                element,
                reason: "not defined".to_string(),
            })?;
        Selector::parse(raw).map_err(|reason| ConfigError::Selector {
            page: self.page.as_str(),
            element,
            reason,
        })
    }
}

impl SiteSelectors {
    /// Parse and validate every table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Selector` naming the first invalid entry.
    pub fn load() -> Result<Self, ConfigError> {
        let login = TableParser {
            page: PageId::Login,
        };
        let dashboard = TableParser {
            page: PageId::Dashboard,
        };
        let common = TableParser {
            page: PageId::Common,
        };

        Ok(Self {
            login: LoginSelectors {
                username: login.take("username")?,
                password: login.take("password")?,
                remember_me: login.take("remember_me")?,
                submit: login.take("submit_button")?,
                error_message: login.take("error_message")?,
            },
            dashboard: DashboardSelectors {
                welcome: dashboard.take("welcome_message")?,
            },
            common: CommonSelectors {
                loading: common.take("loading")?,
                notification: common.take("notification")?,
                dialog_confirm: common.take("dialog_confirm")?,
                dialog_cancel: common.take("dialog_cancel")?,
            },
        })
    }

    /// Look up a selector by page and element name.
    pub fn get(&self, page: PageId, element: &str) -> Option<&Selector> {
        match (page, element) {
            (PageId::Login, "username") => Some(&self.login.username),
            (PageId::Login, "password") => Some(&self.login.password),
            (PageId::Login, "remember_me") => Some(&self.login.remember_me),
            (PageId::Login, "submit_button") => Some(&self.login.submit),
            (PageId::Login, "error_message") => Some(&self.login.error_message),
            (PageId::Dashboard, "welcome_message") => Some(&self.dashboard.welcome),
            (PageId::Common, "loading") => Some(&self.common.loading),
            (PageId::Common, "notification") => Some(&self.common.notification),
            (PageId::Common, "dialog_confirm") => Some(&self.common.dialog_confirm),
            (PageId::Common, "dialog_cancel") => Some(&self.common.dialog_cancel),
            _ => None,
        }
    }
}
