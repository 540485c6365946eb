//! Environment lookup and `.env` file support.
//!
//! Configuration is read through the [`EnvSource`] trait so that tests can
//! inject a fixed set of variables instead of mutating the process
//! environment.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Source of environment-style key/value configuration.
pub trait EnvSource {
    /// Look up a variable. Empty values are reported as absent.
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory variables, used for `.env` contents and in tests.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Process environment layered over a `.env` file.
///
/// Real variables win over file entries, so an exported value can always
/// override what is checked into the file.
#[derive(Debug, Default, Clone)]
pub struct DotenvEnv {
    file: MapEnv,
}

impl DotenvEnv {
    /// Load `path` if it exists; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        let file = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let parsed = parse_dotenv(&contents);
            debug!(path = %path.display(), entries = parsed.len(), "loaded env file");
            parsed
        } else {
            MapEnv::new()
        };
        Ok(Self { file })
    }
}

impl EnvSource for DotenvEnv {
    fn get(&self, key: &str) -> Option<String> {
        ProcessEnv.get(key).or_else(|| self.file.get(key))
    }
}

/// Parse dotenv-style contents.
///
/// Skips empty lines and comments, accepts an optional `export ` prefix and
/// trims matching quotes around values.
pub fn parse_dotenv(contents: &str) -> MapEnv {
    let mut vars = MapEnv::new();

    for line in contents.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            vars.set(key, unquote(value.trim()));
        }
    }

    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
