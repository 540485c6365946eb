//! Browser launch options.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

/// Options used to start the browser process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Run without a visible window.
    pub headless: bool,
    /// Pause after each page action.
    pub slow_mo: Duration,
    /// Browser channel (`chrome`, `msedge`, `chromium`).
    pub channel: Option<String>,
    /// Explicit executable; wins over the channel.
    pub executable: Option<PathBuf>,
    /// Extra command-line arguments.
    pub args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            slow_mo: Duration::ZERO,
            channel: None,
            executable: None,
            args: Vec::new(),
        }
    }
}

/// Caller-supplied overrides. Every field that is set replaces the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOverrides {
    pub headless: Option<bool>,
    pub slow_mo: Option<Duration>,
    pub channel: Option<String>,
    pub executable: Option<PathBuf>,
    pub args: Option<Vec<String>>,
}

impl LaunchOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl LaunchOptions {
    /// Merge `overrides` over `self`.
    pub fn merged(&self, overrides: &LaunchOverrides) -> LaunchOptions {
        LaunchOptions {
            headless: overrides.headless.unwrap_or(self.headless),
            slow_mo: overrides.slow_mo.unwrap_or(self.slow_mo),
            channel: overrides.channel.clone().or_else(|| self.channel.clone()),
            executable: overrides
                .executable
                .clone()
                .or_else(|| self.executable.clone()),
            args: overrides.args.clone().unwrap_or_else(|| self.args.clone()),
        }
    }

    /// Executable to launch, if one can be determined.
    ///
    /// `executable` always wins. Otherwise a known channel is looked up on
    /// `PATH`. `None` leaves detection to the driver.
    pub fn resolve_executable(&self) -> Option<PathBuf> {
        if let Some(path) = &self.executable {
            return Some(path.clone());
        }

        let channel = self.channel.as_deref()?;
        let candidates = channel_binaries(channel);
        if candidates.is_empty() {
            warn!(channel, "unknown browser channel, using default detection");
            return None;
        }

        let found = candidates.iter().find_map(|name| which::which(name).ok());
        match &found {
            Some(path) => debug!(channel, path = %path.display(), "resolved browser channel"),
            None => warn!(channel, "no executable found for channel, using default detection"),
        }
        found
    }
}

fn channel_binaries(channel: &str) -> &'static [&'static str] {
    match channel.to_ascii_lowercase().as_str() {
        "chrome" => &["google-chrome", "google-chrome-stable", "chrome"],
        "msedge" => &["microsoft-edge", "microsoft-edge-stable", "msedge"],
        "chromium" => &["chromium", "chromium-browser"],
        _ => &[],
    }
}
