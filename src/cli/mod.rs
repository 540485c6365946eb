//! Command-line interface.

pub mod check;
pub mod completions;
pub mod encrypt;
pub mod logging;
pub mod output;
pub mod run;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::error;

use crate::core::constants::ENV_FILE;
use crate::core::env::DotenvEnv;
use crate::core::settings::Settings;
use crate::error::Result;

/// autologin - browser-driven login automation with encrypted credentials.
#[derive(Parser)]
#[command(
    name = "autologin",
    about = "Browser-driven login automation with encrypted credentials",
    version
)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Sign in to the site and verify the dashboard
    Run(RunArgs),

    /// Generate a key and encrypt passwords for SAFE_KEY / ENC_PASSWORD
    Encrypt {
        /// Read passwords from stdin, one per line, instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Validate configuration and credentials without launching a browser
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options for `autologin run`. Each one overrides the environment default.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Browser channel (chrome, msedge, chromium)
    #[arg(long)]
    pub channel: Option<String>,

    /// Browser executable
    #[arg(long)]
    pub browser_path: Option<PathBuf>,

    /// Delay after each browser action, in milliseconds
    #[arg(long, value_name = "MS")]
    pub slow_mo: Option<u64>,

    /// Menu entry opened by the post-login check
    #[arg(long, default_value = "Reports")]
    pub menu: String,

    /// Text the page title must contain after opening the menu entry
    #[arg(long, default_value = "Report Dashboard")]
    pub expect_title: String,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Environment and settings shared by commands that talk to the site.
pub struct Context {
    pub env: DotenvEnv,
    pub settings: Settings,
}

impl Context {
    /// Load `.env` and settings, then start logging.
    ///
    /// With `file_logging` the log and screenshot directories are created
    /// and log lines are appended to the configured file.
    fn load(verbose: bool, file_logging: bool) -> Result<Self> {
        let loaded = DotenvEnv::load(Path::new(ENV_FILE))
            .and_then(|env| Settings::from_env(&env).map(|settings| (env, settings)));

        let (env, settings) = match loaded {
            Ok(pair) => pair,
            Err(e) => {
                logging::init(verbose, None, None)?;
                error!(error = %e, "configuration error");
                return Err(e);
            }
        };

        if file_logging {
            settings.ensure_dirs()?;
            logging::init(
                verbose,
                Some(settings.logging.level),
                Some(&settings.logging.file_path()),
            )?;
        } else {
            logging::init(verbose, Some(settings.logging.level), None)?;
        }

        Ok(Self { env, settings })
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;

    match cli.command {
        Command::Run(args) => {
            let ctx = Context::load(verbose, true)?;
            run::execute(&ctx, &args)
        }
        Command::Encrypt { password_stdin } => {
            logging::init(verbose, None, None)?;
            encrypt::execute(password_stdin)
        }
        Command::Check { json } => {
            let ctx = Context::load(verbose, false)?;
            check::execute(&ctx, json)
        }
        Command::Completions { shell } => completions::execute(shell),
    }
}
