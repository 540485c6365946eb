//! autologin - browser-driven login automation with encrypted credentials.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── run           # Login workflow against the site
//! │   ├── encrypt       # Interactive password encryption helper
//! │   ├── check         # Configuration and credential check
//! │   ├── logging       # tracing subscriber setup
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── env           # Environment sources and .env parsing
//!     ├── settings      # Settings built once from the environment
//!     ├── cipher        # XChaCha20-Poly1305 key and ciphertext handling
//!     ├── credentials   # SAFE_KEY / ENC_PASSWORD / LOGIN_USER
//!     ├── retry         # Fixed-delay retry policy
//!     ├── selectors     # Per-page selector tables
//!     ├── browser/      # Driver trait, session wrapper, CDP driver
//!     └── workflow      # Login sequence
//! ```

pub mod cli;
pub mod core;
pub mod error;
