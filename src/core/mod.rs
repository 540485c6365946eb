//! Core library components.
//!
//! Configuration, credential handling, the retry policy, the browser layer
//! and the login workflow built on top of them.

pub mod browser;
pub mod cipher;
pub mod constants;
pub mod credentials;
pub mod env;
pub mod retry;
pub mod selectors;
pub mod settings;
pub mod workflow;
