//! Core domain + application logic for the join hider bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and MongoDB live
//! behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod help;
pub mod logging;
pub mod messaging;
pub mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use context::BotContext;
pub use errors::{DeleteError, Error, Result};
