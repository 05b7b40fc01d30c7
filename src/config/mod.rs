//! Chrome configuration management.
//!
//! Centralized, thread-safe configuration for the frameless chrome layer.
//!
//! ## Architecture
//!
//! - `ChromeConfig`: hit-test and system menu tunables
//!
//! The config uses `parking_lot::RwLock` for fast, non-poisoning locks and
//! atomic batch updates.

pub mod chrome;

pub use chrome::{ChromeConfig, CHROME_CONFIG};
