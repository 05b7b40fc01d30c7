//! Central error types for frameless chrome.
//!
//! Most native operations in this crate report failure as "nothing happened"
//! (no menu shown, no interceptor installed) rather than as an error. The typed
//! errors here cover the few places where a caller can act on the failure:
//! binding a toolkit window handle and loading configuration.

use serde::Serialize;
use thiserror::Error;

/// Main error type for frameless chrome operations.
#[derive(Error, Debug)]
pub enum ChromeError {
    /// The toolkit handed us a window handle kind we cannot bind to
    #[error("Unsupported window handle: {0}")]
    UnsupportedWindowHandle(&'static str),

    /// The toolkit could not produce a window handle
    #[error("Window handle unavailable: {0}")]
    HandleUnavailable(#[from] raw_window_handle::HandleError),

    /// A native handle of zero was passed where a bound window is required
    #[error("Window handle is null")]
    NullWindowHandle,

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Serialize as the display string so errors can cross an IPC boundary.
impl Serialize for ChromeError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Type alias for Results using ChromeError.
pub type ChromeResult<T> = Result<T, ChromeError>;
