//! Frameless window chrome.
//!
//! Emulates the behaviour of a native window frame (dragging, edge resizing,
//! maximize on double-click, resize cursors and the system menu) for windows
//! whose frame has been removed.
//!
//! A host toolkit creates one [`chrome::WindowContext`] per window, implements
//! [`chrome::ChromeHost`] for it, feeds pointer events to
//! [`chrome::WindowContext::handle_pointer_event`] and reports native handle
//! changes through [`chrome::WindowContext::bind_window`].

pub mod chrome;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;

pub use chrome::WindowContext;
pub use config::ChromeConfig;
pub use error::{ChromeError, ChromeResult};
