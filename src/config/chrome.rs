//! Chrome behaviour configuration.
//!
//! Contains the tunables for edge hit-testing and system menu placement:
//! - Resize border thickness (device-independent units)
//! - Vertical offset of the keyboard-invoked system menu
//! - Whether edge resizing is emulated at all
//!
//! Uses `parking_lot::RwLock` for thread-safe access. Contexts take a snapshot
//! with [`ChromeConfig::current`] when they are created, so changing the global
//! configuration only affects windows bound afterwards.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{ChromeError, ChromeResult};

/// Default resize border thickness in device-independent units.
pub const DEFAULT_RESIZE_BORDER_THICKNESS: i32 = 8;

/// Default vertical offset below the window's top edge for a keyboard-invoked menu.
pub const DEFAULT_KEYBOARD_MENU_OFFSET: i32 = 30;

lazy_static! {
    /// Global chrome configuration.
    pub static ref CHROME_CONFIG: RwLock<ChromeConfig> = RwLock::new(ChromeConfig::default());
}

/// Frameless chrome preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChromeConfig {
    /// Width of the invisible band along each window edge that starts a resize.
    pub resize_border_thickness: i32,

    /// Offset added to the window's top edge when the system menu is opened
    /// from the keyboard. The real caption button geometry is not known here,
    /// so this is an approximation of where a native title bar icon would be.
    pub keyboard_menu_offset: i32,

    /// Emulate edge resizing and resize cursors. macOS keeps its own resize
    /// handling for frameless windows, so this is off there by default.
    pub edge_resize_enabled: bool,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            resize_border_thickness: DEFAULT_RESIZE_BORDER_THICKNESS,
            keyboard_menu_offset: DEFAULT_KEYBOARD_MENU_OFFSET,
            edge_resize_enabled: !cfg!(target_os = "macos"),
        }
    }
}

impl ChromeConfig {
    /// Snapshot of the global configuration.
    pub fn current() -> Self {
        CHROME_CONFIG.read().clone()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ChromeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the hit-test cannot work with.
    pub fn validate(&self) -> ChromeResult<()> {
        if self.resize_border_thickness < 0 {
            return Err(ChromeError::InvalidConfig(format!(
                "resizeBorderThickness must not be negative (got {})",
                self.resize_border_thickness
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Getters / setters
// ============================================================================

/// Replace the global configuration after validating it.
pub fn set_chrome_config(config: ChromeConfig) -> ChromeResult<()> {
    config.validate()?;
    log::debug!("[CHROME_CONFIG] set_chrome_config({:?})", config);
    *CHROME_CONFIG.write() = config;
    Ok(())
}

/// Get the current chrome configuration.
pub fn get_chrome_config() -> ChromeConfig {
    ChromeConfig::current()
}
