//! Native system menu invocation.
//!
//! A frameless window has no native caption to right-click, so the platform
//! never opens its window menu on its own. This module opens it on request:
//! it computes which entries apply to the current window state, configures the
//! native menu accordingly, tracks the popup and posts the chosen command back
//! to the window.

use crate::chrome::types::{Point, WindowId};
use crate::platform::{MenuAlignment, NativeChrome};

// ============================================================================
// System Commands
// ============================================================================

/// Keyboard-menu system command (Alt+Space and friends).
pub const SC_KEYMENU: u32 = 0xF100;

/// Mask that strips the platform's private low bits from a system command.
pub const SYSTEM_COMMAND_MASK: usize = 0xFFF0;

/// Canonical entries of the native system menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemCommand {
    Restore,
    Move,
    Size,
    Minimize,
    Maximize,
    Close,
}

impl SystemCommand {
    pub const ALL: [SystemCommand; 6] = [
        Self::Restore,
        Self::Move,
        Self::Size,
        Self::Minimize,
        Self::Maximize,
        Self::Close,
    ];

    /// Native command identifier
    pub fn code(&self) -> u32 {
        match self {
            Self::Size => 0xF000,
            Self::Move => 0xF010,
            Self::Minimize => 0xF020,
            Self::Maximize => 0xF030,
            Self::Close => 0xF060,
            Self::Restore => 0xF120,
        }
    }

    /// Parse a native command identifier (low bits ignored)
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.code() == code & SYSTEM_COMMAND_MASK as u32)
    }
}

// ============================================================================
// Menu Plan
// ============================================================================

/// Window facts that decide which menu entries apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuWindowState {
    pub maximized: bool,
    /// Resize and maximize are disabled by policy
    pub fixed_size: bool,
    /// Window style carries the maximize box
    pub resizable: bool,
    /// Window style carries the minimize box
    pub minimizable: bool,
}

/// Enabled state of every entry plus the default and highlighted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemMenuPlan {
    pub restore: bool,
    pub move_: bool,
    pub size: bool,
    pub minimize: bool,
    pub maximize: bool,
    pub close: bool,
    /// Entry invoked on double-click / shown in bold
    pub default_entry: SystemCommand,
    /// Pre-select Restore when the menu was opened from the keyboard
    pub highlight_restore: bool,
}

impl SystemMenuPlan {
    pub fn new(state: MenuWindowState, select_first_entry: bool) -> Self {
        let MenuWindowState {
            maximized,
            fixed_size,
            resizable,
            minimizable,
        } = state;

        // Restore when maximized, Maximize otherwise. Close would be the
        // fallback if neither applied, which cannot happen for a two-state window.
        let default_entry = if maximized {
            SystemCommand::Restore
        } else {
            SystemCommand::Maximize
        };

        Self {
            restore: maximized && !fixed_size && resizable,
            move_: !maximized,
            size: !maximized && !fixed_size,
            minimize: minimizable,
            maximize: !maximized && !fixed_size && resizable,
            close: true,
            default_entry,
            highlight_restore: select_first_entry,
        }
    }

    pub fn is_enabled(&self, entry: SystemCommand) -> bool {
        match entry {
            SystemCommand::Restore => self.restore,
            SystemCommand::Move => self.move_,
            SystemCommand::Size => self.size,
            SystemCommand::Minimize => self.minimize,
            SystemCommand::Maximize => self.maximize,
            SystemCommand::Close => self.close,
        }
    }
}

// ============================================================================
// Invocation
// ============================================================================

/// Show the native system menu at `pos` (native screen coordinates).
///
/// Blocks until the menu is dismissed. Returns true when an entry was chosen
/// (its command is posted to the window, not executed here), false when the
/// menu was dismissed, and true without showing anything when the window has
/// no system menu.
pub fn show_system_menu(
    native: &dyn NativeChrome,
    window: WindowId,
    pos: Point,
    select_first_entry: bool,
    fixed_size: bool,
    right_to_left: bool,
) -> bool {
    let Some(menu) = native.system_menu(window) else {
        log::debug!("[system_menu] No system menu for window {:#x}", window.raw());
        return true;
    };

    let style = native.window_style(window);
    let plan = SystemMenuPlan::new(
        MenuWindowState {
            maximized: style.maximized,
            fixed_size,
            resizable: style.maximizable,
            minimizable: style.minimizable,
        },
        select_first_entry,
    );

    for entry in SystemCommand::ALL {
        native.enable_menu_item(menu, entry, plan.is_enabled(entry));
    }
    native.highlight_menu_item(window, menu, SystemCommand::Restore, plan.highlight_restore);
    native.set_default_menu_item(menu, plan.default_entry);

    let alignment = if right_to_left {
        MenuAlignment::Right
    } else {
        MenuAlignment::Left
    };
    log::debug!(
        "[system_menu] Tracking menu at ({}, {}) keyboard={} plan={:?}",
        pos.x,
        pos.y,
        select_first_entry,
        plan
    );
    let chosen = native.track_popup_menu(window, menu, pos, alignment);

    native.highlight_menu_item(window, menu, SystemCommand::Restore, false);

    let Some(command) = chosen else {
        return false;
    };
    log::debug!(
        "[system_menu] Posting system command {:#x} ({:?})",
        command,
        SystemCommand::from_code(command)
    );
    native.post_system_command(window, command);
    true
}
