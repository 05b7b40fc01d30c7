//! Native chrome capability providers.
//!
//! The interaction state machine and menu logic are written once against the
//! traits in this module. Each target platform that supports native message
//! interception supplies one provider; [`native_chrome`] picks it at startup.
//!
//! # Modules
//!
//! - `win32` - Window procedure subclassing and system menu via Win32

#[cfg(windows)]
pub mod win32;

use std::num::{NonZeroIsize, NonZeroUsize};
use std::rc::Rc;

use crate::chrome::system_menu::SystemCommand;
use crate::chrome::types::{Point, Rect, WindowId};

/// Address of a native message handler captured from a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowProc(NonZeroUsize);

impl WindowProc {
    /// Wrap a raw handler address. Returns None for a null handler.
    pub fn new(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    pub fn raw(&self) -> usize {
        self.0.get()
    }
}

/// Native menu handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(NonZeroIsize);

impl MenuHandle {
    pub fn new(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }

    pub fn raw(&self) -> isize {
        self.0.get()
    }
}

/// Window state and style bits that shape the system menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeWindowStyle {
    pub maximized: bool,
    pub maximizable: bool,
    pub minimizable: bool,
}

/// Horizontal anchoring of a popup menu relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAlignment {
    Left,
    Right,
}

/// Window queries needed to locate and configure the system menu.
pub trait NativeWindowOps {
    fn window_style(&self, window: WindowId) -> NativeWindowStyle;

    /// Outer window rectangle in screen coordinates
    fn window_rect(&self, window: WindowId) -> Option<Rect>;

    fn client_to_screen(&self, window: WindowId, pos: Point) -> Point;

    /// Live pressed state of a virtual key
    fn is_key_down(&self, key: u32) -> bool;
}

/// The platform's window menu primitives.
pub trait NativeMenuOps {
    fn system_menu(&self, window: WindowId) -> Option<MenuHandle>;

    fn enable_menu_item(&self, menu: MenuHandle, entry: SystemCommand, enabled: bool);

    fn highlight_menu_item(
        &self,
        window: WindowId,
        menu: MenuHandle,
        entry: SystemCommand,
        highlighted: bool,
    );

    fn set_default_menu_item(&self, menu: MenuHandle, entry: SystemCommand);

    /// Show the popup and run its modal loop. Returns the chosen command code,
    /// or None when dismissed. Window messages keep flowing (re-entrantly)
    /// while this runs.
    fn track_popup_menu(
        &self,
        window: WindowId,
        menu: MenuHandle,
        pos: Point,
        alignment: MenuAlignment,
    ) -> Option<u32>;

    /// Queue a system command for the window; does not wait for it to run.
    fn post_system_command(&self, window: WindowId, command: u32);
}

/// Replaces and restores a window's native message handler.
pub trait WindowProcHook {
    /// Route the window's messages through the interception procedure.
    ///
    /// Returns the handler that was in place, or None (and leaves the window
    /// untouched) when it could not be captured.
    fn install_hook(&self, window: WindowId) -> Option<WindowProc>;

    /// Put a previously captured handler back.
    fn restore_proc(&self, window: WindowId, original: WindowProc);
}

/// Full native capability set for one platform.
pub trait NativeChrome: NativeWindowOps + NativeMenuOps + WindowProcHook {}

impl<T: NativeWindowOps + NativeMenuOps + WindowProcHook + ?Sized> NativeChrome for T {}

/// Native provider for the running platform, if it has one.
pub fn native_chrome() -> Option<Rc<dyn NativeChrome>> {
    #[cfg(windows)]
    {
        Some(Rc::new(win32::Win32Chrome))
    }
    #[cfg(not(windows))]
    {
        None
    }
}
