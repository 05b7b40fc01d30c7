//! Type definitions for the frameless chrome layer.
//!
//! This module contains geometry primitives, window identity, window state
//! flag sets and the toolkit-level pointer event consumed by the interaction
//! state machine.

use std::num::NonZeroIsize;

use bitflags::bitflags;
use raw_window_handle::RawWindowHandle;

use crate::error::{ChromeError, ChromeResult};

// ============================================================================
// Geometry Types
// ============================================================================

/// A point with integer coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset the point by dx, dy
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Width and height of a window's content area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A rectangle with integer coordinates.
///
/// Uses left/top/right/bottom format where right and bottom are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from left, top, right, bottom coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Top-left corner
    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Check if a point is inside the rectangle (exclusive of right/bottom edges)
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }
}

// ============================================================================
// Hit-test Types
// ============================================================================

bitflags! {
    /// Window edges under the pointer. Corners are two edges at once.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const LEFT   = 0b0001;
        const RIGHT  = 0b0010;
        const TOP    = 0b0100;
        const BOTTOM = 0b1000;
    }
}

/// Cursor shapes the chrome layer asks the host to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CursorShape {
    #[default]
    Arrow,
    /// Diagonal "\" resize: top-left and bottom-right corners
    SizeFDiag,
    /// Diagonal "/" resize: top-right and bottom-left corners
    SizeBDiag,
    /// Horizontal resize: left and right edges
    SizeHor,
    /// Vertical resize: top and bottom edges
    SizeVer,
}

// ============================================================================
// Window State Types
// ============================================================================

/// How the toolkit window is currently displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    /// Normal restored window; the only mode in which edges resize.
    #[default]
    Windowed,
    Minimized,
    Maximized,
    FullScreen,
}

bitflags! {
    /// Window state bits as reported by the host delegate.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WindowStates: u8 {
        const MINIMIZED   = 0b0001;
        const MAXIMIZED   = 0b0010;
        const FULL_SCREEN = 0b0100;
        const ACTIVE      = 0b1000;
    }
}

bitflags! {
    /// Window hint flags as reported by the host delegate.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        /// Native frame and title bar removed
        const FRAMELESS            = 1 << 0;
        /// Window offers a maximize affordance
        const MAXIMIZE_BUTTON_HINT = 1 << 1;
        const MINIMIZE_BUTTON_HINT = 1 << 2;
        const CLOSE_BUTTON_HINT    = 1 << 3;
    }
}

// ============================================================================
// Window Identity
// ============================================================================

/// Opaque native handle of a top-level window.
///
/// Never zero: an unbound context holds `Option::<WindowId>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(NonZeroIsize);

impl WindowId {
    /// Wrap a raw native handle. Returns None for a zero handle.
    pub fn new(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }

    /// The raw native handle value
    pub fn raw(&self) -> isize {
        self.0.get()
    }
}

impl TryFrom<RawWindowHandle> for WindowId {
    type Error = ChromeError;

    fn try_from(handle: RawWindowHandle) -> ChromeResult<Self> {
        let raw = match handle {
            RawWindowHandle::Win32(h) => h.hwnd.get(),
            RawWindowHandle::Xlib(h) => h.window as isize,
            RawWindowHandle::Xcb(h) => h.window.get() as isize,
            RawWindowHandle::AppKit(h) => h.ns_view.as_ptr() as isize,
            RawWindowHandle::Wayland(h) => h.surface.as_ptr() as isize,
            RawWindowHandle::Web(_) => return Err(ChromeError::UnsupportedWindowHandle("Web")),
            _ => return Err(ChromeError::UnsupportedWindowHandle("unknown")),
        };
        WindowId::new(raw).ok_or(ChromeError::NullWindowHandle)
    }
}

// ============================================================================
// Pointer Events
// ============================================================================

/// Mouse button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Pointer event kinds the interaction filter reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Press,
    Release,
    Move,
    DoubleClick,
}

/// Toolkit-level pointer event for the bound window.
///
/// `scene_pos` is local to the window content; `global_pos` is in the toolkit's
/// logical screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: MouseButton,
    pub scene_pos: Point,
    pub global_pos: Point,
    pub accepted: bool,
}

impl PointerEvent {
    pub fn new(
        kind: PointerEventKind,
        button: MouseButton,
        scene_pos: Point,
        global_pos: Point,
    ) -> Self {
        Self {
            kind,
            button,
            scene_pos,
            global_pos,
            accepted: false,
        }
    }

    pub fn press(button: MouseButton, scene_pos: Point, global_pos: Point) -> Self {
        Self::new(PointerEventKind::Press, button, scene_pos, global_pos)
    }

    pub fn release(button: MouseButton, scene_pos: Point, global_pos: Point) -> Self {
        Self::new(PointerEventKind::Release, button, scene_pos, global_pos)
    }

    /// Pointer motion. Motion carries no button change.
    pub fn moved(scene_pos: Point, global_pos: Point) -> Self {
        Self::new(PointerEventKind::Move, MouseButton::Other, scene_pos, global_pos)
    }

    pub fn double_click(button: MouseButton, scene_pos: Point, global_pos: Point) -> Self {
        Self::new(PointerEventKind::DoubleClick, button, scene_pos, global_pos)
    }

    /// Mark the event as handled
    pub fn accept(&mut self) {
        self.accepted = true;
    }
}
