//! Collaborators supplied by the toolkit that owns the window.
//!
//! The chrome layer never creates or destroys windows. It reaches the host
//! through three narrow capability sets, mirroring how the toolkit itself is
//! split: the window object, the delegate that edits window state, and the
//! policy deciding where the title bar is.

use crate::chrome::types::{CursorShape, Edges, Point, Size, Visibility, WindowFlags, WindowStates};

/// The underlying toolkit window.
pub trait HostWindow {
    /// Content size in logical units
    fn size(&self) -> Size;

    fn visibility(&self) -> Visibility;

    /// Hand the pointer to the platform's interactive move.
    ///
    /// Blocks until the user releases the pointer. Pointer events for this
    /// window are not delivered while it runs, but other events may be.
    fn start_system_move(&self) -> bool;

    /// Hand the pointer to the platform's interactive resize along `edges`.
    ///
    /// Blocks like [`HostWindow::start_system_move`].
    fn start_system_resize(&self, edges: Edges) -> bool;

    /// Convert a native client-area position to scene coordinates.
    fn from_native_local(&self, native: Point) -> Point;

    /// Convert a logical global position to native screen coordinates.
    fn to_native_global(&self, logical: Point) -> Point;
}

/// Reads and edits window flags, state and cursor on behalf of the host.
pub trait WindowDelegate {
    fn window_flags(&self) -> WindowFlags;

    fn set_window_flags(&self, flags: WindowFlags);

    fn window_states(&self) -> WindowStates;

    fn set_window_states(&self, states: WindowStates);

    fn set_cursor_shape(&self, shape: CursorShape);

    /// Undo a previous [`WindowDelegate::set_cursor_shape`]
    fn restore_cursor_shape(&self);
}

/// Externally configured policy for the frameless window.
pub trait ChromePolicy {
    /// Whether a scene point lies in the region that behaves like a title bar.
    fn is_in_title_bar_draggable_area(&self, scene_pos: Point) -> bool;

    /// Fixed-size windows never resize or maximize from gestures.
    fn is_host_size_fixed(&self) -> bool;

    /// Application text direction; the system menu opens right-aligned when set.
    fn is_right_to_left(&self) -> bool {
        false
    }
}

/// Everything a window context needs from its host.
pub trait ChromeHost: HostWindow + WindowDelegate + ChromePolicy {}

impl<T: HostWindow + WindowDelegate + ChromePolicy + ?Sized> ChromeHost for T {}
