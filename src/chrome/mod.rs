//! Frameless window chrome emulation.
//!
//! A window without a native title bar loses dragging, edge resizing,
//! double-click maximize, resize cursors and the right-click window menu.
//! This module puts them back on top of toolkit pointer events and native
//! window messages.
//!
//! # Features
//!
//! - Edge and corner hit-testing with a fixed border thickness
//! - Resize cursor feedback while hovering the border
//! - Deferred window move from the draggable title area
//! - Double-click maximize/restore in the title area
//! - Native system menu from right-click, Alt+Space and the keyboard-menu command
//!
//! # Architecture
//!
//! ```text
//! mod.rs (public API)
//!   |
//!   +-- types.rs (geometry, flags, window identity, pointer events)
//!   +-- host.rs (toolkit collaborator traits)
//!   +-- hit_test.rs (edge / cursor classification)
//!   +-- event_filter.rs (pointer interaction state machine)
//!   +-- system_menu.rs (menu entry planning and invocation)
//!   +-- interceptor.rs (native message gestures, handle registry)
//!   +-- context.rs (per-window binding)
//! ```
//!
//! Native primitives come from a provider in [`crate::platform`].

pub mod context;
pub mod event_filter;
pub mod host;
pub mod interceptor;
pub mod system_menu;
pub mod types;

#[cfg(test)]
mod test_support;


// Re-exports for public API
pub use context::WindowContext;
pub use event_filter::{ChromeAction, FilterDecision, InteractionFilter, WindowStatus};
pub use host::{ChromeHost, ChromePolicy, HostWindow, WindowDelegate};
pub use interceptor::{InterceptorRegistry, MessageTap, NativeMessage, SharedRegistry};
pub use system_menu::{show_system_menu, SystemCommand, SystemMenuPlan};
pub use types::{
    CursorShape, Edges, MouseButton, Point, PointerEvent, PointerEventKind, Rect, Size, Visibility,
    WindowFlags, WindowId, WindowStates,
};
