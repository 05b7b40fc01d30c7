//! Pointer interaction state machine.
//!
//! Classifies toolkit pointer events on a frameless window into resize, move,
//! system menu and maximize gestures.
//!
//! # States
//!
//! ```text
//!            left press on edge            release
//!   Idle ───────────────────────► Resizing ────────► Idle
//!     │  left press in title bar             move              release
//!     ├────────────────────────► PreparingMove ─────► Moving ─────────► Idle
//!     │  any other press               release
//!     └────────────────────────► WaitingRelease ────► Idle
//! ```
//!
//! A move is only handed to the platform on the first motion after the press:
//! if the pointer is released without moving, the platform's move loop swallows
//! the release and nothing would bring the state back to Idle.
//!
//! The filter decides; it never calls into the blocking native gestures itself.
//! It returns a [`ChromeAction`] that the context performs once the filter is no
//! longer borrowed.

use crate::chrome::hit_test;
use crate::chrome::host::ChromeHost;
use crate::chrome::types::{
    CursorShape, Edges, MouseButton, Point, PointerEvent, PointerEventKind, WindowFlags,
    WindowStates,
};
use crate::config::ChromeConfig;

/// Interaction status of one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowStatus {
    #[default]
    Idle,
    /// A press was absorbed without starting a gesture
    WaitingRelease,
    /// Left press in the title bar; move starts on first motion
    PreparingMove,
    Moving,
    Resizing,
}

/// Side effect requested by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeAction {
    /// Blocking native resize along the edges
    StartResize(Edges),
    /// Blocking native move
    StartMove,
    /// Open the system menu at a logical global position
    ShowSystemMenu(Point),
    SetCursor(CursorShape),
    RestoreCursor,
    SetWindowStates(WindowStates),
}

/// Result of filtering one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterDecision {
    /// The event must not reach the toolkit's own handlers
    pub consumed: bool,
    pub action: Option<ChromeAction>,
}

impl FilterDecision {
    fn pass() -> Self {
        Self::default()
    }

    fn consume(event: &mut PointerEvent, action: Option<ChromeAction>) -> Self {
        event.accept();
        Self {
            consumed: true,
            action,
        }
    }

    fn act(action: ChromeAction) -> Self {
        Self {
            consumed: false,
            action: Some(action),
        }
    }
}

/// Per-window pointer interaction state machine.
#[derive(Debug, Clone)]
pub struct InteractionFilter {
    status: WindowStatus,
    cursor_shape_changed: bool,
    border_thickness: i32,
    edge_resize_enabled: bool,
}

impl InteractionFilter {
    pub fn new(config: &ChromeConfig) -> Self {
        Self {
            status: WindowStatus::Idle,
            cursor_shape_changed: false,
            border_thickness: config.resize_border_thickness,
            edge_resize_enabled: config.edge_resize_enabled,
        }
    }

    pub fn status(&self) -> WindowStatus {
        self.status
    }

    /// Whether the filter currently overrides the host cursor
    pub fn cursor_overridden(&self) -> bool {
        self.cursor_shape_changed
    }

    /// The blocking native move or resize has returned.
    ///
    /// The platform's gesture loop usually swallows the release, so nothing
    /// else would bring the filter back to Idle.
    pub fn gesture_finished(&mut self) {
        if matches!(self.status, WindowStatus::Moving | WindowStatus::Resizing) {
            self.status = WindowStatus::Idle;
        }
    }

    /// Classify one pointer event.
    pub fn handle(&mut self, host: &dyn ChromeHost, event: &mut PointerEvent) -> FilterDecision {
        let fixed_size = host.is_host_size_fixed();
        let in_title_bar = host.is_in_title_bar_draggable_area(event.scene_pos);

        let decision = match event.kind {
            PointerEventKind::Press => self.on_press(host, event, fixed_size, in_title_bar),
            PointerEventKind::Release => self.on_release(event, in_title_bar),
            PointerEventKind::Move => self.on_move(host, event, fixed_size),
            PointerEventKind::DoubleClick => {
                Self::on_double_click(host, event, fixed_size, in_title_bar)
            }
        };
        log::trace!(
            "[event_filter] {:?} {:?} at {:?} -> {:?} {:?}",
            event.kind,
            event.button,
            event.scene_pos,
            self.status,
            decision
        );
        decision
    }

    fn edges_at(&self, host: &dyn ChromeHost, pos: Point) -> Edges {
        if !self.edge_resize_enabled {
            return Edges::empty();
        }
        hit_test::window_edges(host.size(), host.visibility(), pos, self.border_thickness)
    }

    fn on_press(
        &mut self,
        host: &dyn ChromeHost,
        event: &mut PointerEvent,
        fixed_size: bool,
        in_title_bar: bool,
    ) -> FilterDecision {
        match event.button {
            MouseButton::Left => {
                if !fixed_size {
                    let edges = self.edges_at(host, event.scene_pos);
                    if !edges.is_empty() {
                        self.status = WindowStatus::Resizing;
                        let action = ChromeAction::StartResize(edges);
                        return FilterDecision::consume(event, Some(action));
                    }
                }
                if in_title_bar {
                    self.status = WindowStatus::PreparingMove;
                    return FilterDecision::consume(event, None);
                }
            }
            MouseButton::Right if in_title_bar => {
                self.status = WindowStatus::WaitingRelease;
                return FilterDecision::act(ChromeAction::ShowSystemMenu(event.global_pos));
            }
            _ => {}
        }
        self.status = WindowStatus::WaitingRelease;
        FilterDecision::pass()
    }

    fn on_release(&mut self, event: &mut PointerEvent, in_title_bar: bool) -> FilterDecision {
        match self.status {
            WindowStatus::PreparingMove | WindowStatus::Moving | WindowStatus::Resizing => {
                self.status = WindowStatus::Idle;
                FilterDecision::consume(event, None)
            }
            WindowStatus::WaitingRelease => {
                self.status = WindowStatus::Idle;
                FilterDecision::pass()
            }
            WindowStatus::Idle if in_title_bar => FilterDecision::consume(event, None),
            WindowStatus::Idle => FilterDecision::pass(),
        }
    }

    fn on_move(
        &mut self,
        host: &dyn ChromeHost,
        event: &mut PointerEvent,
        fixed_size: bool,
    ) -> FilterDecision {
        match self.status {
            WindowStatus::Moving => FilterDecision::consume(event, None),
            WindowStatus::PreparingMove => {
                self.status = WindowStatus::Moving;
                FilterDecision::consume(event, Some(ChromeAction::StartMove))
            }
            WindowStatus::Idle if !fixed_size => {
                let shape = hit_test::cursor_for_edges(self.edges_at(host, event.scene_pos));
                if shape == CursorShape::Arrow {
                    if self.cursor_shape_changed {
                        self.cursor_shape_changed = false;
                        return FilterDecision::act(ChromeAction::RestoreCursor);
                    }
                    FilterDecision::pass()
                } else {
                    self.cursor_shape_changed = true;
                    FilterDecision::act(ChromeAction::SetCursor(shape))
                }
            }
            _ => FilterDecision::pass(),
        }
    }

    fn on_double_click(
        host: &dyn ChromeHost,
        event: &mut PointerEvent,
        fixed_size: bool,
        in_title_bar: bool,
    ) -> FilterDecision {
        if event.button != MouseButton::Left || !in_title_bar || fixed_size {
            return FilterDecision::pass();
        }
        let flags = host.window_flags();
        let states = host.window_states();
        if !flags.contains(WindowFlags::MAXIMIZE_BUTTON_HINT)
            || states.contains(WindowStates::FULL_SCREEN)
        {
            return FilterDecision::pass();
        }
        let toggled = states ^ WindowStates::MAXIMIZED;
        FilterDecision::consume(event, Some(ChromeAction::SetWindowStates(toggled)))
    }
}
