//! Recording fakes for the host and native collaborators.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::chrome::host::{ChromePolicy, HostWindow, WindowDelegate};
use crate::chrome::system_menu::SystemCommand;
use crate::chrome::types::*;
use crate::platform::{
    MenuAlignment, MenuHandle, NativeMenuOps, NativeWindowOps, NativeWindowStyle, WindowProc,
    WindowProcHook,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    StartMove,
    StartResize(Edges),
    SetFlags(WindowFlags),
    SetStates(WindowStates),
    SetCursor(CursorShape),
    RestoreCursor,
}

/// 400x300 windowed host whose title bar is the top 40 rows.
pub struct FakeHost {
    pub size: Cell<Size>,
    pub visibility: Cell<Visibility>,
    pub flags: Cell<WindowFlags>,
    pub states: Cell<WindowStates>,
    pub fixed: Cell<bool>,
    pub rtl: Cell<bool>,
    pub title_bar: Cell<Rect>,
    /// Native units per logical unit
    pub native_scale: Cell<i32>,
    pub calls: RefCell<Vec<HostCall>>,
    /// Runs inside the blocking move, like a nested event loop would
    pub during_move: RefCell<Option<Box<dyn Fn()>>>,
}

impl FakeHost {
    pub fn new() -> Self {
        let _ = crate::logging::init();
        Self {
            size: Cell::new(Size::new(400, 300)),
            visibility: Cell::new(Visibility::Windowed),
            flags: Cell::new(
                WindowFlags::MAXIMIZE_BUTTON_HINT
                    | WindowFlags::MINIMIZE_BUTTON_HINT
                    | WindowFlags::CLOSE_BUTTON_HINT,
            ),
            states: Cell::new(WindowStates::ACTIVE),
            fixed: Cell::new(false),
            rtl: Cell::new(false),
            title_bar: Cell::new(Rect::new(0, 0, 400, 40)),
            native_scale: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            during_move: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl HostWindow for FakeHost {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn visibility(&self) -> Visibility {
        self.visibility.get()
    }

    fn start_system_move(&self) -> bool {
        self.record(HostCall::StartMove);
        if let Some(nested) = self.during_move.borrow().as_ref() {
            nested();
        }
        true
    }

    fn start_system_resize(&self, edges: Edges) -> bool {
        self.record(HostCall::StartResize(edges));
        true
    }

    fn from_native_local(&self, native: Point) -> Point {
        let scale = self.native_scale.get();
        Point::new(native.x / scale, native.y / scale)
    }

    fn to_native_global(&self, logical: Point) -> Point {
        let scale = self.native_scale.get();
        Point::new(logical.x * scale, logical.y * scale)
    }
}

impl WindowDelegate for FakeHost {
    fn window_flags(&self) -> WindowFlags {
        self.flags.get()
    }

    fn set_window_flags(&self, flags: WindowFlags) {
        self.record(HostCall::SetFlags(flags));
        self.flags.set(flags);
    }

    fn window_states(&self) -> WindowStates {
        self.states.get()
    }

    fn set_window_states(&self, states: WindowStates) {
        self.record(HostCall::SetStates(states));
        self.states.set(states);
    }

    fn set_cursor_shape(&self, shape: CursorShape) {
        self.record(HostCall::SetCursor(shape));
    }

    fn restore_cursor_shape(&self) {
        self.record(HostCall::RestoreCursor);
    }
}

impl ChromePolicy for FakeHost {
    fn is_in_title_bar_draggable_area(&self, scene_pos: Point) -> bool {
        self.title_bar.get().contains(scene_pos)
    }

    fn is_host_size_fixed(&self) -> bool {
        self.fixed.get()
    }

    fn is_right_to_left(&self) -> bool {
        self.rtl.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    Enable(SystemCommand, bool),
    Highlight(SystemCommand, bool),
    SetDefault(SystemCommand),
    Track { pos: Point, alignment: MenuAlignment },
    Post(u32),
    InstallHook(WindowId),
    RestoreProc(WindowId, WindowProc),
}

/// Native provider that records every call.
pub struct FakeNative {
    pub style: Cell<NativeWindowStyle>,
    pub menu: Cell<Option<MenuHandle>>,
    /// Command returned by the popup; None means dismissed
    pub choice: Cell<Option<u32>>,
    pub window_rect: Cell<Option<Rect>>,
    pub client_origin: Cell<Point>,
    pub keys_down: RefCell<HashSet<u32>>,
    /// Handler reported as captured by `install_hook`
    pub capture_proc: Cell<Option<WindowProc>>,
    pub calls: RefCell<Vec<NativeCall>>,
    /// Runs inside the popup's modal loop
    pub during_track: RefCell<Option<Box<dyn Fn()>>>,
}

impl FakeNative {
    pub fn new() -> Self {
        Self {
            style: Cell::new(NativeWindowStyle {
                maximized: false,
                maximizable: true,
                minimizable: true,
            }),
            menu: Cell::new(MenuHandle::new(0x77)),
            choice: Cell::new(None),
            window_rect: Cell::new(Some(Rect::new(100, 100, 500, 400))),
            client_origin: Cell::new(Point::new(0, 0)),
            keys_down: RefCell::new(HashSet::new()),
            capture_proc: Cell::new(Some(Self::original_proc())),
            calls: RefCell::new(Vec::new()),
            during_track: RefCell::new(None),
        }
    }

    pub fn original_proc() -> WindowProc {
        WindowProc::new(0xDEAD0).unwrap()
    }

    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&NativeCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn tracked_at(&self) -> Vec<Point> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                NativeCall::Track { pos, .. } => Some(*pos),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: NativeCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl NativeWindowOps for FakeNative {
    fn window_style(&self, _window: WindowId) -> NativeWindowStyle {
        self.style.get()
    }

    fn window_rect(&self, _window: WindowId) -> Option<Rect> {
        self.window_rect.get()
    }

    fn client_to_screen(&self, _window: WindowId, pos: Point) -> Point {
        let origin = self.client_origin.get();
        pos.offset(origin.x, origin.y)
    }

    fn is_key_down(&self, key: u32) -> bool {
        self.keys_down.borrow().contains(&key)
    }
}

impl NativeMenuOps for FakeNative {
    fn system_menu(&self, _window: WindowId) -> Option<MenuHandle> {
        self.menu.get()
    }

    fn enable_menu_item(&self, _menu: MenuHandle, entry: SystemCommand, enabled: bool) {
        self.record(NativeCall::Enable(entry, enabled));
    }

    fn highlight_menu_item(
        &self,
        _window: WindowId,
        _menu: MenuHandle,
        entry: SystemCommand,
        highlighted: bool,
    ) {
        self.record(NativeCall::Highlight(entry, highlighted));
    }

    fn set_default_menu_item(&self, _menu: MenuHandle, entry: SystemCommand) {
        self.record(NativeCall::SetDefault(entry));
    }

    fn track_popup_menu(
        &self,
        _window: WindowId,
        _menu: MenuHandle,
        pos: Point,
        alignment: MenuAlignment,
    ) -> Option<u32> {
        self.record(NativeCall::Track { pos, alignment });
        if let Some(nested) = self.during_track.borrow().as_ref() {
            nested();
        }
        self.choice.get()
    }

    fn post_system_command(&self, _window: WindowId, command: u32) {
        self.record(NativeCall::Post(command));
    }
}

impl WindowProcHook for FakeNative {
    fn install_hook(&self, window: WindowId) -> Option<WindowProc> {
        self.record(NativeCall::InstallHook(window));
        self.capture_proc.get()
    }

    fn restore_proc(&self, window: WindowId, original: WindowProc) {
        self.record(NativeCall::RestoreProc(window, original));
    }
}
