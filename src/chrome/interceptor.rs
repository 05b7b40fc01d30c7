//! Native message interception for system menu gestures.
//!
//! Removing the native frame also removes the platform's own handling of
//! "open the window menu" gestures. Each bound window's message handler is
//! replaced with an interception procedure that recognizes those gestures,
//! shows the menu, and forwards everything else to the captured original.
//!
//! # Re-entrancy
//!
//! Showing the menu runs a nested native message loop, so the interception
//! procedure can be entered again for the same window before the first call
//! returns. [`dispatch`] copies what it needs out of the registry and releases
//! its borrow before calling into the tap, so nested delivery (and even
//! unbinding the window from inside the menu loop) is safe.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::chrome::host::ChromeHost;
use crate::chrome::system_menu::{SC_KEYMENU, SYSTEM_COMMAND_MASK};
use crate::chrome::types::{Point, WindowId};
use crate::platform::{NativeChrome, WindowProc, WindowProcHook};

/// Virtual key code of the space bar
pub const VK_SPACE: u32 = 0x20;

/// Virtual key code of Alt
pub const VK_MENU: u32 = 0x12;

/// Non-client hit-test code of the caption
pub const HTCAPTION: u32 = 2;

// ============================================================================
// Messages
// ============================================================================

/// Native window message, decoded to the cases the interceptor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeMessage {
    /// Right button released in the client area (native client coordinates)
    RightButtonUp { local: Point },
    /// Right button released in the non-client area (native screen coordinates)
    NonClientRightButtonUp { hit_test: u32, screen: Point },
    /// System command with its raw parameters
    SysCommand { command: usize, param: isize },
    /// Key pressed, with or without Alt
    KeyDown { key: u32 },
    /// Anything else
    Other { id: u32 },
}

/// Where to open the system menu and how it was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuRequest {
    /// Native screen coordinates
    pub pos: Point,
    /// Opened from the keyboard: pre-select the first entry
    pub keyboard: bool,
}

/// Decide whether `message` is a request for the system menu.
///
/// Recognized gestures:
/// 1. Right-click release on the native caption
/// 2. Right-click release in the client area inside the draggable title area
/// 3. The keyboard-menu system command with the space key
/// 4. A key press while both Alt and Space are down
pub fn recognize_menu_gesture(
    window: WindowId,
    message: &NativeMessage,
    host: &dyn ChromeHost,
    native: &dyn NativeChrome,
    keyboard_menu_offset: i32,
) -> Option<MenuRequest> {
    match *message {
        NativeMessage::NonClientRightButtonUp { hit_test, screen } if hit_test == HTCAPTION => {
            Some(MenuRequest {
                pos: screen,
                keyboard: false,
            })
        }
        NativeMessage::RightButtonUp { local } => {
            let scene_pos = host.from_native_local(local);
            if !host.is_in_title_bar_draggable_area(scene_pos) {
                return None;
            }
            Some(MenuRequest {
                pos: native.client_to_screen(window, local),
                keyboard: false,
            })
        }
        NativeMessage::SysCommand { command, param }
            if command & SYSTEM_COMMAND_MASK == SC_KEYMENU as usize && param == VK_SPACE as isize =>
        {
            Some(keyboard_request(window, native, keyboard_menu_offset))
        }
        NativeMessage::KeyDown { key } => {
            let alt = key == VK_MENU || native.is_key_down(VK_MENU);
            let space = key == VK_SPACE || native.is_key_down(VK_SPACE);
            if alt && space {
                Some(keyboard_request(window, native, keyboard_menu_offset))
            } else {
                None
            }
        }
        _ => None,
    }
}

// TODO: anchor below the caption icon once hosts can report title bar geometry
// instead of the fixed offset.
fn keyboard_request(window: WindowId, native: &dyn NativeChrome, offset: i32) -> MenuRequest {
    let rect = native.window_rect(window).unwrap_or_default();
    MenuRequest {
        pos: rect.top_left().offset(0, offset),
        keyboard: true,
    }
}

// ============================================================================
// Tap
// ============================================================================

/// Receives messages for an intercepted window.
pub trait MessageTap {
    /// Returns Some(result) when the message was handled and must not reach
    /// the original handler.
    fn on_native_message(&self, window: WindowId, message: &NativeMessage) -> Option<isize>;
}

// ============================================================================
// Registry
// ============================================================================

/// One intercepted window.
#[derive(Clone)]
pub struct InterceptionRecord {
    pub window: WindowId,
    /// Handler that was in place before interception
    pub original_proc: WindowProc,
    pub tap: Weak<dyn MessageTap>,
}

impl std::fmt::Debug for InterceptionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptionRecord")
            .field("window", &self.window)
            .field("original_proc", &self.original_proc)
            .field("tap_alive", &(self.tap.strong_count() > 0))
            .finish()
    }
}

/// Registry shared by every context on the UI thread.
pub type SharedRegistry = Rc<RefCell<InterceptorRegistry>>;

thread_local! {
    static ACTIVE_REGISTRY: RefCell<Weak<RefCell<InterceptorRegistry>>> = RefCell::new(Weak::new());
}

/// Maps intercepted window handles to their records.
///
/// Holds at most one record per handle, and only for handles whose original
/// handler was captured.
#[derive(Debug, Default)]
pub struct InterceptorRegistry {
    records: HashMap<WindowId, InterceptionRecord>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The UI thread's registry, created on first use.
    ///
    /// It lives as long as some context holds it; once the last one is gone
    /// the next call starts a fresh registry.
    pub fn shared() -> SharedRegistry {
        ACTIVE_REGISTRY.with(|slot| {
            if let Some(registry) = slot.borrow().upgrade() {
                return registry;
            }
            log::debug!("[interceptor] Creating interceptor registry");
            let registry = Rc::new(RefCell::new(InterceptorRegistry::new()));
            *slot.borrow_mut() = Rc::downgrade(&registry);
            registry
        })
    }

    /// The UI thread's registry if one is alive. Used by native procedures.
    pub fn active() -> Option<SharedRegistry> {
        ACTIVE_REGISTRY.with(|slot| slot.borrow().upgrade())
    }

    /// Start intercepting `window`. Idempotent.
    ///
    /// Returns true if the window is intercepted after the call.
    pub fn install<H: WindowProcHook + ?Sized>(
        &mut self,
        hook: &H,
        window: WindowId,
        tap: Weak<dyn MessageTap>,
    ) -> bool {
        if self.records.contains_key(&window) {
            return true;
        }

        let Some(original_proc) = hook.install_hook(window) else {
            log::warn!(
                "[interceptor] Could not capture window procedure of {:#x}; \
                 system menu gestures stay native",
                window.raw()
            );
            return false;
        };

        log::debug!("[interceptor] Installed hook on window {:#x}", window.raw());
        self.records.insert(
            window,
            InterceptionRecord {
                window,
                original_proc,
                tap,
            },
        );
        true
    }

    /// Stop intercepting `window`, restoring its original handler.
    ///
    /// Returns false if the window was not intercepted.
    pub fn uninstall<H: WindowProcHook + ?Sized>(&mut self, hook: &H, window: WindowId) -> bool {
        let Some(record) = self.records.remove(&window) else {
            return false;
        };
        hook.restore_proc(window, record.original_proc);
        log::debug!("[interceptor] Removed hook from window {:#x}", window.raw());
        true
    }

    pub fn record(&self, window: WindowId) -> Option<&InterceptionRecord> {
        self.records.get(&window)
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.records.contains_key(&window)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// What the native procedure should do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handled; return this result to the platform
    Consumed(isize),
    /// Pass to the captured original handler
    Forward(WindowProc),
    /// Window not intercepted; use the platform default handler
    Unregistered,
}

/// Route one message for `window` through its tap.
pub fn dispatch(
    registry: &RefCell<InterceptorRegistry>,
    window: WindowId,
    message: &NativeMessage,
) -> DispatchOutcome {
    let record = match registry.try_borrow() {
        Ok(registry) => registry.record(window).cloned(),
        Err(_) => {
            log::warn!(
                "[interceptor] Registry busy while dispatching to {:#x}; using default handling",
                window.raw()
            );
            None
        }
    };
    let Some(record) = record else {
        return DispatchOutcome::Unregistered;
    };

    if let Some(tap) = record.tap.upgrade() {
        if let Some(result) = tap.on_native_message(window, message) {
            return DispatchOutcome::Consumed(result);
        }
    }
    DispatchOutcome::Forward(record.original_proc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::test_support::{FakeHost, FakeNative, NativeCall};
    use crate::chrome::types::Rect;
    use std::cell::Cell;

    fn window() -> WindowId {
        WindowId::new(0x100).unwrap()
    }

    struct CountingTap {
        hits: Cell<u32>,
        consume: bool,
    }

    impl MessageTap for CountingTap {
        fn on_native_message(&self, _window: WindowId, _message: &NativeMessage) -> Option<isize> {
            self.hits.set(self.hits.get() + 1);
            self.consume.then_some(0)
        }
    }

    fn tap(consume: bool) -> Rc<CountingTap> {
        Rc::new(CountingTap {
            hits: Cell::new(0),
            consume,
        })
    }

    fn weak_tap(tap: &Rc<CountingTap>) -> Weak<dyn MessageTap> {
        let tap: Rc<dyn MessageTap> = tap.clone();
        Rc::downgrade(&tap)
    }

    #[test]
    fn install_is_idempotent() {
        let native = FakeNative::new();
        let t = tap(true);
        let mut registry = InterceptorRegistry::new();

        assert!(registry.install(&native, window(), weak_tap(&t)));
        assert!(registry.install(&native, window(), weak_tap(&t)));

        assert_eq!(registry.len(), 1);
        assert_eq!(native.count(|c| matches!(c, NativeCall::InstallHook(_))), 1);
        assert_eq!(
            registry.record(window()).unwrap().original_proc,
            FakeNative::original_proc()
        );
    }

    #[test]
    fn uninstall_twice_is_safe() {
        let native = FakeNative::new();
        let t = tap(true);
        let mut registry = InterceptorRegistry::new();
        registry.install(&native, window(), weak_tap(&t));

        assert!(registry.uninstall(&native, window()));
        assert!(!registry.uninstall(&native, window()));

        assert!(registry.is_empty());
        assert_eq!(
            native.count(|c| *c == NativeCall::RestoreProc(window(), FakeNative::original_proc())),
            1
        );
    }

    #[test]
    fn uninstall_unregistered_is_noop() {
        let native = FakeNative::new();
        let mut registry = InterceptorRegistry::new();
        assert!(!registry.uninstall(&native, window()));
        assert!(native.calls().is_empty());
    }

    #[test]
    fn install_without_captured_proc_registers_nothing() {
        let native = FakeNative::new();
        native.capture_proc.set(None);
        let t = tap(true);
        let mut registry = InterceptorRegistry::new();

        assert!(!registry.install(&native, window(), weak_tap(&t)));
        assert!(!registry.contains(window()));
    }

    #[test]
    fn dispatch_consumed_and_forwarded() {
        let native = FakeNative::new();
        let msg = NativeMessage::Other { id: 0x000F };

        let consuming = tap(true);
        let registry = RefCell::new(InterceptorRegistry::new());
        registry.borrow_mut().install(&native, window(), weak_tap(&consuming));
        assert_eq!(dispatch(&registry, window(), &msg), DispatchOutcome::Consumed(0));
        assert_eq!(consuming.hits.get(), 1);

        let passing = tap(false);
        let registry = RefCell::new(InterceptorRegistry::new());
        registry.borrow_mut().install(&native, window(), weak_tap(&passing));
        assert_eq!(
            dispatch(&registry, window(), &msg),
            DispatchOutcome::Forward(FakeNative::original_proc())
        );
    }

    #[test]
    fn dispatch_unknown_window_uses_default() {
        let registry = RefCell::new(InterceptorRegistry::new());
        let msg = NativeMessage::Other { id: 1 };
        assert_eq!(dispatch(&registry, window(), &msg), DispatchOutcome::Unregistered);
    }

    #[test]
    fn dispatch_after_tap_dropped_forwards() {
        let native = FakeNative::new();
        let registry = RefCell::new(InterceptorRegistry::new());
        {
            let t = tap(true);
            registry.borrow_mut().install(&native, window(), weak_tap(&t));
        }
        let msg = NativeMessage::Other { id: 1 };
        assert_eq!(
            dispatch(&registry, window(), &msg),
            DispatchOutcome::Forward(FakeNative::original_proc())
        );
    }

    #[test]
    fn shared_registry_lives_while_held() {
        let first = InterceptorRegistry::shared();
        let second = InterceptorRegistry::shared();
        assert!(Rc::ptr_eq(&first, &second));
        assert!(InterceptorRegistry::active().is_some());

        drop(first);
        drop(second);
        assert!(InterceptorRegistry::active().is_none());
    }

    // ---- gesture recognition ----

    fn recognize(
        message: NativeMessage,
        host: &FakeHost,
        native: &FakeNative,
    ) -> Option<MenuRequest> {
        recognize_menu_gesture(window(), &message, host, native, 30)
    }

    #[test]
    fn caption_right_click() {
        let host = FakeHost::new();
        let native = FakeNative::new();
        let msg = NativeMessage::NonClientRightButtonUp {
            hit_test: HTCAPTION,
            screen: Point::new(500, 40),
        };
        assert_eq!(
            recognize(msg, &host, &native),
            Some(MenuRequest {
                pos: Point::new(500, 40),
                keyboard: false
            })
        );

        let border = NativeMessage::NonClientRightButtonUp {
            hit_test: 10,
            screen: Point::new(500, 40),
        };
        assert_eq!(recognize(border, &host, &native), None);
    }

    #[test]
    fn client_right_click_in_title_area() {
        let host = FakeHost::new();
        host.native_scale.set(2);
        let native = FakeNative::new();
        native.client_origin.set(Point::new(1000, 500));

        // Native (40, 20) is scene (20, 10): inside the default title bar
        let msg = NativeMessage::RightButtonUp {
            local: Point::new(40, 20),
        };
        assert_eq!(
            recognize(msg, &host, &native),
            Some(MenuRequest {
                pos: Point::new(1040, 520),
                keyboard: false
            })
        );

        // Native (40, 200) is scene (20, 100): below the title bar
        let outside = NativeMessage::RightButtonUp {
            local: Point::new(40, 200),
        };
        assert_eq!(recognize(outside, &host, &native), None);
    }

    #[test]
    fn keyboard_menu_system_command() {
        let host = FakeHost::new();
        let native = FakeNative::new();
        native.window_rect.set(Some(Rect::new(100, 200, 500, 500)));

        let msg = NativeMessage::SysCommand {
            command: SC_KEYMENU as usize | 0x3,
            param: VK_SPACE as isize,
        };
        assert_eq!(
            recognize(msg, &host, &native),
            Some(MenuRequest {
                pos: Point::new(100, 230),
                keyboard: true
            })
        );

        // Alt alone (no space parameter) opens the menu bar, not the system menu
        let alt_only = NativeMessage::SysCommand {
            command: SC_KEYMENU as usize,
            param: 0,
        };
        assert_eq!(recognize(alt_only, &host, &native), None);
    }

    #[test]
    fn alt_space_key_down() {
        let host = FakeHost::new();
        let native = FakeNative::new();
        native.window_rect.set(Some(Rect::new(10, 20, 300, 300)));

        let space = NativeMessage::KeyDown { key: VK_SPACE };
        assert_eq!(recognize(space, &host, &native), None);

        native.keys_down.borrow_mut().insert(VK_MENU);
        assert_eq!(
            recognize(space, &host, &native),
            Some(MenuRequest {
                pos: Point::new(10, 50),
                keyboard: true
            })
        );

        native.keys_down.borrow_mut().clear();
        native.keys_down.borrow_mut().insert(VK_SPACE);
        let alt = NativeMessage::KeyDown { key: VK_MENU };
        assert!(recognize(alt, &host, &native).is_some());
    }

    #[test]
    fn keyboard_position_without_window_rect() {
        let host = FakeHost::new();
        let native = FakeNative::new();
        native.window_rect.set(None);
        let msg = NativeMessage::SysCommand {
            command: SC_KEYMENU as usize,
            param: VK_SPACE as isize,
        };
        assert_eq!(recognize(msg, &host, &native).unwrap().pos, Point::new(0, 30));
    }
}
