//! Binding between a host window and the chrome machinery.
//!
//! A [`WindowContext`] owns the interaction filter for one host window and keeps
//! the native interceptor attached to whichever native handle currently backs
//! that window.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use raw_window_handle::RawWindowHandle;

use crate::chrome::event_filter::{ChromeAction, InteractionFilter, WindowStatus};
use crate::chrome::host::ChromeHost;
use crate::chrome::interceptor::{self, MessageTap, NativeMessage, SharedRegistry};
use crate::chrome::system_menu;
use crate::chrome::types::{Point, PointerEvent, WindowFlags, WindowId};
use crate::config::ChromeConfig;
use crate::error::ChromeResult;
use crate::platform::NativeChrome;

/// Frameless chrome for one host window.
pub struct WindowContext {
    host: Rc<dyn ChromeHost>,
    native: Option<Rc<dyn NativeChrome>>,
    registry: SharedRegistry,
    config: ChromeConfig,
    window_id: Cell<Option<WindowId>>,
    filter: RefCell<InteractionFilter>,
    self_ref: Weak<WindowContext>,
}

impl WindowContext {
    /// Create an unbound context.
    ///
    /// `native` is None on platforms without message interception; pointer
    /// handling still works there, native menu gestures do not.
    pub fn new(
        host: Rc<dyn ChromeHost>,
        native: Option<Rc<dyn NativeChrome>>,
        registry: SharedRegistry,
        config: ChromeConfig,
    ) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            host,
            native,
            registry,
            filter: RefCell::new(InteractionFilter::new(&config)),
            config,
            window_id: Cell::new(None),
            self_ref: self_ref.clone(),
        })
    }

    /// Context using the running platform's native provider, the thread's
    /// shared registry and the global configuration.
    pub fn with_platform_defaults(host: Rc<dyn ChromeHost>) -> Rc<Self> {
        Self::new(
            host,
            crate::platform::native_chrome(),
            interceptor::InterceptorRegistry::shared(),
            ChromeConfig::current(),
        )
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.window_id.get()
    }

    pub fn config(&self) -> &ChromeConfig {
        &self.config
    }

    pub fn interaction_status(&self) -> WindowStatus {
        self.filter.borrow().status()
    }

    /// Track a change of the native handle backing the host window.
    ///
    /// Marks the host frameless while a handle is bound and moves the native
    /// interceptor from the previous handle to the new one.
    pub fn bind_window(&self, window: Option<WindowId>) {
        let previous = self.window_id.replace(window);

        let flags = self.host.window_flags();
        if window.is_some() {
            self.host.set_window_flags(flags | WindowFlags::FRAMELESS);
        } else {
            self.host.set_window_flags(flags - WindowFlags::FRAMELESS);
        }

        let Some(native) = self.native.as_deref() else {
            return;
        };
        let Ok(mut registry) = self.registry.try_borrow_mut() else {
            log::warn!("[context] Interceptor registry busy; hooks not updated for {:?}", window);
            return;
        };
        if let Some(old) = previous {
            registry.uninstall(native, old);
        }
        if let Some(new) = window {
            let tap: Weak<dyn MessageTap> = self.self_ref.clone();
            registry.install(native, new, tap);
        }
    }

    /// [`WindowContext::bind_window`] for a handle obtained through `raw-window-handle`.
    pub fn bind_raw_window(&self, handle: Option<RawWindowHandle>) -> ChromeResult<()> {
        let window = handle.map(WindowId::try_from).transpose()?;
        self.bind_window(window);
        Ok(())
    }

    /// Feed one pointer event through the interaction filter.
    ///
    /// Returns true if the event was consumed. Blocking native gestures run
    /// inside this call.
    pub fn handle_pointer_event(&self, event: &mut PointerEvent) -> bool {
        let decision = match self.filter.try_borrow_mut() {
            Ok(mut filter) => filter.handle(&*self.host, event),
            Err(_) => {
                log::warn!("[context] Re-entrant pointer event {:?} passed through", event.kind);
                return false;
            }
        };
        if let Some(action) = decision.action {
            self.perform(action);
        }
        decision.consumed
    }

    fn perform(&self, action: ChromeAction) {
        match action {
            ChromeAction::StartResize(edges) => {
                log::debug!("[context] Starting system resize {:?}", edges);
                if !self.host.start_system_resize(edges) {
                    log::debug!("[context] Host declined system resize");
                }
                self.finish_gesture();
            }
            ChromeAction::StartMove => {
                log::debug!("[context] Starting system move");
                if !self.host.start_system_move() {
                    log::debug!("[context] Host declined system move");
                }
                self.finish_gesture();
            }
            ChromeAction::ShowSystemMenu(pos) => self.show_system_menu(pos),
            ChromeAction::SetCursor(shape) => self.host.set_cursor_shape(shape),
            ChromeAction::RestoreCursor => self.host.restore_cursor_shape(),
            ChromeAction::SetWindowStates(states) => self.host.set_window_states(states),
        }
    }

    fn finish_gesture(&self) {
        match self.filter.try_borrow_mut() {
            Ok(mut filter) => filter.gesture_finished(),
            Err(_) => log::warn!("[context] Filter busy after native gesture; state not reset"),
        }
    }

    /// Open the native system menu at a logical global position.
    ///
    /// No-op while unbound or without a native provider.
    pub fn show_system_menu(&self, pos: Point) {
        let (Some(window), Some(native)) = (self.window_id.get(), self.native.as_deref()) else {
            log::debug!("[context] System menu requested without a bound native window");
            return;
        };
        let native_pos = self.host.to_native_global(pos);
        system_menu::show_system_menu(
            native,
            window,
            native_pos,
            false,
            self.host.is_host_size_fixed(),
            self.host.is_right_to_left(),
        );
    }
}

impl MessageTap for WindowContext {
    fn on_native_message(&self, window: WindowId, message: &NativeMessage) -> Option<isize> {
        let native = self.native.as_deref()?;
        let request = interceptor::recognize_menu_gesture(
            window,
            message,
            &*self.host,
            native,
            self.config.keyboard_menu_offset,
        )?;
        // Swallowed whether or not an entry was picked
        system_menu::show_system_menu(
            native,
            window,
            request.pos,
            request.keyboard,
            self.host.is_host_size_fixed(),
            self.host.is_right_to_left(),
        );
        Some(0)
    }
}

impl Drop for WindowContext {
    fn drop(&mut self) {
        let (Some(window), Some(native)) = (self.window_id.get(), self.native.as_deref()) else {
            return;
        };
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.uninstall(native, window);
            }
            Err(_) => log::warn!(
                "[context] Interceptor registry busy; hook on {:#x} left installed",
                window.raw()
            ),
        }
    }
}
