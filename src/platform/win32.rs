//! Win32 provider: window procedure subclassing and the system menu.
//!
//! The interception procedure is installed with `SetWindowLongPtrW(GWLP_WNDPROC)`
//! and looks its window up in the UI thread's [`InterceptorRegistry`] on every
//! message.

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::Input::KeyboardAndMouse::GetKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, DefWindowProcW, EnableMenuItem, GetSystemMenu, GetWindowRect, HiliteMenuItem,
    IsZoomed, PostMessageW, SetMenuDefaultItem, TrackPopupMenu, GWLP_WNDPROC, GWL_STYLE, HMENU,
    MF_BYCOMMAND, MF_ENABLED, MF_GRAYED, MF_HILITE, MF_UNHILITE, TPM_LEFTALIGN, TPM_RETURNCMD,
    TPM_RIGHTALIGN, TPM_RIGHTBUTTON, WINDOW_LONG_PTR_INDEX, WM_KEYDOWN, WM_NCRBUTTONUP,
    WM_RBUTTONUP, WM_SYSCOMMAND, WM_SYSKEYDOWN, WNDPROC, WS_MAXIMIZEBOX, WS_MINIMIZEBOX,
};

use super::{
    MenuAlignment, MenuHandle, NativeMenuOps, NativeWindowOps, NativeWindowStyle, WindowProc,
    WindowProcHook,
};
use crate::chrome::interceptor::{dispatch, DispatchOutcome, InterceptorRegistry, NativeMessage};
use crate::chrome::system_menu::SystemCommand;
use crate::chrome::types::{Point, Rect, WindowId};

/// Native chrome provider backed by user32.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Chrome;

fn hwnd(window: WindowId) -> HWND {
    HWND(window.raw() as *mut std::ffi::c_void)
}

fn hmenu(menu: MenuHandle) -> HMENU {
    HMENU(menu.raw() as *mut std::ffi::c_void)
}

#[cfg(target_pointer_width = "64")]
unsafe fn get_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX) -> isize {
    windows::Win32::UI::WindowsAndMessaging::GetWindowLongPtrW(hwnd, index)
}

#[cfg(target_pointer_width = "64")]
unsafe fn set_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX, value: isize) -> isize {
    windows::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(hwnd, index, value)
}

#[cfg(target_pointer_width = "32")]
unsafe fn get_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX) -> isize {
    windows::Win32::UI::WindowsAndMessaging::GetWindowLongW(hwnd, index) as isize
}

#[cfg(target_pointer_width = "32")]
unsafe fn set_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX, value: isize) -> isize {
    windows::Win32::UI::WindowsAndMessaging::SetWindowLongW(hwnd, index, value as i32) as isize
}

impl NativeWindowOps for Win32Chrome {
    fn window_style(&self, window: WindowId) -> NativeWindowStyle {
        unsafe {
            let style = get_window_long(hwnd(window), GWL_STYLE) as u32;
            NativeWindowStyle {
                maximized: IsZoomed(hwnd(window)).as_bool(),
                maximizable: style & WS_MAXIMIZEBOX.0 != 0,
                minimizable: style & WS_MINIMIZEBOX.0 != 0,
            }
        }
    }

    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(window), &mut rect) }.ok()?;
        Some(Rect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn client_to_screen(&self, window: WindowId, pos: Point) -> Point {
        let mut point = POINT { x: pos.x, y: pos.y };
        if !unsafe { ClientToScreen(hwnd(window), &mut point) }.as_bool() {
            log::warn!("[win32] ClientToScreen failed for {:#x}", window.raw());
            return pos;
        }
        Point::new(point.x, point.y)
    }

    fn is_key_down(&self, key: u32) -> bool {
        // High bit set means pressed
        unsafe { GetKeyState(key as i32) < 0 }
    }
}

impl NativeMenuOps for Win32Chrome {
    fn system_menu(&self, window: WindowId) -> Option<MenuHandle> {
        let menu = unsafe { GetSystemMenu(hwnd(window), BOOL::from(false)) };
        MenuHandle::new(menu.0 as isize)
    }

    fn enable_menu_item(&self, menu: MenuHandle, entry: SystemCommand, enabled: bool) {
        let state = if enabled { MF_ENABLED } else { MF_GRAYED };
        unsafe {
            let _ = EnableMenuItem(hmenu(menu), entry.code(), MF_BYCOMMAND | state);
        }
    }

    fn highlight_menu_item(
        &self,
        window: WindowId,
        menu: MenuHandle,
        entry: SystemCommand,
        highlighted: bool,
    ) {
        let state = if highlighted { MF_HILITE } else { MF_UNHILITE };
        let flags = (MF_BYCOMMAND | state).0;
        unsafe {
            let _ = HiliteMenuItem(hwnd(window), hmenu(menu), entry.code(), flags);
        }
    }

    fn set_default_menu_item(&self, menu: MenuHandle, entry: SystemCommand) {
        if let Err(e) = unsafe { SetMenuDefaultItem(hmenu(menu), entry.code(), 0) } {
            log::debug!("[win32] SetMenuDefaultItem failed: {}", e);
        }
    }

    fn track_popup_menu(
        &self,
        window: WindowId,
        menu: MenuHandle,
        pos: Point,
        alignment: MenuAlignment,
    ) -> Option<u32> {
        let align = match alignment {
            MenuAlignment::Left => TPM_LEFTALIGN,
            MenuAlignment::Right => TPM_RIGHTALIGN,
        };
        let result = unsafe {
            TrackPopupMenu(
                hmenu(menu),
                TPM_RETURNCMD | TPM_RIGHTBUTTON | align,
                pos.x,
                pos.y,
                0,
                hwnd(window),
                None,
            )
        };
        // With TPM_RETURNCMD the result is the chosen command, zero when dismissed
        match result.0 {
            0 => None,
            command => Some(command as u32),
        }
    }

    fn post_system_command(&self, window: WindowId, command: u32) {
        let wparam = WPARAM(command as usize);
        let posted = unsafe { PostMessageW(hwnd(window), WM_SYSCOMMAND, wparam, LPARAM(0)) };
        if let Err(e) = posted {
            log::warn!("[win32] Failed to post system command {:#x}: {}", command, e);
        }
    }
}

impl WindowProcHook for Win32Chrome {
    fn install_hook(&self, window: WindowId) -> Option<WindowProc> {
        let hwnd = hwnd(window);
        let original = unsafe { get_window_long(hwnd, GWLP_WNDPROC) };
        let original = WindowProc::new(original as usize)?;
        unsafe {
            set_window_long(hwnd, GWLP_WNDPROC, system_menu_hook_proc as usize as isize);
        }
        Some(original)
    }

    fn restore_proc(&self, window: WindowId, original: WindowProc) {
        unsafe {
            set_window_long(hwnd(window), GWLP_WNDPROC, original.raw() as isize);
        }
    }
}

fn lparam_point(lparam: LPARAM) -> Point {
    let x = (lparam.0 & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32;
    Point::new(x, y)
}

/// Decode the raw message parameters into the cases the interceptor handles.
fn decode_message(msg: u32, wparam: WPARAM, lparam: LPARAM) -> NativeMessage {
    match msg {
        WM_RBUTTONUP => NativeMessage::RightButtonUp {
            local: lparam_point(lparam),
        },
        WM_NCRBUTTONUP => NativeMessage::NonClientRightButtonUp {
            hit_test: wparam.0 as u32,
            screen: lparam_point(lparam),
        },
        WM_SYSCOMMAND => NativeMessage::SysCommand {
            command: wparam.0,
            param: lparam.0,
        },
        WM_KEYDOWN | WM_SYSKEYDOWN => NativeMessage::KeyDown {
            key: wparam.0 as u32,
        },
        id => NativeMessage::Other { id },
    }
}

unsafe extern "system" fn system_menu_hook_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let outcome = match (WindowId::new(hwnd.0 as isize), InterceptorRegistry::active()) {
        (Some(window), Some(registry)) => {
            dispatch(&registry, window, &decode_message(msg, wparam, lparam))
        }
        _ => DispatchOutcome::Unregistered,
    };

    match outcome {
        DispatchOutcome::Consumed(result) => LRESULT(result),
        DispatchOutcome::Forward(original) => {
            // The value came from GWLP_WNDPROC, so it is a valid window procedure
            let original: WNDPROC = std::mem::transmute(original.raw());
            CallWindowProcW(original, hwnd, msg, wparam, lparam)
        }
        DispatchOutcome::Unregistered => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
