use super::r#trait::{GeometryOracle, StyleCapability, WindowState};
use crate::error::{FocusError, Result};
use crate::events::WindowHandle;
use crate::geometry::{Point, Rect};
use crate::utils::win32::resolve_export;
use std::ffi::c_void;
use tracing::{debug, info};
use windows::core::{s, w};
use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetForegroundWindow, GetWindowRect, IsIconic, IsWindowVisible, SetCursorPos,
    GWL_EXSTYLE,
};

type GetWindowLongWFn = unsafe extern "system" fn(isize, i32) -> i32;

/// Desktop backed by the Win32 windowing API of the interactive session.
pub struct Win32Desktop {
    get_window_long: Option<GetWindowLongWFn>,
}

impl Win32Desktop {
    pub fn new() -> Result<Self> {
        info!("Инициализация Win32Desktop");

        // SAFETY: GetWindowLongW имеет сигнатуру LONG (HWND, int); HWND передаётся как isize
        let get_window_long = unsafe {
            resolve_export(w!("user32.dll"), s!("GetWindowLongW"))
                .map(|proc| std::mem::transmute::<_, GetWindowLongWFn>(proc))
        };

        match get_window_long {
            Some(_) => debug!("GetWindowLongW доступна, фильтр стилей окон включён"),
            None => info!("GetWindowLongW недоступна, фильтр стилей окон отключён"),
        }

        Ok(Self { get_window_long })
    }

    fn hwnd(window: WindowHandle) -> HWND {
        HWND(window.0 as *mut c_void)
    }
}

impl GeometryOracle for Win32Desktop {
    fn window_rect(&self, window: WindowHandle) -> Result<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(Self::hwnd(window), &mut rect)? };
        Ok(Rect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn cursor_position(&self) -> Result<Point> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point)? };
        Ok(Point::new(point.x, point.y))
    }

    fn set_cursor_position(&self, point: Point) -> Result<()> {
        unsafe { SetCursorPos(point.x, point.y)? };
        Ok(())
    }
}

impl WindowState for Win32Desktop {
    fn foreground_window(&self) -> WindowHandle {
        WindowHandle(unsafe { GetForegroundWindow() }.0 as isize)
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        unsafe { IsWindowVisible(Self::hwnd(window)) }.as_bool()
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        unsafe { IsIconic(Self::hwnd(window)) }.as_bool()
    }

    fn extended_style_capability(&self) -> StyleCapability {
        if self.get_window_long.is_some() {
            StyleCapability::Available
        } else {
            StyleCapability::Unavailable
        }
    }

    fn extended_style(&self, window: WindowHandle) -> Result<u32> {
        let get_window_long = self.get_window_long.ok_or_else(|| {
            FocusError::CapabilityUnavailable("GetWindowLongW".to_string())
        })?;
        // 0 также является допустимым набором стилей, поэтому ответ принимается как есть
        let style = unsafe { get_window_long(window.0, GWL_EXSTYLE.0) };
        Ok(style as u32)
    }
}
