use crate::error::Result;
use crate::events::WindowHandle;
use crate::geometry::{Point, Rect};
use std::sync::Arc;

/// Наличие запроса расширенных стилей окна, определяется один раз при старте
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleCapability {
    Available,
    Unavailable,
}

/// Geometry requests against the OS: window rectangles, cursor reads and
/// cursor writes. Every call may fail independently of the others.
pub trait GeometryOracle {
    fn window_rect(&self, window: WindowHandle) -> Result<Rect>;

    fn cursor_position(&self) -> Result<Point>;

    /// Best-effort; callers neither retry nor surface the failure
    fn set_cursor_position(&self, point: Point) -> Result<()>;
}

/// Window state requests against the OS.
pub trait WindowState {
    /// Текущее активное окно; `WindowHandle::NULL`, если фокуса нет ни у одного окна
    fn foreground_window(&self) -> WindowHandle;

    fn is_visible(&self, window: WindowHandle) -> bool;

    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn extended_style_capability(&self) -> StyleCapability;

    fn extended_style(&self, window: WindowHandle) -> Result<u32>;
}

/// Everything the focus loop needs from the windowing environment.
pub trait Desktop: GeometryOracle + WindowState + Send + Sync {}

impl<T> Desktop for T where T: GeometryOracle + WindowState + Send + Sync {}

impl<T: GeometryOracle + ?Sized> GeometryOracle for Arc<T> {
    fn window_rect(&self, window: WindowHandle) -> Result<Rect> {
        (**self).window_rect(window)
    }

    fn cursor_position(&self) -> Result<Point> {
        (**self).cursor_position()
    }

    fn set_cursor_position(&self, point: Point) -> Result<()> {
        (**self).set_cursor_position(point)
    }
}

impl<T: WindowState + ?Sized> WindowState for Arc<T> {
    fn foreground_window(&self) -> WindowHandle {
        (**self).foreground_window()
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        (**self).is_visible(window)
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        (**self).is_minimized(window)
    }

    fn extended_style_capability(&self) -> StyleCapability {
        (**self).extended_style_capability()
    }

    fn extended_style(&self, window: WindowHandle) -> Result<u32> {
        (**self).extended_style(window)
    }
}
