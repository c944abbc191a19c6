use serde::{Deserialize, Serialize};
use std::fmt;

/// Непрозрачный идентификатор окна верхнего уровня.
///
/// The OS owns the handle and may destroy the window at any moment, so every
/// consumer treats it as possibly stale after it was acquired. `0` is the
/// null handle ("no window").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// `None` для нулевого дескриптора
    pub fn non_null(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Событие смены активного окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    pub window: WindowHandle,
    pub previous: Option<WindowHandle>,
    pub timestamp: std::time::Instant,
    pub event_type: WindowEventType,
}

impl WindowEvent {
    pub fn new(window: WindowHandle, previous: Option<WindowHandle>, event_type: WindowEventType) -> Self {
        Self {
            window,
            previous,
            timestamp: std::time::Instant::now(),
            event_type,
        }
    }

    pub fn focus_changed(window: WindowHandle, previous: Option<WindowHandle>) -> Self {
        Self::new(window, previous, WindowEventType::FocusChanged)
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.previous {
            Some(previous) => write!(
                f,
                "{:?}: {} -> {} ({}ms ago)",
                self.event_type,
                previous,
                self.window,
                self.timestamp.elapsed().as_millis()
            ),
            None => write!(
                f,
                "{:?}: {} ({}ms ago)",
                self.event_type,
                self.window,
                self.timestamp.elapsed().as_millis()
            ),
        }
    }
}

/// Тип события окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowEventType {
    FocusChanged,
}
