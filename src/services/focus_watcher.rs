use crate::events::{WindowEvent, WindowHandle};
use crate::services::desktop::WindowState;

/// Последнее окно, замеченное в фокусе
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    last: Option<WindowHandle>,
}

impl FocusState {
    #[allow(dead_code)]
    pub fn last(&self) -> Option<WindowHandle> {
        self.last
    }
}

/// Detects foreground window transitions.
///
/// A transition fires only for a non-null handle that differs from the last
/// one observed. A null foreground leaves the state untouched, so regaining
/// focus on the same window after a momentary blip is not a transition.
#[derive(Debug, Default)]
pub struct FocusWatcher {
    state: FocusState,
}

impl FocusWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn poll<W: WindowState + ?Sized>(&mut self, desktop: &W) -> Option<WindowEvent> {
        self.observe(desktop.foreground_window())
    }

    pub fn observe(&mut self, foreground: WindowHandle) -> Option<WindowEvent> {
        let window = foreground.non_null()?;
        if self.state.last == Some(window) {
            return None;
        }

        let previous = self.state.last.replace(window);
        Some(WindowEvent::focus_changed(window, previous))
    }
}
