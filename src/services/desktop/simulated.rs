use super::r#trait::{GeometryOracle, StyleCapability, WindowState};
use crate::error::{FocusError, Result};
use crate::events::WindowHandle;
use crate::geometry::{Point, Rect};
use crate::services::window_filter::WS_EX_TOOLWINDOW;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use tracing::info;

/// Окно эмулируемого рабочего стола
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedWindow {
    pub title: String,
    pub rect: Rect,
    pub visible: bool,
    pub minimized: bool,
    pub ex_style: u32,
}

impl SimulatedWindow {
    pub fn new(title: impl Into<String>, rect: Rect) -> Self {
        Self {
            title: title.into(),
            rect,
            visible: true,
            minimized: false,
            ex_style: 0,
        }
    }

    pub fn tool_window(mut self) -> Self {
        self.ex_style |= WS_EX_TOOLWINDOW;
        self
    }
}

#[cfg(test)]
impl SimulatedWindow {
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn minimized(mut self) -> Self {
        self.minimized = true;
        self
    }
}

/// Round-robin focus changes for the dry-run demo.
#[derive(Debug)]
struct Rotation {
    order: Vec<WindowHandle>,
    polls_per_window: u32,
    polls: u32,
}

#[derive(Debug)]
struct SimulatedState {
    windows: HashMap<WindowHandle, SimulatedWindow>,
    foreground: WindowHandle,
    foreground_script: VecDeque<WindowHandle>,
    rotation: Option<Rotation>,
    rect_scripts: HashMap<WindowHandle, VecDeque<Option<Rect>>>,
    cursor: Point,
    cursor_query_fails: bool,
    cursor_moves: Vec<Point>,
    style_capability: StyleCapability,
}

/// In-memory desktop: a scripted stand-in for the real windowing API.
///
/// Used by `--dry-run` and by the focus loop tests. Foreground values are
/// consumed from a script one per poll; once the script runs out, the last
/// value sticks (or the dry-run rotation takes over).
pub struct SimulatedDesktop {
    state: Mutex<SimulatedState>,
    dry_run: bool,
}

impl Default for SimulatedDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDesktop {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimulatedState {
                windows: HashMap::new(),
                foreground: WindowHandle::NULL,
                foreground_script: VecDeque::new(),
                rotation: None,
                rect_scripts: HashMap::new(),
                cursor: Point::new(0, 0),
                cursor_query_fails: false,
                cursor_moves: Vec::new(),
                style_capability: StyleCapability::Available,
            }),
            dry_run: false,
        }
    }

    /// Рабочий стол для режима сухого запуска: несколько окон, фокус переходит по кругу
    pub fn demo(polls_per_window: u32) -> Self {
        let windows = [
            ("Terminal - dry_run", Rect::new(0, 0, 960, 1040)),
            ("Browser - dry_run", Rect::new(960, 0, 1920, 1040)),
            ("Editor - dry_run", Rect::new(200, 100, 1720, 980)),
            ("Palette - dry_run", Rect::new(1500, 300, 1700, 700)),
        ];

        let mut desktop = Self::new().with_cursor(Point::new(10, 10));
        let mut order = Vec::new();
        for (i, (title, rect)) in windows.into_iter().enumerate() {
            let handle = WindowHandle(0x1000 + i as isize);
            let mut window = SimulatedWindow::new(title, rect);
            if title.starts_with("Palette") {
                window = window.tool_window();
            }
            desktop = desktop.with_window(handle, window);
            order.push(handle);
        }

        let state = desktop.state.get_mut();
        state.rotation = Some(Rotation {
            order,
            polls_per_window: polls_per_window.max(1),
            polls: 0,
        });
        desktop.dry_run = true;
        desktop
    }

    pub fn with_window(mut self, handle: WindowHandle, window: SimulatedWindow) -> Self {
        self.state.get_mut().windows.insert(handle, window);
        self
    }

    pub fn with_cursor(mut self, cursor: Point) -> Self {
        self.state.get_mut().cursor = cursor;
        self
    }
}

#[cfg(test)]
impl SimulatedDesktop {
    pub fn with_foreground_sequence(mut self, sequence: impl IntoIterator<Item = WindowHandle>) -> Self {
        self.state.get_mut().foreground_script.extend(sequence);
        self
    }

    pub fn with_style_capability(mut self, capability: StyleCapability) -> Self {
        self.state.get_mut().style_capability = capability;
        self
    }

    pub fn with_failing_cursor_query(mut self) -> Self {
        self.state.get_mut().cursor_query_fails = true;
        self
    }

    /// Сменить активное окно немедленно, отбросив остаток сценария
    pub fn set_foreground(&self, handle: WindowHandle) {
        let mut state = self.state.lock();
        state.foreground_script.clear();
        state.foreground = handle;
    }

    /// Следующие ответы `window_rect` для окна; `None` означает отказ запроса
    pub fn script_rects(&self, handle: WindowHandle, answers: impl IntoIterator<Item = Option<Rect>>) {
        self.state
            .lock()
            .rect_scripts
            .entry(handle)
            .or_default()
            .extend(answers);
    }

    pub fn update_window(&self, handle: WindowHandle, update: impl FnOnce(&mut SimulatedWindow)) {
        if let Some(window) = self.state.lock().windows.get_mut(&handle) {
            update(window);
        }
    }

    pub fn destroy_window(&self, handle: WindowHandle) {
        self.state.lock().windows.remove(&handle);
    }

    pub fn cursor(&self) -> Point {
        self.state.lock().cursor
    }

    pub fn cursor_moves(&self) -> Vec<Point> {
        self.state.lock().cursor_moves.clone()
    }

    pub fn title(&self, handle: WindowHandle) -> Option<String> {
        self.state.lock().windows.get(&handle).map(|w| w.title.clone())
    }
}

impl GeometryOracle for SimulatedDesktop {
    fn window_rect(&self, window: WindowHandle) -> Result<Rect> {
        let mut state = self.state.lock();

        if let Some(answer) = state.rect_scripts.get_mut(&window).and_then(|s| s.pop_front()) {
            return answer.ok_or_else(|| {
                FocusError::QueryFailed(format!("GetWindowRect({}) отклонён сценарием", window))
            });
        }

        match state.windows.get(&window) {
            Some(w) => Ok(w.rect),
            None => FocusError::query_failed(format!("окно {} не существует", window)),
        }
    }

    fn cursor_position(&self) -> Result<Point> {
        let state = self.state.lock();
        if state.cursor_query_fails {
            return FocusError::query_failed("GetCursorPos отклонён сценарием");
        }
        Ok(state.cursor)
    }

    fn set_cursor_position(&self, point: Point) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Курсор перемещён в {}", point);
        }
        let mut state = self.state.lock();
        state.cursor = point;
        state.cursor_moves.push(point);
        Ok(())
    }
}

impl WindowState for SimulatedDesktop {
    fn foreground_window(&self) -> WindowHandle {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(next) = state.foreground_script.pop_front() {
            state.foreground = next;
        } else if let Some(rotation) = state.rotation.as_mut() {
            let index = (rotation.polls / rotation.polls_per_window) as usize % rotation.order.len();
            rotation.polls = rotation.polls.wrapping_add(1);
            let next = rotation.order[index];
            if next != state.foreground {
                if let Some(window) = state.windows.get(&next) {
                    info!("[DRY RUN] Эмулируем смену окна на: {}", window.title);
                }
                state.foreground = next;
            }
        }

        state.foreground
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        self.state.lock().windows.get(&window).is_some_and(|w| w.visible)
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        self.state.lock().windows.get(&window).is_some_and(|w| w.minimized)
    }

    fn extended_style_capability(&self) -> StyleCapability {
        self.state.lock().style_capability
    }

    fn extended_style(&self, window: WindowHandle) -> Result<u32> {
        let state = self.state.lock();
        if state.style_capability == StyleCapability::Unavailable {
            return Err(FocusError::CapabilityUnavailable("extended style".to_string()));
        }
        match state.windows.get(&window) {
            Some(w) => Ok(w.ex_style),
            None => FocusError::query_failed(format!("окно {} не существует", window)),
        }
    }
}
