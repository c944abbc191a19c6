use crate::error::Result;
use crate::events::WindowHandle;
use crate::geometry::{Point, Rect};
use crate::services::cursor_placer;
use crate::services::desktop::Desktop;
use crate::services::focus_service::FocusServiceTrait;
use crate::services::focus_watcher::{FocusState, FocusWatcher};
use crate::services::window_filter::WindowFilter;
use crate::{debug_if_enabled, trace_if_enabled};
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

/// Фиксированные интервалы цикла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(30),
            settle_delay: Duration::from_millis(150),
        }
    }
}

/// Focus loop: poll the foreground window, filter, wait for the window
/// manager to settle, re-read geometry and move the cursor.
///
/// Everything runs on one task. While the settle delay is pending no other
/// transition is observed; the loop reacts to whatever window holds focus
/// when polling resumes.
pub struct Orchestrator<D> {
    desktop: D,
    watcher: FocusWatcher,
    filter: WindowFilter,
    timing: Timing,
}

impl<D: Desktop> Orchestrator<D> {
    pub fn new(desktop: D) -> Self {
        Self::with_timing(desktop, Timing::default())
    }

    pub fn with_timing(desktop: D, timing: Timing) -> Self {
        let filter = WindowFilter::for_desktop(&desktop);
        Self {
            desktop,
            watcher: FocusWatcher::new(),
            filter,
            timing,
        }
    }

    #[allow(dead_code)]
    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    #[allow(dead_code)]
    pub fn focus_state(&self) -> FocusState {
        self.watcher.state()
    }

    pub async fn run(mut self) -> Result<()> {
        info!(
            "Цикл слежения за фокусом запущен (опрос {:?}, задержка {:?})",
            self.timing.poll_interval, self.timing.settle_delay
        );

        loop {
            self.tick().await;
            sleep(self.timing.poll_interval).await;
        }
    }

    /// Один шаг цикла. Возвращает точку, куда был перемещён курсор.
    pub async fn tick(&mut self) -> Option<Point> {
        let event = self.watcher.poll(&self.desktop)?;
        debug_if_enabled!("{}", event);

        if !self.filter.is_candidate(&self.desktop, event.window) {
            return None;
        }

        sleep(self.timing.settle_delay).await;

        match self.follow(event.window) {
            Ok(moved) => moved,
            Err(e) => {
                trace_if_enabled!("Переход к окну {} отменён: {}", event.window, e);
                None
            }
        }
    }

    fn follow(&self, window: WindowHandle) -> Result<Option<Point>> {
        let rect = self.desktop.window_rect(window)?.validated()?;
        let cursor = self.desktop.cursor_position()?;

        if cursor_placer::place(rect, cursor).is_none() {
            debug_if_enabled!("Курсор {} уже над окном {}", cursor, window);
            return Ok(None);
        }

        // Геометрия могла измениться между проверкой и перемещением
        let rect = self
            .desktop
            .window_rect(window)
            .and_then(Rect::validated)
            .unwrap_or(rect);
        let target = rect.center();

        if let Err(e) = self.desktop.set_cursor_position(target) {
            trace_if_enabled!("Не удалось переместить курсор в {}: {}", target, e);
            return Ok(None);
        }

        debug!("Курсор перемещён {} -> {} (окно {})", cursor, target, window);
        Ok(Some(target))
    }
}

#[async_trait::async_trait]
impl<D: Desktop + 'static> FocusServiceTrait for Orchestrator<D> {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::desktop::{GeometryOracle, SimulatedDesktop, SimulatedWindow, StyleCapability};
    use std::sync::Arc;
    use tokio::time::Instant;

    const A: WindowHandle = WindowHandle(0xA);
    const B: WindowHandle = WindowHandle(0xB);
    const B_RECT: Rect = Rect::new(500, 500, 700, 700);

    fn desktop_with_b(cursor: Point) -> SimulatedDesktop {
        SimulatedDesktop::new()
            .with_window(B, SimulatedWindow::new("B", B_RECT))
            .with_cursor(cursor)
            .with_foreground_sequence([B])
    }

    #[tokio::test(start_paused = true)]
    async fn test_moves_to_center_after_settle_delay() {
        let mut orchestrator = Orchestrator::new(desktop_with_b(Point::new(150, 150)));
        let started = Instant::now();

        let moved = orchestrator.tick().await;

        assert_eq!(moved, Some(Point::new(600, 600)));
        assert!(started.elapsed() >= Duration::from_millis(150));
        assert_eq!(orchestrator.desktop().cursor_moves(), vec![Point::new(600, 600)]);
        assert_eq!(orchestrator.focus_state().last(), Some(B));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_move_when_cursor_already_inside() {
        let mut orchestrator = Orchestrator::new(desktop_with_b(Point::new(600, 600)));

        assert_eq!(orchestrator.tick().await, None);
        assert!(orchestrator.desktop().cursor_moves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_on_edge_counts_as_inside() {
        let mut orchestrator = Orchestrator::new(desktop_with_b(Point::new(700, 500)));

        assert_eq!(orchestrator.tick().await, None);
        assert!(orchestrator.desktop().cursor_moves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_blip_does_not_retrigger() {
        let desktop = SimulatedDesktop::new()
            .with_window(A, SimulatedWindow::new("A", Rect::new(0, 0, 100, 100)))
            .with_cursor(Point::new(400, 400))
            .with_foreground_sequence([A, WindowHandle::NULL, A]);
        let mut orchestrator = Orchestrator::new(desktop);

        assert_eq!(orchestrator.tick().await, Some(Point::new(50, 50)));

        // Пользователь увёл курсор, после чего фокус на мгновение пропал
        orchestrator.desktop().set_cursor_position(Point::new(400, 400)).unwrap();

        let started = Instant::now();
        assert_eq!(orchestrator.tick().await, None);
        assert_eq!(orchestrator.tick().await, None);
        assert_eq!(started.elapsed(), Duration::ZERO);

        assert_eq!(orchestrator.focus_state().last(), Some(A));
        assert_eq!(orchestrator.desktop().cursor(), Point::new(400, 400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimized_window_never_moves_cursor() {
        let desktop = SimulatedDesktop::new()
            .with_window(B, SimulatedWindow::new("B", B_RECT).minimized())
            .with_cursor(Point::new(-3000, -3000))
            .with_foreground_sequence([B]);
        let mut orchestrator = Orchestrator::new(desktop);
        let started = Instant::now();

        assert_eq!(orchestrator.tick().await, None);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(orchestrator.desktop().cursor_moves().is_empty());
        // Переход всё равно зафиксирован
        assert_eq!(orchestrator.focus_state().last(), Some(B));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tool_window_ignored_unless_styles_unavailable() {
        let tool = || {
            SimulatedDesktop::new()
                .with_window(B, SimulatedWindow::new("B", B_RECT).tool_window())
                .with_cursor(Point::new(0, 0))
                .with_foreground_sequence([B])
        };

        let mut with_styles = Orchestrator::new(tool());
        assert_eq!(with_styles.tick().await, None);

        let mut without_styles =
            Orchestrator::new(tool().with_style_capability(StyleCapability::Unavailable));
        assert_eq!(without_styles.tick().await, Some(Point::new(600, 600)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_requery_uses_latest_geometry() {
        let desktop = desktop_with_b(Point::new(150, 150));
        let moved = Rect::new(1000, 0, 1200, 400);
        // фильтр, проверка после задержки, повторный запрос
        desktop.script_rects(B, [Some(B_RECT), Some(B_RECT), Some(moved)]);
        let mut orchestrator = Orchestrator::new(desktop);

        assert_eq!(orchestrator.tick().await, Some(Point::new(1100, 200)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_requery_failure_falls_back_to_first_rect() {
        let desktop = desktop_with_b(Point::new(150, 150));
        desktop.script_rects(B, [Some(B_RECT), Some(B_RECT), None]);
        let mut orchestrator = Orchestrator::new(desktop);

        assert_eq!(orchestrator.tick().await, Some(Point::new(600, 600)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_degenerate_requery_falls_back_to_first_rect() {
        let desktop = desktop_with_b(Point::new(150, 150));
        desktop.script_rects(B, [Some(B_RECT), Some(B_RECT), Some(Rect::new(0, 0, 0, 0))]);
        let mut orchestrator = Orchestrator::new(desktop);

        assert_eq!(orchestrator.tick().await, Some(Point::new(600, 600)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_query_failure_abandons_transition() {
        let desktop = desktop_with_b(Point::new(150, 150)).with_failing_cursor_query();
        desktop.script_rects(B, [Some(B_RECT), None]);
        let mut orchestrator = Orchestrator::new(desktop);

        assert_eq!(orchestrator.tick().await, None);
        assert!(orchestrator.desktop().cursor_moves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_query_failure_alone_abandons_transition() {
        let desktop = desktop_with_b(Point::new(150, 150)).with_failing_cursor_query();
        let mut orchestrator = Orchestrator::new(desktop);

        assert_eq!(orchestrator.tick().await, None);
        assert!(orchestrator.desktop().cursor_moves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_gone_after_settle_abandons_transition() {
        let desktop = desktop_with_b(Point::new(150, 150));
        desktop.script_rects(B, [Some(B_RECT), None, None]);
        let mut orchestrator = Orchestrator::new(desktop);

        assert_eq!(orchestrator.tick().await, None);
        assert!(orchestrator.desktop().cursor_moves().is_empty());
    }

    const C: WindowHandle = WindowHandle(0xC);

    fn desktop_with_a_and_c() -> Arc<SimulatedDesktop> {
        let desktop = SimulatedDesktop::new()
            .with_window(A, SimulatedWindow::new("A", Rect::new(0, 0, 100, 100)))
            .with_window(C, SimulatedWindow::new("C", Rect::new(1000, 1000, 1200, 1200)))
            .with_cursor(Point::new(400, 400));
        desktop.set_foreground(A);
        Arc::new(desktop)
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_bounce_during_settle_is_dropped() {
        let desktop = desktop_with_a_and_c();
        let mut orchestrator = Orchestrator::new(Arc::clone(&desktop));

        let (moved, ()) = tokio::join!(orchestrator.tick(), async {
            sleep(Duration::from_millis(50)).await;
            desktop.set_foreground(C);
            sleep(Duration::from_millis(50)).await;
            desktop.set_foreground(A);
        });

        assert_eq!(moved, Some(Point::new(50, 50)));
        assert_eq!(orchestrator.focus_state().last(), Some(A));

        // Следующий опрос снова видит A: перехода нет
        assert_eq!(orchestrator.tick().await, None);
        assert_eq!(orchestrator.focus_state().last(), Some(A));
        assert_eq!(desktop.cursor_moves(), vec![Point::new(50, 50)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_change_during_settle_handled_on_next_poll() {
        let desktop = desktop_with_a_and_c();
        let mut orchestrator = Orchestrator::new(Arc::clone(&desktop));

        let (moved, ()) = tokio::join!(orchestrator.tick(), async {
            sleep(Duration::from_millis(50)).await;
            desktop.set_foreground(C);
        });

        // Задержка уже шла для A, смена на C внутри неё не видна
        assert_eq!(moved, Some(Point::new(50, 50)));
        assert_eq!(orchestrator.focus_state().last(), Some(A));

        assert_eq!(orchestrator.tick().await, Some(Point::new(1100, 1100)));
        assert_eq!(orchestrator.focus_state().last(), Some(C));
        assert_eq!(
            desktop.cursor_moves(),
            vec![Point::new(50, 50), Point::new(1100, 1100)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_follows_each_new_window() {
        let desktop = Arc::new(
            SimulatedDesktop::new()
                .with_window(A, SimulatedWindow::new("A", Rect::new(0, 0, 100, 100)))
                .with_window(B, SimulatedWindow::new("B", B_RECT))
                .with_cursor(Point::new(150, 150))
                .with_foreground_sequence([A, A, WindowHandle::NULL, B, B]),
        );
        let orchestrator = Orchestrator::new(Arc::clone(&desktop));

        let finished = tokio::time::timeout(Duration::from_secs(1), orchestrator.run()).await;

        assert!(finished.is_err());
        assert_eq!(
            desktop.cursor_moves(),
            vec![Point::new(50, 50), Point::new(600, 600)]
        );
    }
}
