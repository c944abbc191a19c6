use crate::error::Result;
use crate::services::desktop::SimulatedDesktop;
use crate::services::orchestrator::Orchestrator;

/// Опросов на одно окно в режиме сухого запуска (~3 с при опросе 30 мс)
const DEMO_POLLS_PER_WINDOW: u32 = 100;

/// Trait for the focus-following service, real or simulated
#[async_trait::async_trait]
pub trait FocusServiceTrait {
    /// Run until the process is interrupted
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create the focus service based on the dry_run flag
pub fn create_focus_service(dry_run: bool) -> Result<Box<dyn FocusServiceTrait + Send>> {
    if dry_run {
        Ok(Box::new(Orchestrator::new(SimulatedDesktop::demo(
            DEMO_POLLS_PER_WINDOW,
        ))))
    } else {
        create_desktop_service()
    }
}

#[cfg(windows)]
fn create_desktop_service() -> Result<Box<dyn FocusServiceTrait + Send>> {
    let desktop = crate::services::desktop::Win32Desktop::new()?;
    Ok(Box::new(Orchestrator::new(desktop)))
}

#[cfg(not(windows))]
fn create_desktop_service() -> Result<Box<dyn FocusServiceTrait + Send>> {
    Err(crate::focus_error!(
        service_unavailable,
        "слежение за фокусом поддерживается только в Windows, используйте --dry-run"
    ))
}
