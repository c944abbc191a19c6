//! One-time process DPI awareness negotiation.
//!
//! Runs before the first geometry query. Modes are tried strongest first and
//! the first one the system accepts wins; a missing entry point or a refusal
//! moves on to the next weaker mode. Nothing downstream depends on which mode
//! took effect.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(windows), allow(dead_code))]
pub enum DpiAwareness {
    PerMonitorV2,
    PerMonitor,
    System,
    Unaware,
}

impl fmt::Display for DpiAwareness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DpiAwareness::PerMonitorV2 => "per-monitor v2",
            DpiAwareness::PerMonitor => "per-monitor",
            DpiAwareness::System => "system",
            DpiAwareness::Unaware => "unaware",
        };
        f.write_str(name)
    }
}

#[cfg(windows)]
pub fn negotiate() -> DpiAwareness {
    use super::win32::resolve_export;
    use tracing::debug;
    use windows::core::{s, w};

    type SetContextFn = unsafe extern "system" fn(isize) -> i32;
    type SetAwarenessFn = unsafe extern "system" fn(i32) -> i32;
    type SetAwareFn = unsafe extern "system" fn() -> i32;

    const DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2: isize = -4;
    const PROCESS_PER_MONITOR_DPI_AWARE: i32 = 2;

    // SAFETY: сигнатуры соответствуют документированным экспортам user32/shcore
    unsafe {
        if let Some(proc) = resolve_export(w!("user32.dll"), s!("SetProcessDpiAwarenessContext")) {
            let set_context = std::mem::transmute::<_, SetContextFn>(proc);
            if set_context(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) != 0 {
                return DpiAwareness::PerMonitorV2;
            }
            debug!("SetProcessDpiAwarenessContext отклонён");
        }

        if let Some(proc) = resolve_export(w!("shcore.dll"), s!("SetProcessDpiAwareness")) {
            let set_awareness = std::mem::transmute::<_, SetAwarenessFn>(proc);
            // HRESULT: неотрицательное значение означает успех
            if set_awareness(PROCESS_PER_MONITOR_DPI_AWARE) >= 0 {
                return DpiAwareness::PerMonitor;
            }
            debug!("SetProcessDpiAwareness отклонён");
        }

        if let Some(proc) = resolve_export(w!("user32.dll"), s!("SetProcessDPIAware")) {
            let set_aware = std::mem::transmute::<_, SetAwareFn>(proc);
            if set_aware() != 0 {
                return DpiAwareness::System;
            }
        }
    }

    DpiAwareness::Unaware
}

#[cfg(not(windows))]
pub fn negotiate() -> DpiAwareness {
    DpiAwareness::Unaware
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(DpiAwareness::PerMonitorV2.to_string(), "per-monitor v2");
        assert_eq!(DpiAwareness::Unaware.to_string(), "unaware");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_negotiate_is_noop_off_windows() {
        assert_eq!(negotiate(), DpiAwareness::Unaware);
    }
}
