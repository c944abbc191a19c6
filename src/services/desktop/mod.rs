//! Desktop boundary: responsibility and boundaries
//!
//! This module is the ONLY place that talks to the windowing environment:
//! foreground window, visibility, iconic state, extended styles, window
//! rectangles and the cursor. It MUST NOT decide anything about focus
//! transitions or cursor placement; those decisions belong to the
//! FocusWatcher, WindowFilter, CursorPlacer and Orchestrator.

mod simulated;
#[cfg(windows)]
mod win32;
mod r#trait;

pub use self::r#trait::{Desktop, StyleCapability, WindowState};
#[cfg(test)]
pub use self::r#trait::GeometryOracle;
pub use self::simulated::SimulatedDesktop;
#[cfg(test)]
pub use self::simulated::SimulatedWindow;
#[cfg(windows)]
pub use self::win32::Win32Desktop;
