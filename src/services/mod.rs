pub mod cursor_placer;
pub mod desktop;
pub mod focus_service;
pub mod focus_watcher;
pub mod orchestrator;
pub mod window_filter;

pub use focus_service::create_focus_service;
