use crate::debug_if_enabled;
use crate::events::WindowHandle;
use crate::services::desktop::{Desktop, StyleCapability};

/// Расширенный стиль плавающих палитр и всплывающих окон-инструментов
pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;

/// Decides whether a window may receive a forced cursor move.
///
/// The extended style capability is captured once at construction; when it
/// is unavailable the tool-window check is skipped instead of rejecting.
#[derive(Debug, Clone, Copy)]
pub struct WindowFilter {
    style_capability: StyleCapability,
}

impl WindowFilter {
    pub fn new(style_capability: StyleCapability) -> Self {
        Self { style_capability }
    }

    pub fn for_desktop<D: Desktop + ?Sized>(desktop: &D) -> Self {
        Self::new(desktop.extended_style_capability())
    }

    pub fn is_candidate<D: Desktop + ?Sized>(&self, desktop: &D, window: WindowHandle) -> bool {
        if window.is_null() {
            return false;
        }

        if !desktop.is_visible(window) {
            debug_if_enabled!("Окно {} невидимо - пропускаем", window);
            return false;
        }

        if desktop.is_minimized(window) {
            debug_if_enabled!("Окно {} свёрнуто - пропускаем", window);
            return false;
        }

        if self.style_capability == StyleCapability::Available {
            match desktop.extended_style(window) {
                Ok(style) if style & WS_EX_TOOLWINDOW != 0 => {
                    debug_if_enabled!("Окно {} является tool window - пропускаем", window);
                    return false;
                }
                Ok(_) => {}
                Err(e) => {
                    debug_if_enabled!("Не удалось получить стиль окна {}: {}", window, e);
                    return false;
                }
            }
        }

        match desktop.window_rect(window) {
            Ok(rect) if rect.is_valid() => true,
            Ok(rect) => {
                debug_if_enabled!("Окно {} имеет пустую геометрию {}", window, rect);
                false
            }
            Err(e) => {
                debug_if_enabled!("Не удалось получить геометрию окна {}: {}", window, e);
                false
            }
        }
    }
}
