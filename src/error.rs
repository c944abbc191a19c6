use crate::geometry::Rect;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FocusError {
    #[cfg(windows)]
    #[error("Ошибка Win32: {0}")]
    Os(#[from] windows::core::Error),

    #[error("Запрос к ОС не вернул значения: {0}")]
    QueryFailed(String),

    #[error("Недопустимая геометрия окна: {0}")]
    InvalidGeometry(Rect),

    #[error("Возможность недоступна: {0}")]
    CapabilityUnavailable(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),
}

impl FocusError {
    pub fn query_failed<T>(msg: impl Into<String>) -> Result<T> {
        Err(FocusError::QueryFailed(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, FocusError>;

#[macro_export]
macro_rules! focus_error {
    (query_failed, $($arg:tt)*) => {
        $crate::error::FocusError::QueryFailed(format!($($arg)*))
    };
    (capability_unavailable, $($arg:tt)*) => {
        $crate::error::FocusError::CapabilityUnavailable(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::FocusError::ServiceUnavailable(format!($($arg)*))
    };
}
