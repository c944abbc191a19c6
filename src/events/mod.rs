pub mod window;

pub use window::{WindowEvent, WindowHandle};
