//! Inkboard Application
//!
//! The native application shell: windowing, presentation, input mapping and
//! the color-picker capability around the whiteboard engine.

mod app;
mod event_handler;
mod picker;

pub use app::{App, AppConfig, AppError, config_path, load_whiteboard_config};
pub use event_handler::EventHandler;
pub use picker::{ColorPicker, PalettePicker};
