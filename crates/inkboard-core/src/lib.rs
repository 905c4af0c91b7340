//! Inkboard Core Library
//!
//! Platform-agnostic drawing and history engine for the Inkboard whiteboard:
//! the raster canvas surface, snapshot undo/redo, the pointer-driven drawing
//! state machine and the toolbar/slider overlay geometry.

pub mod board;
pub mod config;
pub mod history;
pub mod input;
pub mod overlay;
pub mod shortcuts;
pub mod surface;
pub mod tools;

pub use board::{Repaint, Response, Whiteboard};
pub use config::{ConfigError, SerializableColor, WhiteboardConfig};
pub use history::History;
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use overlay::{ButtonId, OverlayHit, SliderLayout, ToolbarLayout, WidthRange};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use surface::{Snapshot, Surface};
pub use tools::{Brush, ToolKind, ToolManager, ToolSelection, ToolState};
