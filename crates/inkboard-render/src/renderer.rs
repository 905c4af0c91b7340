//! Renderer trait abstraction.

use inkboard_core::Whiteboard;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Frame allocation failed for {width}x{height}")]
    FrameAlloc { width: u32, height: u32 },
    #[error("Buffer holds {actual} pixels, frame needs {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The whiteboard to render.
    pub board: &'a Whiteboard,
    /// Color behind the canvas bitmap.
    pub background_color: Color,
    /// One pixel frame around the host area.
    pub border_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(board: &'a Whiteboard) -> Self {
        Self {
            board,
            background_color: Color::from_rgba8(0x1f, 0x1f, 0x28, 0xff),
            border_color: Color::from_rgba8(0x24, 0x7c, 0xa3, 0xff),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the border color.
    pub fn with_border(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }
}

/// Trait for rendering backends.
///
/// A frame is composited in a fixed order: background, canvas bitmap,
/// toolbar, then the width slider if it is visible.
pub trait Renderer {
    /// Build the frame for the current state of the board.
    fn build_frame(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
