//! Tool system for the whiteboard.

use crate::surface::Surface;
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
}

impl ToolKind {
    /// Get display name for this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Eraser => "Eraser",
        }
    }
}

/// How a single stroke segment is composited onto the surface.
///
/// The pen blends its color source-over; the eraser clears the covered
/// pixels to full transparency and carries no color at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    Pen { color: Color, width: f64 },
    Eraser { width: f64 },
}

impl Brush {
    /// Stroke width in pixels.
    pub fn width(&self) -> f64 {
        match self {
            Brush::Pen { width, .. } | Brush::Eraser { width } => *width,
        }
    }
}

/// State of a drawing interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Waiting for a pointer-down on the canvas.
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing {
        /// Last recorded pointer position; the next segment starts here.
        last: Point,
    },
}

/// Result of selecting a tool from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelection {
    /// The tool was already active; the width slider should toggle.
    AlreadyActive,
    /// The active tool changed; the width slider should hide.
    Switched,
}

/// Manages the current tool, color, width and in-progress stroke.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Pen color. The eraser ignores it.
    pub color: Color,
    /// Stroke width shared by pen and eraser.
    pub width: u32,
}

impl ToolManager {
    /// Create a new tool manager with the pen selected.
    pub fn new(color: Color, width: u32) -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::Idle,
            color,
            width,
        }
    }

    /// Select a tool.
    ///
    /// An in-progress stroke keeps going; the new tool applies from its
    /// next segment onwards.
    pub fn select(&mut self, tool: ToolKind) -> ToolSelection {
        if self.current_tool == tool {
            ToolSelection::AlreadyActive
        } else {
            self.current_tool = tool;
            ToolSelection::Switched
        }
    }

    /// Brush for the next composited segment.
    pub fn brush(&self) -> Brush {
        let width = f64::from(self.width);
        match self.current_tool {
            ToolKind::Pen => Brush::Pen {
                color: self.color,
                width,
            },
            ToolKind::Eraser => Brush::Eraser { width },
        }
    }

    /// Begin a stroke at `point`, marking a dot so single clicks are visible.
    ///
    /// Returns the damaged region of the surface.
    pub fn begin(&mut self, surface: &mut Surface, point: Point) -> Option<Rect> {
        self.state = ToolState::Drawing { last: point };
        surface.composite_stroke(point, point, &self.brush())
    }

    /// Extend the current stroke to `point`.
    pub fn update(&mut self, surface: &mut Surface, point: Point) -> Option<Rect> {
        let ToolState::Drawing { last } = self.state else {
            return None;
        };
        let damage = surface.composite_stroke(last, point, &self.brush());
        self.state = ToolState::Drawing { last: point };
        damage
    }

    /// End the current stroke.
    /// Returns true if a stroke was in progress (and should be recorded).
    pub fn end(&mut self) -> bool {
        let was_drawing = self.is_active();
        self.state = ToolState::Idle;
        was_drawing
    }

    /// Drop the current stroke without recording it.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a stroke is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Drawing { .. })
    }

    /// Last recorded pointer position of the in-progress stroke.
    pub fn last_position(&self) -> Option<Point> {
        match self.state {
            ToolState::Drawing { last } => Some(last),
            ToolState::Idle => None,
        }
    }
}
