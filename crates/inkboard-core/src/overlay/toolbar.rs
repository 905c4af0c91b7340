//! Floating toolbar layout and hit-testing.

use crate::tools::ToolKind;
use kurbo::{Point, Rect, Size};

/// Toolbar width.
pub const TOOLBAR_WIDTH: f64 = 420.0;
/// Toolbar height.
pub const TOOLBAR_HEIGHT: f64 = 48.0;
/// Distance between the toolbar and the bottom edge of the host.
pub const TOOLBAR_MARGIN_BOTTOM: f64 = 22.0;
/// Space before the first button.
pub const TOOLBAR_PADDING: f64 = 12.0;
/// Buttons are square.
pub const BUTTON_SIZE: f64 = 48.0;
/// Space between adjacent buttons.
pub const BUTTON_GAP: f64 = 8.0;

/// Toolbar buttons, in left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Pen,
    Eraser,
    Clear,
    Undo,
    Redo,
    Color,
}

impl ButtonId {
    /// All buttons in layout order.
    pub const ALL: [ButtonId; 6] = [
        ButtonId::Pen,
        ButtonId::Eraser,
        ButtonId::Clear,
        ButtonId::Undo,
        ButtonId::Redo,
        ButtonId::Color,
    ];

    /// The tool this button selects, if it is a tool button.
    pub fn tool(self) -> Option<ToolKind> {
        match self {
            ButtonId::Pen => Some(ToolKind::Pen),
            ButtonId::Eraser => Some(ToolKind::Eraser),
            _ => None,
        }
    }

    /// Stable identifier.
    pub fn name(self) -> &'static str {
        match self {
            ButtonId::Pen => "pen",
            ButtonId::Eraser => "eraser",
            ButtonId::Clear => "clear",
            ButtonId::Undo => "undo",
            ButtonId::Redo => "redo",
            ButtonId::Color => "color",
        }
    }
}

/// Toolbar geometry for one host size.
///
/// Layout is derived from the host size on every call and never cached, so
/// it cannot go stale across resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarLayout {
    /// Toolbar bounds in host coordinates.
    pub rect: Rect,
    buttons: [(ButtonId, Rect); 6],
}

impl ToolbarLayout {
    /// Lay out the toolbar for a host of the given size.
    pub fn compute(host: Size) -> Self {
        let x = (host.width - TOOLBAR_WIDTH) / 2.0;
        let y = host.height - TOOLBAR_HEIGHT - TOOLBAR_MARGIN_BOTTOM;
        let rect = Rect::from_origin_size((x, y), (TOOLBAR_WIDTH, TOOLBAR_HEIGHT));

        let button_y = rect.y0 + (TOOLBAR_HEIGHT - BUTTON_SIZE) / 2.0;
        let buttons = std::array::from_fn(|index| {
            let button_x = rect.x0 + TOOLBAR_PADDING + index as f64 * (BUTTON_SIZE + BUTTON_GAP);
            (
                ButtonId::ALL[index],
                Rect::from_origin_size((button_x, button_y), (BUTTON_SIZE, BUTTON_SIZE)),
            )
        });

        Self { rect, buttons }
    }

    /// Bounds of a single button.
    pub fn button_rect(&self, id: ButtonId) -> Rect {
        self.buttons
            .iter()
            .find(|(button, _)| *button == id)
            .map(|(_, rect)| *rect)
            .unwrap_or(Rect::ZERO)
    }

    /// All buttons with their bounds, left to right.
    pub fn buttons(&self) -> impl Iterator<Item = (ButtonId, Rect)> + '_ {
        self.buttons.iter().copied()
    }

    /// Find the button under `point`.
    pub fn hit_test(&self, point: Point) -> Option<ButtonId> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }

    /// Check if `point` lies anywhere on the toolbar.
    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}
