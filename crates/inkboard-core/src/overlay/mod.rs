//! Overlay geometry for the floating toolbar and width slider.
//!
//! Overlays are drawn above the canvas and get the first look at pointer
//! input. Every layout here is a pure function of the host size.

mod slider;
mod toolbar;

pub use slider::{
    HANDLE_HEIGHT, HANDLE_WIDTH, PREVIEW_PADDING, SLIDER_GAP, SLIDER_HEIGHT, SLIDER_WIDTH,
    SliderLayout, TRACK_HEIGHT, TRACK_LEFT_PADDING, WidthRange,
};
pub use toolbar::{
    BUTTON_GAP, BUTTON_SIZE, ButtonId, TOOLBAR_HEIGHT, TOOLBAR_MARGIN_BOTTOM, TOOLBAR_PADDING,
    TOOLBAR_WIDTH, ToolbarLayout,
};

use kurbo::Point;

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    /// The visible width slider.
    Slider,
    /// A toolbar button.
    Button(ButtonId),
    /// Toolbar background between buttons.
    Toolbar,
    /// Nothing; the canvas gets the event.
    Canvas,
}

/// Route a press through the overlays, topmost first.
pub fn hit_test(point: Point, toolbar: &ToolbarLayout, slider: Option<&SliderLayout>) -> OverlayHit {
    if slider.is_some_and(|slider| slider.contains(point)) {
        return OverlayHit::Slider;
    }
    if let Some(id) = toolbar.hit_test(point) {
        return OverlayHit::Button(id);
    }
    if toolbar.contains(point) {
        return OverlayHit::Toolbar;
    }
    OverlayHit::Canvas
}
