//! Stroke width slider layout and value mapping.

use super::toolbar::ToolbarLayout;
use kurbo::{Point, Rect};

/// Slider width.
pub const SLIDER_WIDTH: f64 = 260.0;
/// Slider height.
pub const SLIDER_HEIGHT: f64 = 40.0;
/// Vertical space between the slider and the toolbar.
pub const SLIDER_GAP: f64 = 10.0;
/// Space between the slider's left edge and the track.
pub const TRACK_LEFT_PADDING: f64 = 16.0;
/// Padding around the width preview on the right.
pub const PREVIEW_PADDING: f64 = 8.0;
/// Thickness of the drawn track.
pub const TRACK_HEIGHT: f64 = 6.0;
/// Handle size.
pub const HANDLE_WIDTH: f64 = 16.0;
pub const HANDLE_HEIGHT: f64 = 20.0;

/// Inclusive range of selectable stroke widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthRange {
    pub min: u32,
    pub max: u32,
}

impl WidthRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Clamp a width into the range.
    pub fn clamp(&self, width: u32) -> u32 {
        width.clamp(self.min, self.max)
    }

    fn span(&self) -> f64 {
        f64::from(self.max - self.min)
    }
}

impl Default for WidthRange {
    fn default() -> Self {
        Self::new(1, 30)
    }
}

/// Slider geometry, derived from the toolbar it floats above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderLayout {
    /// Slider bounds in host coordinates.
    pub rect: Rect,
    /// The draggable track.
    pub track: Rect,
    /// Center of the width preview dot.
    pub preview_center: Point,
    /// Widths the track maps onto.
    pub range: WidthRange,
}

impl SliderLayout {
    /// Lay out the slider directly above `toolbar`, centered on it.
    pub fn compute(toolbar: &ToolbarLayout, range: WidthRange) -> Self {
        let center_x = toolbar.rect.center().x;
        let rect = Rect::from_origin_size(
            (
                center_x - SLIDER_WIDTH / 2.0,
                toolbar.rect.y0 - SLIDER_GAP - SLIDER_HEIGHT,
            ),
            (SLIDER_WIDTH, SLIDER_HEIGHT),
        );

        // The preview area always fits the largest width.
        let max_radius = f64::from(range.max) / 2.0;
        let preview_space = max_radius * 2.0 + PREVIEW_PADDING * 2.0;
        let track_width = (rect.width() - TRACK_LEFT_PADDING - preview_space).max(0.0);
        let center_y = rect.center().y;
        let track = Rect::new(
            rect.x0 + TRACK_LEFT_PADDING,
            center_y - TRACK_HEIGHT / 2.0,
            rect.x0 + TRACK_LEFT_PADDING + track_width,
            center_y + TRACK_HEIGHT / 2.0,
        );
        let preview_center = Point::new(rect.x1 - max_radius - PREVIEW_PADDING, center_y);

        Self {
            rect,
            track,
            preview_center,
            range,
        }
    }

    /// Map a pointer x-coordinate to a stroke width.
    ///
    /// Positions outside the track are clamped to its ends, so the result is
    /// always within the range and never decreases as `x` grows.
    pub fn value_from_pointer_x(&self, x: f64) -> u32 {
        let x = if x.is_nan() {
            self.track.x0
        } else {
            x.clamp(self.track.x0, self.track.x1)
        };
        let t = (x - self.track.x0) / self.track.width().max(1.0);
        let value = self.range.min + (t * self.range.span()).round() as u32;
        self.range.clamp(value)
    }

    /// Track x-coordinate that represents `value`.
    pub fn handle_x_for_value(&self, value: u32) -> f64 {
        let value = self.range.clamp(value);
        let span = self.range.span();
        if span <= 0.0 {
            return self.track.x0;
        }
        self.track.x0 + self.track.width() * f64::from(value - self.range.min) / span
    }

    /// Bounds of the drag handle for `value`.
    pub fn handle_rect(&self, value: u32) -> Rect {
        let x = self.handle_x_for_value(value);
        let y = self.track.center().y;
        Rect::new(
            x - HANDLE_WIDTH / 2.0,
            y - HANDLE_HEIGHT / 2.0,
            x + HANDLE_WIDTH / 2.0,
            y + HANDLE_HEIGHT / 2.0,
        )
    }

    /// Check if `point` lies on the slider.
    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}
