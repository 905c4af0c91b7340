//! tiny-skia based renderer implementation.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use inkboard_core::overlay::ButtonId;
use inkboard_core::{SliderLayout, ToolbarLayout, Whiteboard};
use kurbo::{Arc, Circle, Ellipse, Line, PathEl, Rect, RoundedRect, Shape, Vec2};
use peniko::Color;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint, PixmapRef, Stroke,
    Transform,
};

/// Flattening tolerance for curves.
const TOLERANCE: f64 = 0.1;

const TOOLBAR_RADIUS: f64 = 14.0;
const SLIDER_RADIUS: f64 = 12.0;
const TRACK_RADIUS: f64 = 3.0;
const HANDLE_RADIUS: f64 = 5.0;
/// Inset of the active tool backdrop inside its button.
const BACKDROP_INSET: f64 = 4.0;
/// Inset of the color swatch inside its button.
const SWATCH_INSET: f64 = 12.0;
const GLYPH_WIDTH: f64 = 2.0;

fn panel_color() -> Color {
    Color::from_rgba8(40, 44, 52, 220)
}

fn glyph_color() -> Color {
    Color::from_rgba8(0xe6, 0xe6, 0xe6, 0xff)
}

fn backdrop_color() -> Color {
    Color::from_rgba8(90, 160, 255, 35)
}

fn track_color() -> Color {
    Color::from_rgba8(90, 95, 110, 240)
}

fn handle_color() -> Color {
    Color::from_rgba8(230, 230, 230, 255)
}

/// CPU renderer producing one premultiplied RGBA frame per call.
#[derive(Default)]
pub struct SkiaRenderer {
    /// Last built frame; None while the host has zero area.
    frame: Option<Pixmap>,
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last built frame.
    pub fn frame(&self) -> Option<PixmapRef<'_>> {
        self.frame.as_ref().map(Pixmap::as_ref)
    }

    /// Copy the frame into a `0RGB` pixel buffer of the same size, as used by
    /// window presentation surfaces.
    pub fn write_xrgb(&self, buffer: &mut [u32]) -> RenderResult<()> {
        let Some(frame) = self.frame.as_ref() else {
            return Ok(());
        };
        let pixels = frame.pixels();
        if pixels.len() != buffer.len() {
            return Err(RendererError::BufferSize {
                expected: pixels.len(),
                actual: buffer.len(),
            });
        }
        for (dst, src) in buffer.iter_mut().zip(pixels) {
            let c = src.demultiply();
            *dst = (u32::from(c.red()) << 16) | (u32::from(c.green()) << 8) | u32::from(c.blue());
        }
        Ok(())
    }

    /// Make sure the frame matches the host size, reusing it when possible.
    fn prepare_frame(&mut self, width: u32, height: u32) -> RenderResult<Option<&mut Pixmap>> {
        if width == 0 || height == 0 {
            self.frame = None;
            return Ok(None);
        }
        let reusable = self
            .frame
            .as_ref()
            .is_some_and(|frame| frame.width() == width && frame.height() == height);
        if !reusable {
            log::debug!("Allocating {}x{} frame", width, height);
            let frame = Pixmap::new(width, height)
                .ok_or(RendererError::FrameAlloc { width, height })?;
            self.frame = Some(frame);
        }
        Ok(self.frame.as_mut())
    }
}

impl Renderer for SkiaRenderer {
    fn build_frame(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let board = ctx.board;
        let surface = board.surface();
        let background = self.background_color(ctx);
        let Some(frame) = self.prepare_frame(surface.width(), surface.height())? else {
            return Ok(());
        };

        frame.fill(to_skia_color(background));
        let border = Rect::new(0.5, 0.5, f64::from(frame.width()) - 0.5, f64::from(frame.height()) - 0.5);
        stroke_shape(frame, &border, ctx.border_color, 1.0, Transform::identity());

        if let Some(canvas) = surface.pixmap() {
            frame.draw_pixmap(0, 0, canvas, &PixmapPaint::default(), Transform::identity(), None);
        }

        // Overlay layouts are in logical pixels.
        let scale = board.scale_factor() as f32;
        let overlay = Transform::from_scale(scale, scale);
        render_toolbar(frame, board, &board.toolbar_layout(), overlay);
        if let Some(slider) = board.visible_slider() {
            render_slider(frame, board, &slider, overlay);
        }
        Ok(())
    }
}

fn render_toolbar(frame: &mut Pixmap, board: &Whiteboard, layout: &ToolbarLayout, ts: Transform) {
    fill_shape(frame, &RoundedRect::from_rect(layout.rect, TOOLBAR_RADIUS), panel_color(), ts);

    for (id, rect) in layout.buttons() {
        let active = id.tool() == Some(board.active_tool());
        if active {
            let backdrop = rect.inset(-BACKDROP_INSET);
            fill_shape(frame, &Ellipse::from_rect(backdrop), backdrop_color(), ts);
        }
        render_glyph(frame, id, rect, board.pen_color(), ts);
    }
}

/// Draw the icon for one toolbar button.
fn render_glyph(frame: &mut Pixmap, id: ButtonId, rect: Rect, pen_color: Color, ts: Transform) {
    let center = rect.center();
    let (w, h) = (rect.width(), rect.height());

    match id {
        ButtonId::Pen => {
            let body = Line::new(
                (center.x - w * 0.25, center.y + h * 0.2),
                (center.x + w * 0.25, center.y - h * 0.2),
            );
            let tip = Line::new(
                (center.x + w * 0.05, center.y - h * 0.23),
                (center.x + w * 0.25, center.y - h * 0.03),
            );
            stroke_glyph(frame, &body, ts);
            stroke_glyph(frame, &tip, ts);
        }
        ButtonId::Eraser => {
            stroke_glyph(frame, &rect.inset((-w * 0.25, -h * 0.25)), ts);
        }
        ButtonId::Clear => {
            let a = Line::new((rect.x0 + 8.0, rect.y0 + 8.0), (rect.x1 - 8.0, rect.y1 - 8.0));
            let b = Line::new((rect.x0 + 8.0, rect.y1 - 8.0), (rect.x1 - 8.0, rect.y0 + 8.0));
            stroke_glyph(frame, &a, ts);
            stroke_glyph(frame, &b, ts);
        }
        ButtonId::Undo => {
            let bounds = Rect::new(rect.x0 + 10.0, rect.y0 + 12.0, rect.x1 - 6.0, rect.y1 - 8.0);
            stroke_glyph(frame, &arc_in(bounds, -40.0, -280.0), ts);
            let head = Line::new((rect.x0 + 12.0, center.y), (rect.x0 + 20.0, center.y - 8.0));
            stroke_glyph(frame, &head, ts);
        }
        ButtonId::Redo => {
            let bounds = Rect::new(rect.x0 + 6.0, rect.y0 + 12.0, rect.x1 - 10.0, rect.y1 - 8.0);
            stroke_glyph(frame, &arc_in(bounds, -120.0, 280.0), ts);
            let head = Line::new((rect.x1 - 12.0, center.y), (rect.x1 - 20.0, center.y - 8.0));
            stroke_glyph(frame, &head, ts);
        }
        ButtonId::Color => {
            let swatch = Ellipse::from_rect(rect.inset(-SWATCH_INSET));
            fill_shape(frame, &swatch, pen_color, ts);
            stroke_shape(frame, &swatch, glyph_color(), 1.0, ts);
        }
    }
}

fn render_slider(frame: &mut Pixmap, board: &Whiteboard, layout: &SliderLayout, ts: Transform) {
    let width = board.pen_width();
    fill_shape(frame, &RoundedRect::from_rect(layout.rect, SLIDER_RADIUS), panel_color(), ts);
    fill_shape(frame, &RoundedRect::from_rect(layout.track, TRACK_RADIUS), track_color(), ts);
    fill_shape(
        frame,
        &RoundedRect::from_rect(layout.handle_rect(width), HANDLE_RADIUS),
        handle_color(),
        ts,
    );
    let preview = Circle::new(layout.preview_center, f64::from(width) / 2.0);
    fill_shape(frame, &preview, glyph_color(), ts);
}

/// Elliptical arc inscribed in `bounds`. Angles are in degrees, with positive
/// sweeps running clockwise on screen.
fn arc_in(bounds: Rect, start_degrees: f64, sweep_degrees: f64) -> Arc {
    Arc {
        center: bounds.center(),
        radii: Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0),
        start_angle: start_degrees.to_radians(),
        sweep_angle: sweep_degrees.to_radians(),
        x_rotation: 0.0,
    }
}

/// Conversion of kurbo shapes into tiny-skia paths.
trait ShapePath {
    fn to_skia(&self) -> Option<Path>;
}

impl<S: Shape> ShapePath for S {
    fn to_skia(&self) -> Option<Path> {
        let mut pb = PathBuilder::new();
        for el in self.path_elements(TOLERANCE) {
            match el {
                PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
                PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
                PathEl::QuadTo(p1, p) => pb.quad_to(p1.x as f32, p1.y as f32, p.x as f32, p.y as f32),
                PathEl::CurveTo(p1, p2, p) => pb.cubic_to(
                    p1.x as f32,
                    p1.y as f32,
                    p2.x as f32,
                    p2.y as f32,
                    p.x as f32,
                    p.y as f32,
                ),
                PathEl::ClosePath => pb.close(),
            }
        }
        pb.finish()
    }
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

fn fill_shape(frame: &mut Pixmap, shape: &impl ShapePath, color: Color, ts: Transform) {
    if let Some(path) = shape.to_skia() {
        frame.fill_path(&path, &paint_for(color), FillRule::Winding, ts, None);
    }
}

fn stroke_shape(frame: &mut Pixmap, shape: &impl ShapePath, color: Color, width: f64, ts: Transform) {
    stroke_path(frame, shape.to_skia(), color, width, ts);
}

fn stroke_glyph(frame: &mut Pixmap, shape: &impl ShapePath, ts: Transform) {
    stroke_shape(frame, shape, glyph_color(), GLYPH_WIDTH, ts);
}

/// Stroke `path` under `ts`; the width is in the same units as the path.
fn stroke_path(frame: &mut Pixmap, path: Option<Path>, color: Color, width: f64, ts: Transform) {
    let Some(path) = path else {
        return;
    };
    let stroke = Stroke {
        width: width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    frame.stroke_path(&path, &paint_for(color), &stroke, ts, None);
}
