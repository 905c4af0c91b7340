//! Raster canvas surface.
//!
//! The surface owns a premultiplied RGBA bitmap sized to the host display.
//! Strokes are rasterized into it immediately; nothing is kept as vector data.

use crate::tools::Brush;
use kurbo::{Point, Rect, Size};
use std::fmt;
use std::sync::Arc;
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapRef,
    PremultipliedColorU8, Stroke, Transform,
};

/// Extra damage around a segment to cover anti-aliased edges.
const AA_MARGIN: f64 = 2.0;

/// Bytes per RGBA pixel.
const BPP: usize = 4;

/// The drawing bitmap.
///
/// A zero-area surface holds no pixmap; every drawing operation on it is a
/// no-op.
#[derive(Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixmap: Pixmap::new(width, height),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Surface bounds at the origin.
    pub fn bounds(&self) -> Rect {
        self.size().to_rect()
    }

    /// Check if the surface has no pixels.
    pub fn is_zero_area(&self) -> bool {
        self.pixmap.is_none()
    }

    /// Borrow the bitmap for compositing, if the surface has any pixels.
    pub fn pixmap(&self) -> Option<PixmapRef<'_>> {
        self.pixmap.as_ref().map(Pixmap::as_ref)
    }

    /// Read a single premultiplied pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.as_ref()?.pixel(x, y)
    }

    /// Check if every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap
            .as_ref()
            .is_none_or(|pixmap| pixmap.data().iter().all(|&byte| byte == 0))
    }

    /// Reallocate the bitmap for a new host size.
    ///
    /// Existing content stays anchored at the origin: anything outside the
    /// new bounds is discarded and newly exposed area is transparent.
    /// Returns false if the size did not change.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }

        let mut next = Pixmap::new(width, height);
        if let (Some(dst), Some(src)) = (next.as_mut(), self.pixmap.as_ref()) {
            copy_anchored(dst, src.as_ref());
        }

        self.width = width;
        self.height = height;
        self.pixmap = next;
        true
    }

    /// Composite one round-capped, round-joined segment from `from` to `to`.
    ///
    /// A zero-length segment marks a dot of the brush width. Returns the
    /// damaged region clipped to the surface, or None if nothing was drawn.
    pub fn composite_stroke(&mut self, from: Point, to: Point, brush: &Brush) -> Option<Rect> {
        let width = brush.width();
        if !(width > 0.0) {
            return None;
        }
        let bounds = self.bounds();
        let pixmap = self.pixmap.as_mut()?;

        let mut paint = Paint::default();
        paint.anti_alias = true;
        match brush {
            Brush::Pen { color, .. } => {
                let rgba = color.to_rgba8();
                paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
                paint.blend_mode = BlendMode::SourceOver;
            }
            Brush::Eraser { .. } => {
                paint.blend_mode = BlendMode::Clear;
            }
        }

        if from == to {
            let dot = PathBuilder::from_circle(from.x as f32, from.y as f32, (width / 2.0) as f32)?;
            pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
        } else {
            let mut pb = PathBuilder::new();
            pb.move_to(from.x as f32, from.y as f32);
            pb.line_to(to.x as f32, to.y as f32);
            let path = pb.finish()?;
            let stroke = Stroke {
                width: width as f32,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }

        let reach = width / 2.0 + AA_MARGIN;
        let damage = Rect::from_points(from, to)
            .inflate(reach, reach)
            .intersect(bounds);
        (damage.area() > 0.0).then_some(damage)
    }

    /// Set every pixel to fully transparent.
    pub fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    /// Take an immutable copy of the current bitmap.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            pixmap: self.pixmap.clone().map(Arc::new),
        }
    }

    /// Replace the bitmap with a copy of `snapshot`.
    ///
    /// The surface keeps its current size. A snapshot taken at another size
    /// is placed at the origin with the same policy as [`Surface::resize`].
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.width == self.width && snapshot.height == self.height {
            self.pixmap = snapshot.pixmap.as_deref().cloned();
            return;
        }

        let mut next = Pixmap::new(self.width, self.height);
        if let (Some(dst), Some(src)) = (next.as_mut(), snapshot.pixmap.as_deref()) {
            copy_anchored(dst, src.as_ref());
        }
        self.pixmap = next;
    }
}

/// An immutable full copy of the canvas bitmap.
///
/// Snapshots expose no way to mutate their pixels; restoring one always
/// copies it into the surface, so later strokes cannot reach stored history.
#[derive(Clone)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixmap: Option<Arc<Pixmap>>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.data() == other.data()
    }
}

impl Snapshot {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read a single premultiplied pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.as_ref()?.pixel(x, y)
    }

    /// Raw premultiplied RGBA bytes (empty for a zero-area snapshot).
    pub fn data(&self) -> &[u8] {
        match self.pixmap.as_deref() {
            Some(pixmap) => pixmap.data(),
            None => &[],
        }
    }
}

/// Copy `src` into a transparent `dst`, anchored at the origin.
///
/// Onto a fully transparent destination source-over compositing reduces to a
/// plain copy of the overlapping rows.
fn copy_anchored(dst: &mut Pixmap, src: PixmapRef<'_>) {
    let cols = dst.width().min(src.width()) as usize * BPP;
    let rows = dst.height().min(src.height()) as usize;
    let dst_stride = dst.width() as usize * BPP;
    let src_stride = src.width() as usize * BPP;

    let src_data = src.data();
    let dst_data = dst.data_mut();
    for y in 0..rows {
        let from = &src_data[y * src_stride..y * src_stride + cols];
        dst_data[y * dst_stride..y * dst_stride + cols].copy_from_slice(from);
    }
}
