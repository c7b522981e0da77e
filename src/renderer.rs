use egui::{Color32, ColorImage, Rect, Shape, Vec2};
use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::drawing::Drawing;
use crate::stroke::{Stroke, StrokeSegment};

/// A rendered drawing, backed by a premultiplied RGBA pixmap.
#[derive(Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.pixmap.data() == other.pixmap.data()
    }
}

impl Surface {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Unmultiplied RGBA at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|color| {
            let color = color.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            Rgba(self.pixel(x, y).unwrap_or_default())
        })
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_premultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixmap.data(),
        )
    }
}

/// Rebuilds a [`Surface`] from scratch with tiny-skia.
///
/// Output depends only on the strokes handed in and the rasterizer's own
/// settings, so two renders of the same drawing are byte-identical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rasterizer {
    width: u32,
    height: u32,
    pixels_per_point: f32,
    background: Color32,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixels_per_point: 1.0,
            background: Color32::WHITE,
        }
    }

    /// Size the output for a canvas of `size` points at the given DPI scale.
    pub fn for_canvas(size: Vec2, pixels_per_point: f32) -> Self {
        let width = (size.x * pixels_per_point).round().max(1.0) as u32;
        let height = (size.y * pixels_per_point).round().max(1.0) as u32;
        Self::new(width, height).with_pixels_per_point(pixels_per_point)
    }

    pub fn with_pixels_per_point(mut self, pixels_per_point: f32) -> Self {
        self.pixels_per_point = pixels_per_point;
        self
    }

    pub fn with_background(mut self, background: Color32) -> Self {
        self.background = background;
        self
    }

    pub fn size_px(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    /// The surface area in drawing-space units.
    fn visible_rect(&self) -> Rect {
        Rect::from_min_size(
            egui::Pos2::ZERO,
            Vec2::new(self.width as f32, self.height as f32) / self.pixels_per_point,
        )
    }

    /// Committed strokes in order, then the stroke in progress on top.
    ///
    /// `None` if a pixmap of this size cannot be allocated.
    pub fn render(&self, drawing: &Drawing) -> Option<Surface> {
        let preview = drawing.in_progress().map(|builder| builder.to_stroke());
        self.render_strokes(drawing.strokes().iter().chain(preview.as_ref()))
    }

    /// Committed strokes only.
    pub fn render_committed(&self, drawing: &Drawing) -> Option<Surface> {
        self.render_strokes(drawing.strokes())
    }

    pub fn render_strokes<'a>(
        &self,
        strokes: impl IntoIterator<Item = &'a Stroke>,
    ) -> Option<Surface> {
        let mut pixmap = Pixmap::new(self.width, self.height)?;
        let [r, g, b, a] = self.background.to_srgba_unmultiplied();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

        let visible = self.visible_rect();
        for stroke in strokes {
            if stroke.bounds().intersects(visible) {
                self.draw_stroke(&mut pixmap, stroke);
            }
        }
        Some(Surface { pixmap })
    }

    fn draw_stroke(&self, pixmap: &mut Pixmap, stroke: &Stroke) {
        let Some((first, rest)) = stroke.points().split_first() else {
            return;
        };

        let mut paint = Paint::default();
        let [r, g, b, a] = stroke.color().to_srgba_unmultiplied();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let transform = Transform::from_scale(self.pixels_per_point, self.pixels_per_point);

        // Zero-length paths draw nothing when stroked
        if rest.iter().all(|point| point == first) {
            if let Some(dot) = PathBuilder::from_circle(first.x, first.y, stroke.size() / 2.0) {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(first.x, first.y);
        for point in rest {
            builder.line_to(point.x, point.y);
        }
        let Some(path) = builder.finish() else {
            return;
        };

        let pen = tiny_skia::Stroke {
            width: stroke.size(),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &pen, transform, None);
    }
}

/// Vector version of a stroke for egui, shifted by `offset`.
///
/// Segments get a filled circle at every vertex so that ends and joins are
/// round, matching the rasterizer.
pub fn shapes_for_stroke(stroke: &Stroke, offset: Vec2) -> Vec<Shape> {
    let radius = stroke.size() / 2.0;
    let color = stroke.color();

    let mut shapes = Vec::with_capacity(stroke.points().len() * 2);
    for pair in stroke.points().windows(2) {
        shapes.push(Shape::line_segment(
            [pair[0] + offset, pair[1] + offset],
            egui::Stroke::new(stroke.size(), color),
        ));
    }
    for point in stroke.points() {
        shapes.push(Shape::circle_filled(*point + offset, radius, color));
    }
    shapes
}

/// Incremental counterpart of [`shapes_for_stroke`] for one new segment.
pub fn shapes_for_segment(segment: &StrokeSegment, offset: Vec2) -> Vec<Shape> {
    let radius = segment.size / 2.0;
    let mut shapes = Vec::with_capacity(2);
    if let Some(from) = segment.from {
        shapes.push(Shape::line_segment(
            [from + offset, segment.to + offset],
            egui::Stroke::new(segment.size, segment.color),
        ));
    }
    shapes.push(Shape::circle_filled(segment.to + offset, radius, segment.color));
    shapes
}
