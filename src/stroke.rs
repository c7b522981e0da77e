use egui::{Color32, Pos2, Rect};

/// A recorded pointer position in drawing-surface units.
pub type Point = Pos2;

// Committed stroke, never edited after it lands in a drawing
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    color: Color32,
    size: f32,
}

// Stroke being drawn, owned by the drawing's in-progress slot
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeBuilder {
    points: Vec<Point>,
    color: Color32,
    size: f32,
}

/// The piece of a stroke added by a single `extend`.
///
/// `from` is `None` when the stroke had no previous point, in which case the
/// segment degenerates to a dot at `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeSegment {
    pub from: Option<Point>,
    pub to: Point,
    pub color: Color32,
    pub size: f32,
}

impl Stroke {
    pub fn new(color: Color32, size: f32, points: Vec<Point>) -> Self {
        Self {
            points,
            color,
            size,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Brush diameter.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// A single-point stroke renders as a filled dot.
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    /// Area covered by the stroke, including half the brush on every side.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::NOTHING;
        }
        Rect::from_points(&self.points).expand(self.size / 2.0)
    }
}

impl StrokeBuilder {
    pub fn new(start: Point, color: Color32, size: f32) -> Self {
        Self {
            points: vec![start],
            color,
            size,
        }
    }

    // Append a point and report the segment it closes
    pub fn add_point(&mut self, point: Point) -> StrokeSegment {
        let from = self.points.last().copied();
        self.points.push(point);
        StrokeSegment {
            from,
            to: point,
            color: self.color,
            size: self.size,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Snapshot of the stroke as it stands, for preview rendering.
    pub fn to_stroke(&self) -> Stroke {
        Stroke::new(self.color, self.size, self.points.clone())
    }

    // Consume into a committed stroke, `None` if nothing was recorded
    pub fn finish(self) -> Option<Stroke> {
        if self.points.is_empty() {
            None
        } else {
            Some(Stroke::new(self.color, self.size, self.points))
        }
    }
}
