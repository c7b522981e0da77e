use egui::Color32;
use log::debug;

use crate::stroke::{Point, Stroke, StrokeBuilder, StrokeSegment};

/// The committed strokes of a session plus the single stroke being drawn.
///
/// This is the only owner of stroke state. Every mutation goes through the
/// methods below, none of which can fail: calls that make no sense in the
/// current state are absorbed as no-ops.
#[derive(Debug, Default, Clone)]
pub struct Drawing {
    strokes: Vec<Stroke>,
    in_progress: Option<StrokeBuilder>,
    revision: u64,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a stroke at `point`.
    ///
    /// A stroke that is already in progress is dropped without being
    /// committed.
    pub fn begin(&mut self, point: Point, color: Color32, size: f32) {
        if let Some(discarded) = self.in_progress.take() {
            debug!(
                "Discarding unfinished stroke with {} points",
                discarded.points().len()
            );
        }
        self.in_progress = Some(StrokeBuilder::new(point, color, size));
    }

    /// Append `point` to the stroke in progress.
    ///
    /// Returns the added segment so callers can draw it incrementally, or
    /// `None` when nothing is being drawn.
    pub fn extend(&mut self, point: Point) -> Option<StrokeSegment> {
        self.in_progress
            .as_mut()
            .map(|builder| builder.add_point(point))
    }

    /// Commit the stroke in progress. Returns true if a stroke was appended.
    pub fn end(&mut self) -> bool {
        let Some(builder) = self.in_progress.take() else {
            return false;
        };

        match builder.finish() {
            Some(stroke) => {
                debug!(
                    "Committed stroke #{} with {} points",
                    self.strokes.len(),
                    stroke.points().len()
                );
                self.strokes.push(stroke);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Remove the most recently committed stroke.
    pub fn undo(&mut self) -> Option<Stroke> {
        let removed = self.strokes.pop();
        if removed.is_some() {
            self.revision += 1;
            debug!("Undo, {} strokes remain", self.strokes.len());
        }
        removed
    }

    /// Drop every committed stroke and any stroke in progress.
    pub fn clear(&mut self) {
        let had_content = !self.strokes.is_empty();
        self.strokes.clear();
        self.in_progress = None;
        if had_content {
            self.revision += 1;
        }
        debug!("Drawing cleared");
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn in_progress(&self) -> Option<&StrokeBuilder> {
        self.in_progress.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.in_progress.is_some()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    /// Bumped on every change to the committed strokes.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_revision_tracks_committed_changes_only() {
        let mut drawing = Drawing::new();
        assert_eq!(drawing.revision(), 0);

        drawing.begin(pos2(0.0, 0.0), Color32::RED, 2.0);
        drawing.extend(pos2(1.0, 0.0));
        assert_eq!(drawing.revision(), 0);

        drawing.end();
        assert_eq!(drawing.revision(), 1);

        drawing.undo();
        assert_eq!(drawing.revision(), 2);

        // Nothing left to remove
        drawing.undo();
        drawing.clear();
        assert_eq!(drawing.revision(), 2);
    }

    #[test]
    fn test_duplicate_begin_discards_previous() {
        let mut drawing = Drawing::new();
        drawing.begin(pos2(0.0, 0.0), Color32::RED, 2.0);
        drawing.extend(pos2(5.0, 5.0));
        drawing.begin(pos2(9.0, 9.0), Color32::BLUE, 4.0);
        drawing.end();

        assert_eq!(drawing.len(), 1);
        let stroke = &drawing.strokes()[0];
        assert_eq!(stroke.points(), &[pos2(9.0, 9.0)]);
        assert_eq!(stroke.color(), Color32::BLUE);
    }

    #[test]
    fn test_extend_without_begin_is_noop() {
        let mut drawing = Drawing::new();
        assert!(drawing.extend(pos2(1.0, 1.0)).is_none());
        assert!(!drawing.end());
        assert!(drawing.is_empty());
    }
}
