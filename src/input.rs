use egui::{Color32, Event, LayerId, PointerButton, Pos2, Rect, Vec2};

use crate::config::BrushConfig;
use crate::drawing::Drawing;
use crate::stroke::{Point, StrokeSegment};

/// Smallest brush diameter handed to the drawing.
pub const MIN_BRUSH_SIZE: f32 = 0.1;

/// Maps raw pointer positions into drawing-surface units.
pub trait CoordinateMapper {
    fn to_drawing_space(&self, raw: Pos2) -> Point;

    /// Whether a raw position lies on the drawing surface.
    fn contains(&self, raw: Pos2) -> bool;
}

/// The canvas area on screen. Drawing space is canvas-local logical points,
/// so strokes stay put when DPI scaling changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    canvas_rect: Rect,
}

impl Viewport {
    pub fn new(canvas_rect: Rect) -> Self {
        Self { canvas_rect }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Screen offset of the drawing-space origin.
    pub fn offset(&self) -> Vec2 {
        self.canvas_rect.min.to_vec2()
    }
}

impl CoordinateMapper for Viewport {
    fn to_drawing_space(&self, raw: Pos2) -> Point {
        raw - self.offset()
    }

    fn contains(&self, raw: Pos2) -> bool {
        self.canvas_rect.contains(raw)
    }
}

/// Brush color and diameter, sampled when a stroke begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    pub color: Color32,
    pub size: f32,
}

impl From<&BrushConfig> for BrushSettings {
    fn from(config: &BrushConfig) -> Self {
        Self {
            color: config.color32(),
            size: config.size,
        }
    }
}

/// What a single input event did to the drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    Ignored,
    Began,
    Extended(StrokeSegment),
    Ended { committed: bool },
}

impl InputOutcome {
    /// True when the committed strokes changed and a full redraw is due.
    pub fn committed(&self) -> bool {
        matches!(self, Self::Ended { committed: true })
    }
}

/// Turns egui pointer events into begin/extend/end calls on a [`Drawing`].
#[derive(Debug, Clone)]
pub struct InputAdapter<M> {
    mapper: M,
}

impl<M: CoordinateMapper> InputAdapter<M> {
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }

    pub fn mapper_mut(&mut self) -> &mut M {
        &mut self.mapper
    }

    pub fn handle_event(
        &self,
        event: &Event,
        drawing: &mut Drawing,
        brush: &BrushSettings,
    ) -> InputOutcome {
        match event {
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: true,
                ..
            } if self.mapper.contains(*pos) => {
                let point = self.mapper.to_drawing_space(*pos);
                drawing.begin(point, brush.color, brush.size.max(MIN_BRUSH_SIZE));
                InputOutcome::Began
            }
            Event::PointerMoved(pos) if drawing.is_drawing() => {
                match drawing.extend(self.mapper.to_drawing_space(*pos)) {
                    Some(segment) => InputOutcome::Extended(segment),
                    None => InputOutcome::Ignored,
                }
            }
            Event::PointerButton {
                button: PointerButton::Primary,
                pressed: false,
                ..
            }
            | Event::PointerGone
                if drawing.is_drawing() =>
            {
                InputOutcome::Ended {
                    committed: drawing.end(),
                }
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Feed a frame's worth of events. Returns the outcome of each one.
    pub fn handle_events<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
        drawing: &mut Drawing,
        brush: &BrushSettings,
    ) -> Vec<InputOutcome> {
        events
            .into_iter()
            .map(|event| self.handle_event(event, drawing, brush))
            .collect()
    }
}

/// Drop primary presses that land on another layer drawn over the canvas,
/// such as a popup or window. Moves and releases are kept so a stroke that
/// is already under way still ends.
///
/// `layer_at` returns `None` where no layer covers the position.
pub fn retain_unobstructed(
    events: &mut Vec<Event>,
    canvas_layer: LayerId,
    layer_at: impl Fn(Pos2) -> Option<LayerId>,
) {
    events.retain(|event| match event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed: true,
            ..
        } => layer_at(*pos).is_none_or(|layer| layer == canvas_layer),
        _ => true,
    });
}
