//! Note and receptor geometry per draw strategy.

use super::draw::{DrawCommand, Rect};
use crate::models::settings::NoteShape;
use crate::models::skin::{Color, NoteDrawStrategy};

/// Share of the lane a shape note occupies.
pub const NOTE_SCALE: f32 = 0.8;
/// Share of the lane a hold body occupies.
pub const BODY_SCALE: f32 = 0.6;
pub const BODY_ALPHA: f32 = 0.7;

/// Bounding box of a shape of nominal `size` centred on `(cx, cy)`.
pub fn shape_rect(shape: NoteShape, cx: f32, cy: f32, size: f32) -> Rect {
    match shape {
        NoteShape::Bar => Rect::centered(cx, cy, size, 20.0),
        NoteShape::Line => Rect::centered(cx, cy, size, 4.0),
        NoteShape::Circle | NoteShape::Arrow | NoteShape::Diamond | NoteShape::DiamondSoft => {
            Rect::centered(cx, cy, size, size)
        }
    }
}

/// Head of a note in the lane starting at `lane_x`.
pub fn note_head(strategy: &NoteDrawStrategy, lane_x: f32, lane_width: f32, y: f32, color: Color) -> DrawCommand {
    match strategy {
        NoteDrawStrategy::Image { key, height } => DrawCommand::Image {
            key: *key,
            rect: Rect::new(lane_x, y - height / 2.0, lane_width, *height),
            alpha: 1.0,
        },
        NoteDrawStrategy::Shape(shape) => DrawCommand::Shape {
            shape: *shape,
            rect: shape_rect(*shape, lane_x + lane_width / 2.0, y, lane_width * NOTE_SCALE),
            color,
            outline: false,
        },
    }
}

/// Hold body between the tail and `start_y`, or `None` once it has shrunk away.
pub fn hold_body(cx: f32, lane_width: f32, start_y: f32, tail_y: f32) -> Option<Rect> {
    let height = start_y - tail_y;
    if height <= 0.0 {
        return None;
    }
    let width = lane_width * BODY_SCALE;
    Some(Rect::new(cx - width / 2.0, tail_y, width, height))
}

pub fn receptor(shape: NoteShape, cx: f32, hit_y: f32, lane_width: f32, color: Color, pressed: bool) -> DrawCommand {
    DrawCommand::Shape {
        shape,
        rect: shape_rect(shape, cx, hit_y, lane_width * NOTE_SCALE),
        color,
        outline: !pressed,
    }
}

pub fn with_alpha(mut color: Color, alpha: f32) -> Color {
    color[3] *= alpha;
    color
}
