//! Batches a recorded frame into GPU quads.

use super::draw::{DrawCommand, DrawList, Rect};
use super::shapes::with_alpha;
use crate::models::engine::{InstanceRaw, PixelSystem};
use crate::models::skin::Color;

fn quad(pixels: &PixelSystem, rect: Rect, color: Color) -> InstanceRaw {
    let (cx, cy) = rect.center();
    InstanceRaw {
        offset: pixels.to_ndc(cx, cy),
        scale: [
            pixels.x_pixels_to_normalized(rect.w),
            pixels.y_pixels_to_normalized(rect.h),
        ],
        color,
    }
}

/// Flat quads for every rectangular command in `list`.
///
/// Images become white quads tinted by their alpha, for the host to texture.
/// Text and arcs are left to the host's own passes.
pub fn build_instances(list: &DrawList, pixels: &PixelSystem) -> Vec<InstanceRaw> {
    let (w, h) = (pixels.surface_width as f32, pixels.surface_height as f32);
    let mut out = Vec::with_capacity(list.len());

    for cmd in list.commands() {
        match cmd {
            DrawCommand::Background { dim, .. } => {
                out.push(quad(pixels, Rect::new(0.0, 0.0, w, h), [0.0, 0.0, 0.0, *dim]));
            }
            DrawCommand::Rect { rect, color } => out.push(quad(pixels, *rect, *color)),
            DrawCommand::Shape { rect, color, .. } => out.push(quad(pixels, *rect, *color)),
            DrawCommand::Image { rect, alpha, .. } => {
                out.push(quad(pixels, *rect, with_alpha([1.0; 4], *alpha)));
            }
            DrawCommand::Frame { rect, color, thickness } => {
                let t = *thickness;
                let edges = [
                    Rect::new(rect.x, rect.y, rect.w, t),
                    Rect::new(rect.x, rect.y + rect.h - t, rect.w, t),
                    Rect::new(rect.x, rect.y, t, rect.h),
                    Rect::new(rect.x + rect.w - t, rect.y, t, rect.h),
                ];
                out.extend(edges.into_iter().map(|e| quad(pixels, e, *color)));
            }
            DrawCommand::Text { .. } | DrawCommand::Arc { .. } => {}
        }
    }

    out
}
