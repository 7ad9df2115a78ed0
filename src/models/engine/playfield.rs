//! Playfield layout for a given surface size.

use super::constants::{HIT_LINE_BOTTOM_MARGIN, NARROW_SURFACE_WIDTH, SKIN_REFERENCE_HEIGHT};

/// Resolved lane geometry and scroll mapping for one surface size.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayfieldLayout {
    pub lane_count: usize,
    pub lane_width: f32,
    pub start_x: f32,
    pub hit_line_y: f32,
    pub pixels_per_ms: f32,
    pub surface_width: f32,
    pub surface_height: f32,
}

impl PlayfieldLayout {
    /// `hit_position` is the skin's hit line in 480-high coordinates, if any.
    pub fn new(
        surface_width: f32,
        surface_height: f32,
        lane_count: usize,
        configured_lane_width: f32,
        hit_position: Option<f32>,
        base_speed: f64,
    ) -> Self {
        let lanes = lane_count.max(1) as f32;
        let (lane_width, start_x) = if surface_width < NARROW_SURFACE_WIDTH {
            (surface_width / lanes, 0.0)
        } else {
            let total = configured_lane_width * lanes;
            (configured_lane_width, (surface_width - total) / 2.0)
        };

        let hit_line_y = match hit_position {
            Some(pos) => pos * (surface_height / SKIN_REFERENCE_HEIGHT),
            None => surface_height - HIT_LINE_BOTTOM_MARGIN,
        };

        Self {
            lane_count,
            lane_width,
            start_x,
            hit_line_y,
            pixels_per_ms: pixels_per_ms(base_speed, surface_height),
            surface_width,
            surface_height,
        }
    }

    pub fn total_width(&self) -> f32 {
        self.lane_width * self.lane_count as f32
    }

    /// Left edge of a visual lane.
    pub fn lane_x(&self, visual_lane: usize) -> f32 {
        self.start_x + visual_lane as f32 * self.lane_width
    }

    pub fn lane_center(&self, visual_lane: usize) -> f32 {
        self.lane_x(visual_lane) + self.lane_width / 2.0
    }

    /// Vertical position of an event at `time_ms` when the clock reads `now_ms`.
    pub fn time_to_y(&self, time_ms: f64, now_ms: f64) -> f32 {
        self.hit_line_y - ((time_ms - now_ms) as f32 * self.pixels_per_ms)
    }
}

/// Scroll speed scaled to the surface height.
pub fn pixels_per_ms(base_speed: f64, surface_height: f32) -> f32 {
    (base_speed as f32 / 20.0) * (surface_height / 600.0)
}

/// Picks the configured scroll speed or the chart's own hint.
pub fn base_scroll_speed(use_chart_speed: bool, configured: f64, chart_reference: f64) -> f64 {
    if use_chart_speed {
        chart_reference * 15.0
    } else {
        configured
    }
}
