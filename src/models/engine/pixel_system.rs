//! Utility to convert surface pixels into normalized device coordinates.

/// Handles pixel-to-normalized coordinate conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSystem {
    pub pixel_size: f32, // Derived from height (2.0 / height)
    pub surface_width: u32,
    pub surface_height: u32,
    pub aspect_ratio: f32,
}

impl PixelSystem {
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        let height = surface_height.max(1);
        let pixel_size = 2.0 / height as f32;
        let aspect_ratio = surface_width.max(1) as f32 / height as f32;
        Self {
            pixel_size,
            surface_width,
            surface_height,
            aspect_ratio,
        }
    }

    /// Converts pixel units into normalized Y size (height).
    pub fn y_pixels_to_normalized(&self, pixels: f32) -> f32 {
        pixels * self.pixel_size
    }

    /// Converts pixels into normalized X size, applying aspect-ratio correction.
    pub fn x_pixels_to_normalized(&self, pixels: f32) -> f32 {
        (pixels * self.pixel_size) / self.aspect_ratio
    }

    /// Maps a top-left-origin pixel position to NDC (y up, range -1..1).
    pub fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        [
            self.x_pixels_to_normalized(x) - 1.0,
            1.0 - self.y_pixels_to_normalized(y),
        ]
    }

    pub fn update_size(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }
}
