pub mod constants;
pub mod hit_window;
pub mod instance;
pub mod note;
pub mod pixel_system;
pub mod playfield;

pub use constants::*;
pub use hit_window::HitWindow;
pub use instance::InstanceRaw;
pub use note::{Chart, ChartMetadata, Note, load_chart, parse_chart, x_to_column};
pub use pixel_system::PixelSystem;
pub use playfield::{PlayfieldLayout, base_scroll_speed, pixels_per_ms};
