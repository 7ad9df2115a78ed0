//! Gameplay runtime for a vertical scrolling rhythm game.
//!
//! A session plays one chart against one audio clock:
//! - `logic` - the audio clock and its rodio output thread
//! - `state` - judgement engine, session lifecycle, score summary
//! - `pattern` - lane permutations (mirror, random)
//! - `render` - draws a frame into a `Surface`
//! - `core` - key bindings, touch lanes, hold-to-restart
//! - `system` - channels between the host and the session

pub mod core;
pub mod error;
pub mod logic;
pub mod models;
pub mod pattern;
pub mod render;
pub mod shared;
pub mod state;
pub mod system;

pub use error::GameError;
