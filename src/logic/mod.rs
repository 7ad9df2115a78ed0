//! Audio playback and the audio clock.

pub mod audio;
pub mod audio_thread;

pub use audio::{AudioClock, AudioOutput, DeviceClock, SilentOutput};
pub use audio_thread::RodioOutput;
