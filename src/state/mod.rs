//! Run state and session lifecycle.
//!
//! - `GameEngine` - judgement engine, owns the run state
//! - `Session` - ties the engine to the audio clock, input and renderer
//! - `ScoreSummary` - final result handed to the host

pub mod game;
pub mod result;
pub mod session;
pub mod traits;

pub use game::{GameEngine, InputOutcome, NoteState, Phase};
pub use result::ScoreSummary;
pub use session::Session;
pub use traits::{Snapshot, Transition, Update};
