//! Error types surfaced to the host.
//!
//! Only session setup can fail. Once a session is playing, abnormal endings
//! are game outcomes (`Phase::Failed`), not errors.

/// Errors that prevent a session from starting.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// The audio source could not be decoded.
    Decode(String),
    /// The chart is missing required data or violates its ordering rules.
    MalformedChart(String),
    /// A chart, audio, settings or skin file could not be read.
    Io(String),
    /// A session was started with a clock that has no audio loaded.
    NotReady,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Decode(msg) => write!(f, "Audio decode failed: {}", msg),
            GameError::MalformedChart(msg) => write!(f, "Malformed chart: {}", msg),
            GameError::Io(msg) => write!(f, "I/O error: {}", msg),
            GameError::NotReady => write!(f, "Audio clock is not ready"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::Io(err.to_string())
    }
}
