//! Chart model and osu!mania chart loading.
//!
//! A `Chart` is immutable once built. `Chart::new` is the single validation
//! point; the engine trusts its ordering and never re-sorts at runtime.

use super::constants::{OSU_WIDTH, SLIDER_HOLD_MS};
use crate::error::GameError;
use rosu_map::section::hit_objects::{HitObject, HitObjectKind};
use std::path::{Path, PathBuf};

/// A single note in a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    /// Scheduled hit time in milliseconds.
    pub time: f64,
    /// Release time; equal to `time` for tap notes.
    pub end_time: f64,
    /// Logical lane, `0..lane_count`.
    pub column: usize,
}

impl Note {
    /// Creates a new tap note.
    pub fn tap(time: f64, column: usize) -> Self {
        Self {
            time,
            end_time: time,
            column,
        }
    }

    /// Creates a new hold note.
    pub fn hold(time: f64, column: usize, duration_ms: f64) -> Self {
        Self {
            time,
            end_time: time + duration_ms.max(0.0),
            column,
        }
    }

    /// Returns true if this is a long/hold note.
    pub fn is_hold(&self) -> bool {
        self.end_time > self.time
    }

    pub fn duration_ms(&self) -> f64 {
        self.end_time - self.time
    }
}

/// Descriptive chart metadata, carried for the host's result screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartMetadata {
    pub title: String,
    pub artist: String,
    pub creator: String,
    pub version: String,
}

/// Immutable structured representation of a beatmap.
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    lane_count: usize,
    notes: Vec<Note>,
    pub drain_rate: f64,
    pub overall_difficulty: f64,
    pub scroll_reference_speed: f64,
    pub audio_file: String,
    pub background_file: Option<String>,
    pub metadata: ChartMetadata,
}

impl Chart {
    /// Builds a chart, rejecting anything the engine cannot play.
    pub fn new(lane_count: usize, notes: Vec<Note>) -> Result<Self, GameError> {
        if lane_count == 0 {
            return Err(GameError::MalformedChart("lane count must be at least 1".into()));
        }
        if notes.is_empty() {
            return Err(GameError::MalformedChart("chart has no notes".into()));
        }

        let mut previous = f64::NEG_INFINITY;
        for (i, note) in notes.iter().enumerate() {
            if !note.time.is_finite() || !note.end_time.is_finite() {
                return Err(GameError::MalformedChart(format!("note {} has a non-finite time", i)));
            }
            if note.column >= lane_count {
                return Err(GameError::MalformedChart(format!(
                    "note {} is in column {} of a {}-lane chart",
                    i, note.column, lane_count
                )));
            }
            if note.end_time < note.time {
                return Err(GameError::MalformedChart(format!("note {} ends before it starts", i)));
            }
            if note.time < previous {
                return Err(GameError::MalformedChart(format!("note {} is out of order", i)));
            }
            previous = note.time;
        }

        Ok(Self {
            lane_count,
            notes,
            drain_rate: 5.0,
            overall_difficulty: 5.0,
            scroll_reference_speed: 1.4,
            audio_file: String::new(),
            background_file: None,
            metadata: ChartMetadata::default(),
        })
    }

    /// Sets the difficulty parameters, clamped to the external 0-10 range.
    pub fn with_difficulty(mut self, drain_rate: f64, overall_difficulty: f64) -> Self {
        self.drain_rate = drain_rate.clamp(0.0, 10.0);
        self.overall_difficulty = overall_difficulty.clamp(0.0, 10.0);
        self
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn first_note_time(&self) -> f64 {
        self.notes.first().map_or(0.0, |n| n.time)
    }

    /// Latest release time across all notes.
    pub fn end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.end_time)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Loads a chart from an .osu file.
/// Returns the audio path next to it and the parsed chart.
pub fn load_chart(path: &Path) -> Result<(PathBuf, Chart), GameError> {
    let bytes = std::fs::read(path)
        .map_err(|e| GameError::Io(format!("Failed to read chart {:?}: {}", path, e)))?;
    let chart = parse_chart(&bytes)?;

    let audio_path = path
        .parent()
        .ok_or_else(|| GameError::Io(format!("Invalid path (no parent): {:?}", path)))?
        .join(&chart.audio_file);

    Ok((audio_path, chart))
}

/// Parses .osu content into a chart.
pub fn parse_chart(bytes: &[u8]) -> Result<Chart, GameError> {
    let map = rosu_map::Beatmap::from_bytes(bytes)
        .map_err(|e| GameError::MalformedChart(format!("Failed to parse beatmap: {}", e)))?;

    let lane_count = match map.circle_size.round() as usize {
        0 => 4,
        n => n,
    };

    let mut notes: Vec<Note> = map
        .hit_objects
        .iter()
        .filter_map(|ho| parse_hit_object(ho, lane_count))
        .collect();
    // Stable sort keeps simultaneous notes in file order.
    notes.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut chart = Chart::new(lane_count, notes)?
        .with_difficulty(f64::from(map.hp_drain_rate), f64::from(map.overall_difficulty));
    chart.scroll_reference_speed = map.slider_multiplier;
    chart.audio_file = map.audio_file.clone();
    chart.background_file = (!map.background_file.is_empty()).then(|| map.background_file.clone());
    chart.metadata = ChartMetadata {
        title: map.title.clone(),
        artist: map.artist.clone(),
        creator: map.creator.clone(),
        version: map.version.clone(),
    };

    if chart.audio_file.is_empty() {
        return Err(GameError::MalformedChart("missing AudioFilename".into()));
    }

    Ok(chart)
}

/// Converts an osu! hit object into a note; spinners have no lane.
pub fn parse_hit_object(hit_object: &HitObject, lane_count: usize) -> Option<Note> {
    match &hit_object.kind {
        HitObjectKind::Circle(circle) => {
            let column = x_to_column(f64::from(circle.pos.x), lane_count);
            Some(Note::tap(hit_object.start_time, column))
        }
        HitObjectKind::Hold(hold) => {
            let column = x_to_column(f64::from(hold.pos_x), lane_count);
            Some(Note::hold(hit_object.start_time, column, hold.duration))
        }
        HitObjectKind::Slider(slider) => {
            let column = x_to_column(f64::from(slider.pos.x), lane_count);
            Some(Note::hold(hit_object.start_time, column, SLIDER_HOLD_MS))
        }
        _ => None,
    }
}

/// Converts an osu!mania x position into a column index.
pub fn x_to_column(x: f64, lane_count: usize) -> usize {
    let col = (x * lane_count as f64 / OSU_WIDTH).floor();
    col.clamp(0.0, (lane_count - 1) as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "osu file format v14

[General]
AudioFilename: audio.mp3
Mode: 3

[Metadata]
Title:Neon Nights (Demo)
Artist:OsuWeb
Creator:OsuWeb
Version:4K Standard

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:7
ApproachRate:8
SliderMultiplier:1.4
SliderTickRate:1

[HitObjects]
64,192,1000,1,0,0:0:0:0:
192,192,1500,1,0,0:0:0:0:
320,192,2000,1,0,0:0:0:0:
448,192,2500,1,0,0:0:0:0:
64,192,3000,128,0,3500:0:0:0:0:
320,192,3500,1,0,0:0:0:0:
448,192,4000,1,0,0:0:0:0:
";

    #[test]
    fn columns_follow_x_position() {
        assert_eq!(x_to_column(64.0, 4), 0);
        assert_eq!(x_to_column(192.0, 4), 1);
        assert_eq!(x_to_column(448.0, 4), 3);
        assert_eq!(x_to_column(600.0, 4), 3);
        assert_eq!(x_to_column(-5.0, 4), 0);
        assert_eq!(x_to_column(256.0, 7), 3);
    }

    #[test]
    fn parses_demo_chart() {
        let chart = parse_chart(DEMO.as_bytes()).unwrap();
        assert_eq!(chart.lane_count(), 4);
        assert_eq!(chart.notes().len(), 7);
        assert_eq!(chart.drain_rate, 5.0);
        assert_eq!(chart.overall_difficulty, 7.0);
        assert_eq!(chart.audio_file, "audio.mp3");
        assert_eq!(chart.metadata.version, "4K Standard");

        let hold = chart.notes()[4];
        assert!(hold.is_hold());
        assert_eq!(hold.column, 0);
        assert_eq!(hold.end_time, 3500.0);
        assert_eq!(chart.first_note_time(), 1000.0);
        assert_eq!(chart.end_time(), 4000.0);
    }

    #[test]
    fn rejects_empty_and_unordered_charts() {
        assert!(matches!(Chart::new(4, vec![]), Err(GameError::MalformedChart(_))));
        assert!(matches!(
            Chart::new(4, vec![Note::tap(500.0, 0), Note::tap(100.0, 1)]),
            Err(GameError::MalformedChart(_))
        ));
        assert!(matches!(
            Chart::new(4, vec![Note::tap(100.0, 4)]),
            Err(GameError::MalformedChart(_))
        ));
        assert!(matches!(Chart::new(0, vec![Note::tap(100.0, 0)]), Err(GameError::MalformedChart(_))));
    }

    #[test]
    fn end_time_uses_longest_release() {
        let chart = Chart::new(
            2,
            vec![Note::hold(0.0, 0, 5000.0), Note::tap(1000.0, 1)],
        )
        .unwrap();
        assert_eq!(chart.end_time(), 5000.0);
    }
}
