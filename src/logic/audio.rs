//! Audio clock: the single time source of a session.
//!
//! The clock never counts frames. It maps the output device's own clock onto
//! music time, so reading it any number of times per frame is free and does
//! not accumulate drift.

use crate::error::GameError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Playback backend driven by the clock.
///
/// `device_time` is the backend's monotonic clock in seconds. `start` must
/// begin audible playback of `position` (track seconds) once `delay` seconds
/// of device time have passed, at playback `rate`.
pub trait AudioOutput: Send {
    /// Decodes `data`; returns the track length when the format reports one.
    fn load(&mut self, data: Arc<[u8]>) -> Result<Option<Duration>, GameError>;
    fn device_time(&self) -> f64;
    fn start(&mut self, position: f64, delay: f64, rate: f64);
    /// Silences playback, keeping the loaded audio.
    fn halt(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// Drops the loaded audio.
    fn release(&mut self);
}

pub struct AudioClock {
    output: Box<dyn AudioOutput>,
    ready: bool,
    duration: Option<Duration>,
    /// Device time (seconds) at which track position 0 plays.
    start_device_time: f64,
    active_rate: f64,
    pending_rate: f64,
    playing: bool,
    /// Track position (seconds) shown while not playing.
    frozen_at: f64,
}

impl AudioClock {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            ready: false,
            duration: None,
            start_device_time: 0.0,
            active_rate: 1.0,
            pending_rate: 1.0,
            playing: false,
            frozen_at: 0.0,
        }
    }

    /// Clock backed by `SilentOutput` on a manually advanced device clock.
    pub fn silent(device: DeviceClock) -> Self {
        Self::new(Box::new(SilentOutput::new(device)))
    }

    /// Decodes audio. The clock is ready only after a successful load.
    pub fn load(&mut self, data: Arc<[u8]>) -> Result<(), GameError> {
        self.stop();
        self.ready = false;
        let duration = self.output.load(data)?;
        self.duration = duration;
        self.ready = true;
        log::info!(
            "AUDIO: Loaded ({})",
            duration.map_or("unknown length".to_string(), |d| format!("{:.1}s", d.as_secs_f64()))
        );
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Plays from `offset` seconds of track time.
    ///
    /// A negative offset schedules the track to start in the future; until
    /// then `now()` reads negative. The pending rate becomes active here.
    pub fn play(&mut self, offset: f64) -> Result<(), GameError> {
        if !self.ready {
            return Err(GameError::NotReady);
        }
        self.output.halt();

        self.active_rate = self.pending_rate;
        let device_now = self.output.device_time();
        self.start_device_time = device_now - offset / self.active_rate;

        let position = offset.max(0.0);
        let delay = (-offset).max(0.0) / self.active_rate;
        self.output.start(position, delay, self.active_rate);

        self.playing = true;
        log::info!("AUDIO: Play from {:.3}s at x{:.2}", offset, self.active_rate);
        Ok(())
    }

    /// Freezes the clock at the current position. Calling it again is a no-op.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.frozen_at = self.now() / 1000.0;
        self.playing = false;
        self.output.halt();
        log::info!("AUDIO: Paused at {:.3}s", self.frozen_at);
    }

    /// Halts playback and rewinds the clock to zero.
    pub fn stop(&mut self) {
        if self.playing {
            self.output.halt();
        }
        self.playing = false;
        self.frozen_at = 0.0;
    }

    /// Rate used by the next `play()`.
    pub fn set_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.pending_rate = rate;
        }
    }

    pub fn rate(&self) -> f64 {
        self.active_rate
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.output.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Current track time in milliseconds.
    pub fn now(&self) -> f64 {
        if self.playing {
            (self.output.device_time() - self.start_device_time) * self.active_rate * 1000.0
        } else {
            self.frozen_at * 1000.0
        }
    }

    /// Stops playback and drops the decoded audio.
    pub fn unload(&mut self) {
        self.stop();
        if self.ready {
            self.output.release();
            self.ready = false;
            self.duration = None;
            log::info!("AUDIO: Released");
        }
    }
}

impl Drop for AudioClock {
    fn drop(&mut self) {
        self.unload();
    }
}

/// Device clock for outputs that have no hardware clock.
///
/// `manual` clocks only move when told to, which makes session timing fully
/// deterministic in tests.
#[derive(Clone, Debug)]
pub struct DeviceClock {
    source: ClockSource,
}

#[derive(Clone, Debug)]
enum ClockSource {
    Realtime(Instant),
    /// f64 seconds stored as bits.
    Manual(Arc<AtomicU64>),
}

impl DeviceClock {
    pub fn realtime() -> Self {
        Self {
            source: ClockSource::Realtime(Instant::now()),
        }
    }

    pub fn manual() -> Self {
        Self {
            source: ClockSource::Manual(Arc::new(AtomicU64::new(0f64.to_bits()))),
        }
    }

    pub fn seconds(&self) -> f64 {
        match &self.source {
            ClockSource::Realtime(epoch) => epoch.elapsed().as_secs_f64(),
            ClockSource::Manual(bits) => f64::from_bits(bits.load(Ordering::Acquire)),
        }
    }

    /// Moves a manual clock forward. Has no effect on a realtime clock.
    pub fn advance(&self, seconds: f64) {
        if let ClockSource::Manual(bits) = &self.source {
            let next = f64::from_bits(bits.load(Ordering::Acquire)) + seconds.max(0.0);
            bits.store(next.to_bits(), Ordering::Release);
        }
    }

    pub fn advance_ms(&self, ms: f64) {
        self.advance(ms / 1000.0);
    }
}

/// Output that plays nothing. Used without an audio device and in tests.
pub struct SilentOutput {
    clock: DeviceClock,
    data: Option<Arc<[u8]>>,
    volume: f32,
    playing: bool,
}

impl SilentOutput {
    pub fn new(clock: DeviceClock) -> Self {
        Self {
            clock,
            data: None,
            volume: 1.0,
            playing: false,
        }
    }
}

impl AudioOutput for SilentOutput {
    fn load(&mut self, data: Arc<[u8]>) -> Result<Option<Duration>, GameError> {
        if data.is_empty() {
            return Err(GameError::Decode("audio buffer is empty".into()));
        }
        self.data = Some(data);
        Ok(None)
    }

    fn device_time(&self) -> f64 {
        self.clock.seconds()
    }

    fn start(&mut self, _position: f64, _delay: f64, _rate: f64) {
        self.playing = self.data.is_some();
    }

    fn halt(&mut self) {
        self.playing = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn release(&mut self) {
        self.playing = false;
        self.data = None;
    }
}
