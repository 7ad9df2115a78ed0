//! rodio output running on a dedicated audio thread.
//!
//! The clock side only sends commands; decoding for playback, sink
//! management and device access all stay on the "Audio Thread".
//!
//! With a device, device time is derived from the samples the sink has
//! pulled, so it advances with the audio and stalls when the audio does.
//! Without one it falls back to a monotonic wall clock.

use super::audio::AudioOutput;
use crate::error::GameError;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use rodio::source::Zero;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum AudioCommand {
    Load { data: Arc<[u8]> },
    Start {
        position: f64,
        delay: f64,
        rate: f64,
        /// Fresh per start, so a sink that is still draining cannot move it.
        counter: Arc<AtomicU64>,
    },
    Halt,
    SetVolume { volume: f32 },
    Release,
    Shutdown,
}

/// What decoding the head of a track tells us.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackInfo {
    pub duration: Option<Duration>,
    /// Interleaved samples per second of track time.
    pub samples_per_second: f64,
}

/// Decodes the start of `data` to check it is playable.
pub fn probe(data: &Arc<[u8]>) -> Result<TrackInfo, GameError> {
    let decoder = Decoder::new(Cursor::new(Arc::clone(data)))
        .map_err(|e| GameError::Decode(e.to_string()))?;
    Ok(TrackInfo {
        duration: decoder.total_duration(),
        samples_per_second: decoder.sample_rate() as f64 * decoder.channels() as f64,
    })
}

/// Device seconds covered by `samples` pulled at playback `rate`.
pub fn pulled_seconds(samples: u64, samples_per_second: f64, rate: f64) -> f64 {
    if samples_per_second <= 0.0 || rate <= 0.0 {
        return 0.0;
    }
    samples as f64 / samples_per_second / rate
}

struct AudioWorker {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    data: Option<Arc<[u8]>>,
    volume: f32,
}

impl AudioWorker {
    fn new() -> Self {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => {
                log::info!("AUDIO: Device found, audio enabled");
                (Some(stream), Some(handle))
            }
            Err(e) => {
                log::warn!("AUDIO: No audio device found ({}), running in silent mode", e);
                (None, None)
            }
        };

        Self {
            _stream: stream,
            stream_handle,
            sink: None,
            data: None,
            volume: 1.0,
        }
    }

    fn handle_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Load { data } => {
                self.halt();
                self.data = Some(data);
            }
            AudioCommand::Start {
                position,
                delay,
                rate,
                counter,
            } => self.start(position, delay, rate, counter),
            AudioCommand::Halt => self.halt(),
            AudioCommand::SetVolume { volume } => {
                self.volume = volume;
                if let Some(sink) = &self.sink {
                    sink.set_volume(volume);
                }
            }
            AudioCommand::Release => {
                self.halt();
                self.data = None;
            }
            AudioCommand::Shutdown => {}
        }
    }

    fn halt(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn start(&mut self, position: f64, delay: f64, rate: f64, counter: Arc<AtomicU64>) {
        self.halt();

        let Some(stream_handle) = &self.stream_handle else {
            return;
        };
        let Some(data) = &self.data else {
            log::error!("AUDIO: Start requested with nothing loaded");
            return;
        };

        let source = match Decoder::new(Cursor::new(Arc::clone(data))) {
            Ok(source) => source,
            Err(e) => {
                log::error!("AUDIO: Cannot decode track: {}", e);
                return;
            }
        };

        let (channels, sample_rate) = (source.channels(), source.sample_rate());

        // The sink speed also applies to the leading silence.
        let delayed = source
            .skip_duration(Duration::from_secs_f64(position.max(0.0)))
            .delay(Duration::from_secs_f64((delay * rate).max(0.0)));

        let monitor = AudioMonitor {
            inner: delayed,
            position_counter: Arc::clone(&counter),
        };
        // Keeps the clock running past the end of the track.
        let tail = AudioMonitor {
            inner: Zero::<i16>::new(channels, sample_rate),
            position_counter: counter,
        };

        let sink = match Sink::try_new(stream_handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::error!("AUDIO: Failed to create sink: {}", e);
                return;
            }
        };
        sink.set_speed(rate as f32);
        sink.set_volume(self.volume);
        sink.append(monitor);
        sink.append(tail);

        self.sink = Some(sink);
        log::debug!("AUDIO: Started at {:.3}s after {:.3}s", position, delay);
    }
}

struct AudioMonitor<I> {
    inner: I,
    position_counter: Arc<AtomicU64>,
}

impl<I> Iterator for AudioMonitor<I>
where
    I: Iterator,
{
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.position_counter.fetch_add(1, Ordering::Relaxed);
        }
        item
    }
}

impl<I> Source for AudioMonitor<I>
where
    I: Source,
    I::Item: rodio::Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }
    fn channels(&self) -> u16 {
        self.inner.channels()
    }
    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// `AudioOutput` backed by rodio on its own thread.
pub struct RodioOutput {
    cmd_tx: Sender<AudioCommand>,
    has_device: bool,
    epoch: Instant,
    samples_per_second: f64,
    /// Device time when the current counter started (or froze).
    anchor: f64,
    rate: f64,
    counter: Option<Arc<AtomicU64>>,
    thread: Option<JoinHandle<()>>,
}

impl RodioOutput {
    /// Starts the dedicated audio thread and waits for it to open the device.
    pub fn spawn() -> Result<Self, GameError> {
        let (cmd_tx, cmd_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        let thread = thread::Builder::new()
            .name("Audio Thread".to_string())
            .spawn(move || run_worker(cmd_rx, ready_tx))?;

        let has_device = ready_rx.recv().unwrap_or(false);

        Ok(Self {
            cmd_tx,
            has_device,
            epoch: Instant::now(),
            samples_per_second: 0.0,
            anchor: 0.0,
            rate: 1.0,
            counter: None,
            thread: Some(thread),
        })
    }

    pub fn has_device(&self) -> bool {
        self.has_device
    }

    /// Stops the sample-driven clock where it is.
    fn freeze(&mut self) {
        self.anchor = self.device_time();
        self.counter = None;
    }

    fn send(&self, cmd: AudioCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            log::error!("AUDIO: Thread is gone, command dropped");
        }
    }
}

fn run_worker(cmd_rx: Receiver<AudioCommand>, ready_tx: Sender<bool>) {
    log::info!("AUDIO: Thread started");
    let mut worker = AudioWorker::new();
    let _ = ready_tx.send(worker.stream_handle.is_some());

    while let Ok(cmd) = cmd_rx.recv() {
        if matches!(cmd, AudioCommand::Shutdown) {
            break;
        }
        worker.handle_command(cmd);
    }

    worker.halt();
    log::info!("AUDIO: Thread stopped");
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, data: Arc<[u8]>) -> Result<Option<Duration>, GameError> {
        let info = probe(&data)?;
        self.freeze();
        self.samples_per_second = info.samples_per_second;
        self.send(AudioCommand::Load { data });
        Ok(info.duration)
    }

    fn device_time(&self) -> f64 {
        if !self.has_device {
            return self.epoch.elapsed().as_secs_f64();
        }
        match &self.counter {
            Some(counter) => {
                self.anchor
                    + pulled_seconds(counter.load(Ordering::Relaxed), self.samples_per_second, self.rate)
            }
            None => self.anchor,
        }
    }

    fn start(&mut self, position: f64, delay: f64, rate: f64) {
        self.freeze();
        let counter = Arc::new(AtomicU64::new(0));
        self.counter = Some(Arc::clone(&counter));
        self.rate = rate;
        self.send(AudioCommand::Start {
            position,
            delay,
            rate,
            counter,
        });
    }

    fn halt(&mut self) {
        self.freeze();
        self.send(AudioCommand::Halt);
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCommand::SetVolume { volume });
    }

    fn release(&mut self) {
        self.freeze();
        self.send(AudioCommand::Release);
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mono 16-bit PCM WAV with `samples` zero samples.
    fn wav_bytes(sample_rate: u32, samples: u32) -> Vec<u8> {
        let data_len = samples * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.resize(44 + data_len as usize, 0);
        out
    }

    #[test]
    fn probe_reads_sample_layout() {
        let data: Arc<[u8]> = Arc::from(wav_bytes(8000, 8000));
        let info = probe(&data).unwrap();
        assert_eq!(info.samples_per_second, 8000.0);
    }

    #[test]
    fn pulled_samples_become_device_seconds() {
        assert_eq!(pulled_seconds(88_200, 88_200.0, 1.0), 1.0);
        assert!((pulled_seconds(88_200, 88_200.0, 1.5) - 1.0 / 1.5).abs() < 1e-12);
        assert_eq!(pulled_seconds(500, 0.0, 1.0), 0.0);
    }

    #[test]
    fn monitor_counts_silence_and_audio() {
        let data: Arc<[u8]> = Arc::from(wav_bytes(8000, 8000));
        let source = Decoder::new(Cursor::new(data)).unwrap();
        let counter = Arc::new(AtomicU64::new(0));
        let monitor = AudioMonitor {
            inner: source
                .skip_duration(Duration::from_millis(500))
                .delay(Duration::from_millis(250)),
            position_counter: Arc::clone(&counter),
        };
        let pulled = monitor.count() as u64;

        assert_eq!(counter.load(Ordering::Relaxed), pulled);
        // 250 ms of silence plus the remaining 500 ms of track.
        assert!(pulled.abs_diff(6000) <= 2, "pulled {}", pulled);
    }

    #[test]
    fn probe_rejects_garbage() {
        let data: Arc<[u8]> = Arc::from(b"definitely not audio".to_vec());
        assert!(matches!(probe(&data), Err(GameError::Decode(_))));
    }
}
