//! Session lifecycle: one chart played against one audio clock.
//!
//! The session owns the clock, the engine, the lane mapper and the input
//! layer. Each `update` latches the clock once, drains host actions and
//! advances the engine to that time. Keys are stamped with the clock time
//! at the moment they arrive.

use crate::core::input::InputManager;
use crate::core::input::actions::GameAction;
use crate::error::GameError;
use crate::logic::AudioClock;
use crate::models::engine::{Chart, START_OFFSET_SECONDS};
use crate::models::settings::SettingsState;
use crate::pattern::LaneMapper;
use crate::render::{Frame, Renderer, Surface};
use crate::shared::snapshot::GameplaySnapshot;
use crate::state::game::{GameEngine, Phase};
use crate::state::result::ScoreSummary;
use crate::state::traits::{Snapshot, Transition, Update};
use crate::system::bus::SystemBus;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use winit::keyboard::KeyCode;

pub struct Session {
    chart: Arc<Chart>,
    settings: SettingsState,
    clock: AudioClock,
    engine: GameEngine,
    mapper: LaneMapper,
    input: InputManager,
    bus: SystemBus,
    rng: StdRng,
    summary_sent: bool,
    closed: bool,
}

impl Session {
    /// Starts playing `chart` from the pre-roll. The clock must have audio loaded.
    pub fn start(
        chart: Arc<Chart>,
        settings: SettingsState,
        clock: AudioClock,
        bus: SystemBus,
    ) -> Result<Self, GameError> {
        Self::start_seeded(chart, settings, clock, bus, rand::random())
    }

    /// Same as `start`, with a fixed seed for the random lane shuffle.
    pub fn start_seeded(
        chart: Arc<Chart>,
        settings: SettingsState,
        mut clock: AudioClock,
        bus: SystemBus,
        seed: u64,
    ) -> Result<Self, GameError> {
        if !clock.is_ready() {
            return Err(GameError::NotReady);
        }

        let lanes = chart.lane_count();
        let modifiers = settings.modifiers.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let mapper = LaneMapper::for_session(lanes, &modifiers, &mut rng);
        let engine = GameEngine::new(Arc::clone(&chart), modifiers.clone());
        let input = InputManager::new(&settings, lanes);

        clock.set_volume(settings.volume);
        clock.set_rate(modifiers.playback_rate());
        clock.play(START_OFFSET_SECONDS)?;

        log::info!(
            "SESSION: Started '{}' [{}] ({}K, {} notes, x{:.2})",
            chart.metadata.title,
            chart.metadata.version,
            lanes,
            chart.notes().len(),
            modifiers.playback_rate()
        );

        Ok(Self {
            chart,
            settings,
            clock,
            engine,
            mapper,
            input,
            bus,
            rng,
            summary_sent: false,
            closed: false,
        })
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn mapper(&self) -> &LaneMapper {
        &self.mapper
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Runs one frame.
    pub fn update(&mut self) -> Transition {
        if self.closed {
            return Transition::None;
        }

        let now = self.clock.now();
        while let Ok(action) = self.bus.action_rx.try_recv() {
            self.apply(action, now);
            if self.closed {
                return Transition::None;
            }
        }

        if self.input.poll_restart(Instant::now()) {
            self.restart_or_log();
            return Transition::Restart;
        }

        let transition = self.engine.update(now);
        match transition {
            Transition::Restart => self.restart_or_log(),
            Transition::Failed => {
                self.clock.pause();
                log::info!("SESSION: Failed");
            }
            Transition::Finished => {
                self.clock.pause();
                let summary = self.engine.summary();
                log::info!(
                    "SESSION: Finished, score {}, max combo {}",
                    summary.score,
                    summary.max_combo
                );
                self.send_summary(summary);
            }
            Transition::None => {}
        }

        // Stale frames are dropped when the HUD falls behind.
        let _ = self.bus.render_tx.try_send(self.snapshot());
        transition
    }

    fn apply(&mut self, action: GameAction, now_ms: f64) {
        let result = match action {
            GameAction::Hit { lane } => {
                if let Some(column) = self.mapper.to_logical(lane) {
                    self.engine.queue_press(column, now_ms);
                }
                Ok(())
            }
            GameAction::Release { lane } => {
                if let Some(column) = self.mapper.to_logical(lane) {
                    self.engine.queue_release(column, now_ms);
                }
                Ok(())
            }
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::SkipIntro => self.skip_intro().map(|_| ()),
            GameAction::Restart => self.restart(),
            GameAction::Quit => {
                self.quit();
                Ok(())
            }
        };

        if let Err(e) = result {
            log::error!("SESSION: {:?} failed: {}", action, e);
        }
    }

    /// Pauses the engine and the clock together.
    pub fn pause(&mut self) {
        if self.engine.pause(self.clock.now()) {
            self.clock.pause();
        }
    }

    /// Resumes from the frozen clock position.
    pub fn resume(&mut self) -> Result<(), GameError> {
        if self.engine.resume() {
            self.clock.play(self.clock.now() / 1000.0)?;
        }
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), GameError> {
        if self.engine.phase() == Phase::Paused {
            self.resume()
        } else {
            self.pause();
            Ok(())
        }
    }

    /// Jumps to just before the first note. Returns false when no skip is offered.
    pub fn skip_intro(&mut self) -> Result<bool, GameError> {
        if !self.engine.can_skip() {
            return Ok(false);
        }
        let target = self.engine.skip_target_seconds();
        self.clock.play(target)?;
        log::info!("SESSION: Skipped intro to {:.3}s", target);
        Ok(true)
    }

    /// Throws the run away and plays again from the pre-roll.
    pub fn restart(&mut self) -> Result<(), GameError> {
        if self.closed {
            return Ok(());
        }
        let modifiers = self.settings.modifiers.clone();
        self.mapper = LaneMapper::for_session(self.chart.lane_count(), &modifiers, &mut self.rng);
        self.engine = GameEngine::new(Arc::clone(&self.chart), modifiers);
        self.input.reset();
        self.summary_sent = false;
        self.clock.play(START_OFFSET_SECONDS)?;
        log::info!("SESSION: Restart");
        Ok(())
    }

    fn restart_or_log(&mut self) {
        if let Err(e) = self.restart() {
            log::error!("SESSION: Restart failed: {}", e);
        }
    }

    /// Ends the session. Returns the aborted summary, or `None` when a
    /// summary was already emitted.
    pub fn quit(&mut self) -> Option<ScoreSummary> {
        if self.closed {
            return None;
        }
        self.closed = true;
        self.clock.stop();
        log::info!("SESSION: Quit at {:.0}ms", self.engine.now());

        if self.summary_sent {
            return None;
        }
        let summary = ScoreSummary::aborted(self.engine.hit_stats().clone());
        self.send_summary(summary.clone());
        Some(summary)
    }

    fn send_summary(&mut self, summary: ScoreSummary) {
        if self.summary_sent {
            return;
        }
        self.summary_sent = true;
        if self.bus.summary_tx.send(summary).is_err() {
            log::warn!("SESSION: Summary receiver is gone");
        }
    }

    pub fn key_down(&mut self, key: KeyCode) {
        if self.closed {
            return;
        }
        if let Some(action) = self.input.key_down(key, self.engine.can_skip(), Instant::now()) {
            self.apply(action, self.clock.now());
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        if self.closed {
            return;
        }
        if let Some(action) = self.input.key_up(key) {
            self.apply(action, self.clock.now());
        }
    }

    /// Tap at horizontal fraction `x` of the surface.
    pub fn touch(&mut self, x: f64) {
        if self.closed {
            return;
        }
        if let Some(GameAction::Hit { lane }) = self.input.touch(x) {
            let now = self.clock.now();
            self.apply(GameAction::Hit { lane }, now);
            self.apply(GameAction::Release { lane }, now);
        }
    }

    pub fn snapshot(&self) -> GameplaySnapshot {
        let mut snapshot = self.engine.create_snapshot();
        snapshot.restart_progress = self.input.restart_hold().progress(Instant::now());
        snapshot
    }

    /// Draws the last updated frame.
    pub fn render(&mut self, renderer: &Renderer, surface: &mut dyn Surface) {
        let hud = self.snapshot();
        let now_ms = self.engine.now();
        let (chart, note_states, held, popups) = self.engine.split_for_render();
        let frame = Frame {
            now_ms,
            chart,
            note_states,
            held,
            mapper: &self.mapper,
            hud: &hud,
        };
        renderer.render(&frame, popups, surface);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.clock.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::DeviceClock;
    use crate::models::engine::Note;
    use crate::models::modifiers::Modifiers;
    use crate::models::stats::Judgement;
    use crate::render::{DrawCommand, DrawList};
    use crate::state::game::NoteState;

    struct Harness {
        session: Session,
        device: DeviceClock,
        bus: SystemBus,
    }

    impl Harness {
        fn new(notes: Vec<Note>, modifiers: Modifiers) -> Self {
            let device = DeviceClock::manual();
            let mut clock = AudioClock::silent(device.clone());
            clock.load(Arc::from(vec![0u8; 64])).unwrap();

            let mut settings = SettingsState::default();
            settings.modifiers = modifiers;
            let bus = SystemBus::new();
            let chart = Arc::new(Chart::new(4, notes).unwrap());
            let session = Session::start_seeded(chart, settings, clock, bus.clone(), 7).unwrap();
            Self { session, device, bus }
        }

        /// Advances the device clock and runs one frame.
        fn step(&mut self, ms: f64) -> Transition {
            self.device.advance_ms(ms);
            self.session.update()
        }
    }

    #[test]
    fn start_requires_ready_clock() {
        let clock = AudioClock::silent(DeviceClock::manual());
        let chart = Arc::new(Chart::new(4, vec![Note::tap(1000.0, 0)]).unwrap());
        let result = Session::start(chart, SettingsState::default(), clock, SystemBus::new());
        assert!(matches!(result, Err(GameError::NotReady)));
    }

    #[test]
    fn starts_with_two_second_pre_roll() {
        let h = Harness::new(vec![Note::tap(1000.0, 0)], Modifiers::default());
        assert_eq!(h.session.clock().now(), -2000.0);
        assert!(h.session.clock().is_playing());
    }

    #[test]
    fn scenario_a_key_press_on_time() {
        let mut h = Harness::new(vec![Note::tap(1000.0, 2)], Modifiers::default());
        h.step(2990.0);
        h.device.advance_ms(10.0);
        h.session.key_down(KeyCode::KeyJ);
        h.session.update();

        let engine = h.session.engine();
        assert_eq!(engine.note_states()[0], NoteState::Hit(Judgement::Marvelous));
        assert_eq!(engine.score(), 320);
        assert_eq!(engine.combo(), 1);
    }

    #[test]
    fn scenario_b_late_press_misses() {
        let mut h = Harness::new(vec![Note::tap(1000.0, 2)], Modifiers::default());
        h.step(3140.0);
        h.device.advance_ms(20.0);
        h.session.key_down(KeyCode::KeyJ);
        h.session.update();

        let engine = h.session.engine();
        assert_eq!(engine.note_states()[0], NoteState::Missed);
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.health(), 80.0);
    }

    #[test]
    fn scenario_d_auto_play_summary_sent_once() {
        let notes = vec![Note::tap(1000.0, 0), Note::hold(1500.0, 1, 500.0)];
        let mods = Modifiers {
            auto_play: true,
            ..Default::default()
        };
        let mut h = Harness::new(notes, mods);

        let mut finished = false;
        for _ in 0..2000 {
            if h.step(5.0) == Transition::Finished {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(h.session.engine().accuracy(), 100.0);

        let summary = h.bus.summary_rx.try_recv().unwrap();
        assert!(summary.completed);
        assert_eq!(summary.score, 320 + 320 * 2);
        assert_eq!(summary.max_combo, 2);

        h.step(5.0);
        assert_eq!(h.session.quit(), None);
        assert!(h.bus.summary_rx.try_recv().is_err());
    }

    #[test]
    fn keys_are_ignored_during_auto_play() {
        let mods = Modifiers {
            auto_play: true,
            ..Default::default()
        };
        let mut h = Harness::new(vec![Note::tap(1000.0, 0)], mods);
        h.step(2900.0);
        h.session.key_down(KeyCode::KeyD);
        h.session.update();
        assert_eq!(h.session.engine().note_states()[0], NoteState::Pending);

        h.step(100.0);
        assert_eq!(
            h.session.engine().note_states()[0],
            NoteState::Hit(Judgement::Marvelous)
        );
        assert_eq!(h.session.engine().accuracy(), 100.0);
    }

    #[test]
    fn each_finished_run_sends_its_summary() {
        let mods = Modifiers {
            auto_play: true,
            ..Default::default()
        };
        let mut h = Harness::new(vec![Note::tap(1000.0, 0)], mods);

        for run in 0..2 {
            let mut finished = false;
            for _ in 0..2000 {
                if h.step(5.0) == Transition::Finished {
                    finished = true;
                    break;
                }
            }
            assert!(finished, "run {} never finished", run);
            let summary = h.bus.summary_rx.try_recv().unwrap();
            assert!(summary.completed);
            assert_eq!(summary.score, 320);
            h.session.restart().unwrap();
        }
        assert!(h.bus.summary_rx.try_recv().is_err());
    }

    #[test]
    fn scenario_e_mirror_flips_input_and_drawing() {
        let mods = Modifiers {
            mirror: true,
            ..Default::default()
        };
        let mut h = Harness::new(vec![Note::tap(1000.0, 3), Note::tap(1100.0, 0)], mods);
        h.step(2500.0);

        let renderer = Renderer::new(h.session.settings(), h.session.chart(), None);
        let mut list = DrawList::new(1280.0, 720.0);
        h.session.render(&renderer, &mut list);
        let layout = renderer.layout(1280.0, 720.0, 4);
        let note_xs: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Shape { rect, outline: false, .. } => Some(rect.center().0),
                _ => None,
            })
            .collect();
        // Logical 3 draws in lane 0 and logical 0 in lane 3.
        assert_eq!(note_xs, vec![layout.lane_center(0), layout.lane_center(3)]);

        h.device.advance_ms(500.0);
        h.session.key_down(KeyCode::KeyD);
        h.session.update();
        assert_eq!(
            h.session.engine().note_states()[0],
            NoteState::Hit(Judgement::Marvelous)
        );
    }

    #[test]
    fn quit_sends_aborted_summary_once() {
        let mut h = Harness::new(vec![Note::tap(1000.0, 0), Note::tap(5000.0, 1)], Modifiers::default());
        h.step(3000.0);
        h.session.key_down(KeyCode::KeyD);
        h.step(1.0);

        let summary = h.session.quit().unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.hit_counts.marvelous, 1);
        assert!(!summary.completed);
        assert_eq!(h.bus.summary_rx.try_recv().unwrap(), summary);

        assert_eq!(h.session.quit(), None);
        assert!(h.bus.summary_rx.try_recv().is_err());
        assert!(!h.session.clock().is_playing());
        assert_eq!(h.step(10_000.0), Transition::None);
    }

    #[test]
    fn pause_freezes_clock_and_engine() {
        let mut h = Harness::new(vec![Note::tap(1000.0, 0)], Modifiers::default());
        h.step(2500.0);
        h.session.pause();
        h.session.pause();
        h.step(10_000.0);
        assert_eq!(h.session.engine().phase(), Phase::Paused);
        assert_eq!(h.session.engine().note_states()[0], NoteState::Pending);
        assert_eq!(h.session.clock().now(), 500.0);

        h.session.resume().unwrap();
        h.step(100.0);
        assert!((h.session.engine().now() - 600.0).abs() < 1e-6);
        assert_eq!(h.session.engine().phase(), Phase::Playing);
    }

    #[test]
    fn skip_key_jumps_to_pre_roll() {
        let mut h = Harness::new(vec![Note::tap(10_000.0, 0)], Modifiers::default());
        h.step(1000.0);
        h.session.key_down(KeyCode::Space);
        assert!((h.session.clock().now() - 7000.0).abs() < 1e-6);
        h.step(0.0);
        assert_eq!(h.session.engine().phase(), Phase::Playing);
        assert!(!h.session.skip_intro().unwrap());
    }

    #[test]
    fn perfect_mod_restarts_without_summary() {
        let mods = Modifiers {
            perfect: true,
            ..Default::default()
        };
        let mut h = Harness::new(vec![Note::tap(1000.0, 0), Note::tap(3000.0, 1)], mods);
        h.device.advance_ms(3060.0);
        h.session.key_down(KeyCode::KeyD);
        assert_eq!(h.session.update(), Transition::Restart);

        assert!((h.session.clock().now() + 2000.0).abs() < 1e-6);
        assert_eq!(h.session.engine().processed_count(), 0);
        assert_eq!(h.session.engine().score(), 0);
        assert!(h.bus.summary_rx.try_recv().is_err());
    }

    #[test]
    fn host_actions_are_stamped_with_frame_time() {
        let mut h = Harness::new(vec![Note::tap(1000.0, 1)], Modifiers::default());
        h.step(2000.0);
        h.device.advance_ms(1000.0);
        h.bus.action_tx.send(GameAction::Hit { lane: 1 }).unwrap();
        h.session.update();
        assert_eq!(
            h.session.engine().note_states()[0],
            NoteState::Hit(Judgement::Marvelous)
        );

        let snapshot = h.bus.render_rx.try_recv().unwrap();
        assert_eq!(snapshot.phase, Phase::Playing);
    }

    #[test]
    fn touch_hits_the_lane_under_the_finger() {
        let mut h = Harness::new(vec![Note::tap(1000.0, 2)], Modifiers::default());
        h.step(3000.0);
        h.session.touch(0.6);
        h.session.update();
        assert_eq!(h.session.engine().processed_count(), 1);
        assert!(!h.session.engine().held_columns()[2]);
    }
}
