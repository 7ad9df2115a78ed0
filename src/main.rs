//! Headless runner: plays a chart on auto-play and prints the score summary.

use rvsrg_runtime::GameError;
use rvsrg_runtime::logic::{AudioClock, AudioOutput, DeviceClock, RodioOutput, SilentOutput};
use rvsrg_runtime::models::engine::{PixelSystem, load_chart};
use rvsrg_runtime::models::settings::SettingsState;
use rvsrg_runtime::models::skin::{SkinBundle, custom_skin_name};
use rvsrg_runtime::render::{DrawList, Renderer, build_instances};
use rvsrg_runtime::state::{Session, Transition};
use rvsrg_runtime::system::bus::SystemBus;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(5);
const SURFACE: (u32, u32) = (1280, 720);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("MAIN: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), GameError> {
    let mut args = std::env::args().skip(1);
    let chart_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| GameError::Io("usage: rvsrg-runtime <chart.osu> [settings.toml]".into()))?;
    let mut settings = args
        .next()
        .map(|p| SettingsState::load(Path::new(&p)))
        .unwrap_or_default();
    // No keyboard is attached.
    settings.modifiers.auto_play = true;

    let (audio_path, chart) = load_chart(&chart_path)?;
    let audio: Arc<[u8]> = Arc::from(std::fs::read(&audio_path)?);

    let output: Box<dyn AudioOutput> = match RodioOutput::spawn() {
        Ok(output) if output.has_device() => Box::new(output),
        Ok(_) => Box::new(SilentOutput::new(DeviceClock::realtime())),
        Err(e) => {
            log::warn!("AUDIO: Cannot start audio thread ({}), playing silently", e);
            Box::new(SilentOutput::new(DeviceClock::realtime()))
        }
    };
    let mut clock = AudioClock::new(output);
    clock.load(audio)?;

    let bundle = custom_skin_name(&settings.active_skin).and_then(|name| {
        SkinBundle::load_dir(&Path::new("skins").join(name))
            .map_err(|e| log::warn!("SKIN: Cannot load '{}': {}", name, e))
            .ok()
    });

    let chart = Arc::new(chart);
    let renderer = Renderer::new(&settings, &chart, bundle);
    let bus = SystemBus::new();
    let mut session = Session::start(chart, settings, clock, bus.clone())?;

    let mut surface = DrawList::new(SURFACE.0 as f32, SURFACE.1 as f32);
    let pixels = PixelSystem::new(SURFACE.0, SURFACE.1);

    loop {
        let transition = session.update();

        surface.clear();
        session.render(&renderer, &mut surface);
        let quads = build_instances(&surface, &pixels);
        while bus.render_rx.try_recv().is_ok() {}

        if matches!(transition, Transition::Finished | Transition::Failed) {
            log::debug!("MAIN: Last frame batched {} quads", quads.len());
            break;
        }
        thread::sleep(TICK);
    }

    let summary = bus
        .summary_rx
        .try_recv()
        .ok()
        .or_else(|| session.quit())
        .ok_or_else(|| GameError::Io("session ended without a summary".into()))?;

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| GameError::Io(format!("Failed to serialize summary: {}", e)))?;
    println!("{}", json);
    Ok(())
}
