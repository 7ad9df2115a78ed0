//! Renderer: projects one frame of run state onto a `Surface`.
//!
//! The renderer holds only per-session visual configuration. Each call to
//! `render` reads the frame it is given and never touches run state, apart
//! from pruning expired popups.

pub mod draw;
mod hud;
pub mod instances;
mod playfield;
pub mod shapes;

pub use draw::{DrawCommand, DrawList, Rect, Surface, TextAlign};
pub use instances::build_instances;

use crate::models::engine::{Chart, PlayfieldLayout, base_scroll_speed};
use crate::models::settings::SettingsState;
use crate::models::skin::{ResolvedSkin, SkinBundle};
use crate::pattern::LaneMapper;
use crate::shared::snapshot::GameplaySnapshot;
use crate::state::game::{NoteState, PopupQueue};

/// Borrowed view of one frame.
pub struct Frame<'a> {
    /// Clock time latched for this frame.
    pub now_ms: f64,
    pub chart: &'a Chart,
    pub note_states: &'a [NoteState],
    /// Held state per logical column.
    pub held: &'a [bool],
    pub mapper: &'a LaneMapper,
    pub hud: &'a GameplaySnapshot,
}

pub struct Renderer {
    skin: ResolvedSkin,
    lane_width: f32,
    base_speed: f64,
    background_dim: f32,
    background_file: Option<String>,
    skip_hint: String,
}

impl Renderer {
    pub fn new(settings: &SettingsState, chart: &Chart, bundle: Option<SkinBundle>) -> Self {
        let skin = ResolvedSkin::resolve(settings, chart.lane_count(), bundle);
        let base_speed = base_scroll_speed(
            settings.use_beatmap_scroll_speed,
            settings.scroll_speed,
            chart.scroll_reference_speed,
        );

        Self {
            skin,
            lane_width: settings.lane_width,
            base_speed,
            background_dim: settings.background_dim.clamp(0.0, 1.0),
            background_file: chart.background_file.clone(),
            skip_hint: format!("{} to Skip Intro", settings.keybinds.skip.to_uppercase()),
        }
    }

    pub fn skin(&self) -> &ResolvedSkin {
        &self.skin
    }

    pub fn layout(&self, width: f32, height: f32, lane_count: usize) -> PlayfieldLayout {
        PlayfieldLayout::new(
            width,
            height,
            lane_count,
            self.lane_width,
            self.skin.hit_position(),
            self.base_speed,
        )
    }

    /// Draws the frame back to front.
    pub fn render(&self, frame: &Frame<'_>, popups: &mut PopupQueue, surface: &mut dyn Surface) {
        let (width, height) = surface.viewport();
        let layout = self.layout(width, height, frame.chart.lane_count());

        surface.draw(DrawCommand::Background {
            file: self.background_file.clone(),
            dim: self.background_dim,
        });

        self.draw_backdrop(&layout, surface);
        self.draw_receptors(&layout, frame, surface);
        self.draw_notes(&layout, frame, surface);

        popups.prune(frame.now_ms);
        self.draw_popups(&layout, frame, popups, surface);

        self.draw_hud(&layout, frame.hud, surface);
    }
}
