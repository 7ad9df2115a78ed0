//! Timing and layout constants shared by the engine and the renderer.

/// Width of the osu! playfield grid used to derive columns from x positions.
pub const OSU_WIDTH: f64 = 512.0;

/// Clock position (seconds) at which a session starts: a two second countdown.
pub const START_OFFSET_SECONDS: f64 = -2.0;

/// Intro is considered running while the clock is this far before the first note.
pub const LEAD_IN_MS: f64 = 3000.0;

/// Skipping the intro lands this far before the first note.
pub const SKIP_PRE_ROLL_MS: f64 = 3000.0;

/// Skip is only offered when the first note is later than this.
pub const SKIP_MIN_FIRST_NOTE_MS: f64 = 5000.0;

/// Time after the last note's end before the run is finished.
pub const FINISH_GRACE_MS: f64 = 2000.0;

/// Auto-play resolves notes this close to (or behind) the clock.
pub const AUTO_PLAY_EPSILON_MS: f64 = 10.0;

/// Sliders carry no length in mania charts and are played as fixed holds.
pub const SLIDER_HOLD_MS: f64 = 500.0;

/// Starting (and maximum) health.
pub const MAX_HEALTH: f64 = 100.0;

/// Fixed part of the health lost on a miss (the drain rate is added on top).
pub const MISS_HEALTH_PENALTY: f64 = 15.0;

/// Judgement popups alive at once.
pub const MAX_POPUPS: usize = 5;

/// Lifetime of a judgement popup.
pub const POPUP_LIFETIME_MS: f64 = 400.0;

/// Hold duration of the restart key before a restart triggers.
pub const RESTART_HOLD_MS: u64 = 1000;

/// Surfaces narrower than this use full-width lanes.
pub const NARROW_SURFACE_WIDTH: f32 = 768.0;

/// Distance of the hit line from the bottom edge without a custom skin.
pub const HIT_LINE_BOTTOM_MARGIN: f32 = 120.0;

/// Reference height of custom skin coordinates.
pub const SKIN_REFERENCE_HEIGHT: f32 = 480.0;

/// Notes are culled this many pixels outside the surface.
pub const CULL_MARGIN: f32 = 200.0;
