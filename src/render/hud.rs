//! Judgement popups and HUD overlays.

use super::draw::{DrawCommand, Rect, Surface, TextAlign};
use super::shapes::with_alpha;
use super::{Frame, Renderer};
use crate::models::engine::PlayfieldLayout;
use crate::models::settings::JudgementSet;
use crate::shared::snapshot::GameplaySnapshot;
use crate::state::game::{Phase, PopupQueue};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const TRACK: [f32; 4] = [1.0, 1.0, 1.0, 0.2];
const HEALTH_HIGH: [f32; 4] = [0.29, 0.87, 0.5, 1.0];
const HEALTH_MID: [f32; 4] = [0.98, 0.75, 0.14, 1.0];
const HEALTH_LOW: [f32; 4] = [0.94, 0.27, 0.27, 1.0];

/// Popup rise over its lifetime, in pixels.
const POPUP_RISE: f32 = 25.0;

pub fn health_color(health: f64) -> [f32; 4] {
    if health > 50.0 {
        HEALTH_HIGH
    } else if health > 20.0 {
        HEALTH_MID
    } else {
        HEALTH_LOW
    }
}

fn text_size(set: JudgementSet) -> f32 {
    match set {
        JudgementSet::Default => 36.0,
        JudgementSet::Flat => 30.0,
        JudgementSet::Neon => 40.0,
    }
}

fn text(surface: &mut dyn Surface, text: String, x: f32, y: f32, size: f32, color: [f32; 4], align: TextAlign) {
    surface.draw(DrawCommand::Text {
        text,
        x,
        y,
        size,
        color,
        align,
    });
}

impl Renderer {
    pub(super) fn draw_popups(
        &self,
        layout: &PlayfieldLayout,
        frame: &Frame<'_>,
        popups: &PopupQueue,
        surface: &mut dyn Surface,
    ) {
        let height = layout.surface_height;

        for popup in popups.iter() {
            let Some(visual) = frame.mapper.to_visual(popup.column) else {
                continue;
            };
            let alpha = popup.alpha(frame.now_ms);
            let x = layout.lane_center(visual);

            if let Some((key, img)) = self.skin.judgement_image(popup.judgement) {
                let (w, h) = (img.width as f32, img.height as f32);
                surface.draw(DrawCommand::Image {
                    key,
                    rect: Rect::centered(x, height * 0.4, w, h),
                    alpha,
                });
                continue;
            }

            let set = self.skin.judgement_set;
            let size = text_size(set);
            let y = height * 0.6 - (1.0 - alpha) * POPUP_RISE;
            let color = with_alpha(self.skin.judgement_colors.get(popup.judgement), alpha);
            if set == JudgementSet::Neon {
                // Outline pass.
                text(surface, popup.judgement.label().to_string(), x, y, size + 2.0, with_alpha(WHITE, alpha), TextAlign::Center);
            }
            text(surface, popup.judgement.label().to_string(), x, y, size, color, TextAlign::Center);
        }
    }

    pub(super) fn draw_hud(&self, layout: &PlayfieldLayout, hud: &GameplaySnapshot, surface: &mut dyn Surface) {
        let (w, h) = (layout.surface_width, layout.surface_height);

        let bar = Rect::new(w * 0.3, 20.0, w * 0.4, 10.0);
        surface.draw(DrawCommand::Rect { rect: bar, color: TRACK });
        let fill = (hud.health / 100.0).clamp(0.0, 1.0) as f32;
        surface.draw(DrawCommand::Rect {
            rect: Rect::new(bar.x, bar.y, bar.w * fill, bar.h),
            color: health_color(hud.health),
        });

        let (px, py) = (w - 40.0, h - 40.0);
        surface.draw(DrawCommand::Arc {
            cx: px,
            cy: py,
            radius: 30.0,
            progress: 1.0,
            color: [1.0, 1.0, 1.0, 0.1],
        });
        surface.draw(DrawCommand::Arc {
            cx: px,
            cy: py,
            radius: 30.0,
            progress: hud.progress as f32,
            color: HEALTH_HIGH,
        });

        text(surface, hud.score.to_string(), 16.0, 16.0, 36.0, WHITE, TextAlign::Left);
        text(surface, format!("{:.2}%", hud.accuracy), 16.0, 58.0, 18.0, [1.0, 1.0, 1.0, 0.6], TextAlign::Left);
        text(surface, format!("{}x", hud.combo), 16.0, h - 72.0, 56.0, WHITE, TextAlign::Left);

        if hud.can_skip {
            text(surface, self.skip_hint.clone(), w - 32.0, h - 128.0, 20.0, WHITE, TextAlign::Right);
        }

        if hud.restart_progress > 0.0 {
            text(surface, "RESTARTING...".to_string(), w / 2.0, h / 2.0 - 24.0, 24.0, HEALTH_LOW, TextAlign::Center);
            let track = Rect::centered(w / 2.0, h / 2.0, 192.0, 4.0);
            surface.draw(DrawCommand::Rect { rect: track, color: [1.0, 1.0, 1.0, 0.1] });
            surface.draw(DrawCommand::Rect {
                rect: Rect::new(track.x, track.y, track.w * hud.restart_progress.clamp(0.0, 1.0), track.h),
                color: HEALTH_LOW,
            });
        }

        let overlay = match hud.phase {
            Phase::Paused => Some(("PAUSED", [0.0, 0.0, 0.0, 0.8], [0.93, 0.28, 0.6, 1.0])),
            Phase::Failed => Some(("FAILED", [0.5, 0.11, 0.11, 0.8], WHITE)),
            _ => None,
        };
        if let Some((label, backdrop, color)) = overlay {
            surface.draw(DrawCommand::Rect {
                rect: Rect::new(0.0, 0.0, w, h),
                color: backdrop,
            });
            text(surface, label.to_string(), w / 2.0, h / 2.0, 60.0, color, TextAlign::Center);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{draw, setup};
    use super::*;
    use crate::models::engine::Note;
    use crate::state::traits::Update;

    #[test]
    fn health_bar_changes_color() {
        assert_eq!(health_color(80.0), HEALTH_HIGH);
        assert_eq!(health_color(50.0), HEALTH_MID);
        assert_eq!(health_color(20.0), HEALTH_LOW);
    }

    #[test]
    fn popup_text_rises_and_fades() {
        let (renderer, mut engine, mapper) = setup(vec![Note::tap(1000.0, 1), Note::tap(9000.0, 0)]);
        engine.update(1000.0);
        engine.queue_press(1, 1000.0);
        engine.update(1000.0);
        engine.update(1200.0);

        let list = draw(&renderer, &mut engine, &mapper);
        let popup = list.commands().iter().find_map(|c| match c {
            DrawCommand::Text { text, x, y, color, .. } if text == "MARVELOUS" => Some((*x, *y, color[3])),
            _ => None,
        });
        let (x, y, alpha) = popup.unwrap();
        let layout = renderer.layout(1280.0, 720.0, 4);
        assert_eq!(x, layout.lane_center(1));
        assert!((alpha - 0.5).abs() < 1e-6);
        assert!((y - (720.0 * 0.6 - 12.5)).abs() < 1e-3);
    }

    #[test]
    fn overlays_follow_phase() {
        let (renderer, mut engine, mapper) = setup(vec![Note::tap(1000.0, 0)]);
        engine.update(500.0);
        engine.pause(500.0);
        let list = draw(&renderer, &mut engine, &mapper);
        assert!(list.texts().any(|t| t == "PAUSED"));

        engine.resume();
        let list = draw(&renderer, &mut engine, &mapper);
        assert!(!list.texts().any(|t| t == "PAUSED"));
    }

    #[test]
    fn skip_prompt_only_during_long_intro() {
        let (renderer, mut engine, mapper) = setup(vec![Note::tap(10_000.0, 0)]);
        engine.update(0.0);
        let list = draw(&renderer, &mut engine, &mapper);
        assert!(list.texts().any(|t| t == "SPACE to Skip Intro"));

        engine.update(7500.0);
        let list = draw(&renderer, &mut engine, &mapper);
        assert!(!list.texts().any(|t| t.contains("Skip")));
    }
}
