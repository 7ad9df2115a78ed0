//! Playfield layers: backdrop, lane separators, receptors and notes.

use super::draw::{DrawCommand, Rect, Surface};
use super::shapes::{BODY_ALPHA, hold_body, note_head, receptor, with_alpha};
use super::{Frame, Renderer};
use crate::models::engine::{CULL_MARGIN, PlayfieldLayout};
use crate::models::settings::NoteShape;
use crate::state::game::NoteState;

const BACKDROP: [f32; 4] = [0.04, 0.04, 0.04, 0.8];
const SEPARATOR: [f32; 4] = [1.0, 1.0, 1.0, 0.1];
const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

impl Renderer {
    pub(super) fn draw_backdrop(&self, layout: &PlayfieldLayout, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Rect {
            rect: Rect::new(layout.start_x, 0.0, layout.total_width(), layout.surface_height),
            color: BACKDROP,
        });

        if self.skin.has_bundle() {
            return;
        }
        for i in 0..=layout.lane_count {
            surface.draw(DrawCommand::Rect {
                rect: Rect::new(layout.lane_x(i) - 0.5, 0.0, 1.0, layout.surface_height),
                color: SEPARATOR,
            });
        }
    }

    pub(super) fn draw_receptors(&self, layout: &PlayfieldLayout, frame: &Frame<'_>, surface: &mut dyn Surface) {
        let lanes = layout.lane_count;
        let hit_y = layout.hit_line_y;

        if !self.skin.has_bundle() && self.skin.note_shape == NoteShape::Line {
            surface.draw(DrawCommand::Rect {
                rect: Rect::new(layout.start_x, hit_y - 2.0, layout.total_width(), 4.0),
                color: HIGHLIGHT,
            });
            return;
        }

        for visual in 0..lanes {
            let Some(logical) = frame.mapper.to_logical(visual) else {
                continue;
            };
            let pressed = frame.held.get(logical).copied().unwrap_or(false);
            let x = layout.lane_x(visual);
            let cx = layout.lane_center(visual);

            if let Some((key, img)) = self.skin.receptor_image(visual, lanes, pressed) {
                let h = img.height_for_width(layout.lane_width);
                surface.draw(DrawCommand::Image {
                    key,
                    rect: Rect::new(x, hit_y - h / 2.0, layout.lane_width, h),
                    alpha: 1.0,
                });
                continue;
            }

            let (shape, color) = if self.skin.has_bundle() {
                (NoteShape::Bar, self.skin.lane_color(visual))
            } else {
                (self.skin.note_shape, self.skin.lane_color(logical))
            };
            surface.draw(receptor(shape, cx, hit_y, layout.lane_width, color, pressed));
            if pressed && self.skin.has_bundle() {
                surface.draw(DrawCommand::Rect {
                    rect: Rect::new(x, hit_y - 10.0, layout.lane_width, 20.0),
                    color: HIGHLIGHT,
                });
            }
        }
    }

    pub(super) fn draw_notes(&self, layout: &PlayfieldLayout, frame: &Frame<'_>, surface: &mut dyn Surface) {
        let now = frame.now_ms;
        let lanes = layout.lane_count;

        for (note, state) in frame.chart.notes().iter().zip(frame.note_states) {
            let head_y = layout.time_to_y(note.time, now);
            // Later heads only sit higher up.
            if head_y < -CULL_MARGIN {
                break;
            }

            let hit = match state {
                NoteState::Missed => continue,
                NoteState::Hit(_) if !note.is_hold() || now > note.end_time => continue,
                NoteState::Hit(_) => true,
                NoteState::Pending => false,
            };

            let tail_y = layout.time_to_y(note.end_time, now);
            if tail_y > layout.surface_height + CULL_MARGIN {
                continue;
            }

            let Some(visual) = frame.mapper.to_visual(note.column) else {
                continue;
            };
            let x = layout.lane_x(visual);
            let cx = layout.lane_center(visual);
            let color = self.skin.lane_color(note.column);
            let strategy = self.skin.note_strategy(visual, lanes, layout.lane_width);

            if note.is_hold() {
                let start_y = if hit { layout.hit_line_y } else { head_y };
                if let Some(body) = hold_body(cx, layout.lane_width, start_y, tail_y) {
                    surface.draw(DrawCommand::Rect {
                        rect: body,
                        color: with_alpha(color, BODY_ALPHA),
                    });
                    if !self.skin.has_bundle() {
                        surface.draw(DrawCommand::Frame {
                            rect: body,
                            color: HIGHLIGHT,
                            thickness: 2.0,
                        });
                    }
                }
            }

            if !hit {
                surface.draw(note_head(&strategy, x, layout.lane_width, head_y, color));
            }
            if note.is_hold() {
                surface.draw(note_head(&strategy, x, layout.lane_width, tail_y, color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{draw, setup};
    use crate::models::engine::Note;
    use crate::render::draw::DrawCommand;
    use crate::state::traits::Update;

    fn shapes(list: &crate::render::DrawList) -> usize {
        list.commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Shape { outline: false, .. }))
            .count()
    }

    #[test]
    fn pending_notes_are_drawn_and_hit_taps_vanish() {
        let (renderer, mut engine, mapper) = setup(vec![Note::tap(1000.0, 0), Note::tap(1200.0, 1)]);
        engine.update(900.0);
        assert_eq!(shapes(&draw(&renderer, &mut engine, &mapper)), 2);

        engine.queue_press(0, 1000.0);
        engine.update(1000.0);
        engine.queue_release(0, 1001.0);
        assert_eq!(shapes(&draw(&renderer, &mut engine, &mapper)), 1);
    }

    #[test]
    fn missed_notes_are_hidden() {
        let (renderer, mut engine, mapper) = setup(vec![Note::tap(1000.0, 0), Note::tap(5000.0, 1)]);
        engine.update(1200.0);
        assert_eq!(shapes(&draw(&renderer, &mut engine, &mapper)), 0);
    }

    #[test]
    fn held_long_note_keeps_a_shrinking_body() {
        let (renderer, mut engine, mapper) = setup(vec![Note::hold(1000.0, 2, 1000.0)]);
        engine.update(1000.0);
        engine.queue_press(2, 1000.0);
        engine.update(1000.0);

        let body_height = |list: &crate::render::DrawList| {
            list.commands().iter().find_map(|c| match c {
                DrawCommand::Rect { rect, color } if color[3] < 0.75 && (rect.w - 42.0).abs() < 1e-3 => Some(rect.h),
                _ => None,
            })
        };

        let early = body_height(&draw(&renderer, &mut engine, &mapper)).unwrap();
        engine.update(1500.0);
        let late = body_height(&draw(&renderer, &mut engine, &mapper)).unwrap();
        assert!(late < early);

        engine.update(2100.0);
        assert_eq!(body_height(&draw(&renderer, &mut engine, &mapper)), None);
    }
}
