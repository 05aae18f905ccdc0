//! DOM text overlay
//!
//! Scoreboard across the top, a live score above each ball, and the winner
//! banner once the run is over.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::{SCOREBOARD_Y, Viewport, score_line, scoreboard_x, winner_banner};
use crate::sim::SimState;

/// Nominal text height in simulation pixels
const FONT_SIZE: f32 = 24.0;
/// Gap between a ball's top edge and its score label
const LABEL_LIFT: f32 = 6.0;
/// Vertical position of the optional title
const TITLE_Y: f32 = 60.0;

pub struct Hud {
    scoreboard: Vec<Element>,
    labels: Vec<Element>,
    title: Option<Element>,
    banner: Element,
    banner_shown: bool,
    /// Logical window width, for the scoreboard columns
    arena_width: f32,
}

fn text_element(document: &Document, root: &Element, class: &str) -> Result<Element, JsValue> {
    let el = document.create_element("div")?;
    el.set_attribute("class", class)?;
    root.append_child(&el)?;
    Ok(el)
}

/// Absolutely positioned, centered text at `pos` (CSS pixels)
fn place(el: &Element, pos: glam::Vec2, font_px: f32, color: &str, anchor_bottom: bool) {
    let translate = if anchor_bottom { "-50%, -100%" } else { "-50%, -50%" };
    let style = format!(
        "position:absolute;left:{:.1}px;top:{:.1}px;transform:translate({});\
         font-size:{:.1}px;color:{};white-space:nowrap;pointer-events:none;",
        pos.x, pos.y, translate, font_px, color
    );
    let _ = el.set_attribute("style", &style);
}

impl Hud {
    pub fn new(
        document: &Document,
        root: &Element,
        state: &SimState,
        question: &str,
        arena_width: f32,
    ) -> Result<Self, JsValue> {
        let mut scoreboard = Vec::with_capacity(state.balls.len());
        let mut labels = Vec::with_capacity(state.balls.len());
        for _ in &state.balls {
            scoreboard.push(text_element(document, root, "hud-score")?);
            labels.push(text_element(document, root, "hud-ball-score")?);
        }

        let title = if question.is_empty() {
            None
        } else {
            let el = text_element(document, root, "hud-title")?;
            el.set_text_content(Some(question));
            Some(el)
        };

        let banner = text_element(document, root, "hud-banner hidden")?;

        Ok(Self {
            scoreboard,
            labels,
            title,
            banner,
            banner_shown: false,
            arena_width,
        })
    }

    pub fn update(&mut self, state: &SimState, viewport: &Viewport) {
        let font_px = FONT_SIZE * viewport.scale;

        if let Some(winner) = state.winner() {
            if !self.banner_shown {
                for el in self.scoreboard.iter().chain(&self.labels).chain(&self.title) {
                    let _ = el.set_attribute("class", "hidden");
                }
                self.banner.set_text_content(Some(&winner_banner(winner)));
                let _ = self.banner.set_attribute("class", "hud-banner");
                let center = viewport.to_screen(state.arena.center);
                place(&self.banner, center, font_px * 1.5, &winner.color.to_css(), false);
                self.banner_shown = true;
            }
            return;
        }

        let count = state.balls.len();
        for (i, ball) in state.balls.iter().enumerate() {
            let color = ball.color.to_css();
            let line = score_line(ball);

            if let Some(el) = self.scoreboard.get(i) {
                if el.text_content().as_deref() != Some(line.as_str()) {
                    el.set_text_content(Some(&line));
                }
                let pos = glam::Vec2::new(scoreboard_x(i, count, self.arena_width), SCOREBOARD_Y);
                place(el, viewport.to_screen(pos), font_px, &color, false);
            }

            if let Some(el) = self.labels.get(i) {
                el.set_text_content(Some(&ball.score().to_string()));
                let above = ball.pos - glam::Vec2::new(0.0, state.arena.ball_radius + LABEL_LIFT);
                place(el, viewport.to_screen(above), font_px, "white", true);
            }
        }

        if let Some(title) = &self.title {
            let pos = glam::Vec2::new(self.arena_width / 2.0, TITLE_Y);
            place(title, viewport.to_screen(pos), font_px, "white", false);
        }
    }
}
