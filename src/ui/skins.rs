//! Per-ball image skins
//!
//! Each ball's `images/{name}.png` is shown as an `<img>` clipped to a circle
//! and moved with the ball every frame. Until the image has loaded, or if it
//! fails to, the renderer keeps drawing the plain disc.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlImageElement};

use super::{SkinStatus, Viewport, skin_path};
use crate::sim::SimState;

struct Skin {
    img: HtmlImageElement,
    status: Rc<Cell<SkinStatus>>,
}

/// Image overlays for every ball (empty in shape-only mode)
#[derive(Default)]
pub struct BallSkins {
    skins: Vec<Skin>,
}

impl BallSkins {
    /// Start loading one skin per ball into `root`
    pub fn load(document: &Document, root: &Element, state: &SimState) -> Result<Self, JsValue> {
        let mut skins = Vec::with_capacity(state.balls.len());

        for ball in &state.balls {
            let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
            img.set_attribute("class", "ball-skin hidden")?;
            let status = Rc::new(Cell::new(SkinStatus::Loading));

            {
                let status = status.clone();
                let name = ball.name.clone();
                let onload = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    log::info!("Loaded skin for {}", name);
                    status.set(SkinStatus::Ready);
                });
                img.set_onload(Some(onload.as_ref().unchecked_ref()));
                onload.forget();
            }
            {
                let status = status.clone();
                let path = skin_path(&ball.name);
                let onerror = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    log::warn!("Could not load {}, drawing plain ball", path);
                    status.set(SkinStatus::Failed);
                });
                img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
                onerror.forget();
            }

            img.set_src(&skin_path(&ball.name));
            root.append_child(&img)?;
            skins.push(Skin { img, status });
        }

        Ok(Self { skins })
    }

    /// Which balls are currently covered by a loaded image
    pub fn skinned(&self) -> Vec<bool> {
        self.skins
            .iter()
            .map(|s| s.status.get() == SkinStatus::Ready)
            .collect()
    }

    /// Move each ready skin onto its ball; hide everything once the run is over
    pub fn update(&self, state: &SimState, viewport: &Viewport) {
        let diameter = 2.0 * state.arena.ball_radius * viewport.scale;
        for (skin, ball) in self.skins.iter().zip(&state.balls) {
            if skin.status.get() != SkinStatus::Ready || state.is_over() {
                let _ = skin.img.set_attribute("class", "ball-skin hidden");
                continue;
            }
            let center = viewport.to_screen(ball.pos);
            let style = format!(
                "position:absolute;left:{:.1}px;top:{:.1}px;width:{:.1}px;height:{:.1}px;\
                 border-radius:50%;object-fit:cover;pointer-events:none;",
                center.x - diameter / 2.0,
                center.y - diameter / 2.0,
                diameter,
                diameter
            );
            let _ = skin.img.set_attribute("class", "ball-skin");
            let _ = skin.img.set_attribute("style", &style);
        }
    }
}
