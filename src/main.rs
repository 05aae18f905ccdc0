//! Ring Escape entry point
//!
//! The browser build renders and sounds the run; the native build runs it
//! headless and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, HtmlElement};

    use ring_escape::audio::web::WebAudioOutput;
    use ring_escape::audio::{CuePlayer, CueSource, NoteSequence};
    use ring_escape::consts::MAX_SUBSTEPS;
    use ring_escape::platform::FixedStep;
    use ring_escape::renderer::SdfRenderState;
    use ring_escape::sim::{SimState, step};
    use ring_escape::ui::Viewport;
    use ring_escape::ui::hud::Hud;
    use ring_escape::ui::skins::BallSkins;
    use ring_escape::{AssetError, RenderMode, SimConfig};

    /// Everything the frame loop touches
    struct Game {
        state: SimState,
        frame_limit: Option<u64>,
        render_state: SdfRenderState,
        stepper: FixedStep,
        last_time: f64,
        cues: CuePlayer<WebAudioOutput>,
        hud: Hud,
        skins: BallSkins,
        canvas: HtmlCanvasElement,
        arena_size: (f32, f32),
        quit: Rc<Cell<bool>>,
    }

    impl Game {
        /// Run the simulation steps owed since the last frame
        fn update(&mut self, dt: f32) {
            for _ in 0..self.stepper.advance(dt) {
                if !step(&mut self.state, &mut self.cues, self.frame_limit) {
                    break;
                }
            }
        }

        /// Keep the surface matched to the canvas, return the CSS-pixel viewport
        fn sync_canvas(&mut self) -> Viewport {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let client_w = self.canvas.client_width() as f32;
            let client_h = self.canvas.client_height() as f32;
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            if (width, height) != self.render_state.size {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.render_state.resize(width, height);
            }
            Viewport::fit(self.arena_size.0, self.arena_size.1, client_w, client_h)
        }

        fn render(&mut self, time: f64) {
            let skinned = self.skins.skinned();
            match self.render_state.render(&self.state, &skinned, time) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Fetch a static asset as raw bytes
    async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
        let fetch_err = |reason: String| AssetError::Fetch {
            path: path.to_string(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| fetch_err("no window".into()))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|e| fetch_err(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| fetch_err("not a Response".into()))?;
        if !response.ok() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }
        let buffer = response
            .array_buffer()
            .map_err(|e| fetch_err(format!("{:?}", e)))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| fetch_err(format!("{:?}", e)))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }

    async fn load_song(name: &str) -> NoteSequence {
        let path = format!("musics/{}.mid", name);
        match fetch_bytes(&path).await {
            Ok(bytes) => NoteSequence::from_smf_bytes_or_silent(&bytes, &path),
            Err(e) => {
                log::warn!("{}, notes disabled", e);
                NoteSequence::default()
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Ring Escape starting...");

        let config = SimConfig::load();
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let state = SimState::new(&config, seed);
        log::info!(
            "Run initialized with seed {}: {} balls, {} circles",
            seed,
            state.balls.len(),
            state.circles.len()
        );

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = SdfRenderState::new(
            surface,
            &adapter,
            width,
            height,
            [config.width, config.height],
        )
        .await
        .map_err(js_err)?;
        render_state.set_start_time(js_sys::Date::now());

        let source = match config.audio_mode {
            ring_escape::AudioMode::EffectClip => CueSource::EffectClip,
            ring_escape::AudioMode::MidiSequence => {
                CueSource::MidiSequence(load_song(&config.music).await)
            }
        };
        let cues = CuePlayer::new(source, WebAudioOutput::new());

        let hud_root = document.get_element_by_id("hud").ok_or("no #hud")?;
        let hud = Hud::new(&document, &hud_root, &state, &config.question, config.width)?;
        let skins = match config.render_mode {
            RenderMode::ImageBacked => BallSkins::load(&document, &hud_root, &state)?,
            RenderMode::ShapeOnly => BallSkins::default(),
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            state,
            frame_limit: config.frame_limit,
            render_state,
            stepper: FixedStep::new(config.frame_dt(), MAX_SUBSTEPS),
            last_time: 0.0,
            cues,
            hud,
            skins,
            canvas,
            arena_size: (config.width, config.height),
            quit: Rc::new(Cell::new(false)),
        }));

        setup_input_handlers(game.clone());

        request_animation_frame(game);

        log::info!("Ring Escape running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Escape quits; any key also unlocks audio
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let g = game.borrow();
                g.cues.output().resume();
                if event.key() == "Escape" && !g.quit.get() {
                    log::info!("Quit requested");
                    g.quit.set(true);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Browsers keep the AudioContext suspended until a gesture
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow().cues.output().resume();
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            if g.quit.get() {
                if let Some(winner) = g.state.winner() {
                    log::info!("Stopped; winner was {}", winner.name);
                }
                hide_canvas(&g.canvas);
                return;
            }

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            let viewport = g.sync_canvas();
            g.render(time);

            let g = &mut *g;
            g.hud.update(&g.state, &viewport);
            g.skins.update(&g.state, &viewport);
        }

        request_animation_frame(game);
    }

    fn hide_canvas(canvas: &HtmlCanvasElement) {
        let el: &HtmlElement = canvas;
        let _ = el.style().set_property("display", "none");
        if let Some(hud) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("hud"))
        {
            let _ = hud.set_attribute("class", "hidden");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ring_escape::audio::{CuePlayer, CueSource, LogOutput, NoteSequence};
    use ring_escape::platform::FrameClock;
    use ring_escape::sim::{SimState, run_to_end, step};
    use ring_escape::SimConfig;

    env_logger::init();
    log::info!("Ring Escape (native, headless) starting...");

    let config = SimConfig::load();
    let seed = config.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    });

    let mut state = SimState::new(&config, seed);
    log::info!(
        "Run initialized with seed {}: {} balls, {} circles",
        seed,
        state.balls.len(),
        state.circles.len()
    );

    let source = CueSource::for_mode(config.audio_mode, || {
        let path = std::path::PathBuf::from(format!("musics/{}.mid", config.music));
        NoteSequence::from_file(&path).unwrap_or_else(|e| {
            log::warn!("{}, notes disabled", e);
            NoteSequence::default()
        })
    });
    let mut cues = CuePlayer::new(source, LogOutput);

    if config.paced {
        let mut clock = FrameClock::new(config.fps);
        while step(&mut state, &mut cues, config.frame_limit) {
            clock.tick();
        }
    } else {
        run_to_end(&mut state, &mut cues, config.frame_limit);
    }

    for ball in &state.balls {
        log::info!("{} : {}", ball.name, ball.score());
    }
    match state.winner() {
        Some(winner) => log::info!("The winner is : {} !!", winner.name),
        None => log::info!("No winner"),
    }
    log::info!("{} frames, {} cues", state.frame, cues.played());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
