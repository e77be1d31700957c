//! Sparkler entry point
//!
//! In the browser this drives the show from `requestAnimationFrame`. Natively
//! it runs a fixed number of ticks into a software frame and prints a JSON
//! report.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_show {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PageTransitionEvent, Window,
    };

    use sparkler::renderer::CanvasGlyphRasterizer;
    use sparkler::{AudioManager, Engine, Settings};

    /// Everything the frame callback needs
    struct Show {
        engine: Engine,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        rasterizer: CanvasGlyphRasterizer,
        audio: AudioManager,
        /// Pending `requestAnimationFrame` handle
        frame_id: Option<i32>,
    }

    impl Show {
        /// Match the canvas to the window and resample the glyph
        fn fit_to_window(&mut self, window: &Window) {
            let (width, height) = window_size(window);
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.engine.resize(width, height, &mut self.rasterizer);
        }

        fn toggle_audio(&mut self) {
            let enabled = !self.audio.is_enabled();
            self.audio.set_enabled(enabled);
            log::info!("Audio {}", if enabled { "on" } else { "off" });
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("audio-toggle"))
            {
                el.set_text_content(Some(if enabled { "Sound: on" } else { "Sound: off" }));
            }
        }

        /// Stop the engine and drop the pending frame. Safe to call twice.
        fn teardown(&mut self, window: &Window) {
            self.engine.stop();
            if let Some(id) = self.frame_id.take() {
                let _ = window.cancel_animation_frame(id);
            }
        }

        /// Restart after a teardown. True if the frame loop needs kicking.
        fn restore(&mut self) -> bool {
            self.engine.resume() && self.frame_id.is_none()
        }
    }

    fn window_size(window: &Window) -> (u32, u32) {
        let dim = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
        };
        (dim(window.inner_width()), dim(window.inner_height()))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Sparkler starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;
        let mut rasterizer = CanvasGlyphRasterizer::new().ok_or("no offscreen canvas")?;

        let (width, height) = window_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::default();
        let engine = Engine::new(seed, width, height, &settings, &mut rasterizer);
        let audio = AudioManager::from_settings(seed, &settings);
        log::info!("Show initialized with seed: {}", seed);

        let show = Rc::new(RefCell::new(Show {
            engine,
            canvas,
            ctx,
            rasterizer,
            audio,
            frame_id: None,
        }));

        setup_resize(&window, show.clone());
        setup_audio_toggle(&window, show.clone());
        setup_teardown(&window, show.clone());

        request_animation_frame(show);
        log::info!("Sparkler running!");
        Ok(())
    }

    fn setup_resize(window: &Window, show: Rc<RefCell<Show>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(window) = web_sys::window() {
                show.borrow_mut().fit_to_window(&window);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_audio_toggle(window: &Window, show: Rc<RefCell<Show>>) {
        // Keyboard
        {
            let show = show.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), "m" | "M") {
                    show.borrow_mut().toggle_audio();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Button, if the page has one
        if let Some(btn) = window
            .document()
            .and_then(|d| d.get_element_by_id("audio-toggle"))
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                show.borrow_mut().toggle_audio();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(window: &Window, show: Rc<RefCell<Show>>) {
        // Page unloading or entering the back/forward cache
        {
            let show = show.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PageTransitionEvent| {
                if let Some(window) = web_sys::window() {
                    show.borrow_mut().teardown(&window);
                }
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restored from the back/forward cache
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if !event.persisted() {
                    return;
                }
                let restart = show.borrow_mut().restore();
                if restart {
                    request_animation_frame(show.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(show: Rc<RefCell<Show>>) {
        let Some(window) = web_sys::window() else { return };
        let callback = show.clone();
        let closure = Closure::once(move |_time: f64| {
            show_loop(callback);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => show.borrow_mut().frame_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn show_loop(show: Rc<RefCell<Show>>) {
        {
            let mut guard = show.borrow_mut();
            let s = &mut *guard;
            s.frame_id = None;
            if s.engine.tick(&mut s.ctx, &mut s.audio).is_none() {
                return;
            }
        }

        request_animation_frame(show);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = web_show::run() {
        log::error!("Sparkler failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sparkler::renderer::{BlockFont, PixelBuffer};
    use sparkler::{AudioManager, Engine, QualityPreset, Settings};

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 600;
    const DEFAULT_TICKS: u64 = 600;

    env_logger::init();

    // sparkler [ticks] [seed] [low|medium|high]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let ticks = args
        .first()
        .and_then(|a| a.parse().ok())
        .unwrap_or(DEFAULT_TICKS);
    let seed = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(2026);
    let preset = args
        .get(2)
        .and_then(|a| QualityPreset::from_str(a))
        .unwrap_or_default();

    // Native builds have no audio device; cues are only counted
    let settings = Settings {
        audio_enabled: true,
        ..Settings::from_preset(preset)
    };
    log::info!(
        "Sparkler (native) {}x{}, {} ticks, seed {}, {} quality",
        WIDTH,
        HEIGHT,
        ticks,
        seed,
        preset.as_str()
    );

    let mut engine = Engine::new(seed, WIDTH, HEIGHT, &settings, &mut BlockFont);
    let mut frame = PixelBuffer::new(WIDTH, HEIGHT);
    let mut audio = AudioManager::from_settings(seed, &settings);

    for _ in 0..ticks {
        let Some(stats) = engine.tick(&mut frame, &mut audio) else {
            break;
        };
        if stats.exploded > 0 || stats.fireworks_died > 0 {
            log::debug!("Tick {}: {:?}", engine.state().time_ticks, stats);
        }
    }
    engine.stop();

    log::info!(
        "Final frame mean luma {:.4}, cues played {:?}",
        frame.mean_luma(),
        audio.played()
    );
    match serde_json::to_string_pretty(engine.report()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize report: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
