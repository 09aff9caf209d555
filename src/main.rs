//! Shape Muncher entry point
//!
//! The browser build wires DOM input to the controller and runs the
//! requestAnimationFrame loop. The native build plays a scripted headless
//! session and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

    use glam::Vec2;
    use shape_muncher::audio::{AudioManager, Mixer};
    use shape_muncher::layout::ResizeDebouncer;
    use shape_muncher::renderer::CanvasRenderer;
    use shape_muncher::sim::GameState;
    use shape_muncher::ui::{DomHud, dispatch_events, show_fatal};
    use shape_muncher::{GameController, InitError, Layout, Settings, to_canvas_coords};

    const CANVAS_ID: &str = "gameCanvas";

    /// Everything the page owns
    struct Game {
        controller: GameController,
        renderer: CanvasRenderer,
        audio: AudioManager,
        hud: DomHud,
        resize: ResizeDebouncer,
        settings: Settings,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            if let Some(layout) = self.resize.poll(time) {
                self.renderer.resize(&layout);
                self.controller.resize(layout);
            }

            self.controller.frame(time);
            self.renderer.set_time(time);
            self.controller.render(&mut self.renderer);

            dispatch_events(
                self.controller.drain_events(),
                &mut self.audio,
                &mut self.hud,
            );
        }

        /// Flush events produced outside the frame loop (button clicks)
        fn flush(&mut self) {
            dispatch_events(
                self.controller.drain_events(),
                &mut self.audio,
                &mut self.hud,
            );
        }

        fn canvas_point(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.renderer.canvas().get_bounding_client_rect();
            to_canvas_coords(
                client_x as f32,
                client_y as f32,
                rect.left() as f32,
                rect.top() as f32,
            )
        }
    }

    fn now(window: &Window) -> f64 {
        window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn window_layout(window: &Window) -> Layout {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1024.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(768.0);
        Layout::new(width as f32, height as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Shape Muncher starting...");

        let Some((window, document)) = web_sys::window()
            .and_then(|w| w.document().map(|d| (w, d)))
        else {
            log::error!("{}", InitError::NoDocument);
            return;
        };

        match init(&window, &document) {
            Ok(game) => {
                request_animation_frame(game);
                log::info!("Shape Muncher running!");
            }
            Err(err) => {
                log::error!("Failed to initialize: {err}");
                show_fatal(&document, CANVAS_ID);
            }
        }
    }

    fn init(window: &Window, document: &Document) -> Result<Rc<RefCell<Game>>, InitError> {
        let renderer = CanvasRenderer::new(document, CANVAS_ID)?;
        let layout = window_layout(window);
        renderer.resize(&layout);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut controller = GameController::new(layout, seed);
        controller.apply_settings(&settings);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            controller,
            renderer,
            audio: AudioManager::new(Mixer::from_settings(&settings)),
            hud: DomHud::new(document.clone()),
            resize: ResizeDebouncer::new(),
            settings,
        }));

        let canvas = game.borrow().renderer.canvas().clone();
        setup_mouse_handlers(&canvas, game.clone());
        setup_touch_handlers(&canvas, game.clone());
        setup_buttons(document, game.clone());
        setup_resize(window, game.clone());
        setup_auto_pause(window, document, game.clone());

        {
            let mut g = game.borrow_mut();
            g.controller.finish_loading();
            g.flush();
        }
        Ok(game)
    }

    fn setup_mouse_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.canvas_point(event.client_x(), event.client_y());
                g.controller.press(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.canvas_point(event.client_x(), event.client_y());
                g.controller.move_to(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(window) = web_sys::window() else { return };
                let mut g = game.borrow_mut();
                let pos = g.canvas_point(event.client_x(), event.client_y());
                g.controller.release(pos, now(&window));
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let pos = g.canvas_point(touch.client_x(), touch.client_y());
                    g.controller.press(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let pos = g.canvas_point(touch.client_x(), touch.client_y());
                    g.controller.move_to(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: the lifted finger is only in changedTouches
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(window) = web_sys::window() else { return };
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut g = game.borrow_mut();
                    let pos = g.canvas_point(touch.client_x(), touch.client_y());
                    g.controller.release(pos, now(&window));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game, f64)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button '{id}' missing");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let Some(window) = web_sys::window() else { return };
            let mut g = game.borrow_mut();
            action(&mut g, now(&window));
            g.flush();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "startButton", game.clone(), |g, _| {
            // First user gesture: browsers allow audio from here on
            g.audio.resume();
            g.controller.start_game();
        });
        on_click(document, "pauseButton", game.clone(), |g, _| {
            g.controller.pause();
        });
        on_click(document, "resumeButton", game.clone(), |g, now| {
            g.controller.resume(now);
        });
        on_click(document, "restartButton", game.clone(), |g, _| {
            g.controller.restart();
        });
        on_click(document, "muteButton", game, |g, _| {
            let muted = g.controller.toggle_mute();
            g.settings.muted = muted;
            g.settings.save();
        });
    }

    fn setup_resize(window: &Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            game.borrow_mut()
                .resize
                .notify(window_layout(&window), now(&window));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(window: &Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.controller.state() == GameState::Playing {
                        g.controller.pause();
                        g.flush();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.controller.state() == GameState::Playing {
                    g.controller.pause();
                    g.flush();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let rounds = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    log::info!("Shape Muncher (native) - headless session, seed {seed}");
    log::info!("Run with `trunk serve` for the playable web version");

    let session = headless::play(seed, rounds);
    println!(
        "\nFed {} shapes over {} rounds (streak {}).",
        session.score / shape_muncher::consts::POINTS_PER_SUCCESS,
        session.rounds_completed,
        session.streak
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use shape_muncher::audio::LogAudio;
    use shape_muncher::sim::{GameController, GameState, Session};
    use shape_muncher::ui::{LogUi, dispatch_events};
    use shape_muncher::{Layout, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    struct Host {
        controller: GameController,
        audio: LogAudio,
        ui: LogUi,
        time: f64,
    }

    impl Host {
        fn step(&mut self) {
            self.time += FRAME_MS;
            self.controller.frame(self.time);
            dispatch_events(self.controller.drain_events(), &mut self.audio, &mut self.ui);
        }

        /// Run frames until every shape has landed
        fn settle(&mut self) {
            for _ in 0..600 {
                if self.controller.shapes().iter().all(|s| !s.is_falling) {
                    return;
                }
                self.step();
            }
        }

        fn wait_for_round(&mut self) {
            while self.controller.state() != GameState::Playing {
                self.step();
            }
        }
    }

    /// Play `rounds` rounds with one deliberate miss per round
    pub fn play(seed: u64, rounds: u32) -> Session {
        let mut host = Host {
            controller: GameController::new(Layout::new(1024.0, 768.0), seed),
            audio: LogAudio::default(),
            ui: LogUi::default(),
            time: 0.0,
        };
        host.controller.apply_settings(&Settings::load());
        host.controller.finish_loading();
        host.controller.start_game();
        host.step();

        for _ in 0..rounds {
            host.wait_for_round();
            host.settle();

            let Some(monster) = host.controller.monster() else {
                break;
            };
            let (target, mouth) = (monster.target, monster.mouth());

            // A wrong pick first, when the round has one. It goes back to
            // its own slot so it never ends up covering a target.
            if let Some(wrong) = host
                .controller
                .shapes()
                .iter()
                .find(|s| s.kind != target)
                .map(|s| s.pos)
            {
                host.controller.press(wrong);
                host.controller.move_to(mouth);
                host.step();
                host.controller.move_to(wrong);
                host.controller.release(wrong, host.time);
                host.step();
                host.settle();
            }

            let Some(pick) = host
                .controller
                .shapes()
                .iter()
                .rev()
                .find(|s| s.kind == target)
                .map(|s| s.pos)
            else {
                log::warn!("No {} to feed", target.as_str());
                break;
            };
            host.controller.press(pick);
            if host.controller.dragged_shape().map(|s| s.kind) != Some(target) {
                log::warn!("Grabbed the wrong shape at {pick}");
                host.controller.release(pick, host.time);
                break;
            }
            host.controller.move_to(mouth);
            host.controller.release(mouth, host.time);
            host.step();
        }

        host.controller.session()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::headless;

    #[test]
    fn test_headless_session_feeds_every_round() {
        for seed in 0..20 {
            let session = headless::play(seed, 3);
            assert_eq!(session.score, 30, "seed {seed}");
            assert_eq!(session.streak, 3, "seed {seed}");
        }
    }
}
