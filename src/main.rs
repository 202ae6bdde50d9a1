//! Flappy Canvas entry point
//!
//! On the web: wires the DOM (canvas, buttons, keys, focus) to a `Session`
//! and drives it from `requestAnimationFrame`. On native: runs a headless
//! autopilot demo and prints the last frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use flappy_canvas::audio::{Volumes, WebAudio};
    use flappy_canvas::platform::input::suppress_default;
    use flappy_canvas::platform::{InputAction, LocalStore, action_for_key};
    use flappy_canvas::renderer::CanvasRenderer;
    use flappy_canvas::sim::{GameEvent, GamePhase, Viewport};
    use flappy_canvas::{FrameStatus, Session, Settings};

    type WebSession = Session<CanvasRenderer, WebAudio, LocalStore>;

    /// Session plus loop bookkeeping
    struct Game {
        session: WebSession,
        /// A frame callback is pending
        loop_active: bool,
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    /// Match the canvas backing store to the window
    fn fit_canvas(canvas: &HtmlCanvasElement) -> Viewport {
        let (w, h) = web_sys::window()
            .map(|w| {
                let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
                let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
                (width, height)
            })
            .unwrap_or((800.0, 600.0));
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
        Viewport::new(w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Flappy Canvas starting...");

        let Some(document) = document() else {
            log::error!("No document - nothing to attach to");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let viewport = fit_canvas(&canvas);
        let Some(renderer) = CanvasRenderer::new(canvas.clone()) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let store = LocalStore::new();
        let settings = Settings::load(&store);
        let audio = WebAudio::new(Volumes::from_settings(&settings));

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, viewport, renderer, audio, store);
        set_text(&document, "best", &session.best().to_string());

        let game = Rc::new(RefCell::new(Game {
            session,
            loop_active: false,
        }));
        // Title screen
        game.borrow_mut().session.resize(viewport);
        show(&document, "overlay", true);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game);

        log::info!("Flappy Canvas ready (seed {})", seed);
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.add_1("visible")
            } else {
                classes.remove_1("visible")
            };
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Reflect session events in the DOM overlays
    fn update_hud(game: &mut Game) {
        let events = game.session.drain_events();
        if events.is_empty() {
            return;
        }
        let Some(document) = document() else { return };

        for event in events {
            match event {
                GameEvent::Started => {
                    set_text(&document, "score", "0");
                    show(&document, "overlay", false);
                    show(&document, "pauseOverlay", false);
                    set_hidden(&document, "pauseBtn", false);
                }
                GameEvent::Scored { score } => set_text(&document, "score", &score.to_string()),
                GameEvent::Paused => show(&document, "pauseOverlay", true),
                GameEvent::Resumed => show(&document, "pauseOverlay", false),
                GameEvent::GameOver { score, .. } => {
                    set_text(&document, "overlayTitle", "Game Over!");
                    set_text(
                        &document,
                        "overlayTagline",
                        &format!("You scored {} points", score),
                    );
                    set_hidden(&document, "startBtn", true);
                    set_hidden(&document, "restartBtn", false);
                    set_hidden(&document, "pauseBtn", true);
                    show(&document, "overlay", true);
                }
                GameEvent::BestUpdated { best } => set_text(&document, "best", &best.to_string()),
                GameEvent::Flapped => {}
            }
        }
    }

    /// Apply an action and make sure the loop runs if the game is live
    fn dispatch(game: &Rc<RefCell<Game>>, action: InputAction) {
        let status = {
            let mut g = game.borrow_mut();
            g.session.prime_audio();
            let status = g.session.handle(action, now_ms());
            update_hud(&mut g);
            status
        };
        if status == FrameStatus::Continue {
            ensure_loop(game);
        }
    }

    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        let start = {
            let mut g = game.borrow_mut();
            if g.loop_active || g.session.phase() != GamePhase::Running {
                false
            } else {
                g.loop_active = true;
                true
            }
        };
        if start {
            request_animation_frame(game.clone());
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
        let status = {
            let mut g = game.borrow_mut();
            let status = g.session.frame(time);
            update_hud(&mut g);
            if status == FrameStatus::Stop {
                g.loop_active = false;
            }
            status
        };

        if status == FrameStatus::Continue {
            request_animation_frame(game);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if suppress_default(&code) {
                    event.prevent_default();
                }
                let phase = game.borrow().session.phase();
                if let Some(action) = action_for_key(&code, phase) {
                    dispatch(&game, action);
                } else {
                    game.borrow_mut().session.prime_audio();
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Pointer (mouse and touch) flaps, or restarts after game over
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                dispatch(&game, InputAction::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, action: InputAction) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            dispatch(&game, action);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "startBtn", game.clone(), InputAction::Restart);
        on_click(document, "restartBtn", game.clone(), InputAction::Restart);
        on_click(document, "pauseBtn", game.clone(), InputAction::Pause);
        on_click(document, "resumeBtn", game.clone(), InputAction::Resume);
        on_click(document, "pauseRestartBtn", game, InputAction::Restart);
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let viewport = fit_canvas(&canvas);
            game.borrow_mut().session.resize(viewport);
        });
        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.session.auto_pause();
                    update_hud(&mut g);
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
                g.session.auto_pause();
                update_hud(&mut g);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use directories::ProjectDirs;
    use flappy_canvas::audio::NullSound;
    use flappy_canvas::platform::FileStore;
    use flappy_canvas::renderer::TextRenderer;
    use flappy_canvas::sim::Viewport;
    use flappy_canvas::{FrameStatus, Session};

    env_logger::init();
    log::info!("Flappy Canvas (native) starting headless autopilot demo...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600u32);

    let data_dir = match std::env::var_os("FLAPPY_CANVAS_DATA") {
        Some(dir) => std::path::PathBuf::from(dir),
        None => match ProjectDirs::from("", "", "flappy-canvas") {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => {
                log::warn!("No home directory found - saving under the working directory");
                std::path::PathBuf::from(".flappy-canvas")
            }
        },
    };
    log::info!("Data directory: {}", data_dir.display());

    let mut session = Session::new(
        seed,
        Viewport::new(800.0, 600.0),
        TextRenderer::new(80, 24),
        NullSound,
        FileStore::new(data_dir),
    );
    session.set_autopilot(true);

    let step = 1000.0 / 60.0;
    let mut now = 0.0;
    session.start(now);
    for _ in 0..frames {
        now += step;
        if session.frame(now) == FrameStatus::Stop {
            break;
        }
    }

    print!("{}", session.renderer().frame());
    log::info!(
        "Demo finished: score {}, best {}, phase {:?}",
        session.score(),
        session.best(),
        session.phase()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
