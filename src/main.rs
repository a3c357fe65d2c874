//! Pair Match entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent, MouseEvent};

    use pair_match::Settings;
    use pair_match::renderer::dom::card_id_from_target;
    use pair_match::renderer::{CLASSIC_VICTORY_MESSAGE, DomRenderer};
    use pair_match::sim::{AUTOPLAY_THINK_MS, Autoplayer, GameEvent, GameState, Level, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: DomRenderer,
        input: TickInput,
        autoplayer: Option<Autoplayer>,
        last_time: f64,
        last_revision: Option<u64>,
    }

    impl Game {
        fn new(settings: &Settings, seed: u64, renderer: DomRenderer) -> Self {
            let mut state = GameState::new(seed, settings.variant);
            if let Some(level) = settings.level {
                state.start_level(level);
            }
            Self {
                state,
                renderer,
                input: TickInput::default(),
                autoplayer: settings.autoplay.then(|| Autoplayer::new(seed, AUTOPLAY_THINK_MS)),
                last_time: 0.0,
                last_revision: None,
            }
        }

        /// Apply pending input immediately (no time passes)
        fn apply_input(&mut self) {
            self.step(0);
        }

        /// Advance the simulation and handle whatever it produced
        fn step(&mut self, dt_ms: u64) {
            if let Some(bot) = self.autoplayer.as_mut() {
                if self.input.click.is_none() {
                    self.input.click = bot.next_click(&self.state);
                }
            }

            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt_ms);

            for event in self.state.drain_events() {
                self.handle_event(event);
            }
            self.render();
        }

        fn handle_event(&self, event: GameEvent) {
            match event {
                GameEvent::Victory(summary) => {
                    log::info!("Completed in {} moves", summary.moves);
                    // Leveled mode shows the success modal via the screen state
                    if !self.state.variant.is_leveled() {
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(CLASSIC_VICTORY_MESSAGE);
                        }
                    }
                }
                GameEvent::GameStarted { level, .. } => {
                    log::info!("Game started ({:?})", level);
                }
                other => log::debug!("{:?}", other),
            }
        }

        /// Full rebuild whenever the state changed
        fn render(&mut self) {
            if self.last_revision != Some(self.state.revision) {
                self.renderer.render(&self.state);
                self.last_revision = Some(self.state.revision);
            }
        }

        fn toggle_autoplay(&mut self) {
            self.autoplayer = match self.autoplayer.take() {
                Some(_) => None,
                None => Some(Autoplayer::new(js_sys::Date::now() as u64, AUTOPLAY_THINK_MS)),
            };
            log::info!("Autoplay: {}", self.autoplayer.is_some());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Pair Match starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            web_sys::console::error_1(&"No document available".into());
            return;
        };

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(&settings, seed, DomRenderer::new(document.clone()))));
        log::info!("Game initialized with seed: {}", seed);

        setup_board_handler(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_level_buttons(&document, game.clone());
        setup_keyboard(game.clone());

        game.borrow_mut().render();

        // Start game loop
        request_animation_frame(game);

        log::info!("Pair Match running!");
    }

    /// One delegated listener on the board reports clicked card ids
    fn setup_board_handler(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let Some(board) = document.get_element_by_id("game-board") else {
            log::warn!("#game-board missing, card clicks disabled");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let id = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| card_id_from_target(&el));
            if let Some(id) = id {
                let mut g = game.borrow_mut();
                g.input.click = Some(id);
                g.apply_input();
            }
        });
        let _ = board.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &web_sys::Document, id: &str, game: Rc<RefCell<Game>>, action: fn(&mut TickInput)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::debug!("#{} not present", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            action(&mut g.input);
            g.apply_input();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        on_click(document, "reset-btn", game.clone(), |input| input.reset = true);
        on_click(document, "play-again-btn", game.clone(), |input| input.reset = true);
        on_click(document, "back-btn", game.clone(), |input| input.back_to_levels = true);
        on_click(document, "change-level-btn", game, |input| input.back_to_levels = true);
    }

    /// Level buttons carry their identifier in `data-level`
    fn setup_level_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let Ok(buttons) = document.query_selector_all("[data-level]") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(btn) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let game = game.clone();
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let value = btn_clone.get_attribute("data-level").unwrap_or_default();
                match value.parse::<Level>() {
                    Ok(level) => {
                        let mut g = game.borrow_mut();
                        g.input.select_level = Some(level);
                        g.apply_input();
                    }
                    Err(e) => log::warn!("{}", e),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "r" | "R" => g.input.reset = true,
                "Escape" => g.input.back_to_levels = true,
                "i" | "I" => g.toggle_autoplay(),
                _ => return,
            }
            g.apply_input();
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
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

            // Whole milliseconds only; the remainder carries into the next frame
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time).max(0.0).floor() as u64
            } else {
                g.last_time = time;
                0
            };
            g.last_time += dt_ms as f64;

            g.step(dt_ms);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pair Match (native) starting...");
    log::info!("Native mode runs a headless autoplayed game - run with `trunk serve` for the web version");

    let settings = pair_match::Settings::load();
    let summary = native::autoplay(&settings);

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use pair_match::Settings;
    use pair_match::renderer::render_text;
    use pair_match::sim::{AUTOPLAY_THINK_MS, Autoplayer, GameEvent, GameState, Summary, TickInput, tick};

    /// Simulated frame length (60 Hz)
    const FRAME_MS: u64 = 16;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 10 * 60 * 60;

    /// Play one game with the computer player on the deterministic simulation
    pub fn autoplay(settings: &Settings) -> Option<Summary> {
        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        log::info!("Seed: {}", seed);

        let mut state = GameState::new(seed, settings.variant);
        if state.variant.is_leveled() {
            state.start_level(settings.level.unwrap_or_default());
        }
        let mut bot = Autoplayer::new(seed, AUTOPLAY_THINK_MS);

        for _ in 0..MAX_FRAMES {
            let input = TickInput {
                click: bot.next_click(&state),
                ..Default::default()
            };
            tick(&mut state, &input, FRAME_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::PairMissed { .. } | GameEvent::PairMatched { .. } => {
                        log::debug!("{:?}\n{}", event, render_text(&state));
                    }
                    GameEvent::Victory(summary) => {
                        log::info!("\n{}", render_text(&state));
                        return Some(summary);
                    }
                    _ => {}
                }
            }
        }

        log::warn!("Autoplay did not finish");
        None
    }
}
