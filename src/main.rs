//! Bouquet Rescue entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::closure::{IntoWasmClosure, WasmClosure};
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use bouquet_rescue::Simulation;
    use bouquet_rescue::consts::CANVAS_WIDTH;
    use bouquet_rescue::persistence::HighScoreStore;
    use bouquet_rescue::platform::storage::LocalStorage;
    use bouquet_rescue::platform::time::FrameClock;
    use bouquet_rescue::platform::web::WebScoreService;
    use bouquet_rescue::platform::InputCollector;
    use bouquet_rescue::sim::RunPhase;
    use bouquet_rescue::tuning::Tuning;

    // Page-side renderer hook
    #[wasm_bindgen(inline_js = "
        export function draw_frame(json) {
            const draw = globalThis.bouquetDraw;
            if (typeof draw === 'function') {
                draw(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn draw_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        input: InputCollector,
        clock: FrameClock,
        last_hud: (u64, u64, bool),
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let tuning = Tuning::load(&LocalStorage::open());
            let high_scores = HighScoreStore::new(Box::new(LocalStorage::open()));
            let service = Box::new(WebScoreService::new());
            Self {
                sim: Simulation::new(seed, tuning, high_scores, service),
                input: InputCollector::new(),
                clock: FrameClock::new(),
                last_hud: (u64::MAX, u64::MAX, false),
            }
        }

        fn start(&mut self) {
            self.input.reset();
            self.sim.start_run();
            set_display("startButton", false);
            set_display("restartButton", false);
        }

        fn name_entry_open(&self) -> bool {
            let state = self.sim.state();
            state.show_name_entry && state.phase == RunPhase::NameEntry
        }

        fn frame(&mut self, now: f64) {
            if let Some(dt) = self.clock.advance(now) {
                let snapshot = self.input.snapshot();
                self.sim.tick(&snapshot, dt);
            }
            self.update_hud();

            match self.sim.snapshot_json() {
                Ok(json) => draw_frame(&json),
                Err(e) => log::warn!("Failed to serialise frame: {}", e),
            }
        }

        fn update_hud(&mut self) {
            let state = self.sim.state();
            let hud = (
                state.score,
                state.high_score,
                state.phase == RunPhase::GameOver,
            );
            if hud == self.last_hud {
                return;
            }
            self.last_hud = hud;

            set_text("score", &format!("Score: {}", hud.0));
            set_text("highScore", &format!("High Score: {}", hud.1));
            set_display("restartButton", hud.2);
        }
    }

    fn element(id: &str) -> Option<Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(id: &str, visible: bool) {
        let Some(el) = element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let _ = el
            .style()
            .set_property("display", if visible { "block" } else { "none" });
    }

    /// Client x to canvas x
    fn canvas_x(canvas: &Element, client_x: i32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 {
            return client_x as f32;
        }
        (((client_x as f64 - rect.left()) / rect.width()) * CANVAS_WIDTH as f64) as f32
    }

    fn listen<E, F>(target: &web_sys::EventTarget, event: &str, handler: F)
    where
        E: 'static,
        dyn FnMut(E): WasmClosure,
        F: FnMut(E) + IntoWasmClosure<dyn FnMut(E)> + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Bouquet Rescue starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("gameCanvas")
            .ok_or("no gameCanvas element")?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(&document, game.clone());
        setup_pointer(&canvas, &document, game.clone());
        setup_direction_buttons(game.clone());
        setup_start_buttons(game.clone());

        request_animation_frame(game);
        log::info!("Bouquet Rescue running!");
        Ok(())
    }

    fn setup_keyboard(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(document, "keydown", move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let name_entry = g.name_entry_open();
                if g.input.key_down(&event.key(), name_entry) {
                    event.prevent_default();
                }
            });
        }
        listen(document, "keyup", move |event: KeyboardEvent| {
            game.borrow_mut().input.key_up(&event.key());
        });
    }

    fn setup_pointer(canvas: &Element, document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // Mouse drag
        {
            let game = game.clone();
            let target = canvas.clone();
            listen(canvas, "mousedown", move |event: MouseEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let active = g.sim.accepts_drag();
                g.input.pointer_down(canvas_x(&target, event.client_x()), active);
            });
        }
        {
            let game = game.clone();
            let target = canvas.clone();
            listen(canvas, "mousemove", move |event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .pointer_move(canvas_x(&target, event.client_x()));
            });
        }
        {
            let game = game.clone();
            listen(document, "mouseup", move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
        }

        // Touch drag
        {
            let game = game.clone();
            let target = canvas.clone();
            listen(canvas, "touchstart", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let active = g.sim.accepts_drag();
                    g.input.pointer_down(canvas_x(&target, touch.client_x()), active);
                }
            });
        }
        {
            let game = game.clone();
            let target = canvas.clone();
            listen(canvas, "touchmove", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .input
                        .pointer_move(canvas_x(&target, touch.client_x()));
                }
            });
        }
        listen(canvas, "touchend", move |event: TouchEvent| {
            event.prevent_default();
            game.borrow_mut().input.pointer_up();
        });
    }

    fn setup_direction_buttons(game: Rc<RefCell<Game>>) {
        for (id, is_left) in [("leftButton", true), ("rightButton", false)] {
            let Some(button) = element(id) else {
                continue;
            };
            let press = move |game: Rc<RefCell<Game>>, pressed: bool| {
                move |event: web_sys::Event| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    if is_left {
                        g.input.set_left_button(pressed);
                    } else {
                        g.input.set_right_button(pressed);
                    }
                }
            };
            for name in ["mousedown", "touchstart"] {
                listen(&button, name, press(game.clone(), true));
            }
            for name in ["mouseup", "touchend", "mouseleave"] {
                listen(&button, name, press(game.clone(), false));
            }
        }
    }

    fn setup_start_buttons(game: Rc<RefCell<Game>>) {
        for id in ["startButton", "restartButton"] {
            let Some(button) = element(id) else {
                continue;
            };
            for name in ["click", "touchend"] {
                let game = game.clone();
                listen(&button, name, move |event: web_sys::Event| {
                    event.prevent_default();
                    event.stop_propagation();
                    game.borrow_mut().start();
                });
            }
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bouquet Rescue (native) starting...");
    log::info!("Native mode runs a headless autopilot; build for wasm32 to play");

    autopilot::run(42);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: steers toward the next flower below and plays one run
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use bouquet_rescue::highscores::{LeaderboardView, leaderboard_view};
    use bouquet_rescue::persistence::HighScoreStore;
    use bouquet_rescue::platform::MemoryStore;
    use bouquet_rescue::platform::time::now_ms;
    use bouquet_rescue::sim::{GameEvent, GameState, InputSnapshot, RunPhase, TextEvent};
    use bouquet_rescue::{LocalScoreService, Simulation, Tuning};

    const MAX_TICKS: usize = 60 * 60 * 5;
    const PILOT_NAME: &str = "Autopilot";

    fn steer(state: &GameState) -> InputSnapshot {
        let player = &state.player;
        let target = state
            .flowers
            .iter()
            .filter(|f| f.top() > player.bottom())
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let mut input = InputSnapshot::default();
        if let Some(flower) = target {
            let dx = flower.pos.x - player.pos.x;
            input.left = dx < -6.0;
            input.right = dx > 6.0;
        }
        input
    }

    pub fn run(seed: u64) {
        let high_scores = HighScoreStore::new(Box::new(MemoryStore::default()));
        let service = Box::new(LocalScoreService::new());
        let mut sim = Simulation::new(seed, Tuning::default(), high_scores, service);
        sim.start_run();

        let mut name = PILOT_NAME.chars();
        let mut catches = 0;
        let mut ticks = 0;

        while ticks < MAX_TICKS && sim.state().phase != RunPhase::GameOver {
            let state = sim.state();
            let input = if state.phase == RunPhase::NameEntry && !state.submitting {
                InputSnapshot {
                    text_event: Some(name.next().map_or(TextEvent::Confirm, TextEvent::Char)),
                    ..Default::default()
                }
            } else {
                steer(state)
            };

            for event in sim.tick(&input, 1.0) {
                match event {
                    GameEvent::FlowerCaught { .. } => catches += 1,
                    GameEvent::PhaseChanged(phase) => {
                        println!("tick {:>5}: phase -> {}", ticks, phase.as_str())
                    }
                    _ => {}
                }
            }
            ticks += 1;
        }

        let state = sim.state();
        println!(
            "\nRun over after {} ticks: score {}, {} catches, final combo {}",
            ticks, state.score, catches, state.combo_streak
        );

        match leaderboard_view(sim.is_available(), sim.top_scores(), now_ms()) {
            LeaderboardView::Unavailable => println!("Leaderboard unavailable"),
            LeaderboardView::Empty => println!("No scores yet!"),
            LeaderboardView::Ranked(rows) => {
                for row in rows {
                    println!("{:>4} {:<15} {:>6}  {}", row.badge, row.name, row.score, row.when);
                }
            }
        }
    }
}
