//! Arcade Loop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use arcade_loop::audio::{AudioManager, effects_for};
    use arcade_loop::consts::*;
    use arcade_loop::games::tictactoe::{Outcome, Player};
    use arcade_loop::games::{GameKind, TicTacToe};
    use arcade_loop::platform::{InputState, Key, KeyValueStore, LocalStore, MemoryStore};
    use arcade_loop::renderer::CanvasSurface;
    use arcade_loop::settings::Settings;
    use arcade_loop::sim::entity::Bounds;
    use arcade_loop::sim::round::{Game, RoundController, RoundPhase};

    /// One real-time game hosted on the page
    struct App {
        kind: GameKind,
        round: RoundController<dyn Game>,
        input: InputState,
        surface: CanvasSurface,
        audio: AudioManager,
    }

    impl App {
        /// Run one frame: simulate, paint, play sounds
        fn frame(&mut self, time: f64) {
            let before = self.round.hud();
            let events = self.round.tick(time, &mut self.input, &mut self.surface);
            let after = self.round.hud();

            for effect in effects_for(self.kind, &events, &before, &after) {
                self.audio.play(effect);
            }
        }

        fn restart(&mut self) {
            self.round.restart();
            self.input.reset();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let hud = self.round.hud();

            set_text(document, "score", &hud.score.to_string());
            set_text(document, "highScore", &hud.best.to_string());
            if let Some(lives) = hud.lives {
                set_text(document, "lives", &lives.to_string());
            }
            if let Some(level) = hud.level {
                set_text(document, "level", &level.to_string());
            }
            if let Some(length) = hud.length {
                set_text(document, "length", &length.to_string());
            }

            // Show/hide game over
            let Some(el) = document.get_element_by_id("gameOver") else {
                return;
            };
            if hud.phase.is_over() {
                let title = match hud.phase {
                    RoundPhase::Won => "🎉 Congratulations! 🎉",
                    _ => "Game Over!",
                };
                set_text(document, "gameOverText", title);
                set_text(document, "finalScore", &hud.score.to_string());
                if let Some(length) = hud.length {
                    set_text(document, "finalLength", &length.to_string());
                }
                set_display(&el, "block");
            } else {
                set_display(&el, "none");
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_display(el: &Element, display: &str) {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property("display", display);
        }
    }

    /// Game chosen by `#name` or `?game=name`, balloon popper by default
    fn selected_game() -> GameKind {
        let Some(location) = web_sys::window().map(|w| w.location()) else {
            return GameKind::Balloon;
        };
        [location.hash().ok(), location.search().ok()]
            .into_iter()
            .flatten()
            .find_map(|part| GameKind::from_name(&part))
            .unwrap_or(GameKind::Balloon)
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{} - scores will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        // Set up panic hook and logging
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let kind = selected_game();
        log::info!("Arcade Loop starting: {}", kind.as_str());

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if kind == GameKind::TicTacToe {
            setup_tictactoe(&document);
            return Ok(());
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no #gameCanvas element")?
            .dyn_into()?;
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: web_sys::CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;
        let surface = CanvasSurface::new(ctx, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);

        let mut store = open_store();
        let settings = Settings::load(store.as_ref());
        // Persist the sanitized copy
        settings.save(store.as_mut());
        let bounds = Bounds::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let game = kind.build(&settings, bounds).ok_or("not a real-time game")?;

        let seed = js_sys::Date::now() as u64;
        let app = App {
            kind,
            round: RoundController::new(game, seed, store),
            input: InputState::new(),
            surface,
            audio: AudioManager::new(&settings),
        };
        let app = Rc::new(RefCell::new(app));

        setup_input_handlers(&canvas, app.clone())?;
        setup_restart_button(&document, app.clone());
        setup_auto_pause(&document, app.clone());

        request_animation_frame(app);
        log::info!("Game loop started");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Click - canvas pixels, scaled if CSS stretched the element
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let scale_x = canvas_clone.width() as f32 / canvas_clone.client_width().max(1) as f32;
                let scale_y =
                    canvas_clone.height() as f32 / canvas_clone.client_height().max(1) as f32;
                let pos = Vec2::new(
                    event.offset_x() as f32 * scale_x,
                    event.offset_y() as f32 * scale_y,
                );
                app.borrow_mut().input.click(pos);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                    // Held space must not flicker pause
                    if key == Key::Pause && event.repeat() {
                        return;
                    }
                    app.borrow_mut().input.key_down(key);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    app.borrow_mut().input.key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }
        request_animation_frame(app);
    }

    fn setup_restart_button(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause pausable games when the tab is hidden
    fn setup_auto_pause(document: &Document, app: Rc<RefCell<App>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() != web_sys::VisibilityState::Hidden {
                return;
            }
            let mut a = app.borrow_mut();
            let state = a.round.state();
            if a.round.game().pausable() && state.is_live() {
                a.input.pause_requested = true;
                log::info!("Auto-paused (tab hidden)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Tic-tac-toe is DOM-only: `.cell[data-index]` buttons, `#status`,
    /// `#undoBtn` and `#restartBtn`.
    fn setup_tictactoe(document: &Document) {
        let board = Rc::new(RefCell::new(TicTacToe::new()));
        render_board(document, &board.borrow());

        let Ok(cells) = document.query_selector_all(".cell") else {
            return;
        };
        for i in 0..cells.length() {
            let Some(cell) = cells.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(index) = cell
                .get_attribute("data-index")
                .and_then(|v| v.parse::<usize>().ok())
            else {
                continue;
            };
            let board = board.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut b = board.borrow_mut();
                match b.play(index) {
                    Ok(_) => render_board(&document, &b),
                    Err(e) => log::debug!("Move at {} refused: {:?}", index, e),
                }
            });
            let _ = cell.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (id, undo) in [("undoBtn", true), ("restartBtn", false)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let board = board.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut b = board.borrow_mut();
                if undo {
                    b.undo();
                } else {
                    b.restart();
                }
                render_board(&document, &b);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn render_board(document: &Document, board: &TicTacToe) {
        if let Ok(cells) = document.query_selector_all(".cell") {
            for i in 0..cells.length() {
                let Some(cell) = cells.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let mark = cell
                    .get_attribute("data-index")
                    .and_then(|v| v.parse::<usize>().ok())
                    .and_then(|index| board.board().get(index).copied().flatten());
                cell.set_text_content(mark.map(Player::as_str));
            }
        }

        set_text(document, "status", &board.status());
        if let Some(btn) = document.get_element_by_id("undoBtn") {
            let _ = if board.can_undo() {
                btn.remove_attribute("disabled")
            } else {
                btn.set_attribute("disabled", "")
            };
        }
        if board.outcome() != Outcome::InProgress {
            log::info!("{}", board.status());
        }
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
    log::info!("Arcade Loop (native) starting...");
    log::info!("Native mode runs headless rounds - serve the wasm build for the playable pages");

    demo::balloon();
    demo::comets();
    demo::snake();
    demo::tictactoe();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless rounds driven by simple bots, drawn into a recording surface
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use arcade_loop::games::tictactoe::Outcome;
    use arcade_loop::games::{BalloonGame, CometsGame, SnakeGame, TicTacToe};
    use arcade_loop::platform::{Direction, InputState, Key, MemoryStore};
    use arcade_loop::renderer::RecordingSurface;
    use arcade_loop::settings::Settings;
    use arcade_loop::sim::entity::Bounds;
    use arcade_loop::sim::round::{RoundController, RoundPhase};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_TICKS: u32 = 60 * 60 * 5;
    const SEED: u64 = 42;

    pub fn balloon() {
        let settings = Settings::default();
        let game = BalloonGame::new(settings.balloon, Bounds::default());
        let mut round = RoundController::new(Box::new(game), SEED, Box::new(MemoryStore::new()));
        let mut input = InputState::new();
        let mut surface = RecordingSurface::new();

        let mut t = 0;
        while round.phase() == RoundPhase::Running && t < MAX_TICKS {
            // Click the highest balloon still in play
            let target = round
                .game()
                .pool()
                .iter()
                .filter(|e| e.is_hittable() && e.pos.y < 600.0)
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|e| e.pos);
            if let Some(pos) = target {
                input.click(pos);
            }
            round.tick(f64::from(t) * FRAME_MS, &mut input, &mut surface);
            t += 1;
        }
        report("Balloon Popper", round.phase(), round.state().score, t);
    }

    pub fn comets() {
        let settings = Settings::default();
        let game = CometsGame::new(settings.asteroids, Bounds::default());
        let mut round = RoundController::new(Box::new(game), SEED, Box::new(MemoryStore::new()));
        let mut input = InputState::new();
        let mut surface = RecordingSurface::new();

        // Circle the screen so the trail sweeps through rocks
        let pattern = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
        let mut t = 0;
        while round.phase() == RoundPhase::Running && t < MAX_TICKS {
            let held = pattern[(t as usize / 90) % pattern.len()];
            input.reset();
            input.key_down(Key::Move(held));
            round.tick(f64::from(t) * FRAME_MS, &mut input, &mut surface);
            t += 1;
        }
        report("Comets", round.phase(), round.state().score, t);
    }

    pub fn snake() {
        let settings = Settings::default();
        let game = SnakeGame::new(settings.snake, Bounds::default());
        let mut round = RoundController::new(Box::new(game), SEED, Box::new(MemoryStore::new()));
        let mut input = InputState::new();
        let mut surface = RecordingSurface::new();

        let mut t = 0;
        while round.phase() == RoundPhase::Running && t < MAX_TICKS {
            let game = round.game();
            if let Some(food) = game.food() {
                let head = game.snake().head();
                let direction = if food.x > head.x {
                    Direction::Right
                } else if food.x < head.x {
                    Direction::Left
                } else if food.y > head.y {
                    Direction::Down
                } else {
                    Direction::Up
                };
                input.key_down(Key::Move(direction));
                input.key_up(Key::Move(direction));
            }
            round.tick(f64::from(t) * FRAME_MS, &mut input, &mut surface);
            t += 1;
        }
        report("Snake", round.phase(), round.state().score, t);
        println!("  length {}", round.game().snake().len());
    }

    pub fn tictactoe() {
        let mut game = TicTacToe::new();
        for index in [4, 0, 2, 6, 3, 5, 1, 7, 8] {
            if game.play(index).is_err() || game.outcome() != Outcome::InProgress {
                break;
            }
        }
        println!("Tic-tac-toe: {}", game.status());
    }

    fn report(name: &str, phase: RoundPhase, score: u32, ticks: u32) {
        println!("{}: {:?} with score {} after {} ticks", name, phase, score, ticks);
    }
}
