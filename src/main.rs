//! Runway Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use runway_runner::audio::{AudioManager, SoundEffect};
    use runway_runner::consts::*;
    use runway_runner::input::InputState;
    use runway_runner::render::draw_frame;
    use runway_runner::session::{GameStatus, ResumeState, Session};
    use runway_runner::sim::{GameEvent, theme_for};
    use runway_runner::{HighScores, Settings};

    /// LocalStorage key for the mid-run save
    const SAVE_KEY: &str = "runway_runner_save";
    /// HUD message hold time in ticks
    const MESSAGE_TICKS: u32 = 120;
    /// Autosave interval in ticks (10 s at 60 Hz)
    const AUTOSAVE_TICKS: u64 = 600;

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputState,
        audio: AudioManager,
        settings: Settings,
        highscores: HighScores,
        ctx: CanvasRenderingContext2d,
        accumulator: f32,
        last_time: f64,
        // Track status for end-of-run bookkeeping
        last_status: GameStatus,
        message: Option<&'static str>,
        message_ticks: u32,
        ticks: u64,
        /// True while a blur-triggered mute is active, so regaining focus
        /// never unmutes a player who muted on purpose
        muted_by_blur: bool,
        /// Set on teardown; stops the animation-frame chain
        stopped: bool,
    }

    impl Game {
        fn new(ctx: CanvasRenderingContext2d) -> Self {
            Self {
                session: Session::new(),
                input: InputState::new(),
                audio: AudioManager::new(),
                settings: Settings::load(),
                highscores: HighScores::load(),
                ctx,
                accumulator: 0.0,
                last_time: 0.0,
                last_status: GameStatus::Menu,
                message: None,
                message_ticks: 0,
                ticks: 0,
                muted_by_blur: false,
                stopped: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.sample();
                let events = self.session.advance(&input);
                for event in &events {
                    self.apply_event(event);
                }
                if self.message_ticks > 0 {
                    self.message_ticks -= 1;
                    if self.message_ticks == 0 {
                        self.message = None;
                    }
                }
                self.ticks += 1;
                if self.ticks % AUTOSAVE_TICKS == 0 {
                    self.save_game();
                }
                self.accumulator -= FRAME_DT;
                substeps += 1;
            }

            self.on_status_change();
        }

        /// Play a sound effect at the settings' effective volume
        fn play_sfx(&self, effect: SoundEffect) {
            self.audio.play(effect, self.settings.effective_sfx_volume());
        }

        fn apply_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::Jumped => self.play_sfx(SoundEffect::Jump),
                GameEvent::Collected { .. } => self.play_sfx(SoundEffect::Collect),
                GameEvent::Defeated { .. } => self.play_sfx(SoundEffect::Stomp),
                GameEvent::Damaged { .. } => self.play_sfx(SoundEffect::Damage),
                GameEvent::PowerupTaken(_) => self.play_sfx(SoundEffect::Powerup),
                GameEvent::GoalReached => self.play_sfx(SoundEffect::LevelWin),
                GameEvent::Died => {
                    self.play_sfx(SoundEffect::Damage);
                    self.message = Some(theme_for(self.session.level).death_message);
                    self.message_ticks = MESSAGE_TICKS;
                }
                GameEvent::Message(text) => {
                    self.message = Some(*text);
                    self.message_ticks = MESSAGE_TICKS;
                }
                _ => {}
            }
        }

        /// End-of-run bookkeeping on status transitions
        fn on_status_change(&mut self) {
            let status = self.session.status;
            if status == self.last_status {
                return;
            }

            match status {
                GameStatus::GameOver | GameStatus::Victory => {
                    clear_saved_game();
                    if status == GameStatus::Victory {
                        self.play_sfx(SoundEffect::LevelWin);
                    } else {
                        self.play_sfx(SoundEffect::GameOver);
                    }
                    let score = self.session.score;
                    if let Some(rank) =
                        self.highscores
                            .add_score(score, self.session.level, js_sys::Date::now())
                    {
                        log::info!("New high score rank {}: {}", rank, score);
                        self.play_sfx(SoundEffect::HighScore);
                        self.highscores.save();
                    }
                }
                GameStatus::Playing => {
                    // Show the level's lesson text as the opening HUD message
                    if let Some(world) = self.session.world.as_ref() {
                        self.message = Some(world.level.description);
                        self.message_ticks = MESSAGE_TICKS;
                    }
                    self.save_game();
                    self.input.clear();
                }
                _ => {}
            }
            self.last_status = status;
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(world) = self.session.world.as_ref() {
                draw_frame(&self.ctx, world, &self.settings);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("${}", self.session.score)));
            }

            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.session.lives.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-health .hud-value").ok().flatten() {
                let health = self
                    .session
                    .world
                    .as_ref()
                    .map(|w| w.player.health.max(0))
                    .unwrap_or(0);
                el.set_text_content(Some(&"❤️".repeat(health as usize)));
            }

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                let name = self
                    .session
                    .world
                    .as_ref()
                    .map(|w| w.level.name)
                    .unwrap_or("");
                el.set_text_content(Some(&format!("{} - {}", self.session.level, name)));
            }

            // Transient pickup/powerup message
            if let Some(el) = document.get_element_by_id("hud-message") {
                match self.message {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "hud-message");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hud-message hidden");
                    }
                }
            }

            self.update_overlay(&document, "menu", GameStatus::Menu);
            self.update_overlay(&document, "level-complete", GameStatus::LevelComplete);
            self.update_overlay(&document, "game-over", GameStatus::GameOver);
            self.update_overlay(&document, "victory", GameStatus::Victory);

            if self.session.status == GameStatus::LevelComplete {
                if let Some(el) = document.get_element_by_id("level-complete-title") {
                    let boss = self
                        .session
                        .world
                        .as_ref()
                        .map(|w| w.level.boss_theme)
                        .unwrap_or("");
                    el.set_text_content(Some(&format!("You beat {}!", boss)));
                }
            }

            if matches!(
                self.session.status,
                GameStatus::GameOver | GameStatus::Victory
            ) {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&format!("${}", self.session.score)));
                }
                if let Some(el) = document.get_element_by_id("best-score") {
                    if let Some(best) = self.highscores.top_score() {
                        el.set_text_content(Some(&format!("${}", best)));
                    }
                }
            }
        }

        fn update_overlay(&self, document: &web_sys::Document, id: &str, status: GameStatus) {
            if let Some(el) = document.get_element_by_id(id) {
                if self.session.status == status {
                    let _ = el.set_attribute("class", "overlay");
                } else {
                    let _ = el.set_attribute("class", "overlay hidden");
                }
            }
        }

        /// Save run snapshot to LocalStorage
        fn save_game(&self) {
            let Some(snapshot) = self.session.snapshot() else {
                return;
            };
            if let Ok(json) = serde_json::to_string(&snapshot) {
                if let Some(storage) = web_sys::window()
                    .and_then(|w| w.local_storage().ok())
                    .flatten()
                {
                    let _ = storage.set_item(SAVE_KEY, &json);
                    log::info!("Run saved (level {})", snapshot.level);
                }
            }
        }
    }

    /// Load saved run from LocalStorage
    fn load_saved_game() -> Option<ResumeState> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(SAVE_KEY).ok()??;
        serde_json::from_str(&json).ok()
    }

    /// Clear saved run from LocalStorage
    fn clear_saved_game() {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.remove_item(SAVE_KEY);
            log::info!("Saved run cleared");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Runway Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let game = Rc::new(RefCell::new(Game::new(ctx)));

        // A saved run swaps the menu's start button for a continue choice
        let saved_game = load_saved_game();
        if let Some(ref save) = saved_game {
            if let Some(el) = document.get_element_by_id("continue-prompt") {
                let _ = el.set_attribute("class", "");
            }
            if let Some(el) = document.get_element_by_id("continue-level") {
                el.set_text_content(Some(&save.level.to_string()));
            }
            log::info!("Found saved run at level {}", save.level);
        }

        setup_input_handlers(game.clone());
        setup_touch_controls(&document, game.clone());
        setup_buttons(&document, game.clone(), saved_game);

        request_animation_frame(game);

        log::info!("Runway Runner running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();

                if g.input.set_key(&event.code(), true) {
                    event.prevent_default();
                    return;
                }

                // Enter advances whichever screen is up
                if event.code() == "Enter" {
                    match g.session.status {
                        GameStatus::Menu => g.session.start(),
                        GameStatus::LevelComplete => g.session.next_level(),
                        GameStatus::GameOver | GameStatus::Victory => g.session.restart(),
                        GameStatus::Playing => {}
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().input.set_key(&event.code(), false) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur drops held keys and optionally mutes
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.clear();
                if g.settings.mute_on_blur && !g.settings.muted {
                    g.settings.muted = true;
                    g.muted_by_blur = true;
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Regaining focus lifts a blur mute
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.muted_by_blur {
                    g.settings.muted = false;
                    g.muted_by_blur = false;
                }
            });
            let _ = window
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page teardown: save and stop the frame chain
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.save_game();
                g.stopped = true;
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen touch buttons: left, right, jump
    fn setup_touch_controls(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // CSS hides the buttons on pointer devices; the setting forces them on
        if game.borrow().settings.force_touch_controls {
            if let Some(el) = document.get_element_by_id("touch-controls") {
                let _ = el.set_attribute("class", "");
            }
        }

        let buttons: [(&str, fn(&mut Game, bool)); 3] = [
            ("touch-left", |g, down| g.input.set_touch_left(down)),
            ("touch-right", |g, down| g.input.set_touch_right(down)),
            ("touch-jump", |g, down| g.input.set_touch_jump(down)),
        ];

        for (id, setter) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, down) in [("touchstart", true), ("touchend", false), ("touchcancel", false)] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    setter(&mut g, down);
                });
                let _ = el
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_buttons(
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
        saved_game: Option<ResumeState>,
    ) {
        // Start a fresh run from the menu
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                clear_saved_game();
                g.session.start();
                hide_continue_prompt();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resume the saved run
        if let Some(btn) = document.get_element_by_id("continue-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Some(save) = saved_game {
                    g.session.resume(save);
                    log::info!("Resumed run at level {}", save.level);
                } else {
                    g.session.start();
                }
                hide_continue_prompt();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Advance past the level-complete screen
        if let Some(btn) = document.get_element_by_id("next-level-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.next_level();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart from game over or victory
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn hide_continue_prompt() {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id("continue-prompt") {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.stopped {
                return;
            }

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
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
    use runway_runner::session::{GameStatus, Session};
    use runway_runner::sim::TickInput;

    env_logger::init();
    log::info!("Runway Runner (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: hold right and jump whenever grounded
    let mut session = Session::new();
    session.start();
    for _ in 0..3600 {
        let jump = session
            .world
            .as_ref()
            .map(|w| w.player.grounded)
            .unwrap_or(false);
        let input = TickInput {
            right: true,
            jump,
            ..TickInput::default()
        };
        session.advance(&input);
        if session.status != GameStatus::Playing {
            break;
        }
    }
    println!(
        "After 60s: status={:?} level={} lives={} score={}",
        session.status, session.level, session.lives, session.score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
