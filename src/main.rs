//! Rudolph Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use rudolph_flap::audio::{AudioManager, SilentAudio, SoundEffect, SoundPlayer};
    use rudolph_flap::character::CHARACTERS;
    use rudolph_flap::renderer::{RenderState, build_scene};
    use rudolph_flap::session::NullHost;
    use rudolph_flap::sim::{GamePhase, GameState};
    use rudolph_flap::storage::LocalStore;
    use rudolph_flap::{
        Action, CharacterProfile, Economy, FrameStatus, Session, SessionHost, Settings,
    };

    /// Shell side of an interactive session: pays out coins and tracks exit requests
    struct ShellHost {
        economy: Rc<RefCell<Economy>>,
        store: LocalStore,
        exit_requested: bool,
    }

    impl SessionHost for ShellHost {
        fn character(&self) -> CharacterProfile {
            self.economy.borrow().active_character().clone()
        }

        fn on_session_end(&mut self, coins_earned: u32) {
            let mut economy = self.economy.borrow_mut();
            economy.credit(coins_earned);
            economy.save(&self.store);
        }

        fn on_request_close(&mut self) {
            self.exit_requested = true;
        }
    }

    type PlaySession = Session<ShellHost, Rc<AudioManager>>;
    type AttractSession = Session<NullHost, SilentAudio>;

    /// Which session a frame chain is driving
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Screen {
        Menu,
        Play,
    }

    /// Game instance holding all state
    struct Game {
        play: Option<PlaySession>,
        attract: Option<AttractSession>,
        render_state: Option<RenderState>,
        economy: Rc<RefCell<Economy>>,
        store: LocalStore,
        settings: Settings,
        audio: Rc<AudioManager>,
        /// Bumped whenever the menu chain is restarted so stale chains die
        menu_epoch: u32,
        start_time: f64,
        /// CSS pixel size of the canvas
        client_size: (f32, f32),
    }

    impl Game {
        fn new(start_time: f64, client_size: (f32, f32)) -> Self {
            let store = LocalStore;
            let settings = Settings::load(&store);
            let audio = Rc::new(AudioManager::new());
            audio.apply_settings(&settings);
            Self {
                play: None,
                attract: None,
                render_state: None,
                economy: Rc::new(RefCell::new(Economy::load(&store))),
                store,
                settings,
                audio,
                menu_epoch: 0,
                start_time,
                client_size,
            }
        }

        fn seed() -> u64 {
            js_sys::Date::now() as u64
        }

        /// Replace any attract run with a fresh one and show the menu
        fn open_menu(&mut self) -> u32 {
            let mut attract = Session::new_attract(NullHost, SilentAudio, Self::seed());
            attract.resize(self.client_size.0, self.client_size.1);
            self.attract = Some(attract);
            self.menu_epoch = self.menu_epoch.wrapping_add(1);
            self.update_menu();
            self.menu_epoch
        }

        fn open_play(&mut self) {
            if let Some(attract) = self.attract.as_mut() {
                attract.close();
            }
            self.attract = None;

            let host = ShellHost {
                economy: Rc::clone(&self.economy),
                store: self.store,
                exit_requested: false,
            };
            let mut play = Session::new_interactive(host, Rc::clone(&self.audio), Self::seed());
            play.resize(self.client_size.0, self.client_size.1);
            self.play = Some(play);
            self.audio.resume();

            if let Some(document) = document() {
                set_class(&document, "menu", "hidden");
                set_class(&document, "hud", "");
            }
        }

        fn push(&mut self, action: Action) {
            self.audio.resume();
            if let Some(play) = self.play.as_mut() {
                play.push(action);
            }
        }

        fn resize(&mut self, client_w: f32, client_h: f32, width: u32, height: u32) {
            self.client_size = (client_w, client_h);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            if let Some(play) = self.play.as_mut() {
                play.resize(client_w, client_h);
            }
            if let Some(attract) = self.attract.as_mut() {
                attract.resize(client_w, client_h);
            }
        }

        /// Pause an active run (tab hidden, window blurred)
        fn auto_pause(&mut self, reason: &str) {
            if let Some(play) = self.play.as_mut()
                && play.phase() == GamePhase::Playing
            {
                play.push(Action::PauseToggle);
                log::info!("Auto-paused ({reason})");
            }
        }

        fn reset_clocks(&mut self) {
            if let Some(play) = self.play.as_mut() {
                play.reset_clock();
            }
            if let Some(attract) = self.attract.as_mut() {
                attract.reset_clock();
            }
        }

        /// Advance and draw one frame of `screen`'s session
        fn frame(&mut self, screen: Screen, time: f64) -> FrameStatus {
            let time_secs = (time - self.start_time) / 1000.0;
            match screen {
                Screen::Menu => {
                    let Some(attract) = self.attract.as_mut() else {
                        return FrameStatus::Stopped;
                    };
                    let status = attract.frame(time);
                    if status == FrameStatus::Running {
                        draw(&mut self.render_state, attract.state(), &self.settings, time_secs);
                    }
                    status
                }
                Screen::Play => {
                    let Some(play) = self.play.as_mut() else {
                        return FrameStatus::Stopped;
                    };
                    let status = play.frame(time);
                    if status == FrameStatus::Running {
                        draw(&mut self.render_state, play.state(), &self.settings, time_secs);
                        update_hud(play.state());
                    }
                    status
                }
            }
        }

        /// Tear down a finished run
        fn close_play(&mut self) {
            if let Some(play) = self.play.take()
                && play.host().exit_requested
            {
                log::info!("Player left the run");
            }
            if let Some(document) = document() {
                set_class(&document, "hud", "hidden");
                set_class(&document, "game-over", "hidden");
                set_class(&document, "pause-overlay", "hidden");
                set_class(&document, "menu", "");
            }
        }

        /// Buy the character if needed, then equip it
        fn select_character(&mut self, id: &str) {
            let mut economy = self.economy.borrow_mut();
            let owned = rudolph_flap::CharacterId::from_id(id).is_some_and(|c| economy.owns(c));
            if !owned {
                match economy.purchase(id) {
                    Ok(_) => self.audio.play(SoundEffect::Score),
                    Err(e) => {
                        log::warn!("Purchase of {id} failed: {e}");
                        self.audio.play(SoundEffect::Crash);
                        return;
                    }
                }
            }
            match economy.equip(id) {
                Ok(()) => self.audio.play(SoundEffect::Click),
                Err(e) => log::warn!("Equip of {id} failed: {e}"),
            }
            economy.save(&self.store);
            drop(economy);
            self.update_menu();
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.apply_settings(&self.settings);
            self.settings.save(&self.store);
            self.update_menu();
        }

        /// Wallet, shop buttons and mute label
        fn update_menu(&self) {
            let Some(document) = document() else {
                return;
            };
            let economy = self.economy.borrow();
            set_text(&document, "wallet", &economy.wallet.to_string());
            set_text(
                &document,
                "mute-btn",
                if self.settings.muted { "SOUND OFF" } else { "SOUND ON" },
            );

            for character in &CHARACTERS {
                let id = character.id;
                let label = if economy.equipped == id {
                    format!("{} (equipped)", character.name)
                } else if economy.owns(id) {
                    format!("{} (owned)", character.name)
                } else {
                    format!("{} - {} coins", character.name, character.cost)
                };
                let button_id = format!("shop-{}", id.as_str());
                set_text(&document, &button_id, &label);
                set_text(&document, &format!("{button_id}-desc"), character.description);
                if let Some(el) = document.get_element_by_id(&button_id) {
                    let style = format!("border-left: 6px solid {}", character.badge_css());
                    let _ = el.set_attribute("style", &style);
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn draw(render_state: &mut Option<RenderState>, state: &GameState, settings: &Settings, time_secs: f64) {
        let Some(render_state) = render_state.as_mut() else {
            return;
        };
        let vertices = build_scene(state, settings, time_secs);
        match render_state.render(&vertices, state.viewport_width) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                render_state.resize(render_state.size.0, render_state.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(state: &GameState) {
        let Some(document) = document() else {
            return;
        };

        set_text(&document, "hud-coins", &state.coins_collected.to_string());
        set_text(&document, "hud-level", &format!("Lvl {}", state.level_index + 1));

        match &state.level_banner {
            Some(banner) => {
                set_text(&document, "level-banner", banner.name);
                set_class(&document, "level-banner", "");
            }
            None => set_class(&document, "level-banner", "hidden"),
        }

        let start = state.phase == GamePhase::Start;
        set_class(&document, "start-prompt", if start { "" } else { "hidden" });
        if start {
            set_text(
                &document,
                "start-character",
                &format!("Playing as {}", state.character.name),
            );
        }

        let paused = state.phase == GamePhase::Paused;
        set_class(&document, "pause-overlay", if paused { "" } else { "hidden" });

        let over = state.phase == GamePhase::GameOver;
        set_class(&document, "game-over", if over { "" } else { "hidden" });
        if over {
            set_text(&document, "final-coins", &state.coins_collected.to_string());
        }
    }

    /// Size the canvas backing store to its CSS size times the pixel ratio
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32, u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (client_w as f32, client_h as f32, width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Rudolph Flap starting...");

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

        let (client_w, client_h, width, height) = fit_canvas(&canvas);
        let now = window.performance().map_or_else(js_sys::Date::now, |p| p.now());
        let game = Rc::new(RefCell::new(Game::new(now, (client_w, client_h))));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {e}"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas, game.clone());
        setup_auto_pause(game.clone());

        let epoch = game.borrow_mut().open_menu();
        request_animation_frame(game, Screen::Menu, epoch);

        log::info!("Rudolph Flap running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().push(Action::Primary);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().push(Action::Primary);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let action = match event.code().as_str() {
                    "Space" | "ArrowUp" => Action::Primary,
                    "KeyP" => Action::PauseToggle,
                    "Escape" => Action::Cancel,
                    _ => return,
                };
                if event.repeat() {
                    return;
                }
                event.prevent_default();
                game.borrow_mut().push(action);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        {
            let game = game.clone();
            on_click(&document, "play-btn", move || {
                if game.borrow().play.is_some() {
                    return;
                }
                game.borrow_mut().open_play();
                request_animation_frame(game.clone(), Screen::Play, 0);
            });
        }

        {
            let game = game.clone();
            on_click(&document, "retry-btn", move || game.borrow_mut().push(Action::Primary));
        }

        {
            let game = game.clone();
            on_click(&document, "exit-btn", move || game.borrow_mut().push(Action::Cancel));
        }

        {
            let game = game.clone();
            on_click(&document, "resume-btn", move || {
                game.borrow_mut().push(Action::PauseToggle)
            });
        }

        {
            let game = game.clone();
            on_click(&document, "mute-btn", move || game.borrow_mut().toggle_mute());
        }

        for character in &CHARACTERS {
            let game = game.clone();
            let id = character.id.as_str();
            on_click(&document, &format!("shop-{id}"), move || {
                game.borrow_mut().select_character(id)
            });
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (client_w, client_h, width, height) = fit_canvas(&canvas);
            game.borrow_mut().resize(client_w, client_h, width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, screen: Screen, epoch: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, screen, epoch, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, screen: Screen, epoch: u32, time: f64) {
        let status = {
            let mut g = game.borrow_mut();
            if screen == Screen::Menu && epoch != g.menu_epoch {
                return;
            }
            g.frame(screen, time)
        };

        match (status, screen) {
            (FrameStatus::Running, _) => request_animation_frame(game, screen, epoch),
            (FrameStatus::Stopped, Screen::Play) => {
                let epoch = {
                    let mut g = game.borrow_mut();
                    g.close_play();
                    g.open_menu()
                };
                request_animation_frame(game, Screen::Menu, epoch);
            }
            (FrameStatus::Stopped, Screen::Menu) => {}
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.auto_pause("tab hidden");
                } else {
                    g.reset_clocks();
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
                game.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rudolph_flap::audio::SilentAudio;
    use rudolph_flap::consts::FRAME_TIME_MS;
    use rudolph_flap::session::NullHost;
    use rudolph_flap::sim::GamePhase;
    use rudolph_flap::storage::{KeyValueStore, MemoryStore};
    use rudolph_flap::{Action, CharacterProfile, Economy, Session, SessionHost};

    /// Credits finished runs into an in-memory wallet
    struct LedgerHost {
        economy: Economy,
        store: MemoryStore,
    }

    impl SessionHost for LedgerHost {
        fn character(&self) -> CharacterProfile {
            self.economy.active_character().clone()
        }

        fn on_session_end(&mut self, coins_earned: u32) {
            self.economy.credit(coins_earned);
            self.economy.save(&self.store);
        }

        fn on_request_close(&mut self) {
            log::info!("Run closed, wallet holds {} coins", self.economy.wallet);
        }
    }

    /// Let the autopilot fly for `frames` nominal frames
    pub fn attract(seed: u64, frames: u32) {
        let mut session = Session::new_attract(NullHost, SilentAudio, seed);
        let mut now = 0.0;
        let mut best = 0;
        for _ in 0..frames {
            session.frame(now);
            now += FRAME_TIME_MS;
            best = best.max(session.state().distance_score);
        }
        let state = session.state();
        log::info!(
            "Attract: {} frames, best distance {}, now at {} in tier {}",
            frames,
            best,
            state.distance_score,
            state.level_index
        );
    }

    /// A player who only taps at the start, then one who retries and leaves
    pub fn scripted(seed: u64) {
        let host = LedgerHost {
            economy: Economy::default(),
            store: MemoryStore::new(),
        };
        let mut session = Session::new_interactive(host, SilentAudio, seed);
        session.push(Action::Primary);

        let mut frames = 0;
        while session.phase() != GamePhase::GameOver && frames < 10_000 {
            session.advance(1.0);
            frames += 1;
        }
        log::info!("Run over after {frames} frames");

        session.push(Action::Primary);
        session.advance(1.0);
        log::info!(
            "Retry: phase {:?}, distance {}",
            session.phase(),
            session.state().distance_score
        );

        session.push(Action::Cancel);
        session.advance(1.0);
        let wallet = session.host().store.get(rudolph_flap::economy::WALLET_KEY);
        log::info!("Persisted wallet: {}", wallet.as_deref().unwrap_or("0"));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rudolph Flap (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    headless::attract(seed, 3_600);
    headless::scripted(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
