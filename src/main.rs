//! Rocket Arcade entry point
//!
//! Web builds run the arcade shell: a requestAnimationFrame loop feeding
//! measured, clamped real time into the active simulation, with input
//! snapshots, Canvas 2D rendering, audio, and best-score persistence.
//! Native builds run a short headless demo of each simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_arcade {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent};

    use rocket_arcade::audio::{AudioManager, SoundEffect};
    use rocket_arcade::render::{self, Starfield, Surface};
    use rocket_arcade::scores::{self, BestScore};
    use rocket_arcade::seed;
    use rocket_arcade::settings::Settings;
    use rocket_arcade::sim::balance::{self, BalanceEvent, BalanceInput, BalanceWorld};
    use rocket_arcade::sim::gate::{self, GateEvent, GateInput, GateWorld};
    use rocket_arcade::sim::orbit::{self, OrbitEvent, OrbitInput, OrbitWorld};

    /// The game this page is hosting, selected via `?game=`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum GameKind {
        Orbit,
        Balance,
        Gate,
    }

    enum Session {
        Orbit(OrbitWorld),
        Balance(BalanceWorld),
        Gate(GateWorld),
    }

    impl Session {
        fn running(&self) -> bool {
            match self {
                Session::Orbit(w) => w.running,
                Session::Balance(w) => w.running,
                Session::Gate(w) => w.running,
            }
        }
    }

    /// Held input state, sampled into a snapshot once per frame
    #[derive(Debug, Default)]
    struct Held {
        thrust: bool,
        left: bool,
        right: bool,
        brake: bool,
        /// One-shot: set on press, cleared after the step that consumes it
        flap: bool,
    }

    struct Arcade {
        kind: GameKind,
        session: Session,
        held: Held,
        settings: Settings,
        surface: Surface,
        starfield: Starfield,
        audio: AudioManager,
        orbit_best: BestScore,
        balance_best_time: BestScore,
        balance_best_score: BestScore,
        gate_best: BestScore,
        last_time: f64,
        /// Set once the current run's result has been reported
        run_reported: bool,
    }

    impl Arcade {
        fn new(kind: GameKind, surface: Surface, settings: Settings) -> Self {
            let starfield = Starfield::new(surface.width, surface.height);
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            let session = fresh_session(kind, &settings, &surface);
            Self {
                kind,
                session,
                held: Held::default(),
                settings,
                surface,
                starfield,
                audio,
                orbit_best: BestScore::load(scores::ORBIT_BEST_KEY),
                balance_best_time: BestScore::load(scores::BALANCE_BEST_TIME_KEY),
                balance_best_score: BestScore::load(scores::BALANCE_BEST_SCORE_KEY),
                gate_best: BestScore::load(&scores::gate_best_key(&seed::ymd_label())),
                last_time: 0.0,
                run_reported: false,
            }
        }

        fn restart(&mut self) {
            self.session = fresh_session(self.kind, &self.settings, &self.surface);
            self.held = Held::default();
            self.run_reported = false;
            self.audio.resume();
            set_overlay_visible(false);
            log::info!("Run started ({:?})", self.kind);
        }

        /// Advance the active simulation by one clamped real-time step
        fn update(&mut self, dt: f32) {
            match &mut self.session {
                Session::Orbit(world) => {
                    let input = OrbitInput {
                        thrust: self.held.thrust,
                        turn_left: self.held.left,
                        turn_right: self.held.right,
                        brake: self.held.brake,
                    };
                    orbit::step(world, &input, dt);

                    let burning =
                        !world.ship.landed && self.held.thrust && world.ship.fuel > 0.01;
                    self.audio.set_engine_level(if burning { 1.0 } else { 0.0 });

                    for event in world.events.clone() {
                        match event {
                            OrbitEvent::Landed { .. } => self.audio.play(SoundEffect::Land),
                            OrbitEvent::Bounced => self.audio.play(SoundEffect::Bounce),
                            OrbitEvent::Launched => self.audio.play(SoundEffect::Launch),
                            OrbitEvent::StarCollected => {
                                self.audio.play(SoundEffect::StarCollect)
                            }
                            OrbitEvent::RunEnded => self.audio.play(SoundEffect::LostInSpace),
                        }
                    }
                }
                Session::Balance(world) => {
                    world.width = self.surface.width;
                    let input = BalanceInput {
                        left: self.held.left,
                        right: self.held.right,
                    };
                    balance::step(world, &input, dt);

                    let burning = world.fuel > 0.01 && (self.held.left || self.held.right);
                    self.audio.set_engine_level(if burning { 0.85 } else { 0.0 });

                    for event in world.events.clone() {
                        match event {
                            BalanceEvent::CheckPassed => self.audio.play(SoundEffect::CheckPass),
                            BalanceEvent::CheckFailed => self.audio.play(SoundEffect::CheckFail),
                            BalanceEvent::Crashed => self.audio.play(SoundEffect::Crash),
                            BalanceEvent::CheckStarted => {}
                        }
                    }
                }
                Session::Gate(world) => {
                    world.width = self.surface.width;
                    world.height = self.surface.height;
                    let input = GateInput {
                        flap: self.held.flap,
                    };
                    gate::step(world, &input, dt);
                    self.held.flap = false;

                    for event in world.events.clone() {
                        match event {
                            GateEvent::Flapped => self.audio.play(SoundEffect::Flap),
                            GateEvent::GatePassed => self.audio.play(SoundEffect::GatePass),
                            GateEvent::Died => self.audio.play(SoundEffect::GateCrash),
                        }
                    }
                }
            }

            if !self.session.running() && !self.run_reported {
                self.finish_run();
            }
        }

        /// Report the result once: bests, HUD, overlay
        fn finish_run(&mut self) {
            self.run_reported = true;
            self.audio.set_engine_level(0.0);

            let (last_label, new_best, best_label) = match &self.session {
                Session::Orbit(world) => {
                    let score = world.score.floor() as f64;
                    let improved = self.orbit_best.submit(score);
                    (
                        format!("{score}"),
                        improved,
                        format!("{}", self.orbit_best.value),
                    )
                }
                Session::Balance(world) => {
                    let time = f64::from(world.time);
                    let score = f64::from(world.score.floor());
                    self.balance_best_score.submit(score);
                    let improved = self.balance_best_time.submit(time);
                    (
                        format!("{time:.1}s"),
                        improved,
                        format!("{:.1}s", self.balance_best_time.value),
                    )
                }
                Session::Gate(world) => {
                    let passed = f64::from(world.passed);
                    let improved = self.gate_best.submit(passed);
                    (
                        format!("{}", world.passed),
                        improved,
                        format!("{}", self.gate_best.value),
                    )
                }
            };

            set_text("last", &last_label);
            set_text("best", &best_label);
            if new_best {
                log::info!("Run ended with a new best: {last_label}");
            } else {
                log::info!("Run ended: {last_label}");
            }
            show_game_over(self.kind);
        }

        fn render(&mut self) {
            if self.surface.resize() {
                self.starfield
                    .regenerate(self.surface.width, self.surface.height);
            }
            match &self.session {
                Session::Orbit(world) => {
                    render::orbit::draw(&self.surface, &self.starfield, world, self.held.thrust)
                }
                Session::Balance(world) => render::balance::draw(
                    &self.surface,
                    &self.starfield,
                    world,
                    self.held.left,
                    self.held.right,
                ),
                Session::Gate(world) => {
                    let mode = if self.settings.practice_gate {
                        "practice"
                    } else {
                        "daily"
                    };
                    render::gate::draw(&self.surface, world, self.held.thrust, mode)
                }
            }
        }
    }

    fn fresh_session(kind: GameKind, settings: &Settings, surface: &Surface) -> Session {
        match kind {
            GameKind::Orbit => {
                let seed = if settings.daily_orbit {
                    seed::orbit_daily_seed()
                } else {
                    seed::free_seed()
                };
                set_text("seed-label", &seed.to_string());
                set_text(
                    "mode-label",
                    if settings.daily_orbit { "daily" } else { "free" },
                );
                Session::Orbit(OrbitWorld::new(seed))
            }
            GameKind::Balance => Session::Balance(BalanceWorld::new(
                surface.width,
                settings.easy_balance,
            )),
            GameKind::Gate => {
                let seed = if settings.practice_gate {
                    seed::free_seed()
                } else {
                    seed::gate_daily_seed()
                };
                set_text("day-label", &seed::ymd_label());
                Session::Gate(GateWorld::new(seed, surface.width, surface.height))
            }
        }
    }

    // === DOM helpers (all absent elements are silently skipped) ===

    fn document() -> Option<web_sys::Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_overlay_visible(visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id("overlay")) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn show_game_over(kind: GameKind) {
        let (title, text) = match kind {
            GameKind::Orbit => (
                "Lost in space",
                "You drifted too far. Short bursts + gravity turns are the move.",
            ),
            GameKind::Balance => (
                "Crashed",
                "Try smaller, earlier taps. Don't chase the wobble - damp it.",
            ),
            GameKind::Gate => (
                "Crashed",
                "Try smaller taps. Find a rhythm - today's gates are learnable.",
            ),
        };
        set_text("overlay-title", title);
        set_text("overlay-text", text);
        set_text("start-btn", "Try again");
        set_overlay_visible(true);
    }

    fn game_kind_from_url() -> GameKind {
        let raw = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("game"))
            .unwrap_or_default();
        match raw.as_str() {
            "balance" => GameKind::Balance,
            "gate" => GameKind::Gate,
            _ => GameKind::Orbit,
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Rocket Arcade starting...");

        let document = document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let surface = Surface::new(canvas.clone()).expect("no 2d context");
        let settings = Settings::load();
        let kind = game_kind_from_url();
        log::info!("Hosting {:?}", kind);

        let arcade = Rc::new(RefCell::new(Arcade::new(kind, surface, settings)));

        // Startup HUD: show the persisted best
        {
            let a = arcade.borrow();
            let best = match kind {
                GameKind::Orbit => format!("{}", a.orbit_best.value),
                GameKind::Balance => format!("{:.1}s", a.balance_best_time.value),
                GameKind::Gate => format!("{}", a.gate_best.value),
            };
            set_text("best", &best);
        }

        setup_input_handlers(&canvas, arcade.clone());
        setup_buttons(arcade.clone());
        setup_toggles(arcade.clone());
        setup_auto_mute(arcade.clone());

        set_overlay_visible(true);
        request_animation_frame(arcade);

        log::info!("Rocket Arcade running");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, arcade: Rc<RefCell<Arcade>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard press
        {
            let arcade = arcade.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = arcade.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        if !a.session.running() {
                            a.restart();
                        }
                        if !event.repeat() {
                            a.held.flap = true;
                        }
                        a.held.thrust = true;
                        a.audio.resume();
                    }
                    "KeyA" | "ArrowLeft" => {
                        event.prevent_default();
                        a.held.left = true;
                    }
                    "KeyD" | "ArrowRight" => {
                        event.prevent_default();
                        a.held.right = true;
                    }
                    "KeyS" | "ArrowDown" => {
                        event.prevent_default();
                        a.held.brake = true;
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard release
        {
            let arcade = arcade.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = arcade.borrow_mut();
                match event.code().as_str() {
                    "Space" => a.held.thrust = false,
                    "KeyA" | "ArrowLeft" => a.held.left = false,
                    "KeyD" | "ArrowRight" => a.held.right = false,
                    "KeyS" | "ArrowDown" => a.held.brake = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer press: thrust (orbit), flap (gate), half-screen thrusters
        // (balance)
        {
            let arcade = arcade.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut a = arcade.borrow_mut();
                a.audio.resume();
                match a.kind {
                    GameKind::Balance => {
                        let half = canvas_clone.client_width() as f32 / 2.0;
                        if (event.offset_x() as f32) < half {
                            a.held.left = true;
                        } else {
                            a.held.right = true;
                        }
                    }
                    GameKind::Gate => a.held.flap = true,
                    GameKind::Orbit => a.held.thrust = true,
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer release anywhere clears held pointer inputs
        {
            let arcade = arcade.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut a = arcade.borrow_mut();
                a.held.thrust = false;
                a.held.left = false;
                a.held.right = false;
            });
            let _ = window
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(arcade: Rc<RefCell<Arcade>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let arcade = arcade.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = arcade.borrow_mut();
                if !a.session.running() {
                    a.restart();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset wipes the persisted best for this page's game
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = arcade.borrow_mut();
                match a.kind {
                    GameKind::Orbit => a.orbit_best.reset(),
                    GameKind::Balance => {
                        a.balance_best_time.reset();
                        a.balance_best_score.reset();
                    }
                    GameKind::Gate => a.gate_best.reset(),
                }
                set_text("best", "0");
                log::info!("Best score reset");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Optional per-page checkboxes: sound, daily/practice/easy modes
    fn setup_toggles(arcade: Rc<RefCell<Arcade>>) {
        let Some(document) = document() else { return };

        let bind = |id: &str, arcade: Rc<RefCell<Arcade>>, apply: fn(&mut Settings, bool)| {
            let Some(el) = document.get_element_by_id(id) else {
                return;
            };
            let Ok(input) = el.dyn_into::<HtmlInputElement>() else {
                return;
            };
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = arcade.borrow_mut();
                apply(&mut a.settings, input_clone.checked());
                a.settings.save();
                let vol = a.settings.effective_volume();
                a.audio.set_volume(vol);
            });
            let _ =
                input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        };

        bind("sound-toggle", arcade.clone(), |s, on| s.sound = on);
        bind("daily-toggle", arcade.clone(), |s, on| s.daily_orbit = on);
        bind("practice-toggle", arcade.clone(), |s, on| {
            s.practice_gate = on
        });
        bind("easy-toggle", arcade, |s, on| s.easy_balance = on);
    }

    /// Cut the engine loop when the tab is hidden
    fn setup_auto_mute(arcade: Rc<RefCell<Arcade>>) {
        let Some(document) = document() else { return };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                arcade.borrow_mut().audio.set_engine_level(0.0);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(arcade: Rc<RefCell<Arcade>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame(arcade, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(arcade: Rc<RefCell<Arcade>>, time: f64) {
        {
            let mut a = arcade.borrow_mut();

            // Measured real dt; the sims clamp it again internally
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            a.last_time = time;

            if a.session.running() {
                a.update(dt);
            }
            a.render();
        }
        request_animation_frame(arcade);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_arcade::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rocket_arcade::sim::balance::{self, BalanceInput, BalanceWorld};
    use rocket_arcade::sim::gate::{self, GateInput, GateWorld};
    use rocket_arcade::sim::orbit::{self, OrbitInput, OrbitWorld};

    env_logger::init();
    log::info!("Rocket Arcade (native) - headless demo run");

    let dt = 1.0 / 120.0;

    // Orbit Hop: coast for ten simulated seconds, then burn prograde
    let mut orbit_world = OrbitWorld::new(rocket_arcade::seed::orbit_daily_seed());
    for step_index in 0..(30.0 / dt) as u32 {
        let input = OrbitInput {
            thrust: step_index > (10.0 / dt) as u32,
            ..Default::default()
        };
        orbit::step(&mut orbit_world, &input, dt);
        if !orbit_world.running {
            break;
        }
    }
    log::info!(
        "Orbit Hop: score {} visited {} stars {}",
        orbit_world.score.floor(),
        orbit_world.visited.len(),
        orbit_world.stars_collected()
    );

    // Balance: alternate corrective taps against the wind
    let mut balance_world = BalanceWorld::new(900.0, false);
    for _ in 0..(30.0 / dt) as u32 {
        let input = BalanceInput {
            left: balance_world.angle > 0.05,
            right: balance_world.angle < -0.05,
        };
        balance::step(&mut balance_world, &input, dt);
        if !balance_world.running {
            break;
        }
    }
    log::info!(
        "Balance: survived {:.1}s, score {}, checks {}/{}",
        balance_world.time,
        balance_world.score.floor(),
        balance_world.checks_passed,
        balance_world.checks_done
    );

    // Gate Run: flap whenever the ship sinks below the next gap
    let mut gate_world = GateWorld::new(rocket_arcade::seed::gate_daily_seed(), 900.0, 500.0);
    for _ in 0..(60.0 / dt) as u32 {
        let target = gate_world
            .gates
            .iter()
            .find(|g| g.x + gate_world.tuning.gate_width >= gate_world.tuning.player_x)
            .map(|g| g.center)
            .unwrap_or(250.0);
        let input = GateInput {
            flap: gate_world.y > target && gate_world.vy > -50.0,
        };
        gate::step(&mut gate_world, &input, dt);
        if !gate_world.running {
            break;
        }
    }
    log::info!(
        "Gate Run: {} gates in {:.1}s",
        gate_world.passed,
        gate_world.time
    );
}
