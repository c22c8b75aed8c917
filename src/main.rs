//! Orbital Missions entry point
//!
//! Handles platform-specific initialization and runs the frame loop. The 3D
//! scene itself lives in the page (`globalThis.orbitalScene`); this shell
//! feeds it positions and reflects mission state in the DOM.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlInputElement, MouseEvent};

    use glam::{Vec2, Vec3};
    use orbital_missions::audio::AudioManager;
    use orbital_missions::sim::{
        Camera, GameEvent, RenderHandle, SimulationState, Viewport, handle_interaction, resolve,
        tick,
    };
    use orbital_missions::{Settings, neo, score_text};

    // JS bindings for the page's scene object
    #[wasm_bindgen(inline_js = "
        function scene() {
            return globalThis.orbitalScene || null;
        }

        export function scene_add_body(name, radius, color, texture, x, y, z) {
            const s = scene();
            return s ? s.addBody(name, radius, color, texture, x, y, z) >>> 0 : 0;
        }

        export function scene_remove_body(handle) {
            const s = scene();
            if (s) s.removeBody(handle);
        }

        export function scene_set_position(handle, x, y, z) {
            const s = scene();
            if (s) s.setPosition(handle, x, y, z);
        }

        export function scene_set_controls_enabled(enabled) {
            const s = scene();
            if (s) s.setControlsEnabled(enabled);
        }

        export function scene_camera() {
            const s = scene();
            return new Float32Array(s ? s.camera() : []);
        }

        export function scene_render() {
            const s = scene();
            if (s) s.render();
        }
    ")]
    extern "C" {
        fn scene_add_body(
            name: &str,
            radius: f32,
            color: u32,
            texture: Option<String>,
            x: f32,
            y: f32,
            z: f32,
        ) -> u32;
        fn scene_remove_body(handle: u32);
        fn scene_set_position(handle: u32, x: f32, y: f32, z: f32);
        fn scene_set_controls_enabled(enabled: bool);
        fn scene_camera() -> js_sys::Float32Array;
        fn scene_render();
    }

    /// Game instance holding all state
    struct Game {
        state: SimulationState,
        audio: AudioManager,
        settings: Settings,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut state = SimulationState::new(seed);
            state.set_time_multiplier(settings.time_multiplier);

            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());

            Self {
                state,
                audio,
                settings,
                last_time: 0.0,
            }
        }

        /// Run one frame of simulation
        fn update(&mut self, dt: f32) {
            tick(&mut self.state, dt);

            for body in self.state.bodies() {
                if let Some(handle) = body.render {
                    let p = body.position;
                    scene_set_position(handle.0, p.x, p.y, p.z);
                }
            }

            self.process_events();
        }

        /// Reflect pending simulation events in the scene and DOM
        fn process_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::ScoreChanged(score) => set_text("score", &score_text(score)),
                    GameEvent::MissionChanged { text, details } => {
                        set_text("mission", &text);
                        set_text("missionDetails", &details);
                    }
                    GameEvent::Sound(effect) => self.audio.play(effect),
                    GameEvent::ControlsEnabled(enabled) => scene_set_controls_enabled(enabled),
                    GameEvent::Notice(msg) => {
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&msg);
                        }
                    }
                    GameEvent::BodySpawned(id) => {
                        let Some(body) = self.state.body(id) else {
                            continue;
                        };
                        let p = body.position;
                        let handle = scene_add_body(
                            &body.name,
                            body.radius,
                            body.appearance.color,
                            body.appearance.texture.clone(),
                            p.x,
                            p.y,
                            p.z,
                        );
                        if handle != 0 {
                            self.state.attach_render(id, RenderHandle(handle));
                        }
                    }
                    GameEvent::BodyRemoved { handle, .. } => {
                        if let Some(handle) = handle {
                            scene_remove_body(handle.0);
                        }
                    }
                }
            }
        }

        /// Resolve a click and feed it to the mission
        fn click(&mut self, x: f32, y: f32) {
            let Some(viewport) = viewport() else { return };
            let camera = current_camera();
            if let Some(id) = resolve(&self.state, &camera, &viewport, Vec2::new(x, y)) {
                handle_interaction(&mut self.state, id);
                self.process_events();
            }
        }

        fn set_time_multiplier(&mut self, value: f32) {
            self.state.set_time_multiplier(value);
            self.settings.time_multiplier = self.state.time_multiplier();
            self.settings.save();
        }
    }

    impl AsMut<SimulationState> for Game {
        fn as_mut(&mut self) -> &mut SimulationState {
            &mut self.state
        }
    }

    fn set_text(id: &str, text: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn viewport() -> Option<Viewport> {
        let window = web_sys::window()?;
        let w = window.inner_width().ok()?.as_f64()?;
        let h = window.inner_height().ok()?.as_f64()?;
        Some(Viewport::new(w as f32, h as f32))
    }

    /// Camera as reported by the scene: [eye xyz, target xyz, fov degrees]
    fn current_camera() -> Camera {
        let values = scene_camera().to_vec();
        if values.len() < 7 {
            return Camera::default();
        }
        Camera {
            eye: Vec3::new(values[0], values[1], values[2]),
            target: Vec3::new(values[3], values[4], values[5]),
            fov_y: values[6].to_radians(),
            ..Camera::default()
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Orbital Missions starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings.clone())));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            let score = g.state.mission.score;
            let mission = g.state.mission.text();
            set_text("score", &score_text(score));
            set_text("mission", &mission);
            set_text("missionDetails", "Click on an asteroid to mine it.");
            g.process_events();
        }

        setup_input_handlers(game.clone(), &settings);
        start_neo_fetch(game.clone(), &settings);

        request_animation_frame(game);

        log::info!("Orbital Missions running!");
    }

    fn start_neo_fetch(game: Rc<RefCell<Game>>, settings: &Settings) {
        let (start, end) = neo::date_window(settings.feed_window_days);
        let url = neo::feed_url(&settings.feed_base_url, &start, &end, &settings.feed_api_key);
        log::info!("Fetching NEO feed for {} to {}", start, end);

        wasm_bindgen_futures::spawn_local(async move {
            neo::fetch_and_populate(&url, &game).await;
            game.borrow_mut().process_events();
        });
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>, settings: &Settings) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Clicks on the render surface
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .click(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Time multiplier slider
        if let Some(slider) = document
            .get_element_by_id("timeSlider")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            slider.set_value(&settings.time_multiplier.to_string());
            let input = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match input.value().parse::<f32>() {
                    Ok(value) => game.borrow_mut().set_time_multiplier(value),
                    Err(_) => log::warn!("Ignoring slider value {:?}", input.value()),
                }
            });
            let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
        }
        scene_render();

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless run: load a feed document from disk, simulate a few seconds and
/// play through the missions with the first matching bodies.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use orbital_missions::sim::{
        BodyKind, SimulationState, advance_landing, handle_interaction, tick,
    };
    use orbital_missions::{Settings, neo, score_text};

    env_logger::init();
    log::info!("Orbital Missions (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let mut state = SimulationState::new(42);
    state.set_time_multiplier(settings.time_multiplier);

    match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match neo::ingest(&mut state, &json) {
                Ok((ordinary, hazardous)) => {
                    log::info!("Loaded {} asteroids and {} PHAs from {}", ordinary, hazardous, path)
                }
                Err(e) => log::error!("{}", e),
            },
            Err(e) => log::error!("Could not read {}: {}", path, e),
        },
        None => log::info!("No feed file given; running with planets only"),
    }

    for _ in 0..60 {
        tick(&mut state, 1.0 / 60.0);
    }

    let targets: Vec<_> = state
        .asteroids()
        .iter()
        .take(3)
        .chain(state.hazardous().iter().take(1))
        .copied()
        .chain(
            state
                .bodies()
                .filter(|b| b.kind == BodyKind::Planet)
                .map(|b| b.id)
                .take(1),
        )
        .collect();
    for id in targets {
        let outcome = handle_interaction(&mut state, id);
        log::info!("{:?} -> {:?}", id, outcome);
    }
    advance_landing(&mut state, orbital_missions::consts::LANDING_DELAY_SECS);

    println!("{}", state.mission.text());
    println!("{}", score_text(state.mission.score));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
