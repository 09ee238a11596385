//! Character Runner entry point
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
    use web_sys::{
        AddEventListenerOptions, CanvasRenderingContext2d, Document, HtmlCanvasElement,
        HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use character_runner::consts::PLAYER_SPRITE_PATH;
    use character_runner::input::{Direction, client_to_canvas, should_prevent_default};
    use character_runner::persistence::LocalStore;
    use character_runner::renderer::{Mesh, RenderState};
    use character_runner::{Game, GameEvent, Settings, Tuning};

    /// Browser-side state around the game
    struct App {
        game: Game,
        settings: Settings,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        document: Document,
    }

    impl App {
        fn sprite_ready(&self) -> bool {
            self.render_state.as_ref().is_some_and(|rs| rs.has_sprite())
        }

        /// Map a client-space pointer position onto the canvas
        fn canvas_pos(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let tuning = self.game.tuning();
            client_to_canvas(
                Vec2::new(client_x as f32, client_y as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
                Vec2::new(rect.width() as f32, rect.height() as f32),
                Vec2::new(tuning.canvas_width, tuning.canvas_height),
            )
        }

        fn render(&mut self) {
            let scene = self.game.scene(&self.settings, self.sprite_ready());
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let mesh = Mesh::from_scene(&scene, self.settings.quality.circle_segments());
            match render_state.render(&mesh, (scene.width, scene.height), scene.clear) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        fn update_hud(&mut self) {
            for event in self.game.drain_events() {
                match event {
                    GameEvent::Started => set_hidden(&self.document, "overlay", true),
                    GameEvent::GameOver { final_score, .. } => {
                        set_text(&self.document, "finalScore", &final_score.to_string());
                        set_hidden(&self.document, "overlay", false);
                    }
                }
            }
            set_text(&self.document, "score", &self.game.score().to_string());
            set_text(&self.document, "best", &self.game.best().to_string());
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let result = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
            if result.is_err() {
                log::warn!("Could not toggle #{id}");
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Character Runner starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game canvas");
            return;
        };

        // Optional overrides from <script type="application/json" id="tuning">
        let mut tuning = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default();
        tuning.canvas_width = canvas.width() as f32;
        tuning.canvas_height = canvas.height() as f32;

        let store = LocalStore::open();
        let mut settings = Settings::load(&store);
        apply_page_preferences(&window, &canvas, &mut settings);
        log::info!("Quality preset: {}", settings.quality.as_str());

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(tuning, Box::new(store), seed);
        set_text(&document, "best", &game.best().to_string());

        let render_state = match init_gpu(&canvas).await {
            Ok(rs) => Some(rs),
            Err(e) => {
                log::error!("GPU unavailable, nothing will be drawn: {e}");
                None
            }
        };

        let app = Rc::new(RefCell::new(App {
            game,
            settings,
            render_state,
            canvas: canvas.clone(),
            document: document.clone(),
        }));

        load_sprite(app.clone(), &document);

        setup_keyboard(app.clone());
        setup_buttons(&document, app.clone());
        setup_pointer(&canvas, app.clone());
        setup_touch(&canvas, app.clone());
        setup_restart_button(&document, app.clone());
        setup_focus_loss(app.clone());

        request_animation_frame(app);

        log::info!("Character Runner running!");
    }

    /// Read page-level hints and apply them for this session only
    ///
    /// `<canvas data-quality="low|medium|high">` picks a preset and the OS
    /// reduced-motion preference freezes the starfield. Neither is saved.
    fn apply_page_preferences(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        settings: &mut Settings,
    ) {
        let quality = canvas.get_attribute("data-quality");
        let prefers_reduced = window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|mq| mq.matches());
        settings.apply_page_hints(quality.as_deref(), prefers_reduced);
    }

    async fn init_gpu(canvas: &HtmlCanvasElement) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, canvas.width(), canvas.height())
            .await
            .map_err(|e| e.to_string())
    }

    /// Load the player image; the vector fallback is drawn until it arrives
    fn load_sprite(app: Rc<RefCell<App>>, document: &Document) {
        let Ok(img) = HtmlImageElement::new() else {
            log::warn!("Could not create image element, using vector fallback");
            return;
        };

        {
            let img_ref = img.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let Some((width, height, rgba)) = sprite_pixels(&document, &img_ref) else {
                    log::warn!("Could not read sprite pixels, using vector fallback");
                    return;
                };
                let mut a = app.borrow_mut();
                if let Some(rs) = a.render_state.as_mut() {
                    match rs.set_sprite_rgba(width, height, &rgba) {
                        Ok(()) => log::info!("Sprite loaded ({width}x{height})"),
                        Err(e) => log::warn!("Sprite rejected: {e}"),
                    }
                }
            });
            img.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut()>::new(move || {
                log::warn!("{PLAYER_SPRITE_PATH} failed to load, using vector fallback");
            });
            img.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        img.set_src(PLAYER_SPRITE_PATH);
    }

    /// Decode a loaded image to straight RGBA through an offscreen 2D canvas
    fn sprite_pixels(document: &Document, img: &HtmlImageElement) -> Option<(u32, u32, Vec<u8>)> {
        let (width, height) = (img.natural_width(), img.natural_height());
        if width == 0 || height == 0 {
            return None;
        }
        let scratch: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        scratch.set_width(width);
        scratch.set_height(height);
        let ctx: CanvasRenderingContext2d = scratch.get_context("2d").ok()??.dyn_into().ok()?;
        ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok()?;
        let data = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;
        Some((width, height, data.data().0))
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if should_prevent_default(&key) {
                    event.prevent_default();
                }
                app.borrow_mut().game.key_down(&key);
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen arrow buttons
    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for dir in Direction::ALL {
            let Some(btn) = document.get_element_by_id(dir.button_id()) else {
                continue;
            };

            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    app.borrow_mut().game.button_down(dir);
                });
                let _ = btn.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            for name in ["pointerup", "pointerleave"] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    app.borrow_mut().game.button_up(dir);
                });
                let _ = btn.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Pointer drag on the canvas
    fn setup_pointer(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.canvas_pos(event.client_x(), event.client_y());
                a.game.pointer_down(pos);
            });
            let _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.canvas_pos(event.client_x(), event.client_y());
                a.game.pointer_move(pos);
            });
            let _ = canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointerleave"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.pointer_up();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Touch drag; listeners are non-passive so scrolling can be suppressed
    fn setup_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let pos = a.canvas_pos(touch.client_x(), touch.client_y());
                    a.game.pointer_down(pos);
                }
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let pos = a.canvas_pos(touch.client_x(), touch.client_y());
                    a.game.pointer_move(pos);
                }
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.pointer_up();
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchend",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("restart") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Release held keys when the window loses focus
    fn setup_focus_loss(app: Rc<RefCell<App>>) {
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.release_input();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            a.game.frame(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Character Runner (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a few scripted runs without a window and report the results
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use character_runner::persistence::MemoryStore;
    use character_runner::renderer::Mesh;
    use character_runner::{Game, Settings, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60;

    let settings = Settings::default();
    let mut game = Game::new(Tuning::default(), Box::new(MemoryStore::new()), 2024);
    let mut now = 0.0;
    game.frame(now);

    for run in 1..=3 {
        game.start();
        let mut frames = 0;
        while game.is_running() && frames < MAX_FRAMES {
            // Weave up and down, switching every 1.5 s
            let (press, release) = if (frames / 90) % 2 == 0 {
                ("ArrowUp", "ArrowDown")
            } else {
                ("ArrowDown", "ArrowUp")
            };
            game.key_up(release);
            game.key_down(press);

            now += FRAME_MS;
            game.frame(now);
            frames += 1;
        }
        game.release_input();

        let score = if game.is_running() {
            game.score()
        } else {
            game.final_score()
        };
        let mesh = Mesh::from_scene(&game.scene(&settings, false), settings.quality.circle_segments());
        println!(
            "Run {run}: score {score} after {:.1}s, {} obstacles, {} particles, {} vertices in last frame",
            game.state().time_alive / 1000.0,
            game.state().obstacles.len(),
            game.state().particles.len(),
            mesh.colored.len() + mesh.sprites.len(),
        );
    }

    println!("Best: {}", game.best());
}
