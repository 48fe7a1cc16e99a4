//! Fox Likes Stars entry point
//!
//! The web build runs the scene router from requestAnimationFrame and paints the draw
//! list on a 2D canvas. The native build plays a scripted headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use fox_likes_stars::Settings;
    use fox_likes_stars::audio::WebAudio;
    use fox_likes_stars::consts::*;
    use fox_likes_stars::input::TickInput;
    use fox_likes_stars::scene::{Router, SceneKey, build_router};
    use fox_likes_stars::storage::{KeyValueStore, LocalStore};
    use fox_likes_stars::view::{Anchor, DrawList, Shape, palette};

    /// Game wrapper for the browser
    struct Game {
        router: Router<WebAudio>,
        input: TickInput,
        draw_list: DrawList,
        ctx: CanvasRenderingContext2d,
        /// Canvas pixels per playfield unit
        scale: f64,
        last_time: f64,
    }

    impl Game {
        fn update(&mut self, dt: f32) {
            self.router.tick(&self.input, dt);
            self.input.clear_one_shots();
            self.router.audio_mut().pump();
        }

        fn render(&mut self) {
            self.draw_list.clear();
            self.router.draw(&mut self.draw_list);

            let ctx = &self.ctx;
            let _ = ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0);
            ctx.set_fill_style_str(&palette::SKY.to_css());
            ctx.fill_rect(0.0, 0.0, WORLD_WIDTH as f64, WORLD_HEIGHT as f64);

            for shape in self.draw_list.shapes() {
                match shape {
                    Shape::Rect { rect, color } => {
                        let size = rect.size();
                        ctx.set_fill_style_str(&color.to_css());
                        ctx.fill_rect(
                            rect.min.x as f64,
                            rect.min.y as f64,
                            size.x as f64,
                            size.y as f64,
                        );
                    }
                    Shape::Text {
                        pos,
                        text,
                        size,
                        color,
                        anchor,
                    } => {
                        ctx.set_fill_style_str(&color.to_css());
                        ctx.set_font(&format!("bold {}px sans-serif", size));
                        match anchor {
                            Anchor::TopLeft => {
                                ctx.set_text_align("left");
                                ctx.set_text_baseline("top");
                            }
                            Anchor::Center => {
                                ctx.set_text_align("center");
                                ctx.set_text_baseline("middle");
                            }
                        }
                        let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                    }
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fox Likes Stars starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Backing store at device resolution, drawn in playfield units
        let dpr = window.device_pixel_ratio();
        canvas.set_width((WORLD_WIDTH as f64 * dpr) as u32);
        canvas.set_height((WORLD_HEIGHT as f64 * dpr) as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let store: Rc<dyn KeyValueStore> = Rc::new(LocalStore);
        let settings = Settings::load(&store);
        let seed = js_sys::Date::now() as u64;
        let mut router = build_router(WebAudio::new(&settings), store, seed);
        router.start(SceneKey::Boot);

        log::info!("Scenes ready, seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            router,
            input: TickInput::default(),
            draw_list: DrawList::new(),
            ctx,
            scale: dpr,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Fox Likes Stars running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                // Auto-repeat would re-fire one-shot keys
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                if g.input.apply_key(&event.code(), true) {
                    event.prevent_default();
                    g.router.audio().resume();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.apply_key(&event.code(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer release, mapped from CSS pixels to playfield units
        {
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let width = target.client_width().max(1) as f32;
                let height = target.client_height().max(1) as f32;
                let pos = glam::Vec2::new(
                    event.offset_x() as f32 * WORLD_WIDTH / width,
                    event.offset_y() as f32 * WORLD_HEIGHT / height,
                );
                let mut g = game.borrow_mut();
                g.input.release_pointer_at(pos);
                g.router.audio().resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    request_pause(&game, "tab hidden");
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
                request_pause(&game, "window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause only while the game itself is being played
    fn request_pause(game: &Rc<RefCell<Game>>, reason: &str) {
        let mut g = game.borrow_mut();
        // Key-ups sent while unfocused never reach us
        g.input.release_held();
        if g.router.gameplay_active() == Some(SceneKey::Game) {
            g.input.pause = true;
            log::info!("Auto-paused ({})", reason);
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
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Fox Likes Stars (native) starting...");
    log::info!("Native mode plays a scripted session - run with `trunk serve` for the web version");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fox_likes_stars.json".to_string());
    headless::run(&path);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use fox_likes_stars::BestScore;
    use fox_likes_stars::audio::SilentAudio;
    use fox_likes_stars::consts::SIM_DT;
    use fox_likes_stars::input::TickInput;
    use fox_likes_stars::scene::{Router, SceneKey, build_router};
    use fox_likes_stars::storage::{FileStore, KeyValueStore};
    use fox_likes_stars::view::DrawList;

    /// Give up on the session after this long (seconds of game time)
    const MAX_SESSION_SECS: f32 = 120.0;
    /// Change running direction this often
    const ROAM_SECS: f32 = 1.5;

    /// Boot, menu, one roaming session until a bomb hits, back to the menu
    pub fn run(path: &str) {
        let store: Rc<dyn KeyValueStore> = Rc::new(FileStore::new(path));
        let best = BestScore::new(store.clone());
        log::info!("Best score on disk ({}): {}", path, best.read());

        let mut router = build_router(SilentAudio::new(), store, 42);
        router.start(SceneKey::Boot);
        summarize(&router);

        // Press play
        let play = TickInput {
            confirm: true,
            ..Default::default()
        };
        router.tick(&play, SIM_DT);
        if router.gameplay_active() != Some(SceneKey::Game) {
            log::warn!("Menu did not start the game");
            return;
        }

        let max_frames = (MAX_SESSION_SECS / SIM_DT) as u32;
        let roam_frames = (ROAM_SECS / SIM_DT) as u32;
        let mut frame = 0;
        while router.gameplay_active() != Some(SceneKey::MainMenu) {
            if frame == max_frames {
                log::warn!("No bomb hit after {} s, stopping", MAX_SESSION_SECS);
                break;
            }

            let input = scripted_input(frame, roam_frames, router.gameplay_active());
            router.tick(&input, SIM_DT);

            if frame % roam_frames == 0 {
                summarize(&router);
            }
            frame += 1;
        }

        summarize(&router);
        log::info!(
            "Session finished after {:.1} s, best score now {}",
            frame as f32 * SIM_DT,
            best.read()
        );
    }

    /// Roam left and right, hop now and then, and try the pause overlay once
    fn scripted_input(frame: u32, roam_frames: u32, active: Option<SceneKey>) -> TickInput {
        if active == Some(SceneKey::Pause) {
            return TickInput {
                pointer_released: frame % 30 == 0,
                ..Default::default()
            };
        }

        let leg = frame / roam_frames;
        TickInput {
            left: leg % 2 == 1,
            right: leg % 2 == 0,
            jump: frame % 90 < 10,
            pause: frame == 200,
            ..Default::default()
        }
    }

    fn summarize(router: &Router<SilentAudio>) {
        let mut list = DrawList::new();
        router.draw(&mut list);
        let texts: Vec<&str> = list.texts().collect();
        log::info!(
            "[{:?}] {} shapes | {}",
            router.gameplay_active(),
            list.len(),
            texts.join(" | ")
        );
    }
}
