//! Scene routing
//!
//! Four named scenes (Boot, MainMenu, Game, Pause) are registered once with a
//! `Router`. Controllers never touch the router directly: each one gets a
//! `RouterHandle` at construction and queues commands on it, which the router applies
//! after the current callback pass.

pub mod boot;
pub mod game;
pub mod main_menu;
pub mod pause;
pub mod router;

pub use boot::BootScene;
pub use game::GameScene;
pub use main_menu::MainMenuScene;
pub use pause::PauseScene;
pub use router::{Router, SceneStatus};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::audio::Audio;
use crate::best_score::BestScore;
use crate::input::TickInput;
use crate::settings::Settings;
use crate::storage::KeyValueStore;
use crate::view::DrawList;

/// Scene identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Boot,
    MainMenu,
    Game,
    Pause,
}

impl SceneKey {
    /// Scenes that take part in gameplay routing (Boot only runs at startup)
    pub const GAMEPLAY: [SceneKey; 3] = [SceneKey::MainMenu, SceneKey::Game, SceneKey::Pause];

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKey::Boot => "Boot",
            SceneKey::MainMenu => "MainMenu",
            SceneKey::Game => "Game",
            SceneKey::Pause => "Pause",
        }
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle request queued by a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Activate (restarting if already active)
    Start(SceneKey),
    /// Deactivate and hide
    Stop(SceneKey),
    /// Keep resident and visible, stop ticking
    Pause(SceneKey),
    /// Tick a paused scene again
    Resume(SceneKey),
}

/// Command queue shared between the router and its controllers
#[derive(Debug, Clone, Default)]
pub struct RouterHandle {
    queue: Rc<RefCell<VecDeque<SceneCommand>>>,
}

impl RouterHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, key: SceneKey) {
        self.push(SceneCommand::Start(key));
    }

    pub fn stop(&self, key: SceneKey) {
        self.push(SceneCommand::Stop(key));
    }

    pub fn pause(&self, key: SceneKey) {
        self.push(SceneCommand::Pause(key));
    }

    pub fn resume(&self, key: SceneKey) {
        self.push(SceneCommand::Resume(key));
    }

    /// Stop `from` and start `to`
    pub fn switch(&self, from: SceneKey, to: SceneKey) {
        self.stop(from);
        self.start(to);
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn push(&self, command: SceneCommand) {
        self.queue.borrow_mut().push_back(command);
    }

    pub(crate) fn pop(&self) -> Option<SceneCommand> {
        self.queue.borrow_mut().pop_front()
    }
}

/// What a controller can reach during a callback
pub struct SceneContext<'a> {
    pub audio: &'a mut dyn Audio,
    pub settings: &'a mut Settings,
    /// Input for this frame (empty outside `on_tick`)
    pub input: TickInput,
    /// Frame delta in seconds (zero outside `on_tick`)
    pub dt: f32,
}

/// A scene's behaviour. Every callback has a no-op default except `on_tick`.
pub trait Controller {
    fn key(&self) -> SceneKey;

    fn on_enter(&mut self, _ctx: &mut SceneContext) {}

    fn on_tick(&mut self, ctx: &mut SceneContext);

    fn on_exit(&mut self, _ctx: &mut SceneContext) {}

    fn on_pause(&mut self, _ctx: &mut SceneContext) {}

    fn on_resume(&mut self, _ctx: &mut SceneContext) {}

    fn draw(&self, _out: &mut DrawList) {}
}

/// Router with all four scenes registered, not yet started
pub fn build_router<A, S>(audio: A, store: S, seed: u64) -> Router<A>
where
    A: Audio,
    S: KeyValueStore + Clone + 'static,
{
    let mut router = Router::new(audio);
    let handle = router.handle();

    router.register(Box::new(BootScene::new(handle.clone(), store.clone())));
    router.register(Box::new(MainMenuScene::new(handle.clone(), store.clone())));
    router.register(Box::new(GameScene::new(
        handle.clone(),
        BestScore::new(store),
        seed,
    )));
    router.register(Box::new(PauseScene::new(handle)));

    router
}
