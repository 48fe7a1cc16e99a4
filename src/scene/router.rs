//! Scene lifecycle: register, start, stop, pause, resume

use super::{Controller, RouterHandle, SceneCommand, SceneContext, SceneKey};
use crate::audio::Audio;
use crate::input::TickInput;
use crate::settings::Settings;
use crate::view::DrawList;

/// Upper bound on commands applied per flush, in case controllers ping-pong
const MAX_COMMANDS_PER_FLUSH: usize = 32;

/// Lifecycle status of a registered scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStatus {
    Inactive,
    Running,
    /// Resident and visible, not ticked
    Paused,
}

struct SceneRoute {
    controller: Box<dyn Controller>,
    status: SceneStatus,
    visible: bool,
}

/// Owns every scene plus the audio and settings they share
pub struct Router<A> {
    routes: Vec<SceneRoute>,
    handle: RouterHandle,
    audio: A,
    settings: Settings,
}

impl<A: Audio> Router<A> {
    pub fn new(audio: A) -> Self {
        Self {
            routes: Vec::new(),
            handle: RouterHandle::new(),
            audio,
            settings: Settings::default(),
        }
    }

    /// Handle to give controllers at construction
    pub fn handle(&self) -> RouterHandle {
        self.handle.clone()
    }

    /// Register a scene. Tick and draw order follow registration order.
    /// Routes are never removed; a second registration of the same key is ignored.
    pub fn register(&mut self, controller: Box<dyn Controller>) {
        let key = controller.key();
        if self.index_of(key).is_some() {
            log::warn!("Scene {} already registered", key);
            return;
        }
        self.routes.push(SceneRoute {
            controller,
            status: SceneStatus::Inactive,
            visible: false,
        });
    }

    pub fn start(&mut self, key: SceneKey) {
        self.apply(SceneCommand::Start(key));
        self.flush();
    }

    pub fn stop(&mut self, key: SceneKey) {
        self.apply(SceneCommand::Stop(key));
        self.flush();
    }

    pub fn pause(&mut self, key: SceneKey) {
        self.apply(SceneCommand::Pause(key));
        self.flush();
    }

    pub fn resume(&mut self, key: SceneKey) {
        self.apply(SceneCommand::Resume(key));
        self.flush();
    }

    /// Tick every running scene, then apply the commands they queued
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        for route in &mut self.routes {
            if route.status != SceneStatus::Running {
                continue;
            }
            let mut ctx = SceneContext {
                audio: &mut self.audio,
                settings: &mut self.settings,
                input: *input,
                dt,
            };
            route.controller.on_tick(&mut ctx);
        }
        self.flush();
    }

    /// Draw visible scenes bottom to top
    pub fn draw(&self, out: &mut DrawList) {
        for route in self.routes.iter().filter(|r| r.visible) {
            route.controller.draw(out);
        }
    }

    pub fn status(&self, key: SceneKey) -> SceneStatus {
        self.index_of(key)
            .map_or(SceneStatus::Inactive, |i| self.routes[i].status)
    }

    pub fn is_visible(&self, key: SceneKey) -> bool {
        self.index_of(key).is_some_and(|i| self.routes[i].visible)
    }

    /// The gameplay scene currently receiving ticks, if any
    pub fn gameplay_active(&self) -> Option<SceneKey> {
        SceneKey::GAMEPLAY
            .into_iter()
            .find(|key| self.status(*key) == SceneStatus::Running)
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn index_of(&self, key: SceneKey) -> Option<usize> {
        self.routes.iter().position(|r| r.controller.key() == key)
    }

    fn flush(&mut self) {
        let mut applied = 0;
        while let Some(command) = self.handle.pop() {
            if applied == MAX_COMMANDS_PER_FLUSH {
                log::warn!("Dropping scene command {:?}: too many in one frame", command);
                continue;
            }
            self.apply(command);
            applied += 1;
        }

        let running = SceneKey::GAMEPLAY
            .into_iter()
            .filter(|key| self.status(*key) == SceneStatus::Running)
            .count();
        if running > 1 {
            log::warn!("{} gameplay scenes running at once", running);
        }
    }

    fn apply(&mut self, command: SceneCommand) {
        let (SceneCommand::Start(key)
        | SceneCommand::Stop(key)
        | SceneCommand::Pause(key)
        | SceneCommand::Resume(key)) = command;
        let Some(index) = self.index_of(key) else {
            log::warn!("Scene {} is not registered", key);
            return;
        };

        let route = &mut self.routes[index];
        let mut ctx = SceneContext {
            audio: &mut self.audio,
            settings: &mut self.settings,
            input: TickInput::default(),
            dt: 0.0,
        };

        match (command, route.status) {
            (SceneCommand::Start(_), status) => {
                if status != SceneStatus::Inactive {
                    route.controller.on_exit(&mut ctx);
                }
                route.status = SceneStatus::Running;
                route.visible = true;
                route.controller.on_enter(&mut ctx);
                log::info!("Scene {} started", key);
            }
            (SceneCommand::Stop(_), SceneStatus::Inactive) => {}
            (SceneCommand::Stop(_), _) => {
                route.status = SceneStatus::Inactive;
                route.visible = false;
                route.controller.on_exit(&mut ctx);
                log::info!("Scene {} stopped", key);
            }
            (SceneCommand::Pause(_), SceneStatus::Running) => {
                route.status = SceneStatus::Paused;
                route.controller.on_pause(&mut ctx);
                log::info!("Scene {} paused", key);
            }
            (SceneCommand::Resume(_), SceneStatus::Paused) => {
                route.status = SceneStatus::Running;
                route.controller.on_resume(&mut ctx);
                log::info!("Scene {} resumed", key);
            }
            (SceneCommand::Pause(_) | SceneCommand::Resume(_), status) => {
                log::debug!("Ignoring {:?} on {} ({:?})", command, key, status);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records lifecycle callbacks into a shared log
    struct Probe {
        key: SceneKey,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Probe {
        fn boxed(key: SceneKey, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn Controller> {
            Box::new(Self {
                key,
                log: log.clone(),
            })
        }

        fn record(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.key, what));
        }
    }

    impl Controller for Probe {
        fn key(&self) -> SceneKey {
            self.key
        }
        fn on_enter(&mut self, _ctx: &mut SceneContext) {
            self.record("enter");
        }
        fn on_tick(&mut self, _ctx: &mut SceneContext) {
            self.record("tick");
        }
        fn on_exit(&mut self, _ctx: &mut SceneContext) {
            self.record("exit");
        }
        fn on_pause(&mut self, _ctx: &mut SceneContext) {
            self.record("pause");
        }
        fn on_resume(&mut self, _ctx: &mut SceneContext) {
            self.record("resume");
        }
    }

    fn probed_router() -> (Router<SilentAudio>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut router = Router::new(SilentAudio::new());
        router.register(Probe::boxed(SceneKey::MainMenu, &log));
        router.register(Probe::boxed(SceneKey::Game, &log));
        router.register(Probe::boxed(SceneKey::Pause, &log));
        (router, log)
    }

    #[test]
    fn test_lifecycle_callbacks() {
        let (mut router, log) = probed_router();

        router.start(SceneKey::Game);
        router.tick(&TickInput::default(), 0.016);
        router.pause(SceneKey::Game);
        router.tick(&TickInput::default(), 0.016);
        router.resume(SceneKey::Game);
        router.stop(SceneKey::Game);

        assert_eq!(
            *log.borrow(),
            vec!["Game:enter", "Game:tick", "Game:pause", "Game:resume", "Game:exit"]
        );
        assert_eq!(router.status(SceneKey::Game), SceneStatus::Inactive);
        assert!(!router.is_visible(SceneKey::Game));
    }

    #[test]
    fn test_paused_scene_stays_visible() {
        let (mut router, _) = probed_router();
        router.start(SceneKey::Game);
        router.pause(SceneKey::Game);
        router.start(SceneKey::Pause);

        assert_eq!(router.status(SceneKey::Game), SceneStatus::Paused);
        assert!(router.is_visible(SceneKey::Game));
        assert_eq!(router.gameplay_active(), Some(SceneKey::Pause));
    }

    #[test]
    fn test_queued_commands_apply_after_tick() {
        let (mut router, log) = probed_router();
        let handle = router.handle();
        router.start(SceneKey::MainMenu);

        handle.switch(SceneKey::MainMenu, SceneKey::Game);
        // Queued, not yet applied
        assert_eq!(router.status(SceneKey::MainMenu), SceneStatus::Running);

        router.tick(&TickInput::default(), 0.016);
        assert_eq!(router.status(SceneKey::MainMenu), SceneStatus::Inactive);
        assert_eq!(router.gameplay_active(), Some(SceneKey::Game));
        // The newly started scene is not ticked in the frame it started
        assert!(!log.borrow().contains(&"Game:tick".to_string()));
    }

    #[test]
    fn test_start_restarts_running_scene() {
        let (mut router, log) = probed_router();
        router.start(SceneKey::Game);
        router.start(SceneKey::Game);
        assert_eq!(
            *log.borrow(),
            vec!["Game:enter", "Game:exit", "Game:enter"]
        );
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let (mut router, log) = probed_router();
        router.resume(SceneKey::Game);
        router.pause(SceneKey::Game);
        router.stop(SceneKey::Game);
        router.start(SceneKey::Boot);

        assert!(log.borrow().is_empty());
        assert_eq!(router.gameplay_active(), None);
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let (mut router, log) = probed_router();
        let other = Rc::new(RefCell::new(Vec::new()));
        router.register(Probe::boxed(SceneKey::Game, &other));

        router.start(SceneKey::Game);
        assert_eq!(*log.borrow(), vec!["Game:enter"]);
        assert!(other.borrow().is_empty());
    }
}
