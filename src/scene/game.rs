//! Game scene: wraps a `GameController` and routes around it
//!
//! A fresh controller is built every time the scene starts. Pause input hands over to
//! the Pause overlay; game over returns to the menu, either on the next tick or after
//! a confirm, depending on `Settings::return_to_menu`.

use glam::Vec2;

use super::{Controller, RouterHandle, SceneContext, SceneKey};
use crate::audio::{Clip, Playback};
use crate::best_score::BestScore;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::physics::{Aabb, ArcadeWorld};
use crate::settings::ReturnToMenu;
use crate::sim::{GameController, GameEvent, GamePhase, LevelLayout};
use crate::storage::KeyValueStore;
use crate::view::{DrawList, palette};

pub struct GameScene<S> {
    router: RouterHandle,
    best: BestScore<S>,
    layout: LevelLayout,
    seed: u64,
    sessions: u64,
    return_to_menu: ReturnToMenu,
    game: Option<GameController<ArcadeWorld>>,
    last_over: Option<(u64, u64)>,
}

impl<S: KeyValueStore> GameScene<S> {
    /// Session `n` is seeded with `seed + n`
    pub fn new(router: RouterHandle, best: BestScore<S>, seed: u64) -> Self {
        Self {
            router,
            best,
            layout: LevelLayout::default(),
            seed,
            sessions: 0,
            return_to_menu: ReturnToMenu::default(),
            game: None,
            last_over: None,
        }
    }

    pub fn with_layout(mut self, layout: LevelLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn controller(&self) -> Option<&GameController<ArcadeWorld>> {
        self.game.as_ref()
    }
}

impl<S: KeyValueStore> Controller for GameScene<S> {
    fn key(&self) -> SceneKey {
        SceneKey::Game
    }

    fn on_enter(&mut self, ctx: &mut SceneContext) {
        let seed = self.seed.wrapping_add(self.sessions);
        self.sessions += 1;
        self.return_to_menu = ctx.settings.return_to_menu;
        self.last_over = None;
        log::debug!("Game over routing: {}", self.return_to_menu.as_str());
        self.game = Some(GameController::new(
            ArcadeWorld::new(WORLD_WIDTH, WORLD_HEIGHT),
            &self.layout,
            seed,
        ));
    }

    fn on_tick(&mut self, ctx: &mut SceneContext) {
        let Some(game) = self.game.as_mut() else {
            return;
        };

        match game.phase() {
            GamePhase::Over => {
                let confirmed = ctx.input.confirm || ctx.input.pointer_released;
                if self.return_to_menu == ReturnToMenu::Auto || confirmed {
                    self.router.switch(SceneKey::Game, SceneKey::MainMenu);
                }
                return;
            }
            // The router does not tick paused scenes
            GamePhase::Paused => return,
            GamePhase::Running => {}
        }

        if ctx.input.pause {
            game.pause();
            self.router.pause(SceneKey::Game);
            self.router.start(SceneKey::Pause);
            return;
        }

        game.tick(&ctx.input, ctx.dt, &self.best);

        for event in game.drain_events() {
            let clip = match event {
                GameEvent::StarCollected { .. } => Clip::StarCollect,
                GameEvent::LevelComplete { .. } => Clip::LevelUp,
                GameEvent::Jumped => Clip::Jump,
                GameEvent::GameOver {
                    final_score,
                    best_score,
                } => {
                    self.last_over = Some((final_score, best_score));
                    Clip::GameOver
                }
            };
            ctx.audio.play(clip, Playback::ONCE);
        }
    }

    fn on_exit(&mut self, _ctx: &mut SceneContext) {
        if let Some(game) = self.game.take() {
            log::info!(
                "Leaving game at score {} ({:?})",
                game.session().score(),
                game.phase()
            );
        }
    }

    fn on_pause(&mut self, _ctx: &mut SceneContext) {
        if let Some(game) = self.game.as_mut() {
            game.pause();
        }
    }

    fn on_resume(&mut self, _ctx: &mut SceneContext) {
        if let Some(game) = self.game.as_mut() {
            game.resume();
        }
    }

    fn draw(&self, out: &mut DrawList) {
        out.rect(
            Aabb::from_corner_size(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT),
            palette::SKY,
        );
        let Some(game) = &self.game else { return };
        game.draw(out);

        if let (Some((final_score, best_score)), ReturnToMenu::OnConfirm) =
            (self.last_over, self.return_to_menu)
        {
            let center = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
            out.centered_text(center, "GAME OVER", 64.0, palette::FOX_HIT);
            out.centered_text(
                center + Vec2::new(0.0, 60.0),
                format!("Score: {}  Best: {}", final_score, best_score),
                32.0,
                palette::BEST_TEXT,
            );
            out.centered_text(
                center + Vec2::new(0.0, 110.0),
                "Back to Menu (Enter / click)",
                24.0,
                palette::SCORE_TEXT,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::best_score::BEST_SCORE_KEY;
    use crate::consts::SIM_DT;
    use crate::input::TickInput;
    use crate::scene::router::{Router, SceneStatus};
    use crate::storage::MemoryStore;
    use std::rc::Rc;

    fn game_router(store: &Rc<MemoryStore>) -> Router<SilentAudio> {
        let mut router = Router::new(SilentAudio::new());
        let handle = router.handle();
        router.register(Box::new(GameScene::new(
            handle,
            BestScore::new(store.clone()),
            7,
        )));
        router.start(SceneKey::Game);
        router
    }

    #[test]
    fn test_pause_input_hands_over_to_overlay() {
        let store = Rc::new(MemoryStore::new());
        let mut router = game_router(&store);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        router.tick(&pause, SIM_DT);
        assert_eq!(router.status(SceneKey::Game), SceneStatus::Paused);
        assert!(router.is_visible(SceneKey::Game));
    }

    #[test]
    fn test_ticks_advance_and_draw_hud() {
        let store = Rc::new(MemoryStore::new());
        let mut router = game_router(&store);
        for _ in 0..10 {
            router.tick(&TickInput::default(), SIM_DT);
        }

        let mut list = DrawList::new();
        router.draw(&mut list);
        assert!(list.contains_text("Score: 0"));
        assert!(store.get(BEST_SCORE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_restart_builds_fresh_session() {
        let mut scene = GameScene::new(
            RouterHandle::new(),
            BestScore::new(MemoryStore::new()),
            1,
        );
        let mut audio = SilentAudio::new();
        let mut settings = crate::settings::Settings::default();
        let mut ctx = SceneContext {
            audio: &mut audio,
            settings: &mut settings,
            input: TickInput::default(),
            dt: 0.0,
        };

        scene.on_enter(&mut ctx);
        assert_eq!(scene.controller().unwrap().session().score(), 0);
        scene.on_exit(&mut ctx);
        assert!(scene.controller().is_none());
        scene.on_enter(&mut ctx);
        assert_eq!(scene.controller().unwrap().phase(), GamePhase::Running);
    }
}
