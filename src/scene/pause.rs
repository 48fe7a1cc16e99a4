//! Pause overlay
//!
//! Drawn over the frozen game. While it runs the game is not ticked, so no input
//! reaches it; any click, confirm or pause key closes the overlay and resumes play.

use glam::Vec2;

use super::{Controller, RouterHandle, SceneContext, SceneKey};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::physics::Aabb;
use crate::view::{DrawList, palette};

pub struct PauseScene {
    router: RouterHandle,
}

impl PauseScene {
    pub fn new(router: RouterHandle) -> Self {
        Self { router }
    }
}

impl Controller for PauseScene {
    fn key(&self) -> SceneKey {
        SceneKey::Pause
    }

    fn on_tick(&mut self, ctx: &mut SceneContext) {
        if ctx.input.any_action() {
            self.router.resume(SceneKey::Game);
            self.router.stop(SceneKey::Pause);
        }
    }

    fn draw(&self, out: &mut DrawList) {
        out.rect(
            Aabb::from_corner_size(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT),
            palette::OVERLAY,
        );
        let center = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        out.centered_text(center, "PAUSED", 64.0, palette::BUTTON_TEXT);
        out.centered_text(
            center + Vec2::new(0.0, 60.0),
            "Click to resume",
            28.0,
            palette::BEST_TEXT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::input::TickInput;
    use crate::scene::router::{Router, SceneStatus};
    use crate::view::Shape;

    fn paused_router() -> Router<SilentAudio> {
        let mut router = Router::new(SilentAudio::new());
        let handle = router.handle();
        router.register(Box::new(PauseScene::new(handle)));
        router.start(SceneKey::Pause);
        router
    }

    #[test]
    fn test_overlay_is_translucent_black() {
        let router = paused_router();
        let mut list = DrawList::new();
        router.draw(&mut list);

        match &list.shapes()[0] {
            Shape::Rect { color, .. } => {
                assert_eq!(*color, palette::OVERLAY);
                assert_eq!(color.a, 0.8);
            }
            other => panic!("expected overlay rect, got {:?}", other),
        }
        assert!(list.contains_text("PAUSED"));
    }

    #[test]
    fn test_stays_until_input() {
        let mut router = paused_router();
        let held = TickInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        for _ in 0..5 {
            router.tick(&held, 0.016);
        }
        assert_eq!(router.status(SceneKey::Pause), SceneStatus::Running);

        let click = TickInput {
            pointer_released: true,
            ..Default::default()
        };
        router.tick(&click, 0.016);
        assert_eq!(router.status(SceneKey::Pause), SceneStatus::Inactive);
    }
}
