//! Main menu: title, best score, play button and a music toggle

use glam::Vec2;

use super::{Controller, RouterHandle, SceneContext, SceneKey};
use crate::audio::{Clip, Playback};
use crate::best_score::BestScore;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::physics::Aabb;
use crate::storage::KeyValueStore;
use crate::view::{DrawList, palette};

pub struct MainMenuScene<S> {
    router: RouterHandle,
    /// Settings are written back here when the sound is toggled
    store: S,
    best: BestScore<S>,
    /// Best score read on entry
    best_score: u64,
    /// Shown next to the sound icon; mirrors the audio mute flag
    muted: bool,
}

impl<S: KeyValueStore + Clone> MainMenuScene<S> {
    pub fn new(router: RouterHandle, store: S) -> Self {
        Self {
            router,
            best: BestScore::new(store.clone()),
            store,
            best_score: 0,
            muted: false,
        }
    }

    fn play_button() -> Aabb {
        Aabb::from_center_size(
            Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT * 0.6),
            Vec2::new(220.0, 80.0),
        )
    }

    fn sound_button() -> Aabb {
        Aabb::from_corner_size(WORLD_WIDTH - 190.0, 10.0, 180.0, 40.0)
    }
}

impl<S: KeyValueStore + Clone> Controller for MainMenuScene<S> {
    fn key(&self) -> SceneKey {
        SceneKey::MainMenu
    }

    fn on_enter(&mut self, ctx: &mut SceneContext) {
        self.best_score = self.best.read();
        self.muted = ctx.audio.muted();
        ctx.audio.play(Clip::BackgroundMusic, Playback::LOOP);
    }

    fn on_tick(&mut self, ctx: &mut SceneContext) {
        if ctx.input.toggle_mute || ctx.input.released_in(&Self::sound_button()) {
            self.muted = ctx.audio.toggle_mute();
            ctx.settings.start_muted = self.muted;
            ctx.settings.save(&self.store);
            if self.muted {
                ctx.audio.stop(Clip::BackgroundMusic);
            } else {
                ctx.audio.play(Clip::BackgroundMusic, Playback::LOOP);
            }
            log::info!("Music {}", if self.muted { "off" } else { "on" });
        }

        if ctx.input.confirm || ctx.input.released_in(&Self::play_button()) {
            ctx.audio.stop(Clip::BackgroundMusic);
            self.router.switch(SceneKey::MainMenu, SceneKey::Game);
        }
    }

    fn on_exit(&mut self, ctx: &mut SceneContext) {
        ctx.audio.stop(Clip::BackgroundMusic);
    }

    fn draw(&self, out: &mut DrawList) {
        out.rect(
            Aabb::from_corner_size(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT),
            palette::SKY,
        );
        out.centered_text(
            Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT * 0.25),
            "FOX LIKES STARS",
            85.0,
            palette::TITLE_TEXT,
        );
        out.centered_text(
            Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT * 0.4),
            format!("Best Score: {}", self.best_score),
            40.0,
            palette::BEST_TEXT,
        );

        let button = Self::play_button();
        out.rect(button, palette::TITLE_TEXT);
        out.centered_text(button.center(), "PLAY", 40.0, palette::BUTTON_TEXT);

        let sound = Self::sound_button();
        out.centered_text(
            sound.center(),
            if self.muted { "Sound: off (M)" } else { "Sound: on (M)" },
            20.0,
            palette::SCORE_TEXT,
        );
    }
}
