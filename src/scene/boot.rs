//! Boot: load settings, then hand over to the main menu

use super::{Controller, RouterHandle, SceneContext, SceneKey};
use crate::settings::Settings;
use crate::storage::KeyValueStore;

pub struct BootScene<S> {
    router: RouterHandle,
    store: S,
}

impl<S: KeyValueStore> BootScene<S> {
    pub fn new(router: RouterHandle, store: S) -> Self {
        Self { router, store }
    }
}

impl<S: KeyValueStore> Controller for BootScene<S> {
    fn key(&self) -> SceneKey {
        SceneKey::Boot
    }

    fn on_enter(&mut self, ctx: &mut SceneContext) {
        *ctx.settings = Settings::load(&self.store);
        ctx.audio.set_muted(ctx.settings.start_muted);
        self.router.switch(SceneKey::Boot, SceneKey::MainMenu);
    }

    fn on_tick(&mut self, _ctx: &mut SceneContext) {}
}
