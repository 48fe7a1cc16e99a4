use std::rc::Rc;

use fox_likes_stars::audio::{Audio, Clip, SilentAudio};
use fox_likes_stars::best_score::BEST_SCORE_KEY;
use fox_likes_stars::consts::SIM_DT;
use fox_likes_stars::input::TickInput;
use fox_likes_stars::physics::Aabb;
use fox_likes_stars::scene::{
    BootScene, GameScene, MainMenuScene, PauseScene, Router, SceneKey, SceneStatus, build_router,
};
use fox_likes_stars::sim::LevelLayout;
use fox_likes_stars::storage::{KeyValueStore, MemoryStore};
use fox_likes_stars::view::{Color, DrawList, Shape, palette};
use fox_likes_stars::{BestScore, ReturnToMenu, Settings};

/// Frames allowed for the fox to catch a bomb
const CHASE_FRAMES: u32 = 120 * 60;

/// All four scenes, with the game on a bare floor so bombs can always be reached
fn flat_router(store: &Rc<MemoryStore>) -> Router<SilentAudio> {
    let mut router = Router::new(SilentAudio::new());
    let handle = router.handle();
    router.register(Box::new(BootScene::new(handle.clone(), store.clone())));
    router.register(Box::new(MainMenuScene::new(handle.clone(), store.clone())));
    router.register(Box::new(
        GameScene::new(handle.clone(), BestScore::new(store.clone()), 3)
            .with_layout(LevelLayout { platforms: vec![] }),
    ));
    router.register(Box::new(PauseScene::new(handle)));
    router
}

fn frame(router: &Router<SilentAudio>) -> DrawList {
    let mut list = DrawList::new();
    router.draw(&mut list);
    list
}

fn rects_of(list: &DrawList, wanted: Color) -> Vec<Aabb> {
    list.shapes()
        .iter()
        .filter_map(|shape| match shape {
            Shape::Rect { rect, color } if *color == wanted => Some(*rect),
            _ => None,
        })
        .collect()
}

fn tap(router: &mut Router<SilentAudio>, input: TickInput) {
    router.tick(&input, SIM_DT);
}

fn confirm() -> TickInput {
    TickInput {
        confirm: true,
        ..Default::default()
    }
}

/// Run the fox toward the oldest bomb until it is hit (drawn red)
fn chase_bomb(router: &mut Router<SilentAudio>) -> bool {
    for _ in 0..CHASE_FRAMES {
        let list = frame(router);
        if !rects_of(&list, palette::FOX_HIT).is_empty() {
            return true;
        }
        let fox = rects_of(&list, palette::FOX).first().copied();
        let bomb = rects_of(&list, palette::BOMB).first().copied();
        let (Some(fox), Some(bomb)) = (fox, bomb) else {
            return false;
        };

        let dx = bomb.center().x - fox.center().x;
        tap(
            router,
            TickInput {
                left: dx < -4.0,
                right: dx > 4.0,
                ..Default::default()
            },
        );
    }
    false
}

#[test]
fn boot_lands_on_menu_with_music() {
    let store = Rc::new(MemoryStore::new());
    let mut router = build_router(SilentAudio::new(), store, 1);
    router.start(SceneKey::Boot);

    assert_eq!(router.gameplay_active(), Some(SceneKey::MainMenu));
    assert_eq!(router.status(SceneKey::Boot), SceneStatus::Inactive);
    assert!(router.audio().is_playing(Clip::BackgroundMusic));
    assert!(frame(&router).contains_text("Best Score: 0"));
}

#[test]
fn pause_overlay_freezes_and_resumes_game() {
    let store = Rc::new(MemoryStore::new());
    let mut router = flat_router(&store);
    router.start(SceneKey::Boot);
    tap(&mut router, confirm());
    assert_eq!(router.gameplay_active(), Some(SceneKey::Game));
    assert!(!router.audio().is_playing(Clip::BackgroundMusic));

    for _ in 0..30 {
        tap(&mut router, TickInput::default());
    }
    tap(
        &mut router,
        TickInput {
            pause: true,
            ..Default::default()
        },
    );
    assert_eq!(router.gameplay_active(), Some(SceneKey::Pause));
    assert_eq!(router.status(SceneKey::Game), SceneStatus::Paused);

    let paused = frame(&router);
    assert!(paused.contains_text("Score: 0"), "game stays visible");
    assert!(paused.contains_text("PAUSED"));
    let fox_before = rects_of(&paused, palette::FOX);

    // Held movement does not reach the frozen game
    for _ in 0..60 {
        tap(
            &mut router,
            TickInput {
                right: true,
                ..Default::default()
            },
        );
    }
    assert_eq!(rects_of(&frame(&router), palette::FOX), fox_before);

    tap(
        &mut router,
        TickInput {
            pointer_released: true,
            ..Default::default()
        },
    );
    assert_eq!(router.gameplay_active(), Some(SceneKey::Game));
    assert!(!router.is_visible(SceneKey::Pause));
    assert_eq!(rects_of(&frame(&router), palette::FOX), fox_before);
}

#[test]
fn bomb_hit_saves_best_and_returns_to_menu() {
    let store = Rc::new(MemoryStore::new());
    let mut router = flat_router(&store);
    router.start(SceneKey::Boot);
    tap(&mut router, confirm());

    assert!(chase_bomb(&mut router), "fox never reached a bomb");
    let best_after_hit = store.get(BEST_SCORE_KEY).unwrap();
    assert!(best_after_hit.is_some(), "written at the moment of the hit");
    assert_eq!(router.gameplay_active(), Some(SceneKey::Game));

    // Routed back on the next tick
    tap(&mut router, TickInput::default());
    assert_eq!(router.gameplay_active(), Some(SceneKey::MainMenu));
    assert!(router.audio().history().contains(&Clip::GameOver));

    let best: u64 = store
        .get(BEST_SCORE_KEY)
        .unwrap()
        .expect("best score written")
        .parse()
        .unwrap();
    assert_eq!(best % 10, 0);
    assert!(frame(&router).contains_text(&format!("Best Score: {}", best)));

    // A second session that scores less leaves the record alone
    store.set(BEST_SCORE_KEY, "100000").unwrap();
    tap(&mut router, confirm());
    assert!(chase_bomb(&mut router));
    tap(&mut router, TickInput::default());
    assert_eq!(router.gameplay_active(), Some(SceneKey::MainMenu));
    assert_eq!(
        store.get(BEST_SCORE_KEY).unwrap().as_deref(),
        Some("100000")
    );
}

#[test]
fn confirm_policy_waits_on_game_over_screen() {
    let store = Rc::new(MemoryStore::new());
    Settings {
        return_to_menu: ReturnToMenu::OnConfirm,
        ..Default::default()
    }
    .save(&*store);

    let mut router = flat_router(&store);
    router.start(SceneKey::Boot);
    tap(&mut router, confirm());

    assert!(chase_bomb(&mut router), "fox never reached a bomb");
    let list = frame(&router);
    assert!(list.contains_text("GAME OVER"));
    assert!(store.get(BEST_SCORE_KEY).unwrap().is_some());

    // The game over screen stays up until confirmed
    for _ in 0..30 {
        tap(&mut router, TickInput::default());
    }
    assert_eq!(router.gameplay_active(), Some(SceneKey::Game));
    assert!(frame(&router).contains_text("GAME OVER"));

    tap(&mut router, confirm());
    assert_eq!(router.gameplay_active(), Some(SceneKey::MainMenu));
}
