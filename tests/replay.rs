//! Headless end-to-end runs through the public `Game` API

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use character_runner::consts::BEST_SCORE_KEY;
use character_runner::persistence::{KeyValueStore, MemoryStore, StoreError};
use character_runner::sim::Obstacle;
use character_runner::{Game, GameEvent, Settings, Tuning};
use glam::Vec2;

const FRAME_MS: f64 = 16.0;

/// A store whose contents outlive the game that owns it
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<HashMap<String, String>>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().remove(key);
        Ok(())
    }
}

/// Input recorded per frame: keys pressed, keys released, drag position
type Step = (&'static [&'static str], &'static [&'static str], Option<(f32, f32)>);

const SCRIPT: &[Step] = &[
    (&["ArrowUp"], &[], None),
    (&[], &[], None),
    (&["d"], &[], None),
    (&[], &["ArrowUp"], Some((200.0, 300.0))),
    (&[], &[], Some((230.0, 290.0))),
    (&["s"], &["d"], None),
    (&[], &[], None),
    (&[], &["s"], None),
];

/// Play the script on a loop for `frames` frames
fn replay(seed: u64, frames: usize) -> Game {
    let mut game = Game::new(Tuning::default(), Box::new(MemoryStore::new()), seed);
    let mut now = 0.0;
    game.frame(now);
    game.start();

    for i in 0..frames {
        let (down, up, drag) = SCRIPT[i % SCRIPT.len()];
        for key in down {
            game.key_down(key);
        }
        for key in up {
            game.key_up(key);
        }
        match drag {
            Some((x, y)) if game.is_running() => game.pointer_move(Vec2::new(x, y)),
            _ => game.pointer_up(),
        }
        now += FRAME_MS;
        game.frame(now);
    }
    game
}

fn crash_now(game: &mut Game, now: &mut f64) {
    let pos = game.state().player.pos;
    game.state_mut().obstacles.push(Obstacle {
        pos: pos - Vec2::splat(8.0),
        size: Vec2::splat(16.0),
        vx: -0.001,
        t: 0.0,
        wobble: 0.0,
    });
    *now += FRAME_MS;
    game.frame(*now);
}

#[test]
fn same_seed_and_script_replay_identically() {
    let a = replay(42, 600);
    let b = replay(42, 600);

    assert_eq!(a.state().score, b.state().score);
    assert_eq!(a.state().player.pos, b.state().player.pos);
    assert_eq!(a.state().player.vel, b.state().player.vel);
    assert_eq!(a.state().obstacles, b.state().obstacles);
    assert_eq!(a.state().particles, b.state().particles);
    assert_eq!(a.final_score(), b.final_score());
}

#[test]
fn scripted_run_produces_obstacles_and_score() {
    let game = replay(7, 120);
    let state = game.state();
    // Movement keys restart the run after a crash, so it is always live here
    // unless the very last frame crashed
    assert!(state.time_alive > 0.0);
    if game.is_running() {
        assert!(!state.obstacles.is_empty());
    }
    let tuning = game.tuning();
    let lo = tuning.player_radius + tuning.bounds_margin;
    assert!(state.player.pos.x >= lo && state.player.pos.x <= tuning.canvas_width - lo);
    assert!(state.player.pos.y >= lo && state.player.pos.y <= tuning.canvas_height - lo);
}

#[test]
fn best_score_survives_sessions() {
    let store = SharedStore::default();
    let mut now = 0.0;

    {
        let mut game = Game::new(Tuning::default(), Box::new(store.clone()), 1);
        assert_eq!(game.best(), 0);
        game.frame(now);
        game.start();
        game.state_mut().score = 123.9;
        crash_now(&mut game, &mut now);

        assert_eq!(game.final_score(), 123);
        assert!(game.drain_events().contains(&GameEvent::GameOver {
            final_score: 123,
            new_best: true
        }));
    }
    assert_eq!(
        store.get(BEST_SCORE_KEY).unwrap().as_deref(),
        Some("123")
    );

    // A later, worse session leaves the stored best alone
    let mut game = Game::new(Tuning::default(), Box::new(store.clone()), 2);
    assert_eq!(game.best(), 123);
    game.frame(now);
    game.start();
    game.state_mut().score = 10.0;
    crash_now(&mut game, &mut now);
    assert_eq!(game.best(), 123);
    assert_eq!(
        store.get(BEST_SCORE_KEY).unwrap().as_deref(),
        Some("123")
    );
}

#[test]
fn malformed_best_reads_as_zero() {
    let mut store = SharedStore::default();
    store.set(BEST_SCORE_KEY, "not a number").unwrap();
    let game = Game::new(Tuning::default(), Box::new(store), 3);
    assert_eq!(game.best(), 0);
}

#[test]
fn restart_after_game_over_resets_field() {
    let mut game = Game::new(Tuning::default(), Box::new(MemoryStore::new()), 9);
    let mut now = 0.0;
    game.frame(now);
    game.start();
    for _ in 0..200 {
        now += FRAME_MS;
        game.frame(now);
    }
    crash_now(&mut game, &mut now);
    assert!(!game.is_running());

    game.start();
    let tuning = game.tuning().clone();
    let state = game.state();
    assert!(state.obstacles.is_empty());
    assert!(state.player.trail.is_empty());
    assert_eq!(state.score, 0.0);
    assert_eq!(state.time_alive, 0.0);
    assert_eq!(state.player.pos, Vec2::new(tuning.player_respawn_x, tuning.mid_y()));
}

#[test]
fn scene_renders_every_layer() {
    let game = replay(5, 90);
    let settings = Settings::default();
    let scene = game.scene(&settings, false);
    assert_eq!(scene.width, game.tuning().canvas_width);
    assert!(scene.commands.len() >= settings.star_count() + 1);
}
