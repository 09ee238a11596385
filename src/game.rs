//! Frame loop driver
//!
//! Owns the simulation, input and best score. The host calls
//! [`Game::frame`] once per display refresh and forwards input events;
//! everything else (DOM, GPU) reads the exposed values.

use glam::Vec2;

use crate::best_score::BestScore;
use crate::consts::MAX_FRAME_DT_MS;
use crate::input::{Direction, InputState, is_start_key};
use crate::persistence::KeyValueStore;
use crate::renderer::scene::{Scene, build_scene};
use crate::settings::Settings;
use crate::sim::{GameState, SimEvent, tick};
use crate::tuning::Tuning;

/// Game-level events for the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A run began (hide the overlay)
    Started,
    /// The run ended (show the overlay with `final_score`)
    GameOver { final_score: u64, new_best: bool },
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    tuning: Tuning,
    input: InputState,
    best: BestScore,
    final_score: u64,
    store: Box<dyn KeyValueStore>,
    /// Timestamp of the previous frame (ms)
    last_time: Option<f64>,
    /// Timestamp of the current frame (ms), drives background scroll
    clock: f64,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create an idle game; the best score is read from `store`
    pub fn new(tuning: Tuning, store: Box<dyn KeyValueStore>, seed: u64) -> Self {
        let best = BestScore::load(store.as_ref());
        log::info!("Game initialized with seed {seed}, best {}", best.get());
        Self {
            state: GameState::new(seed, &tuning),
            tuning,
            input: InputState::new(),
            best,
            final_score: 0,
            store,
            last_time: None,
            clock: 0.0,
            events: Vec::new(),
        }
    }

    /// Reset the field and begin a run (restart action)
    pub fn start(&mut self) {
        self.state.start(&self.tuning);
        self.events.push(GameEvent::Started);
        log::info!("Run started");
    }

    /// Advance one display frame at timestamp `now` (ms)
    pub fn frame(&mut self, now: f64) {
        let dt = match self.last_time {
            Some(last) => ((now - last) as f32).clamp(0.0, MAX_FRAME_DT_MS),
            None => 0.0,
        };
        self.last_time = Some(now);
        self.clock = now;

        let input = self.input.snapshot();
        tick(&mut self.state, &input, &self.tuning, dt);

        for event in self.state.drain_events() {
            match event {
                SimEvent::Crashed { score, .. } => self.finish_run(score),
            }
        }
    }

    fn finish_run(&mut self, score: f32) {
        self.final_score = score.max(0.0).floor() as u64;
        let new_best = self.best.record(self.final_score);
        log::info!("Game over, score {}", self.final_score);
        if new_best {
            log::info!("New best score: {}", self.final_score);
            if let Err(e) = self.best.save(self.store.as_mut()) {
                log::warn!("Could not save best score: {e}");
            }
        }
        self.events.push(GameEvent::GameOver {
            final_score: self.final_score,
            new_best,
        });
    }

    /// Build this frame's draw list
    pub fn scene(&self, settings: &Settings, sprite_ready: bool) -> Scene {
        build_scene(&self.state, &self.tuning, settings, sprite_ready, self.clock)
    }

    // === Input forwarding ===

    /// Key pressed; a movement key starts a run while idle
    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key);
        if !self.state.is_running() && is_start_key(key) {
            self.start();
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn button_down(&mut self, dir: Direction) {
        self.input.button_down(dir);
    }

    pub fn button_up(&mut self, dir: Direction) {
        self.input.button_up(dir);
    }

    /// Pointer/touch pressed on the canvas; starts a run while idle
    pub fn pointer_down(&mut self, pos: Vec2) {
        self.input.drag_start(pos);
        if !self.state.is_running() {
            self.start();
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.input.drag_move(pos);
    }

    pub fn pointer_up(&mut self) {
        self.input.drag_end();
    }

    /// Drop all held input (focus lost)
    pub fn release_input(&mut self) {
        self.input.clear();
    }

    // === Read-only views for the HUD ===

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Current score as displayed
    pub fn score(&self) -> u64 {
        self.state.score.max(0.0).floor() as u64
    }

    pub fn best(&self) -> u64 {
        self.best.get()
    }

    /// Score of the last finished run
    pub fn final_score(&self) -> u64 {
        self.final_score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable simulation state, for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Take events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
