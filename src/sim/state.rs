//! Game state and core simulation types
//!
//! Everything the update and render steps touch lives in [`GameState`].

use std::collections::VecDeque;

use glam::Vec2;

use super::rng::SimRng;
use crate::clamp;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Waiting for a start trigger (also shown after a crash)
    #[default]
    Idle,
    /// Active gameplay
    Running,
}

/// Trail point for the motion cue behind the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub radius: f32,
}

/// The player-controlled sprite
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Recent positions, oldest first
    pub trail: VecDeque<TrailPoint>,
    trail_capacity: usize,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_start_x, tuning.mid_y()),
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            trail: VecDeque::with_capacity(tuning.trail_capacity + 1),
            trail_capacity: tuning.trail_capacity,
        }
    }

    /// Move back to the respawn point and stop
    pub fn respawn(&mut self, tuning: &Tuning) {
        self.pos = Vec2::new(tuning.player_respawn_x, tuning.mid_y());
        self.vel = Vec2::ZERO;
        self.radius = tuning.player_radius;
        self.trail.clear();
    }

    /// Record current position to trail, dropping the oldest past capacity
    pub fn record_trail(&mut self) {
        self.trail.push_back(TrailPoint {
            pos: self.pos,
            radius: self.radius,
        });
        while self.trail.len() > self.trail_capacity {
            self.trail.pop_front();
        }
    }

    /// Keep the player inside the canvas, `margin` pixels from each edge
    pub fn clamp_to_bounds(&mut self, width: f32, height: f32, margin: f32) {
        let inset = self.radius + margin;
        self.pos.x = clamp(self.pos.x, inset, width - inset);
        self.pos.y = clamp(self.pos.y, inset, height - inset);
    }

    /// Heading used to tilt the sprite
    pub fn tilt(&self) -> f32 {
        self.vel.y.atan2(self.vel.x) * 0.25
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (always negative)
    pub vx: f32,
    /// Time alive (ms)
    pub t: f32,
    /// Wobble frequency factor
    pub wobble: f32,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Advance scroll and wobble by `dt` ms
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        self.t += dt;
        self.pos.y += ((self.t / tuning.wobble_period) * self.wobble).sin() * tuning.wobble_step;
        self.pos.x += self.vx * dt * tuning.obstacle_time_scale;
    }

    /// Still on (or near) the canvas
    pub fn is_live(&self, tuning: &Tuning) -> bool {
        self.right() > -tuning.obstacle_despawn_margin
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// 0-1, decreases over time
    pub life: f32,
    /// Hue in degrees
    pub hue: f32,
}

/// Things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Player hit an obstacle; the run is over
    Crashed { at: Vec2, score: f32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: SimRng,
    pub phase: GamePhase,
    /// Survival time of the current run (ms)
    pub time_alive: f32,
    pub score: f32,
    /// Countdown until the next obstacle spawns (ms)
    pub spawn_countdown: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    /// Events produced since the last drain
    pub events: Vec<SimEvent>,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            rng: SimRng::new(seed),
            phase: GamePhase::Idle,
            time_alive: 0.0,
            score: 0.0,
            spawn_countdown: 0.0,
            player: Player::new(tuning),
            obstacles: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Clear the field and begin a new run
    pub fn start(&mut self, tuning: &Tuning) {
        self.obstacles.clear();
        self.particles.clear();
        self.player.respawn(tuning);
        self.score = 0.0;
        self.time_alive = 0.0;
        self.spawn_countdown = 0.0;
        self.phase = GamePhase::Running;
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let tuning = Tuning::default();
        let state = GameState::new(1, &tuning);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.player.pos, Vec2::new(120.0, 270.0));
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_start_resets_run() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        state.score = 42.0;
        state.time_alive = 9000.0;
        state.spawn_countdown = 500.0;
        state.player.vel = Vec2::new(3.0, -2.0);
        state.player.record_trail();
        state.obstacles.push(Obstacle {
            pos: Vec2::new(10.0, 10.0),
            size: Vec2::new(30.0, 30.0),
            vx: -3.0,
            t: 0.0,
            wobble: 1.0,
        });

        state.start(&tuning);

        assert!(state.is_running());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.time_alive, 0.0);
        assert_eq!(state.spawn_countdown, 0.0);
        assert_eq!(state.player.pos, Vec2::new(140.0, 270.0));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.player.trail.is_empty());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_trail_capacity() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        for i in 0..40 {
            player.pos.x = i as f32;
            player.record_trail();
        }
        assert_eq!(player.trail.len(), 24);
        // Oldest dropped first
        assert_eq!(player.trail.front().map(|p| p.pos.x), Some(16.0));
        assert_eq!(player.trail.back().map(|p| p.pos.x), Some(39.0));
    }

    #[test]
    fn test_obstacle_despawn() {
        let tuning = Tuning::default();
        let mut o = Obstacle {
            pos: Vec2::new(-49.0, 100.0),
            size: Vec2::new(30.0, 40.0),
            vx: -3.0,
            t: 0.0,
            wobble: 1.0,
        };
        assert!(o.is_live(&tuning));
        o.pos.x = -50.0;
        assert!(!o.is_live(&tuning));
    }
}
