//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance can be tweaked from JSON
//! without touching the simulation. Defaults reproduce the classic feel.

use serde::{Deserialize, Serialize};

/// Gameplay tuning values
///
/// Times are in milliseconds, distances in canvas pixels. Velocities are in
/// pixels per tick unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Gap kept between the player and the canvas edge
    pub bounds_margin: f32,

    // === Player ===
    pub player_radius: f32,
    /// Position on first construction
    pub player_start_x: f32,
    /// Position after every restart
    pub player_respawn_x: f32,
    /// Velocity gained per ms while a direction is held
    pub player_accel: f32,
    /// Per-axis velocity cap
    pub player_max_speed: f32,
    /// Per-tick cap on drag-induced velocity change
    pub player_drag_thrust: f32,
    /// Drag delta (px) to velocity scale
    pub drag_scale: f32,
    /// Multiplicative velocity decay per tick
    pub player_friction: f32,
    pub trail_capacity: usize,

    // === Spawner ===
    /// Spawn interval at time zero
    pub spawn_base_interval: f32,
    /// Interval reduction per ms survived
    pub spawn_interval_decay: f32,
    pub spawn_min_interval: f32,
    pub obstacle_base_speed: f32,
    /// Speed gained per ms survived
    pub obstacle_speed_ramp: f32,
    /// Cap on speed gained from the ramp
    pub obstacle_speed_bonus_max: f32,
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,
    /// Vertical gap kept when placing an obstacle
    pub obstacle_edge_gap: f32,
    /// Distance past the right edge where obstacles appear
    pub obstacle_spawn_offset: f32,
    /// Obstacles are dropped once their right edge is left of `-despawn_margin`
    pub obstacle_despawn_margin: f32,
    pub wobble_min: f32,
    pub wobble_max: f32,
    /// Wobble phase period divisor (ms)
    pub wobble_period: f32,
    /// Vertical displacement per tick at peak wobble
    pub wobble_step: f32,
    /// Converts obstacle vx * dt(ms) into pixels
    pub obstacle_time_scale: f32,

    // === Particles ===
    pub death_burst_count: usize,
    pub particle_max_speed: f32,
    pub particle_min_radius: f32,
    pub particle_max_radius: f32,
    pub particle_min_hue: f32,
    pub particle_max_hue: f32,
    pub particle_damping: f32,
    /// Lifetime of a particle in ms
    pub particle_lifetime: f32,

    // === Score ===
    /// Points per ms survived
    pub score_per_ms: f32,
    /// Points per live obstacle per tick
    pub score_per_obstacle: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 960.0,
            canvas_height: 540.0,
            bounds_margin: 6.0,

            player_radius: 22.0,
            player_start_x: 120.0,
            player_respawn_x: 140.0,
            player_accel: 0.28,
            player_max_speed: 5.2,
            player_drag_thrust: 0.75,
            drag_scale: 0.05,
            player_friction: 0.985,
            trail_capacity: 24,

            spawn_base_interval: 1100.0,
            spawn_interval_decay: 0.12,
            spawn_min_interval: 300.0,
            obstacle_base_speed: 2.5,
            obstacle_speed_ramp: 0.002,
            obstacle_speed_bonus_max: 7.0,
            obstacle_min_height: 30.0,
            obstacle_max_height: 120.0,
            obstacle_min_width: 30.0,
            obstacle_max_width: 55.0,
            obstacle_edge_gap: 20.0,
            obstacle_spawn_offset: 40.0,
            obstacle_despawn_margin: 20.0,
            wobble_min: 0.6,
            wobble_max: 1.6,
            wobble_period: 180.0,
            wobble_step: 0.8,
            obstacle_time_scale: 0.06,

            death_burst_count: 80,
            particle_max_speed: 3.0,
            particle_min_radius: 1.5,
            particle_max_radius: 3.5,
            particle_min_hue: 180.0,
            particle_max_hue: 260.0,
            particle_damping: 0.99,
            particle_lifetime: 1200.0,

            score_per_ms: 0.02,
            score_per_obstacle: 0.005,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse tuning from JSON, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("Invalid tuning JSON ({e}), using defaults");
            Self::default()
        })
    }

    /// Vertical centre of the canvas
    pub fn mid_y(&self) -> f32 {
        self.canvas_height / 2.0
    }

    /// Spawn interval for a given survival time (ms)
    ///
    /// Non-increasing in `time_alive`, floored at `spawn_min_interval`.
    pub fn spawn_interval(&self, time_alive: f32) -> f32 {
        (self.spawn_base_interval - time_alive * self.spawn_interval_decay)
            .max(self.spawn_min_interval)
    }

    /// Leftward speed of obstacles spawned at a given survival time
    pub fn obstacle_speed(&self, time_alive: f32) -> f32 {
        self.obstacle_base_speed
            + (time_alive * self.obstacle_speed_ramp).min(self.obstacle_speed_bonus_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_radius": 30.0 }"#).unwrap();
        assert_eq!(tuning.player_radius, 30.0);
        assert_eq!(tuning.spawn_min_interval, 300.0);
        assert_eq!(tuning.trail_capacity, 24);
    }

    #[test]
    fn test_bad_json_falls_back() {
        let tuning = Tuning::from_json_or_default("not json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_spawn_interval_ramp() {
        let t = Tuning::default();
        assert_eq!(t.spawn_interval(0.0), 1100.0);
        assert!((t.spawn_interval(1000.0) - 980.0).abs() < 1e-3);
        // 1100 - 0.12 * 10000 = -100 -> floored
        assert_eq!(t.spawn_interval(10_000.0), 300.0);
    }

    #[test]
    fn test_obstacle_speed_capped() {
        let t = Tuning::default();
        assert_eq!(t.obstacle_speed(0.0), 2.5);
        assert!((t.obstacle_speed(1000.0) - 4.5).abs() < 1e-5);
        assert_eq!(t.obstacle_speed(1_000_000.0), 9.5);
    }
}
