//! Per-frame simulation tick
//!
//! Advances the game by one rendered frame. `dt` is the frame delta in
//! milliseconds; velocities are applied once per tick.

use glam::Vec2;

use super::collision::first_hit;
use super::particles::{burst, update_particles};
use super::spawner::spawn_obstacles;
use super::state::{GamePhase, GameState, SimEvent};
use crate::clamp;
use crate::tuning::Tuning;

/// Movement intent for a single tick
///
/// Built by polling the input layer once per frame, so a run can be
/// replayed from a recorded sequence of these.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Pointer/touch drag since the previous tick (canvas pixels)
    pub drag: Vec2,
}

impl TickInput {
    /// Net held direction on each axis (-1, 0 or 1)
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i32 - self.left as i32) as f32;
        let y = (self.down as i32 - self.up as i32) as f32;
        Vec2::new(x, y)
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    if state.phase == GamePhase::Running {
        state.time_alive += dt;
        spawn_obstacles(state, tuning, dt);
        update_player(state, input, tuning, dt);
        update_obstacles(state, tuning, dt);

        if first_hit(state.player.pos, state.player.radius, &state.obstacles).is_some() {
            crash(state, tuning);
        } else {
            state.score +=
                dt * tuning.score_per_ms + state.obstacles.len() as f32 * tuning.score_per_obstacle;
        }
    }

    // Death bursts keep animating while idle
    update_particles(&mut state.particles, tuning, dt);
}

/// Accelerate, clamp, integrate, apply friction, record trail
pub fn update_player(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    let player = &mut state.player;
    let max = tuning.player_max_speed;
    let thrust = tuning.player_drag_thrust;

    player.vel += input.axis() * tuning.player_accel * dt;
    player.vel.x += clamp(input.drag.x * tuning.drag_scale, -thrust, thrust);
    player.vel.y += clamp(input.drag.y * tuning.drag_scale, -thrust, thrust);

    player.vel.x = clamp(player.vel.x, -max, max);
    player.vel.y = clamp(player.vel.y, -max, max);

    player.pos += player.vel;
    player.clamp_to_bounds(tuning.canvas_width, tuning.canvas_height, tuning.bounds_margin);

    player.vel *= tuning.player_friction;
    player.record_trail();
}

/// Scroll and wobble obstacles, dropping the ones past the left edge
pub fn update_obstacles(state: &mut GameState, tuning: &Tuning, dt: f32) {
    for o in state.obstacles.iter_mut() {
        o.advance(dt, tuning);
    }
    state.obstacles.retain(|o| o.is_live(tuning));
}

fn crash(state: &mut GameState, tuning: &Tuning) {
    let at = state.player.pos;
    state.phase = GamePhase::Idle;
    burst(
        &mut state.particles,
        &mut state.rng,
        tuning,
        at,
        tuning.death_burst_count,
    );
    state.events.push(SimEvent::Crashed {
        at,
        score: state.score,
    });
}
