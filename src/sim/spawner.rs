//! Obstacle spawner with a time-based difficulty ramp

use glam::Vec2;

use super::state::{GameState, Obstacle};
use crate::tuning::Tuning;

/// Count down by `dt` ms and emit an obstacle when the countdown runs out
///
/// The countdown is reset to [`Tuning::spawn_interval`] for the current
/// survival time, so spawns get denser the longer the run lasts.
pub fn spawn_obstacles(state: &mut GameState, tuning: &Tuning, dt: f32) {
    state.spawn_countdown -= dt;
    if state.spawn_countdown > 0.0 {
        return;
    }
    state.spawn_countdown = tuning.spawn_interval(state.time_alive);

    let obstacle = roll_obstacle(state, tuning);
    state.obstacles.push(obstacle);
}

fn roll_obstacle(state: &mut GameState, tuning: &Tuning) -> Obstacle {
    let rng = &mut state.rng;
    let h = rng.range(tuning.obstacle_min_height, tuning.obstacle_max_height);
    let y = rng.range(
        tuning.obstacle_edge_gap,
        tuning.canvas_height - tuning.obstacle_edge_gap - h,
    );
    let w = rng.range(tuning.obstacle_min_width, tuning.obstacle_max_width);
    let wobble = rng.range(tuning.wobble_min, tuning.wobble_max);

    Obstacle {
        pos: Vec2::new(tuning.canvas_width + tuning.obstacle_spawn_offset, y),
        size: Vec2::new(w, h),
        vx: -tuning.obstacle_speed(state.time_alive),
        t: 0.0,
        wobble,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(1234, tuning);
        state.start(tuning);
        state
    }

    #[test]
    fn test_first_tick_spawns() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        spawn_obstacles(&mut state, &tuning, 16.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_countdown, 1100.0);
    }

    #[test]
    fn test_countdown_between_spawns() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        spawn_obstacles(&mut state, &tuning, 16.0);

        // 1100ms countdown: 68 more 16ms ticks stay under it
        for _ in 0..68 {
            spawn_obstacles(&mut state, &tuning, 16.0);
        }
        assert_eq!(state.obstacles.len(), 1);

        spawn_obstacles(&mut state, &tuning, 16.0);
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_spawned_obstacle_geometry() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        for _ in 0..200 {
            state.spawn_countdown = 0.0;
            spawn_obstacles(&mut state, &tuning, 1.0);
        }
        for o in &state.obstacles {
            assert_eq!(o.pos.x, 1000.0);
            assert!(o.vx < 0.0);
            assert!(o.size.y >= 30.0 && o.size.y <= 120.0);
            assert!(o.size.x >= 30.0 && o.size.x <= 55.0);
            assert!(o.pos.y >= 20.0);
            assert!(o.bottom() <= tuning.canvas_height - 20.0 + 1e-3);
            assert!(o.wobble >= 0.6 && o.wobble <= 1.6);
        }
    }

    #[test]
    fn test_speed_scales_with_survival_time() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        spawn_obstacles(&mut state, &tuning, 1.0);
        state.time_alive = 2000.0;
        state.spawn_countdown = 0.0;
        spawn_obstacles(&mut state, &tuning, 1.0);
        assert!(state.obstacles[1].vx < state.obstacles[0].vx);
    }

    proptest! {
        #[test]
        fn spawn_interval_non_increasing(a in 0.0f32..100_000.0, b in 0.0f32..100_000.0) {
            let tuning = Tuning::default();
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tuning.spawn_interval(late) <= tuning.spawn_interval(early));
            prop_assert!(tuning.spawn_interval(late) >= 300.0);
        }
    }
}
