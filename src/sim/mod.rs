//! Simulation module
//!
//! All gameplay logic lives here. This module must stay headless:
//! - Seeded RNG only
//! - State passed explicitly, no globals
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{circle_rect_overlap, first_hit};
pub use particles::{burst, update_particles};
pub use rng::SimRng;
pub use spawner::spawn_obstacles;
pub use state::{GamePhase, GameState, Obstacle, Particle, Player, SimEvent, TrailPoint};
pub use tick::{TickInput, tick, update_obstacles, update_player};
