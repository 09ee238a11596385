//! Scene building
//!
//! Turns simulation state into an ordered list of draw commands in canvas
//! pixel space. Pure: no GPU or DOM access, so it runs in tests.

use glam::Vec2;

use super::shapes::quadratic_points;
use super::vertex::colors::{self, hex};
use crate::hsl_to_rgb;
use crate::settings::Settings;
use crate::sim::GameState;
use crate::tuning::Tuning;

/// Corner radius of obstacle rectangles
const OBSTACLE_CORNER: f32 = 8.0;
/// Sprite edge length relative to player radius
const SPRITE_SCALE: f32 = 2.2;
/// Background scroll speed (px per ms)
const STAR_SCROLL: f64 = 0.06;
/// Points per quadratic segment of the fallback outline
const CURVE_STEPS: usize = 8;

/// Fallback player outline: start point then (control, end) pairs,
/// relative to the player centre
const BLOB_START: Vec2 = Vec2::new(-18.0, -6.0);
const BLOB_CURVES: [(Vec2, Vec2); 4] = [
    (Vec2::new(-6.0, -18.0), Vec2::new(10.0, -10.0)),
    (Vec2::new(22.0, -4.0), Vec2::new(10.0, 6.0)),
    (Vec2::new(-8.0, 6.0), Vec2::new(-6.0, 18.0)),
    (Vec2::new(-24.0, 14.0), Vec2::new(-18.0, -6.0)),
];

/// A single draw call against the 2D surface
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        pos: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    RoundedRect {
        pos: Vec2,
        size: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Closed simple polygon (may be concave)
    Polygon {
        points: Vec<Vec2>,
        color: [f32; 4],
    },
    /// Player image blit, rotated about its centre
    Sprite {
        center: Vec2,
        size: f32,
        rotation: f32,
        alpha: f32,
    },
}

/// One frame's draw list
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub clear: [f32; 4],
    pub commands: Vec<DrawCmd>,
}

/// Build the scene for a frame at time `now` (ms)
///
/// Layer order: starfield, trail, obstacles, player, particles.
pub fn build_scene(
    state: &GameState,
    tuning: &Tuning,
    settings: &Settings,
    sprite_ready: bool,
    now: f64,
) -> Scene {
    let mut commands = Vec::with_capacity(
        settings.star_count() + state.player.trail.len() + state.obstacles.len() * 2 + state.particles.len() + 1,
    );

    push_starfield(&mut commands, tuning, settings, now);
    if settings.trails {
        push_trail(&mut commands, state);
    }
    push_obstacles(&mut commands, state);
    push_player(&mut commands, state, sprite_ready);
    push_particles(&mut commands, state, settings.max_particles());

    Scene {
        width: tuning.canvas_width,
        height: tuning.canvas_height,
        clear: colors::BACKGROUND,
        commands,
    }
}

fn push_starfield(commands: &mut Vec<DrawCmd>, tuning: &Tuning, settings: &Settings, now: f64) {
    let w = tuning.canvas_width as f64;
    let h = tuning.canvas_height as f64;
    let scroll = if settings.starfield_scrolls() { now * STAR_SCROLL } else { 0.0 };

    for i in 0..settings.star_count() {
        let x = ((i * 73) as f64 + scroll).rem_euclid(w + 60.0) - 30.0;
        let y = ((i * 97) as f64).rem_euclid(h.max(1.0));
        let alpha = 0.25 + (i % 5) as f32 / 10.0;
        commands.push(DrawCmd::Rect {
            pos: Vec2::new(x as f32, y as f32),
            size: Vec2::splat(2.0),
            color: hex(colors::STAR, alpha),
        });
    }
}

fn push_trail(commands: &mut Vec<DrawCmd>, state: &GameState) {
    let len = state.player.trail.len() as f32;
    for (i, point) in state.player.trail.iter().enumerate() {
        // Oldest point is fully transparent
        let a = i as f32 / len;
        if a <= 0.0 {
            continue;
        }
        commands.push(DrawCmd::Circle {
            center: point.pos,
            radius: point.radius * 0.65 * a,
            color: hex(colors::TRAIL, a * 0.4),
        });
    }
}

fn push_obstacles(commands: &mut Vec<DrawCmd>, state: &GameState) {
    for o in &state.obstacles {
        commands.push(DrawCmd::RoundedRect {
            pos: o.pos,
            size: o.size,
            radius: OBSTACLE_CORNER,
            color: hex(colors::OBSTACLE, 1.0),
        });
        // Inner shine
        commands.push(DrawCmd::Rect {
            pos: o.pos + Vec2::splat(4.0),
            size: Vec2::new((o.size.x - 8.0).max(0.0), 6.0),
            color: hex(colors::SHINE, 0.15),
        });
    }
}

fn push_player(commands: &mut Vec<DrawCmd>, state: &GameState, sprite_ready: bool) {
    let player = &state.player;
    if sprite_ready {
        commands.push(DrawCmd::Sprite {
            center: player.pos,
            size: player.radius * SPRITE_SCALE,
            rotation: player.tilt(),
            alpha: 1.0,
        });
    } else {
        commands.push(DrawCmd::Polygon {
            points: fallback_outline().into_iter().map(|p| p + player.pos).collect(),
            color: hex(colors::PLAYER_FALLBACK, 1.0),
        });
    }
}

fn push_particles(commands: &mut Vec<DrawCmd>, state: &GameState, max: usize) {
    for p in state.particles.iter().take(max) {
        let [r, g, b] = hsl_to_rgb(p.hue, 0.9, 0.6);
        commands.push(DrawCmd::Circle {
            center: p.pos,
            radius: p.radius,
            color: [r, g, b, p.life.clamp(0.0, 1.0)],
        });
    }
}

/// Flattened vector outline drawn when the sprite image is unavailable
pub fn fallback_outline() -> Vec<Vec2> {
    let mut points = Vec::with_capacity(BLOB_CURVES.len() * CURVE_STEPS);
    let mut from = BLOB_START;
    for (control, to) in BLOB_CURVES {
        points.extend(quadratic_points(from, control, to, CURVE_STEPS));
        from = to;
    }
    points
}
