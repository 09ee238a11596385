//! Shape generation for 2D primitives
//!
//! Tessellates [`Scene`] draw commands into triangle lists in canvas pixel
//! space. Colored shapes and sprite quads go to separate vertex lists;
//! [`Batch`] records the draw order across the two.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::ops::Range;

use glam::Vec2;

use super::scene::{DrawCmd, Scene};
use super::vertex::{SpriteVertex, Vertex};

/// Segments used for each rounded corner
const CORNER_SEGMENTS: u32 = 4;

/// A contiguous run of vertices drawn with one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch {
    Colored(Range<u32>),
    Sprite(Range<u32>),
}

/// Triangles for a whole frame
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub colored: Vec<Vertex>,
    pub sprites: Vec<SpriteVertex>,
    pub batches: Vec<Batch>,
}

impl Mesh {
    /// Tessellate a scene; `circle_segments` controls arc smoothness
    pub fn from_scene(scene: &Scene, circle_segments: u32) -> Self {
        let mut mesh = Mesh::default();
        for cmd in &scene.commands {
            match cmd {
                DrawCmd::Rect { pos, size, color } => {
                    let start = mesh.colored.len();
                    mesh.colored.extend(rect(*pos, *size, *color));
                    mesh.push_colored(start);
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    let start = mesh.colored.len();
                    mesh.colored
                        .extend(circle(*center, *radius, *color, circle_segments));
                    mesh.push_colored(start);
                }
                DrawCmd::RoundedRect {
                    pos,
                    size,
                    radius,
                    color,
                } => {
                    let start = mesh.colored.len();
                    mesh.colored
                        .extend(rounded_rect(*pos, *size, *radius, *color, CORNER_SEGMENTS));
                    mesh.push_colored(start);
                }
                DrawCmd::Polygon { points, color } => {
                    let start = mesh.colored.len();
                    mesh.colored.extend(polygon(points, *color));
                    mesh.push_colored(start);
                }
                DrawCmd::Sprite {
                    center,
                    size,
                    rotation,
                    alpha,
                } => {
                    let start = mesh.sprites.len();
                    mesh.sprites
                        .extend(sprite_quad(*center, *size, *rotation, *alpha));
                    mesh.push_sprite(start);
                }
            }
        }
        mesh
    }

    /// Extend the last colored batch or open a new one
    fn push_colored(&mut self, start: usize) {
        let end = self.colored.len() as u32;
        if end as usize == start {
            return;
        }
        match self.batches.last_mut() {
            Some(Batch::Colored(range)) if range.end as usize == start => range.end = end,
            _ => self.batches.push(Batch::Colored(start as u32..end)),
        }
    }

    fn push_sprite(&mut self, start: usize) {
        let end = self.sprites.len() as u32;
        match self.batches.last_mut() {
            Some(Batch::Sprite(range)) if range.end as usize == start => range.end = end,
            _ => self.batches.push(Batch::Sprite(start as u32..end)),
        }
    }
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    if radius <= 0.0 || segments < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a rectangle with rounded corners
///
/// The corner radius shrinks to fit small rectangles.
pub fn rounded_rect(
    pos: Vec2,
    size: Vec2,
    radius: f32,
    color: [f32; 4],
    corner_segments: u32,
) -> Vec<Vertex> {
    let r = radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
    if r == 0.0 {
        return rect(pos, size, color);
    }

    // Corner centres clockwise from top-left (screen space, y down)
    let corners = [
        (Vec2::new(pos.x + r, pos.y + r), PI),
        (Vec2::new(pos.x + size.x - r, pos.y + r), PI + FRAC_PI_2),
        (Vec2::new(pos.x + size.x - r, pos.y + size.y - r), 0.0),
        (Vec2::new(pos.x + r, pos.y + size.y - r), FRAC_PI_2),
    ];

    let mut outline = Vec::with_capacity((corners.len() as u32 * (corner_segments + 1)) as usize);
    for (c, start) in corners {
        for s in 0..=corner_segments {
            let theta = start + FRAC_PI_2 * s as f32 / corner_segments as f32;
            outline.push(c + Vec2::new(theta.cos(), theta.sin()) * r);
        }
    }

    fan(pos + size / 2.0, &outline, color)
}

/// Fill a closed outline as a triangle fan around `center`
pub fn fan(center: Vec2, outline: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if outline.len() < 2 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Fill a simple polygon by ear clipping
///
/// Works for concave outlines in either winding, matching a canvas
/// `fill()`. Collinear vertices are skipped.
pub fn polygon(outline: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if outline.len() < 3 {
        return Vec::new();
    }
    // +1 for counter-clockwise in y-up terms, -1 for clockwise
    let winding = signed_area(outline).signum();
    let mut remaining: Vec<usize> = (0..outline.len()).collect();
    let mut vertices = Vec::with_capacity((outline.len() - 2) * 3);

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let (a, b, c) = (
                outline[remaining[(i + n - 1) % n]],
                outline[remaining[i]],
                outline[remaining[(i + 1) % n]],
            );
            let turn = (b - a).perp_dot(c - b);
            if turn * winding < 0.0 {
                return false;
            }
            turn == 0.0
                || !remaining
                    .iter()
                    .map(|&k| outline[k])
                    .filter(|p| *p != a && *p != b && *p != c)
                    .any(|p| in_triangle(p, a, b, c))
        });

        // Self-intersecting input has no ear; stop rather than loop
        let Some(i) = ear else {
            break;
        };
        let (a, b, c) = (
            outline[remaining[(i + n - 1) % n]],
            outline[remaining[i]],
            outline[remaining[(i + 1) % n]],
        );
        if (b - a).perp_dot(c - b) != 0.0 {
            vertices.extend([a, b, c].map(|p| Vertex::new(p.x, p.y, color)));
        }
        remaining.remove(i);
    }

    if remaining.len() == 3 {
        vertices.extend(
            remaining
                .iter()
                .map(|&k| Vertex::new(outline[k].x, outline[k].y, color)),
        );
    }
    vertices
}

/// Twice the signed area (shoelace)
fn signed_area(outline: &[Vec2]) -> f32 {
    outline
        .iter()
        .zip(outline.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum()
}

/// Point inside or on the edge of triangle `abc`, either winding
fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Points along a quadratic Bezier, excluding `from`, ending at `to`
pub fn quadratic_points(from: Vec2, control: Vec2, to: Vec2, steps: usize) -> Vec<Vec2> {
    let steps = steps.max(1);
    (1..=steps)
        .map(|k| {
            let t = k as f32 / steps as f32;
            let u = 1.0 - t;
            from * (u * u) + control * (2.0 * u * t) + to * (t * t)
        })
        .collect()
}

/// Two textured triangles for a rotated square sprite
pub fn sprite_quad(center: Vec2, size: f32, rotation: f32, alpha: f32) -> Vec<SpriteVertex> {
    let half = size / 2.0;
    let rot = Vec2::from_angle(rotation);
    let corner = |dx: f32, dy: f32, u: f32, v: f32| {
        let p = center + rot.rotate(Vec2::new(dx, dy));
        SpriteVertex::new(p.x, p.y, u, v, alpha)
    };

    let tl = corner(-half, -half, 0.0, 0.0);
    let tr = corner(half, -half, 1.0, 0.0);
    let bl = corner(-half, half, 0.0, 1.0);
    let br = corner(half, half, 1.0, 1.0);
    vec![tl, tr, bl, bl, tr, br]
}
