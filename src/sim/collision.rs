//! Collision detection between the player circle and obstacle rectangles
//!
//! Only player-vs-obstacle contacts matter. Obstacles may overlap each other
//! freely and are never tested against one another.

use glam::Vec2;

use super::state::Obstacle;
use crate::clamp;

/// Exact circle vs axis-aligned rectangle test
///
/// Clamps the circle centre onto the rectangle to find the closest point,
/// then compares the squared distance with the squared radius.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_min: Vec2, rect_size: Vec2) -> bool {
    let closest = Vec2::new(
        clamp(center.x, rect_min.x, rect_min.x + rect_size.x),
        clamp(center.y, rect_min.y, rect_min.y + rect_size.y),
    );
    center.distance_squared(closest) < radius * radius
}

/// Index of the first obstacle the player circle touches
pub fn first_hit(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| circle_rect_overlap(center, radius, o.pos, o.size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_center_inside_rect() {
        assert!(circle_rect_overlap(
            Vec2::new(100.0, 100.0),
            22.0,
            Vec2::new(90.0, 90.0),
            Vec2::new(40.0, 40.0)
        ));
    }

    #[test]
    fn test_disjoint() {
        assert!(!circle_rect_overlap(
            Vec2::new(0.0, 0.0),
            5.0,
            Vec2::new(1000.0, 1000.0),
            Vec2::new(50.0, 50.0)
        ));
    }

    #[test]
    fn test_edge_graze() {
        let rect_min = Vec2::new(100.0, 100.0);
        let size = Vec2::new(40.0, 40.0);
        // 10px left of the left edge, radius 12: overlap
        assert!(circle_rect_overlap(Vec2::new(90.0, 120.0), 12.0, rect_min, size));
        // Exactly touching is not a hit
        assert!(!circle_rect_overlap(Vec2::new(90.0, 120.0), 10.0, rect_min, size));
    }

    #[test]
    fn test_corner_uses_euclidean_distance() {
        let rect_min = Vec2::new(100.0, 100.0);
        let size = Vec2::new(40.0, 40.0);
        // (93, 93) is ~9.9px from the corner, inside both axis spans of radius 8
        // bounding box but outside the circle
        assert!(!circle_rect_overlap(Vec2::new(93.0, 93.0), 8.0, rect_min, size));
        assert!(circle_rect_overlap(Vec2::new(95.0, 95.0), 8.0, rect_min, size));
    }

    #[test]
    fn test_first_hit_picks_touching_obstacle() {
        let far = Obstacle {
            pos: Vec2::new(800.0, 0.0),
            size: Vec2::new(40.0, 40.0),
            vx: -3.0,
            t: 0.0,
            wobble: 1.0,
        };
        let near = Obstacle {
            pos: Vec2::new(110.0, 90.0),
            ..far.clone()
        };
        let obstacles = vec![far, near];
        assert_eq!(first_hit(Vec2::new(100.0, 100.0), 22.0, &obstacles), Some(1));
        assert_eq!(first_hit(Vec2::new(400.0, 400.0), 22.0, &obstacles), None);
    }

    proptest! {
        #[test]
        fn center_inside_always_hits(
            x in 0.0f32..500.0, y in 0.0f32..500.0,
            w in 1.0f32..100.0, h in 1.0f32..100.0,
            fx in 0.0f32..=1.0, fy in 0.0f32..=1.0,
            r in 0.1f32..50.0,
        ) {
            let center = Vec2::new(x + w * fx, y + h * fy);
            prop_assert!(circle_rect_overlap(center, r, Vec2::new(x, y), Vec2::new(w, h)));
        }

        #[test]
        fn far_away_never_hits(
            x in 0.0f32..500.0, y in 0.0f32..500.0,
            w in 1.0f32..100.0, h in 1.0f32..100.0,
            r in 0.1f32..50.0,
        ) {
            let center = Vec2::new(x + w + r + 1.0, y - r - 1.0);
            prop_assert!(!circle_rect_overlap(center, r, Vec2::new(x, y), Vec2::new(w, h)));
        }
    }
}
