//! Particle bursts and decay

use glam::Vec2;

use super::rng::SimRng;
use super::state::Particle;
use crate::tuning::Tuning;

/// Emit `count` particles at `at` with random velocity, size and hue
pub fn burst(particles: &mut Vec<Particle>, rng: &mut SimRng, tuning: &Tuning, at: Vec2, count: usize) {
    particles.reserve(count);
    let s = tuning.particle_max_speed;
    for _ in 0..count {
        particles.push(Particle {
            pos: at,
            vel: Vec2::new(rng.range(-s, s), rng.range(-s, s)),
            radius: rng.range(tuning.particle_min_radius, tuning.particle_max_radius),
            life: 1.0,
            hue: rng.range(tuning.particle_min_hue, tuning.particle_max_hue),
        });
    }
}

/// Integrate, damp and age particles by `dt` ms, dropping dead ones
pub fn update_particles(particles: &mut Vec<Particle>, tuning: &Tuning, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel *= tuning.particle_damping;
        p.life -= dt / tuning.particle_lifetime;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_count_and_ranges() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(3);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, &tuning, Vec2::new(50.0, 60.0), 80);

        assert_eq!(particles.len(), 80);
        for p in &particles {
            assert_eq!(p.pos, Vec2::new(50.0, 60.0));
            assert_eq!(p.life, 1.0);
            assert!(p.vel.x.abs() <= 3.0 && p.vel.y.abs() <= 3.0);
            assert!(p.radius >= 1.5 && p.radius <= 3.5);
            assert!(p.hue >= 180.0 && p.hue <= 260.0);
        }
    }

    #[test]
    fn test_update_moves_and_damps() {
        let tuning = Tuning::default();
        let mut particles = vec![Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(2.0, -1.0),
            radius: 2.0,
            life: 1.0,
            hue: 200.0,
        }];
        update_particles(&mut particles, &tuning, 120.0);

        let p = &particles[0];
        assert_eq!(p.pos, Vec2::new(2.0, -1.0));
        assert!((p.vel.x - 1.98).abs() < 1e-5);
        assert!((p.life - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_burst_expires_within_lifetime() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(9);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, &tuning, Vec2::new(10.0, 10.0), 40);

        // 16ms frames: 1200 / 16 = 75 frames to drain
        let mut frames = 0;
        while !particles.is_empty() {
            update_particles(&mut particles, &tuning, 16.0);
            frames += 1;
            assert!(frames <= 76, "particles outlived their lifetime");
        }
        assert!(frames >= 75);
    }
}
