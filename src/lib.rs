//! Character Runner - a side-scrolling obstacle dodger
//!
//! Core modules:
//! - `sim`: Simulation (player physics, spawner, collisions, particles)
//! - `game`: Frame loop driver, idle/running state machine, best score
//! - `input`: Event-driven input folded into per-tick snapshots
//! - `renderer`: Scene building and the WebGPU pipeline
//! - `persistence`: Key-value storage for the best score
//! - `tuning`: Data-driven game balance
//! - `settings`: Player-facing visual preferences

pub mod best_score;
pub mod game;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, GameEvent};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Fixed configuration that is not part of the balance data
pub mod consts {
    /// Longest frame delta fed to the simulation (ms)
    pub const MAX_FRAME_DT_MS: f32 = 100.0;

    /// Storage key for the best score
    pub const BEST_SCORE_KEY: &str = "cr_best";
    /// Storage key for settings
    pub const SETTINGS_KEY: &str = "character_runner_settings";

    /// Player sprite asset path
    pub const PLAYER_SPRITE_PATH: &str = "assets/character.png";
}

/// Clamp `v` into `[lo, hi]`
///
/// Unlike `f32::clamp` this never panics: if the range is inverted the
/// upper bound wins.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

/// Convert HSL (hue in degrees, saturation/lightness 0-1) to sRGB components in 0-1
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        // Inverted range does not panic
        assert_eq!(clamp(3.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);

        let blue = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!(blue[0].abs() < 1e-5 && blue[1].abs() < 1e-5 && (blue[2] - 1.0).abs() < 1e-5);

        let grey = hsl_to_rgb(200.0, 0.0, 0.5);
        assert!(grey.iter().all(|c| (c - 0.5).abs() < 1e-5));
    }
}
