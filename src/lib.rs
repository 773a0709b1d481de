//! Monolite - a grayscale first-person raycasting mini-game core
//!
//! Core modules:
//! - `map`: static tile grid and geometry queries
//! - `sim`: deterministic simulation (movement, AI, combat, particles)
//! - `renderer`: software column raycaster + billboard pass
//! - `tuning`: data-driven game balance
//!
//! The embedding driver owns input capture, frame scheduling, and HUD
//! presentation; it calls [`sim::update`] and [`renderer::render`] once
//! per frame.

pub mod map;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use map::{Tile, TileMap};
pub use renderer::{render, Framebuffer};
pub use sim::{update, FrameInput, FrameReport, WorldState};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Horizontal field of view (radians)
    pub const FOV: f32 = std::f32::consts::PI / 3.0;
    /// Maximum ray march distance (world units)
    pub const MAX_DEPTH: f32 = 20.0;
    /// Ray march / line-of-sight step size (world units)
    pub const STEP: f32 = 0.02;
    /// Vertical look limit (±80°)
    pub const PITCH_LIMIT: f32 = std::f32::consts::PI * 80.0 / 180.0;
    /// Largest delta-time a single update will integrate. Explicit-Euler
    /// collision and ballistics go unstable above this.
    pub const MAX_DT: f32 = 0.033;
    /// Downward acceleration for projectiles and particles
    pub const GRAVITY: f32 = -9.8;
    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 0.18;
    /// Projectiles only connect while at most this high off the ground
    pub const HIT_HEIGHT: f32 = 0.6;
}

/// Normalize an angle to [-π, π)
#[inline]
pub fn normalize_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut x = (a + PI) % TAU;
    if x < 0.0 {
        x += TAU;
    }
    x - PI
}

/// Interpolate from angle `a` toward angle `b` along the shortest arc
#[inline]
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    a + normalize_angle(b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        for a in [-7.0_f32, -PI, -0.5, 0.0, 0.5, PI, 7.0, 100.0] {
            let n = normalize_angle(a);
            assert!((-PI..PI).contains(&n), "normalize_angle({a}) = {n}");
        }
    }

    #[test]
    fn test_lerp_angle_shortest_arc() {
        // Crossing the -π/π seam takes the short way round
        let a = PI - 0.1;
        let b = -PI + 0.1;
        let mid = lerp_angle(a, b, 0.5);
        assert!((normalize_angle(mid - PI).abs()) < 0.01);
    }

    #[test]
    fn test_pitch_limit_is_80_degrees() {
        let deg = consts::PITCH_LIMIT.to_degrees();
        assert!((deg - 80.0).abs() < 0.05);
    }
}
