//! Explosion particles
//!
//! Two flavors of burst: a gravity-bounce variant that arcs, bounces
//! with energy loss, and settles on the floor, and a no-gravity drift
//! variant that hovers at the death height and fades. Both deflect off
//! walls and expire by ttl.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::GRAVITY;
use crate::map::TileMap;
use crate::sim::state::Particle;

/// Bounce restitution on floor contact
const BOUNCE: f32 = -0.35;
/// Horizontal damping on floor contact
const GROUND_FRICTION: f32 = 0.82;
/// Horizontal reflection factor on wall contact (lossy)
const WALL_BOUNCE: f32 = -0.25;
/// Vertical rest threshold
const REST_VH: f32 = 0.2;
/// Horizontal rest threshold
const REST_SPEED: f32 = 0.05;
/// Horizontal decay rate for the drift variant (per second)
const DRIFT_DECAY: f32 = 2.5;

/// Spawn a ground explosion: 24..40 particles launched outward that fall,
/// bounce, and settle.
pub fn spawn_explosion(particles: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2, shade: u8) {
    let n = 24 + rng.random_range(0..16);
    for _ in 0..n {
        let a = rng.random_range(0.0..std::f32::consts::TAU);
        let dir = Vec2::from_angle(a);
        let speed = rng.random_range(2.0..5.5);
        particles.push(Particle {
            pos: pos + dir * 0.02,
            vel: dir * speed,
            height: rng.random_range(0.30..0.65),
            v_height: rng.random_range(1.2..2.5),
            ttl: rng.random_range(0.9..1.6),
            size: rng.random_range(0.10..0.28),
            shade,
            no_gravity: false,
        });
    }
}

/// Spawn a mid-air burst at a fixed height: 28..46 drift particles that
/// decay in place instead of falling.
pub fn spawn_drift_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    shade: u8,
    height: f32,
) {
    let n = 28 + rng.random_range(0..18);
    for _ in 0..n {
        let a = rng.random_range(0.0..std::f32::consts::TAU);
        let dir = Vec2::from_angle(a);
        let speed = rng.random_range(2.2..6.0);
        particles.push(Particle {
            pos: pos + dir * 0.06,
            vel: dir * speed,
            height: height.max(0.0),
            v_height: 0.0,
            ttl: rng.random_range(0.9..1.8),
            size: rng.random_range(0.08..0.24),
            shade,
            no_gravity: true,
        });
    }
}

/// Integrate all particles for one frame; expired ones are compacted
/// after the loop.
pub fn update_particles(particles: &mut Vec<Particle>, map: &TileMap, dt: f32) {
    for p in particles.iter_mut() {
        p.ttl -= dt;
        if p.ttl <= 0.0 {
            continue;
        }
        if p.no_gravity {
            p.vel *= (-DRIFT_DECAY * dt).exp();
        } else {
            p.v_height += GRAVITY * dt;
            p.height += p.v_height * dt;
            if p.height < 0.0 {
                p.height = 0.0;
                p.v_height *= BOUNCE;
                p.vel *= GROUND_FRICTION;
                if p.v_height.abs() < REST_VH {
                    p.v_height = 0.0;
                }
                if p.vel.length() < REST_SPEED {
                    p.vel = Vec2::ZERO;
                }
            }
        }
        p.pos += p.vel * dt;
        if map.is_wall(p.pos.x, p.pos.y) {
            p.vel *= WALL_BOUNCE;
        }
    }
    particles.retain(|p| p.ttl > 0.0);
}
