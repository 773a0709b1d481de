//! Movement integration and collision response
//!
//! Movement resolution is axis-separated slide: attempt the full 2D
//! displacement, then each axis alone, and stay put if both axes are
//! blocked. No impulses, no penetration resolution; an entity's final
//! position each frame always passes the circle collision test.

use glam::Vec2;

use crate::consts::{PITCH_LIMIT, PLAYER_RADIUS};
use crate::map::TileMap;
use crate::sim::state::{Enemy, FrameInput, Player};
use crate::tuning::Tuning;
use crate::normalize_angle;

/// Walk-cycle frequency (rad/sec of phase while moving)
const WALK_FREQ: f32 = 7.0;
/// Pitch recentering rate when there is no vertical look input
const PITCH_DECAY: f32 = 1.5;

/// Resolve a move from `pos` to `target` against the map.
/// Returns the furthest non-colliding position: full move, x-only,
/// y-only, or `pos` unchanged.
pub fn slide_move(map: &TileMap, pos: Vec2, target: Vec2, radius: f32) -> Vec2 {
    if !map.collides(target, radius) {
        return target;
    }
    let x_only = Vec2::new(target.x, pos.y);
    if !map.collides(x_only, radius) {
        return x_only;
    }
    let y_only = Vec2::new(pos.x, target.y);
    if !map.collides(y_only, radius) {
        return y_only;
    }
    pos
}

/// Integrate player movement and look for one frame
pub fn update_player(
    player: &mut Player,
    map: &TileMap,
    tuning: &Tuning,
    input: &FrameInput,
    dt: f32,
) {
    // Defensive clamp; the driver already deadzone-normalizes
    let axes = input.move_axes.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    let stick = input.turn_stick.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));

    let forward = Vec2::from_angle(player.yaw);
    let right = forward.perp();
    let mut intent = forward * axes.x + right * axes.y;
    if intent.length_squared() > 1.0 {
        intent = intent.normalize();
    }

    let moving = intent.length_squared() > 1e-6;
    if moving {
        player.walk_phase += WALK_FREQ * dt;
    }
    let sway = 1.0 + player.walk_phase.sin() * tuning.walk_sway;
    let target = player.pos + intent * tuning.player_speed * sway * dt;
    player.pos = slide_move(map, player.pos, target, PLAYER_RADIUS);

    player.yaw = normalize_angle(player.yaw + stick.x * tuning.turn_rate * dt + input.look_delta.x);
    player.pitch += stick.y * tuning.pitch_rate * dt + input.look_delta.y;
    player.pitch = player.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    // Ease pitch back to level when the stick is centered
    if stick.y.abs() < 0.001 && input.look_delta.y.abs() < 1e-6 {
        player.pitch *= 1.0 - (PITCH_DECAY * dt).min(1.0);
    }
}

/// Push overlapping alive enemies apart, half the overlap each, along
/// the connecting unit vector. A push that would embed an enemy in a
/// wall is discarded for that enemy only. O(n²), fine for small counts.
pub fn separate_enemies(enemies: &mut [Enemy], map: &TileMap) {
    for j in 1..enemies.len() {
        let (left, right) = enemies.split_at_mut(j);
        let b = &mut right[0];
        if !b.alive {
            continue;
        }
        for a in left.iter_mut() {
            if !a.alive {
                continue;
            }
            let delta = b.pos - a.pos;
            let d2 = delta.length_squared();
            let min_dist = a.radius + b.radius;
            if d2 <= 0.0 || d2 >= min_dist * min_dist {
                continue;
            }
            let d = d2.sqrt().max(0.0001);
            let push = delta / d * (min_dist - d) * 0.5;
            let a_to = a.pos - push;
            let b_to = b.pos + push;
            if !map.collides(a_to, a.radius) {
                a.pos = a_to;
            }
            if !map.collides(b_to, b.radius) {
                b.pos = b_to;
            }
        }
    }
}
