//! Weapon handling, aim assist, and projectile ballistics
//!
//! Projectiles carry a horizontal velocity plus an independent vertical
//! component under gravity; a shot only connects while its height is
//! near ground level, so high arcs sail over targets.

use glam::Vec2;

use crate::consts::{GRAVITY, HIT_HEIGHT};
use crate::map::TileMap;
use crate::sim::particles::{spawn_drift_burst, spawn_explosion};
use crate::sim::state::{
    Enemy, FrameReport, Owner, Player, Projectile, ProjectileKind, WorldState,
};
use crate::tuning::Tuning;
use crate::{lerp_angle, normalize_angle};

/// Hit radius of the player against enemy shots
const PLAYER_HIT_RADIUS: f32 = 0.35;
/// Deaths below this height explode on the ground; above it they
/// hover-and-fade in place.
const AIRBORNE_DEATH: f32 = 0.05;
/// Muzzle offset along the fire direction
const MUZZLE_OFFSET: f32 = 0.2;

/// Blend the player's raw aim toward the best assist target.
///
/// A target qualifies if it is alive, within the assist cone and range,
/// and line-of-sight holds; among candidates the smallest angular
/// deviation wins. The blend strength grows with angular closeness and
/// shrinks with distance, and never reaches 1 — the shot stays the
/// player's.
pub fn aim_assist_direction(
    player: &Player,
    enemies: &[Enemy],
    map: &TileMap,
    tuning: &Tuning,
    base_dir: f32,
) -> f32 {
    let mut best: Option<(f32, f32, f32)> = None; // (angle, deviation, dist)
    for e in enemies {
        if !e.alive {
            continue;
        }
        let delta = e.pos - player.pos;
        let dist = delta.length();
        if dist > tuning.aim_range {
            continue;
        }
        if !map.line_of_sight(player.pos, e.pos) {
            continue;
        }
        let angle = delta.y.atan2(delta.x);
        let deviation = normalize_angle(angle - base_dir).abs();
        if deviation > tuning.aim_cone {
            continue;
        }
        if best.is_none_or(|(_, d, _)| deviation < d) {
            best = Some((angle, deviation, dist));
        }
    }
    let Some((angle, deviation, dist)) = best else {
        return base_dir;
    };
    let closeness = 1.0 - deviation / tuning.aim_cone;
    let distance_factor = (1.0 - dist / tuning.aim_range).clamp(0.0, 1.0);
    let strength = tuning.aim_strength * closeness * (0.5 + 0.5 * distance_factor);
    lerp_angle(base_dir, angle, strength)
}

/// Push a new projectile. The velocity splits into a horizontal part
/// scaled by cos(pitch) and a vertical part sin(pitch) * speed.
#[allow(clippy::too_many_arguments)]
pub fn spawn_projectile(
    projectiles: &mut Vec<Projectile>,
    pos: Vec2,
    dir: f32,
    speed: f32,
    ttl: f32,
    owner: Owner,
    kind: ProjectileKind,
    z0: f32,
    pitch: f32,
) {
    let heading = Vec2::from_angle(dir);
    projectiles.push(Projectile {
        pos: pos + heading * MUZZLE_OFFSET,
        vel: heading * speed * pitch.cos(),
        z: z0,
        vz: pitch.sin() * speed,
        ttl,
        owner,
        kind,
        trail: Vec::new(),
    });
}

/// Attempt to fire the player's weapon. Blocked while reloading, during
/// the fire cooldown, or after the level is won; an empty clip only
/// reports the click.
pub fn try_fire(world: &mut WorldState, report: &mut FrameReport) {
    if world.won || world.reload_time > 0.0 || world.fire_cooldown > 0.0 {
        return;
    }
    if world.ammo == 0 {
        report.say("Click! (empty)");
        return;
    }
    world.ammo -= 1;
    report.ammo_delta -= 1;
    report.say("Bang!");
    world.fire_cooldown = world.tuning.fire_cooldown;

    let aim = aim_assist_direction(
        &world.player,
        &world.enemies,
        &world.map,
        &world.tuning,
        world.player.yaw,
    );
    // The last round in the clip is a tracer
    let kind = if world.ammo == 0 {
        ProjectileKind::Tracer
    } else {
        ProjectileKind::Bullet
    };
    spawn_projectile(
        &mut world.projectiles,
        world.player.pos,
        aim,
        world.tuning.bullet_speed,
        world.tuning.bullet_ttl,
        Owner::Player,
        kind,
        world.tuning.bullet_z0,
        world.player.pitch,
    );
}

/// Begin reloading unless a reload is already running
pub fn start_reload(world: &mut WorldState, report: &mut FrameReport) {
    if world.reload_time > 0.0 {
        return;
    }
    world.reload_time = world.tuning.reload_time;
    report.say("Reloading\u{2026}");
}

/// Advance the fire cooldown and the reload timer; a finished reload
/// refills the clip.
pub fn tick_weapon_timers(world: &mut WorldState, report: &mut FrameReport, dt: f32) {
    world.fire_cooldown = (world.fire_cooldown - dt).max(0.0);
    if world.reload_time > 0.0 {
        world.reload_time -= dt;
        if world.reload_time <= 0.0 {
            world.reload_time = 0.0;
            report.ammo_delta += world.tuning.clip_size as i32 - world.ammo as i32;
            world.ammo = world.tuning.clip_size;
        }
    }
}

/// Integrate every projectile and resolve hits.
///
/// Order per projectile: ttl, wall check at the destination (a wall
/// kills the shot without moving it), commit position, then damage. A
/// projectile deals at most one hit; the first matching enemy wins.
/// Expired shots are compacted after the loop, never mid-iteration.
pub fn integrate_projectiles(world: &mut WorldState, report: &mut FrameReport, dt: f32) {
    let WorldState {
        projectiles,
        enemies,
        particles,
        player,
        map,
        tuning,
        rng,
        hp,
        score,
        ..
    } = world;

    for pr in projectiles.iter_mut() {
        pr.ttl -= dt;
        if pr.ttl <= 0.0 {
            continue;
        }
        let next = pr.pos + pr.vel * dt;
        pr.vz += GRAVITY * dt;
        let next_z = pr.z + pr.vz * dt;
        if map.is_wall(next.x, next.y) {
            pr.ttl = 0.0;
            continue;
        }
        if pr.kind.has_trail() {
            pr.record_trail();
        }
        pr.pos = next;
        pr.z = next_z;

        // High arcs pass over everything
        let z_ok = pr.z <= HIT_HEIGHT;
        if !z_ok {
            continue;
        }

        match pr.owner {
            Owner::Player => {
                for e in enemies.iter_mut() {
                    if !e.alive {
                        continue;
                    }
                    if e.pos.distance(pr.pos) < e.radius {
                        e.hp = (e.hp - tuning.bullet_damage).max(0);
                        pr.ttl = 0.0;
                        if e.hp == 0 {
                            e.alive = false;
                            *score += tuning.kill_score;
                            report.score_delta += tuning.kill_score;
                            report.say("Cube down");
                            log::debug!("enemy down at {:.1},{:.1}", e.pos.x, e.pos.y);
                            let height = e.height();
                            if height > AIRBORNE_DEATH {
                                spawn_drift_burst(particles, rng, e.pos, e.shade, height);
                            } else {
                                spawn_explosion(particles, rng, e.pos, e.shade);
                            }
                        }
                        break;
                    }
                }
            }
            Owner::Enemy => {
                if player.pos.distance(pr.pos) < PLAYER_HIT_RADIUS {
                    pr.ttl = 0.0;
                    *hp = (*hp - tuning.laser_damage).max(0);
                    report.hp_delta -= tuning.laser_damage;
                    report.say("Laser hit!");
                }
            }
        }
    }
    projectiles.retain(|pr| pr.ttl > 0.0);
}
