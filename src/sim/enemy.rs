//! Enemy spawning and per-frame AI
//!
//! The AI is fully reactive: each frame an enemy decides from scratch
//! whether to chase, boop, or shoot. The only state carried across
//! frames is the attack cooldown (and cosmetic animation clocks).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::map::{Tile, TileMap};
use crate::sim::combat::spawn_projectile;
use crate::sim::motion::slide_move;
use crate::sim::state::{Enemy, FrameReport, Owner, Player, Projectile, ProjectileKind};
use crate::tuning::Tuning;

/// Rejection-sample `n` spawn positions on floor tiles in a window
/// around the map center. Gives up after a bounded number of tries so a
/// wall-heavy map can't loop forever.
pub fn spawn_enemies(n: usize, map: &TileMap, tuning: &Tuning, rng: &mut Pcg32) -> Vec<Enemy> {
    let w = map.width() as f32;
    let h = map.height() as f32;
    let center = Vec2::new(w * 0.5, h * 0.5);
    let spread = (w.min(h) * 0.28).max(2.5);

    let mut enemies = Vec::with_capacity(n);
    let mut tries = 0;
    while enemies.len() < n && tries < 2000 {
        tries += 1;
        let x = (center.x + rng.random_range(-1.0..1.0) * spread).clamp(1.5, w - 1.5);
        let y = (center.y + rng.random_range(-1.0..1.0) * spread).clamp(1.5, h - 1.5);
        if map.tile_at(x, y) != Tile::Floor {
            continue;
        }
        let spin_dir = if rng.random_range(0.0..1.0) < 0.5 { -1.0 } else { 1.0 };
        enemies.push(Enemy {
            pos: Vec2::new(x, y),
            radius: tuning.enemy_radius,
            hp: tuning.enemy_hp,
            alive: true,
            cooldown: rng.random_range(0.5..1.3),
            speed: rng.random_range(0.7..1.6),
            hover: rng.random_range(0.05..0.30),
            bob_amp: rng.random_range(0.02..0.06),
            anim_t: rng.random_range(0.0..10.0),
            spin: rng.random_range(0.0..std::f32::consts::TAU),
            spin_rate: rng.random_range(0.5..2.0) * spin_dir,
            size_mul: rng.random_range(0.32..0.44),
            shade: 180 + rng.random_range(0..60) as u8,
        });
    }
    if enemies.len() < n {
        log::warn!("spawned {}/{} enemies before giving up", enemies.len(), n);
    }
    enemies
}

/// Advance every alive enemy: cooldowns, animation, chase-or-boop, and
/// the line-of-sight-gated ranged attack.
#[allow(clippy::too_many_arguments)]
pub fn update_enemies(
    enemies: &mut [Enemy],
    projectiles: &mut Vec<Projectile>,
    player: &Player,
    player_hp: &mut i32,
    map: &TileMap,
    tuning: &Tuning,
    rng: &mut Pcg32,
    report: &mut FrameReport,
    dt: f32,
) {
    for e in enemies.iter_mut() {
        if !e.alive {
            continue;
        }
        e.cooldown = (e.cooldown - dt).max(0.0);
        e.anim_t += dt;
        e.spin += e.spin_rate * dt;

        let delta = player.pos - e.pos;
        let dist = delta.length();
        if dist > tuning.enemy_stop_range {
            let target = e.pos + delta / dist * (e.speed * dt);
            e.pos = slide_move(map, e.pos, target, e.radius);
        } else if rng.random_range(0.0..1.0) < tuning.contact_chance * dt {
            *player_hp = (*player_hp - tuning.contact_damage).max(0);
            report.hp_delta -= tuning.contact_damage;
            report.say("Cube boop");
        }

        let in_band = dist > tuning.attack_range_min && dist < tuning.attack_range_max;
        if in_band && e.cooldown == 0.0 && map.line_of_sight(e.pos, player.pos) {
            let angle = delta.y.atan2(delta.x);
            spawn_projectile(
                projectiles,
                e.pos,
                angle,
                tuning.laser_speed,
                tuning.laser_ttl,
                Owner::Enemy,
                ProjectileKind::Laser,
                tuning.laser_z0,
                0.0,
            );
            e.cooldown = rng.random_range(0.7..1.7);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fixture() -> (TileMap, Tuning, Pcg32) {
        (TileMap::default(), Tuning::default(), Pcg32::seed_from_u64(5))
    }

    #[test]
    fn test_spawns_on_floor_only() {
        let (map, tuning, mut rng) = fixture();
        let enemies = spawn_enemies(12, &map, &tuning, &mut rng);
        assert_eq!(enemies.len(), 12);
        for e in &enemies {
            assert_eq!(map.tile_at(e.pos.x, e.pos.y), Tile::Floor);
            assert_eq!(e.hp, tuning.enemy_hp);
            assert!(e.alive);
            assert!((180..240).contains(&(e.shade as i32)));
        }
    }

    #[test]
    fn test_spawn_gives_up_on_solid_map() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let solid = TileMap::from_flat(8, 8, &[1; 64]);
        let enemies = spawn_enemies(4, &solid, &tuning, &mut rng);
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_enemy_chases_player() {
        let (map, tuning, mut rng) = fixture();
        let mut enemies = spawn_enemies(1, &map, &tuning, &mut rng);
        enemies[0].pos = Vec2::new(8.5, 8.5);
        let player = Player::new(Vec2::new(6.5, 8.5));
        let before = enemies[0].pos.distance(player.pos);
        let mut hp = 100;
        let mut report = FrameReport::default();
        let mut projectiles = Vec::new();
        update_enemies(
            &mut enemies,
            &mut projectiles,
            &player,
            &mut hp,
            &map,
            &tuning,
            &mut rng,
            &mut report,
            0.016,
        );
        assert!(enemies[0].pos.distance(player.pos) < before);
    }

    #[test]
    fn test_attack_requires_line_of_sight() {
        let (map, tuning, mut rng) = fixture();
        let mut enemies = spawn_enemies(1, &map, &tuning, &mut rng);
        // Wall block at (5, 2) sits between these two floor positions
        enemies[0].pos = Vec2::new(4.5, 2.5);
        enemies[0].cooldown = 0.0;
        let player = Player::new(Vec2::new(7.5, 2.5));
        let mut hp = 100;
        let mut report = FrameReport::default();
        let mut projectiles = Vec::new();
        update_enemies(
            &mut enemies,
            &mut projectiles,
            &player,
            &mut hp,
            &map,
            &tuning,
            &mut rng,
            &mut report,
            0.016,
        );
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_attack_fires_and_resets_cooldown() {
        let (map, tuning, mut rng) = fixture();
        let mut enemies = spawn_enemies(1, &map, &tuning, &mut rng);
        enemies[0].pos = Vec2::new(8.5, 8.5);
        enemies[0].cooldown = 0.0;
        let player = Player::new(Vec2::new(5.5, 8.5));
        let mut hp = 100;
        let mut report = FrameReport::default();
        let mut projectiles = Vec::new();
        update_enemies(
            &mut enemies,
            &mut projectiles,
            &player,
            &mut hp,
            &map,
            &tuning,
            &mut rng,
            &mut report,
            0.016,
        );
        assert_eq!(projectiles.len(), 1);
        let pr = &projectiles[0];
        assert_eq!(pr.owner, Owner::Enemy);
        assert_eq!(pr.kind, ProjectileKind::Laser);
        // Aimed at the player (westward)
        assert!(pr.vel.x < 0.0);
        assert!(enemies[0].cooldown >= 0.7);
    }

    #[test]
    fn test_dead_enemy_is_inert() {
        let (map, tuning, mut rng) = fixture();
        let mut enemies = spawn_enemies(1, &map, &tuning, &mut rng);
        enemies[0].pos = Vec2::new(8.5, 8.5);
        enemies[0].alive = false;
        enemies[0].cooldown = 0.0;
        let pos_before = enemies[0].pos;
        let player = Player::new(Vec2::new(5.5, 8.5));
        let mut hp = 100;
        let mut report = FrameReport::default();
        let mut projectiles = Vec::new();
        update_enemies(
            &mut enemies,
            &mut projectiles,
            &player,
            &mut hp,
            &map,
            &tuning,
            &mut rng,
            &mut report,
            0.016,
        );
        assert_eq!(enemies[0].pos, pos_before);
        assert!(projectiles.is_empty());
    }
}
