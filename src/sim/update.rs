//! Per-frame simulation entry point
//!
//! The driver calls [`update`] once per animation frame with the clamped
//! wall-clock delta. Order within a tick: weapon timers and player
//! motion, enemy AI, enemy separation, projectiles, particles, exit
//! check. Containers are only compacted after their integration loops.

use crate::consts::MAX_DT;
use crate::map::Tile;
use crate::sim::state::{FrameInput, FrameReport, WorldState};
use crate::sim::{combat, enemy, motion, particles};

/// Advance the world by one frame. `dt` is in seconds and gets clamped
/// to a sane maximum so frame hitches cannot destabilize the explicit
/// Euler integration.
pub fn update(world: &mut WorldState, input: &FrameInput, dt: f32) -> FrameReport {
    let mut report = FrameReport::default();
    let dt = dt.clamp(0.0, MAX_DT);
    world.time += dt as f64;

    motion::update_player(&mut world.player, &world.map, &world.tuning, input, dt);
    combat::tick_weapon_timers(world, &mut report, dt);
    if input.fire {
        combat::try_fire(world, &mut report);
    }
    if input.reload {
        combat::start_reload(world, &mut report);
    }

    {
        let WorldState {
            enemies,
            projectiles,
            player,
            hp,
            map,
            tuning,
            rng,
            ..
        } = world;
        enemy::update_enemies(
            enemies,
            projectiles,
            player,
            hp,
            map,
            tuning,
            rng,
            &mut report,
            dt,
        );
    }
    motion::separate_enemies(&mut world.enemies, &world.map);

    combat::integrate_projectiles(world, &mut report, dt);
    particles::update_particles(&mut world.particles, &world.map, dt);

    let on_exit = world.map.tile_at(world.player.pos.x, world.player.pos.y) == Tile::Exit;
    if on_exit && !world.won {
        world.won = true;
        report.say("Level complete!");
        log::info!("level complete: score={}", world.score);
    }
    report.level_complete = world.won;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_dt_is_clamped() {
        let mut w = WorldState::new(1, 0);
        let input = FrameInput {
            move_axes: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        let before = w.player.pos;
        // A 10 second hitch still only integrates MAX_DT
        update(&mut w, &input, 10.0);
        let moved = w.player.pos.distance(before);
        assert!(moved <= w.tuning.player_speed * (1.0 + w.tuning.walk_sway) * MAX_DT + 1e-4);
    }

    #[test]
    fn test_malformed_input_clamped() {
        let mut w = WorldState::new(1, 0);
        let input = FrameInput {
            move_axes: Vec2::new(50.0, -50.0),
            turn_stick: Vec2::new(9.0, 9.0),
            ..Default::default()
        };
        let before = w.player.pos;
        update(&mut w, &input, DT);
        // Clamped intent can never exceed one normalized step
        let max_step = w.tuning.player_speed * (1.0 + w.tuning.walk_sway) * DT;
        assert!(w.player.pos.distance(before) <= max_step + 1e-4);
    }

    #[test]
    fn test_fire_scenario_no_enemies() {
        // Player at (2.5, 2.5) facing east, full clip, nothing in range
        let mut w = WorldState::new(1, 0);
        let input = FrameInput {
            fire: true,
            ..Default::default()
        };
        let report = update(&mut w, &input, DT);
        assert_eq!(report.ammo_delta, -1);
        assert_eq!(w.projectiles.len(), 1);
        let pr = &w.projectiles[0];
        assert_eq!(pr.owner, crate::sim::Owner::Player);
        assert_eq!(pr.kind, crate::sim::ProjectileKind::Bullet);
        // Spawned near the player, offset along the fire direction, and
        // already advanced one frame eastward
        assert!(pr.pos.distance(w.player.pos) < 0.5);
        assert!(pr.pos.x > w.player.pos.x);
    }

    #[test]
    fn test_exit_reports_level_complete() {
        let mut w = WorldState::new(1, 0);
        w.player.pos = Vec2::new(14.5, 14.5);
        let report = update(&mut w, &FrameInput::default(), DT);
        assert!(report.level_complete);
        assert_eq!(report.message, Some("Level complete!"));
        assert!(w.won);
        // Subsequent frames keep reporting the flag without the message
        let report = update(&mut w, &FrameInput::default(), DT);
        assert!(report.level_complete);
        assert_eq!(report.message, None);
    }

    #[test]
    fn test_won_blocks_firing() {
        let mut w = WorldState::new(1, 0);
        w.player.pos = Vec2::new(14.5, 14.5);
        update(&mut w, &FrameInput::default(), DT);
        let input = FrameInput {
            fire: true,
            ..Default::default()
        };
        let report = update(&mut w, &input, DT);
        assert_eq!(report.ammo_delta, 0);
        assert!(w.projectiles.is_empty());
    }

    #[test]
    fn test_player_never_inside_wall() {
        let mut w = WorldState::new(7, 4);
        // Grind against walls in varying directions for a while
        for i in 0..600 {
            let a = i as f32 * 0.05;
            let input = FrameInput {
                move_axes: Vec2::new(a.cos(), a.sin()),
                turn_stick: Vec2::new(0.3, 0.0),
                ..Default::default()
            };
            update(&mut w, &input, DT);
            assert!(
                !w.map.collides(w.player.pos, crate::consts::PLAYER_RADIUS),
                "player embedded at {:?} on frame {i}",
                w.player.pos
            );
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = WorldState::new(424242, 9);
        let mut b = WorldState::new(424242, 9);
        let inputs = [
            FrameInput {
                move_axes: Vec2::new(1.0, 0.0),
                fire: true,
                ..Default::default()
            },
            FrameInput {
                turn_stick: Vec2::new(0.5, 0.1),
                ..Default::default()
            },
            FrameInput {
                fire: true,
                reload: true,
                ..Default::default()
            },
            FrameInput::default(),
        ];
        for _ in 0..120 {
            for input in &inputs {
                update(&mut a, input, DT);
                update(&mut b, input, DT);
            }
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.hp, b.hp);
        assert_eq!(a.projectiles.len(), b.projectiles.len());
        assert_eq!(a.particles.len(), b.particles.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.hp, eb.hp);
        }
    }

    #[test]
    fn test_enemy_health_floor() {
        let mut w = WorldState::new(5, 3);
        // Run long enough for some combat to happen
        let input = FrameInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..300 {
            update(&mut w, &input, DT);
            for e in &w.enemies {
                assert!(e.hp >= 0);
            }
            assert!(w.hp >= 0);
        }
    }
}
