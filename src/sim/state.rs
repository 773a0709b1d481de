//! World state and core simulation types
//!
//! The whole simulation is one snapshot passed into `update`/`render`;
//! there are no module-level singletons. State must stay deterministic:
//! seeded RNG only, stable iteration order, no platform dependencies.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::FOV;
use crate::map::TileMap;
use crate::sim::enemy::spawn_enemies;
use crate::tuning::Tuning;

/// The player's camera/body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Facing angle (radians)
    pub yaw: f32,
    /// Vertical look angle, clamped to the look limit
    pub pitch: f32,
    /// Horizontal field of view
    pub fov: f32,
    /// Walk-cycle phase, advanced only while moving. Drives the speed
    /// sway and the render-side view bob.
    pub walk_phase: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            yaw: 0.0,
            pitch: 0.0,
            fov: FOV,
            walk_phase: 0.0,
        }
    }
}

/// A pursuing cube enemy
///
/// Dead enemies are kept in the container with `alive = false` so any
/// external index stays valid; AI, hit tests, and rendering skip them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: i32,
    pub alive: bool,
    /// Seconds until the next ranged attack is allowed
    pub cooldown: f32,
    pub speed: f32,
    // Cosmetic parameters, randomized once at spawn
    /// Resting hover height
    pub hover: f32,
    /// Bob amplitude around the hover height
    pub bob_amp: f32,
    /// Animation clock (drives bobbing)
    pub anim_t: f32,
    /// Current spin angle
    pub spin: f32,
    /// Spin rate (signed)
    pub spin_rate: f32,
    /// Sprite size multiplier
    pub size_mul: f32,
    /// Base gray level, 180..=239
    pub shade: u8,
}

impl Enemy {
    /// Current animated height above the floor
    pub fn height(&self) -> f32 {
        (self.hover + self.anim_t.sin() * self.bob_amp).max(0.0)
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Projectile flavor; dispatched once in integration and once in drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Standard player round
    Bullet,
    /// Enemy shot, rendered as a glow dot with a trail
    Laser,
    /// Last round in the clip, bright with a trail
    Tracer,
}

impl ProjectileKind {
    /// Kinds that keep a position history for rendering
    pub fn has_trail(&self) -> bool {
        matches!(self, ProjectileKind::Laser | ProjectileKind::Tracer)
    }
}

/// Maximum trail points kept per projectile
pub const TRAIL_LENGTH: usize = 10;

/// An in-flight projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Horizontal velocity (units/sec); already scaled by launch pitch
    pub vel: Vec2,
    /// Height above the floor
    pub z: f32,
    /// Vertical velocity; gravity pulls it down each frame
    pub vz: f32,
    /// Remaining time-to-live (seconds)
    pub ttl: f32,
    pub owner: Owner,
    pub kind: ProjectileKind,
    /// Recent positions, newest last (bounded)
    pub trail: Vec<Vec2>,
}

impl Projectile {
    /// Push the current position onto the trail, dropping the oldest
    pub fn record_trail(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }
}

/// A short-lived explosion particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Horizontal velocity
    pub vel: Vec2,
    /// Height above the floor (independent of projectile z)
    pub height: f32,
    /// Vertical velocity
    pub v_height: f32,
    pub ttl: f32,
    pub size: f32,
    pub shade: u8,
    /// Drift-and-settle variant: skips gravity, decays horizontally
    pub no_gravity: bool,
}

/// Per-frame input, already normalized by the driver.
/// Axis values land in [-1, 1]; the core clamps defensively anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Movement intent: x = forward, y = strafe right
    pub move_axes: Vec2,
    /// Look stick: x = yaw, y = pitch (up positive)
    pub turn_stick: Vec2,
    /// Raw look delta in radians (mouse), applied directly
    pub look_delta: Vec2,
    /// Fire the weapon this frame
    pub fire: bool,
    /// Start a reload this frame
    pub reload: bool,
}

/// Side effects of one update, for the HUD collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub hp_delta: i32,
    pub ammo_delta: i32,
    pub score_delta: u32,
    /// Transient status line, newest event wins within a frame
    pub message: Option<&'static str>,
    pub level_complete: bool,
}

impl FrameReport {
    pub(crate) fn say(&mut self, msg: &'static str) {
        self.message = Some(msg);
    }
}

/// Complete game state; exclusively owned and mutated between ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Run seed, for reproduction
    pub seed: u64,
    pub rng: Pcg32,
    pub map: TileMap,
    pub tuning: Tuning,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    /// Rounds left in the clip
    pub ammo: u32,
    /// Player health, floored at zero
    pub hp: i32,
    pub score: u32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
    /// Seconds left on the active reload (0 = not reloading)
    pub reload_time: f32,
    /// Simulated seconds since world init
    pub time: f64,
    /// Player reached the exit tile
    pub won: bool,
}

impl WorldState {
    /// Build a world on the default level with `enemy_count` enemies
    pub fn new(seed: u64, enemy_count: usize) -> Self {
        Self::with_map(seed, TileMap::default(), Tuning::default(), enemy_count)
    }

    pub fn with_map(seed: u64, map: TileMap, tuning: Tuning, enemy_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let enemies = spawn_enemies(enemy_count, &map, &tuning, &mut rng);
        log::info!(
            "world init: seed={seed}, {}x{} map, {} enemies",
            map.width(),
            map.height(),
            enemies.len()
        );
        Self {
            seed,
            rng,
            map,
            player: Player::new(Vec2::new(2.5, 2.5)),
            enemies,
            projectiles: Vec::new(),
            particles: Vec::new(),
            ammo: tuning.clip_size,
            hp: 100,
            score: 0,
            fire_cooldown: 0.0,
            reload_time: 0.0,
            time: 0.0,
            won: false,
            tuning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_init() {
        let world = WorldState::new(7, 9);
        assert_eq!(world.enemies.len(), 9);
        assert_eq!(world.ammo, world.tuning.clip_size);
        assert_eq!(world.hp, 100);
        assert!(!world.won);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_spawn_is_seeded() {
        let a = WorldState::new(42, 9);
        let b = WorldState::new(42, 9);
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.shade, eb.shade);
        }
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut pr = Projectile {
            pos: Vec2::ZERO,
            vel: Vec2::X,
            z: 0.35,
            vz: 0.0,
            ttl: 1.0,
            owner: Owner::Enemy,
            kind: ProjectileKind::Laser,
            trail: Vec::new(),
        };
        for i in 0..30 {
            pr.pos = Vec2::new(i as f32, 0.0);
            pr.record_trail();
        }
        assert_eq!(pr.trail.len(), TRAIL_LENGTH);
        // Newest last
        assert_eq!(pr.trail.last().unwrap().x, 29.0);
    }
}
