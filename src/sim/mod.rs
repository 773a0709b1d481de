//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Seeded RNG only, owned by the world state
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod combat;
pub mod enemy;
pub mod motion;
pub mod particles;
pub mod state;
pub mod update;

pub use combat::{aim_assist_direction, spawn_projectile};
pub use enemy::spawn_enemies;
pub use motion::{separate_enemies, slide_move};
pub use particles::{spawn_drift_burst, spawn_explosion};
pub use state::{
    Enemy, FrameInput, FrameReport, Owner, Particle, Player, Projectile, ProjectileKind,
    WorldState,
};
pub use update::update;
