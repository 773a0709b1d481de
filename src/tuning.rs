//! Data-driven game balance
//!
//! Every gameplay constant that designers tend to iterate on lives here,
//! with the shipped defaults matching the tuned build. A driver may
//! override the whole table from JSON at startup.

use serde::{Deserialize, Serialize};

/// Balance knobs for the simulation core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    // === Player ===
    /// Base walk speed (units/sec)
    pub player_speed: f32,
    /// Walk-cycle speed modulation amplitude (fraction of base speed)
    pub walk_sway: f32,
    /// Turn-stick yaw rate (rad/sec at full deflection)
    pub turn_rate: f32,
    /// Turn-stick pitch rate (rad/sec at full deflection)
    pub pitch_rate: f32,

    // === Weapon ===
    /// Rounds per clip
    pub clip_size: u32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    /// Seconds to reload
    pub reload_time: f32,
    pub bullet_speed: f32,
    pub bullet_ttl: f32,
    pub bullet_damage: i32,
    /// Bullet spawn height
    pub bullet_z0: f32,

    // === Aim assist ===
    /// Half-angle of the assist cone (radians)
    pub aim_cone: f32,
    /// Maximum assist range (units)
    pub aim_range: f32,
    /// Upper bound on the blend toward the target angle
    pub aim_strength: f32,

    // === Enemies ===
    /// Enemy health at spawn
    pub enemy_hp: i32,
    /// Enemy collision radius
    pub enemy_radius: f32,
    /// Enemies stop chasing inside this distance
    pub enemy_stop_range: f32,
    /// Per-second odds of a contact hit while in stop range
    pub contact_chance: f32,
    pub contact_damage: i32,
    /// Ranged attack band (min avoids point-blank degenerate angles)
    pub attack_range_min: f32,
    pub attack_range_max: f32,
    pub laser_speed: f32,
    pub laser_ttl: f32,
    pub laser_damage: i32,
    /// Laser spawn height
    pub laser_z0: f32,
    /// Score for a kill
    pub kill_score: u32,

    // === Renderer ===
    /// Slack when comparing billboard depth against wall depth
    pub occlusion_epsilon: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 2.6,
            walk_sway: 0.04,
            turn_rate: 3.6,
            pitch_rate: 1.8,

            clip_size: 6,
            fire_cooldown: 0.12,
            reload_time: 0.9,
            bullet_speed: 12.0,
            bullet_ttl: 1.4,
            bullet_damage: 60,
            bullet_z0: 0.35,

            aim_cone: 8.0_f32.to_radians(),
            aim_range: 9.0,
            aim_strength: 0.6,

            enemy_hp: 60,
            enemy_radius: 0.28,
            enemy_stop_range: 0.6,
            contact_chance: 0.5,
            contact_damage: 1,
            attack_range_min: 1.2,
            attack_range_max: 10.0,
            laser_speed: 14.0,
            laser_ttl: 0.8,
            laser_damage: 12,
            laser_z0: 0.45,
            kill_score: 120,

            occlusion_epsilon: 0.02,
        }
    }
}

impl Tuning {
    /// Parse a JSON override table. Unknown keys are rejected so typos in
    /// a tuning file fail loudly; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
