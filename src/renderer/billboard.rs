//! Billboard projection, occlusion, and sprite drawing
//!
//! Every dynamic entity projects to a screen x and an apparent size from
//! its camera-relative position. Sprites draw back-to-front after a
//! depth sort; each one is first occlusion-tested by sampling a handful
//! of columns across its width against the wall depth buffer. Sprite-
//! vs-sprite occlusion is draw order only.

use glam::Vec2;

use crate::renderer::framebuffer::{gray, rgba, Framebuffer};
use crate::renderer::raycast::{column_angle, ColumnHit};
use crate::sim::state::{Player, ProjectileKind, WorldState};

/// Billboards closer than this to the camera are rejected
const MIN_DISTANCE: f32 = 0.05;

/// A projected sprite awaiting the depth sort
struct Billboard {
    /// True ray distance from the camera
    depth: f32,
    screen_x: f32,
    /// Apparent size (inverse distance, scaled by screen width)
    size: f32,
    sprite: Sprite,
}

enum Sprite {
    Enemy {
        height: f32,
        spin: f32,
        size_mul: f32,
        shade: u8,
        hp_frac: f32,
    },
    /// Player round; tracers glow
    Shot { z: f32, glow: bool },
    /// Enemy laser bolt
    Laser,
    /// Fading point behind a laser or tracer
    TrailDot { alpha: f32 },
    Particle {
        height: f32,
        size: f32,
        ttl: f32,
        shade: u8,
    },
}

/// Project a world point to (distance, screen x, apparent size).
/// Rejects points outside the field of view or inside the near limit.
pub fn project(player: &Player, screen_w: f32, pos: Vec2) -> Option<(f32, f32, f32)> {
    let delta = pos - player.pos;
    let dist = delta.length();
    if dist < MIN_DISTANCE {
        return None;
    }
    let angle = crate::normalize_angle(delta.y.atan2(delta.x) - player.yaw);
    if angle.abs() > player.fov {
        return None;
    }
    let size = (1.0 / (dist + 0.0001) * (screen_w * 0.9)).min(9999.0);
    let screen_x = (0.5 + angle / player.fov) * screen_w;
    Some((dist, screen_x, size))
}

fn collect(world: &WorldState, screen_w: f32) -> Vec<Billboard> {
    let player = &world.player;
    let mut bills = Vec::new();

    for e in &world.enemies {
        if !e.alive {
            continue;
        }
        if let Some((depth, screen_x, size)) = project(player, screen_w, e.pos) {
            bills.push(Billboard {
                depth,
                screen_x,
                size,
                sprite: Sprite::Enemy {
                    height: e.height(),
                    spin: e.spin,
                    size_mul: e.size_mul,
                    shade: e.shade,
                    hp_frac: (e.hp as f32 / world.tuning.enemy_hp as f32).clamp(0.0, 1.0),
                },
            });
        }
    }

    for pr in &world.projectiles {
        if let Some((depth, screen_x, size)) = project(player, screen_w, pr.pos) {
            let sprite = match pr.kind {
                ProjectileKind::Laser => Sprite::Laser,
                ProjectileKind::Tracer => Sprite::Shot { z: pr.z, glow: true },
                ProjectileKind::Bullet => Sprite::Shot { z: pr.z, glow: false },
            };
            bills.push(Billboard {
                depth,
                screen_x,
                size,
                sprite,
            });
        }
        let n = pr.trail.len();
        for (i, &pt) in pr.trail.iter().enumerate() {
            if let Some((depth, screen_x, size)) = project(player, screen_w, pt) {
                bills.push(Billboard {
                    depth,
                    screen_x,
                    size,
                    sprite: Sprite::TrailDot {
                        alpha: (i + 1) as f32 / n as f32,
                    },
                });
            }
        }
    }

    for p in &world.particles {
        if let Some((depth, screen_x, size)) = project(player, screen_w, p.pos) {
            bills.push(Billboard {
                depth,
                screen_x,
                size,
                sprite: Sprite::Particle {
                    height: p.height,
                    size: p.size,
                    ttl: p.ttl,
                    shade: p.shade,
                },
            });
        }
    }

    bills
}

/// Coarse sprite-vs-wall visibility: sample a few columns across the
/// sprite's width and pass if any sample is nearer than the wall there.
/// The wall depth is corrected, so divide the correction back out per
/// sampled column.
fn occluded(b: &Billboard, hits: &[ColumnHit], fov: f32, screen_w: f32, epsilon: f32) -> bool {
    let cols = hits.len();
    if cols == 0 {
        return false;
    }
    let col_w = screen_w / cols as f32;
    let sprite_w = (b.size * 0.45).max(2.0);
    let left = b.screen_x - sprite_w / 2.0;
    let samples = ((sprite_w / col_w) as usize).max(5);
    for s in 0..samples {
        let px = left + s as f32 / (samples - 1) as f32 * sprite_w;
        let col = ((px / col_w) as i32).clamp(0, cols as i32 - 1) as usize;
        let cos_cam = column_angle(col, cols, fov).cos().max(0.0001);
        let wall_dist = hits[col].depth / cos_cam;
        if b.depth < wall_dist - epsilon {
            return false;
        }
    }
    true
}

/// Draw all billboards, far to near
pub fn draw_billboards(fb: &mut Framebuffer, world: &WorldState, hits: &[ColumnHit], horizon: f32) {
    let w = fb.width() as f32;
    let h = fb.height() as f32;
    let fov = world.player.fov;
    let epsilon = world.tuning.occlusion_epsilon;

    let mut bills = collect(world, w);
    bills.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    for b in &bills {
        if occluded(b, hits, fov, w, epsilon) {
            continue;
        }
        let sprite_w = (b.size * 0.45).max(2.0);
        match b.sprite {
            Sprite::Enemy {
                height,
                spin,
                size_mul,
                shade,
                hp_frac,
            } => {
                let cube = sprite_w * size_mul;
                let y_center = horizon - b.size * 0.7 - height * (h * 0.08);
                draw_cube(fb, b.screen_x, y_center, cube, spin, shade);
                // Health bar above the cube
                let bar_x = (b.screen_x - cube / 2.0) as i32;
                let bar_y = (y_center - cube / 2.0 - 8.0) as i32;
                let bar_w = cube as i32;
                fb.fill_rect(bar_x, bar_y, bar_w, 6, gray(0));
                fb.fill_rect(bar_x, bar_y, (cube * hp_frac) as i32, 6, gray(255));
            }
            Sprite::Shot { z, glow } => {
                let s = (b.size * 0.18).max(2.0);
                let rise = (z * h * 0.06).clamp(0.0, h * 0.15);
                let x = b.screen_x - s / 2.0;
                let y = horizon - s * 0.2 - rise;
                fb.fill_rect(x as i32, y as i32, s as i32, s as i32, gray(255));
                if glow {
                    fb.add_circle(b.screen_x, y + s / 2.0, s, 255, 0.25);
                }
            }
            Sprite::Laser => {
                let s = (sprite_w * 0.22).max(3.0);
                let y = horizon - s * 0.2;
                // Soft halo, then a hot core
                fb.add_circle(b.screen_x, y, s * 1.6, 255, 0.35);
                fb.add_circle(b.screen_x, y, (s * 0.6).max(1.0), 255, 1.0);
            }
            Sprite::TrailDot { alpha } => {
                let s = (sprite_w * 0.16).max(2.0);
                let y = horizon - s * 0.2;
                fb.add_circle(b.screen_x, y, s, 255, 0.08 + 0.22 * alpha);
            }
            Sprite::Particle {
                height,
                size,
                ttl,
                shade,
            } => {
                let s = (b.size * size * 0.6).max(2.0);
                let h_px = h * 0.12 * height.max(0.0);
                let y = if height <= 0.001 {
                    horizon - s * 0.5
                } else {
                    horizon - s * 0.3 - h_px
                };
                let alpha = 0.25 + 0.75 * (ttl / 1.6).clamp(0.0, 1.0);
                fb.blend_rect(
                    (b.screen_x - s / 2.0) as i32,
                    y as i32,
                    s as i32,
                    s as i32,
                    gray(shade),
                    alpha,
                );
            }
        }
    }
}

/// Orthographic spinning cube: three-axis rotation driven by one clock,
/// six faces filled in fixed painter order with per-face brightness.
fn draw_cube(fb: &mut Framebuffer, cx: f32, cy: f32, size: f32, t: f32, shade: u8) {
    let s = size / 2.0;
    let verts: [[f32; 3]; 8] = [
        [-s, -s, -s],
        [s, -s, -s],
        [s, s, -s],
        [-s, s, -s],
        [-s, -s, s],
        [s, -s, s],
        [s, s, s],
        [-s, s, s],
    ];
    let (sy, cy_) = t.sin_cos();
    let (sp, cp) = (t * 0.6).sin_cos();
    let (sr, cr) = (t * 0.3).sin_cos();
    let rot = |v: [f32; 3]| -> Vec2 {
        let [x, y, z] = v;
        // yaw, pitch, roll
        let (x1, y1, z1) = (x * cy_ - y * sy, x * sy + y * cy_, z);
        let (x2, y2, z2) = (x1, y1 * cp - z1 * sp, y1 * sp + z1 * cp);
        let (x3, y3, _z3) = (z2 * sr + x2 * cr, y2, z2 * cr - x2 * sr);
        Vec2::new(x3 + cx, y3 + cy)
    };
    let v: Vec<Vec2> = verts.iter().map(|&p| rot(p)).collect();
    const FACES: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [2, 3, 7, 6],
        [1, 2, 6, 5],
        [0, 3, 7, 4],
    ];
    const FACE_MUL: [f32; 6] = [0.70, 1.00, 0.85, 0.85, 0.90, 0.90];
    for (face, mul) in FACES.iter().zip(FACE_MUL) {
        let lum = (shade as f32 * mul).clamp(0.0, 255.0) as u8;
        fb.fill_quad(
            [v[face[0]], v[face[1]], v[face[2]], v[face[3]]],
            rgba(lum, lum, lum, 255),
        );
    }
}
