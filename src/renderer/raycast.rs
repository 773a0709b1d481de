//! Column raycasting: depth buffer and wall strips
//!
//! One ray per screen column (half the pixel width), marched in fixed
//! steps until it hits a wall or exit tile or runs out of depth. The
//! raw hit distance times cos(column angle) gives the perspective-
//! correct depth; the billboard pass divides it back out when it needs
//! the true ray distance.

use glam::Vec2;

use crate::consts::{MAX_DEPTH, STEP};
use crate::map::{Tile, TileMap};
use crate::renderer::framebuffer::Framebuffer;
use crate::sim::state::Player;

/// Result of one column's ray march
#[derive(Debug, Clone, Copy)]
pub struct ColumnHit {
    /// Fish-eye corrected depth
    pub depth: f32,
    /// What the ray hit; `None` if it ran out at max depth
    pub tile: Option<Tile>,
}

/// March a single ray; returns the raw (uncorrected) distance and the
/// terminating tile.
pub fn cast_ray(map: &TileMap, origin: Vec2, angle: f32) -> (f32, Option<Tile>) {
    let step = Vec2::from_angle(angle) * STEP;
    let mut p = origin;
    let mut dist = 0.0;
    while dist < MAX_DEPTH {
        p += step;
        dist += STEP;
        match map.tile_at(p.x, p.y) {
            t @ (Tile::Wall | Tile::Exit) => return (dist, Some(t)),
            Tile::Floor => {}
        }
    }
    (MAX_DEPTH, None)
}

/// Cast one ray per column across the field of view, with fish-eye
/// correction applied.
pub fn cast_columns(map: &TileMap, player: &Player, cols: usize) -> Vec<ColumnHit> {
    let mut hits = Vec::with_capacity(cols);
    for i in 0..cols {
        let cam_x = (i as f32 / cols as f32 - 0.5) * player.fov;
        let (dist, tile) = cast_ray(map, player.pos, player.yaw + cam_x);
        hits.push(ColumnHit {
            depth: dist * cam_x.cos(),
            tile,
        });
    }
    hits
}

/// Camera-space angle offset of a column, for undoing the correction
#[inline]
pub fn column_angle(col: usize, cols: usize, fov: f32) -> f32 {
    (col as f32 / cols as f32 - 0.5) * fov
}

/// Draw the wall strips: shading by depth, lighter exit tiles, neighbor
/// depth AO, a vertical contact gradient, and a soft ground shadow
/// under each column.
pub fn draw_walls(fb: &mut Framebuffer, hits: &[ColumnHit], horizon: f32) {
    let h = fb.height() as f32;
    let cols = hits.len();
    if cols == 0 {
        return;
    }
    let col_w = fb.width() as f32 / cols as f32;

    let neighbor_contrast = |i: usize| -> f32 {
        let c = hits[i].depth;
        let l = if i > 0 { hits[i - 1].depth } else { c };
        let r = if i + 1 < cols { hits[i + 1].depth } else { c };
        (l - c).abs() + (r - c).abs()
    };

    let mut y_bots = vec![f32::NAN; cols];
    for (i, hit) in hits.iter().enumerate() {
        let depth = hit.depth;
        let wall_h = (h / (depth + 0.0001) * 0.9).min(h);
        let shade = (1.0 - depth / 10.0).clamp(0.0, 1.0);
        let mut lum = match hit.tile {
            Some(Tile::Exit) => 200.0 + 55.0 * shade,
            _ => 255.0 * shade,
        };
        let ao = (neighbor_contrast(i) * 0.125).clamp(0.0, 0.35);
        lum *= 1.0 - ao;
        let edge_ao = (0.225 * (1.0 - (depth / 12.0).clamp(0.0, 1.0))).clamp(0.0, 0.225);
        let lum_edge = lum * (1.0 - edge_ao);

        let x0 = (i as f32 * col_w).floor() as i32;
        let w = col_w.ceil() as i32 + 1;
        let y_top = horizon - wall_h / 2.0;
        let y_bot = y_top + wall_h;
        y_bots[i] = y_bot;
        fb.column_gradient(x0, w, y_top, y_bot, lum_edge as u8, lum as u8, lum_edge as u8);
    }

    // Ground contact shadow below every actual hit
    for (i, hit) in hits.iter().enumerate() {
        if hit.tile.is_none() {
            continue;
        }
        let y_bot = y_bots[i];
        if !y_bot.is_finite() {
            continue;
        }
        let depth = hit.depth;
        let edge_contrast = (neighbor_contrast(i) * 0.5).clamp(0.0, 1.0);
        let near = (1.0 - depth / 12.0).clamp(0.0, 1.0);
        let contact = (0.175 * near + 0.125 * edge_contrast).clamp(0.0, 0.325);
        let max_shadow = ((h - y_bot) * 0.18).max(6.0);
        let len = (8.0 + (max_shadow - 8.0) * near * 0.8).max(6.0) as i32;
        let x0 = (i as f32 * col_w).floor() as i32;
        let w = col_w.ceil() as i32 + 1;
        fb.contact_shadow(x0, w, y_bot.floor() as i32, len, contact);
    }
}
