//! Software first-person renderer
//!
//! Pure CPU pipeline over a caller-owned [`Framebuffer`]: sky and floor
//! gradients, one raycast column per two pixels of width, then the
//! billboard pass, then overlay captions. The horizon line carries both
//! look pitch and the walk bob, so everything above ground level hangs
//! off the same reference row.

pub mod billboard;
pub mod framebuffer;
pub mod raycast;

pub use framebuffer::{gray, rgba, Framebuffer};
pub use raycast::{cast_columns, cast_ray, ColumnHit};

use crate::sim::state::WorldState;

/// Render one frame of the world into `fb`. A zero-area framebuffer is
/// a no-op.
pub fn render(world: &WorldState, fb: &mut Framebuffer, paused: bool) {
    if fb.is_empty() {
        return;
    }
    let w = fb.width();
    let h = fb.height() as f32;
    let player = &world.player;

    let bob = player.walk_phase.sin() * h * 0.004;
    let horizon = h / 2.0 + player.pitch.tan() * h * 0.25 + bob;

    fb.clear(gray(0));
    fb.vgradient(0, horizon as i32, 0x0a, 0x1a);
    fb.vgradient(horizon as i32, h as i32, 0xf2, 0xd6);

    let cols = (w / 2).max(1);
    let hits = cast_columns(&world.map, player, cols);
    raycast::draw_walls(fb, &hits, horizon);
    billboard::draw_billboards(fb, world, &hits, horizon);

    if world.won {
        overlay(fb, "LEVEL COMPLETE");
    } else if paused {
        overlay(fb, "PAUSED");
    }
}

/// Dim the frame and stamp a caption across the middle
fn overlay(fb: &mut Framebuffer, caption: &str) {
    let w = fb.width() as i32;
    let h = fb.height() as i32;
    fb.blend_rect(0, 0, w, h, gray(0), 0.5);
    let scale = (w / 120).max(2);
    fb.draw_text_centered(caption, w / 2, h / 2, scale, gray(255));
}
