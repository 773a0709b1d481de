//! Headless demo driver
//!
//! Runs a scripted ten-second session against a seeded world, renders
//! the final frame to `frame.ppm`, and logs the session summary. Useful
//! for eyeballing renderer changes and for profiling the sim without a
//! windowing stack.
//!
//! Usage: `monolite [seed]`

use std::fs::File;
use std::io::{BufWriter, Write};

use glam::Vec2;
use monolite::{render, update, FrameInput, Framebuffer, WorldState};

const FRAME_W: usize = 640;
const FRAME_H: usize = 360;
const TICKS: usize = 600;
const DT: f32 = 1.0 / 60.0;

fn main() -> std::io::Result<()> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);
    let mut world = WorldState::new(seed, 9);
    log::info!(
        "seed={seed} enemies={} map={}x{}",
        world.enemies.len(),
        world.map.width(),
        world.map.height()
    );

    let mut messages = 0usize;
    for tick in 0..TICKS {
        let t = tick as f32 * DT;
        // Push forward while sweeping the view; fire in bursts, reload
        // whenever the clip runs dry
        let input = FrameInput {
            move_axes: Vec2::new(1.0, (t * 0.8).sin() * 0.3),
            turn_stick: Vec2::new((t * 0.5).sin() * 0.6, 0.0),
            fire: tick % 9 == 0,
            reload: world.ammo == 0,
            ..Default::default()
        };
        let report = update(&mut world, &input, DT);
        if let Some(msg) = report.message {
            messages += 1;
            log::debug!("t={t:.2} {msg}");
        }
        if report.level_complete {
            log::info!("level complete on tick {tick}");
            break;
        }
    }

    log::info!(
        "done: hp={} ammo={} score={} enemies_left={} messages={messages}",
        world.hp,
        world.ammo,
        world.score,
        world.enemies.iter().filter(|e| e.alive).count()
    );

    let mut fb = Framebuffer::new(FRAME_W, FRAME_H);
    render(&world, &mut fb, false);
    write_ppm("frame.ppm", &fb)?;
    log::info!("wrote frame.ppm ({FRAME_W}x{FRAME_H})");
    Ok(())
}

/// Binary PPM dump, alpha dropped
fn write_ppm(path: &str, fb: &Framebuffer) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P6\n{} {}\n255\n", fb.width(), fb.height())?;
    for &px in fb.pixels() {
        out.write_all(&[(px & 0xff) as u8, (px >> 8 & 0xff) as u8, (px >> 16 & 0xff) as u8])?;
    }
    out.flush()
}
