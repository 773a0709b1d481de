//! CPU pixel surface and primitive drawing ops
//!
//! Pixels are packed RGBA8 (red in the low byte), so the buffer can be
//! viewed as raw bytes for export. The world is grayscale; colors are
//! built from a single luminance value.

use bytemuck::cast_slice;
use glam::Vec2;

/// Pack an RGBA color, red in the low byte
#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24
}

/// Opaque gray
#[inline]
pub const fn gray(lum: u8) -> u32 {
    rgba(lum, lum, lum, 255)
}

/// Caller-owned render target
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![gray(0); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw RGBA bytes, for export
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.pixels)
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = color;
    }

    /// Alpha-blend one pixel; no-op outside the surface
    #[inline]
    pub fn blend_px(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let dst = self.get(x, y);
        self.set(x, y, blend(dst, color, alpha.clamp(0.0, 1.0)));
    }

    /// Additive-blend one pixel, saturating per channel
    #[inline]
    pub fn add_px(&mut self, x: i32, y: i32, lum: u8, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let dst = self.get(x, y);
        let add = (lum as f32 * alpha.clamp(0.0, 1.0)) as u32;
        let r = (dst & 0xff) + add;
        let g = (dst >> 8 & 0xff) + add;
        let b = (dst >> 16 & 0xff) + add;
        self.set(x, y, rgba(r.min(255) as u8, g.min(255) as u8, b.min(255) as u8, 255));
    }

    /// Filled rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = ((x + w).max(0) as usize).min(self.width);
        let y1 = ((y + h).max(0) as usize).min(self.height);
        for yy in y0..y1 {
            for xx in x0..x1 {
                self.set(xx, yy, color);
            }
        }
    }

    /// Alpha-blended rectangle
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = ((x + w).max(0) as usize).min(self.width);
        let y1 = ((y + h).max(0) as usize).min(self.height);
        for yy in y0..y1 {
            for xx in x0..x1 {
                let dst = self.get(xx, yy);
                self.set(xx, yy, blend(dst, color, alpha));
            }
        }
    }

    /// Full-width vertical luminance gradient between two rows
    pub fn vgradient(&mut self, y0: i32, y1: i32, top: u8, bottom: u8) {
        if y1 <= y0 {
            return;
        }
        let span = (y1 - y0) as f32;
        let ya = y0.max(0);
        let yb = y1.min(self.height as i32);
        for y in ya..yb {
            let t = (y - y0) as f32 / span;
            let lum = top as f32 + (bottom as f32 - top as f32) * t;
            let color = gray(lum as u8);
            for x in 0..self.width {
                self.set(x, y as usize, color);
            }
        }
    }

    /// Vertical strip with a three-stop luminance gradient
    /// (top -> mid at the half point -> bottom)
    pub fn column_gradient(
        &mut self,
        x: i32,
        w: i32,
        y_top: f32,
        y_bot: f32,
        top: u8,
        mid: u8,
        bottom: u8,
    ) {
        if !y_top.is_finite() || !y_bot.is_finite() || y_bot <= y_top {
            return;
        }
        let span = y_bot - y_top;
        let ya = (y_top.floor() as i32).max(0);
        let yb = (y_bot.ceil() as i32).min(self.height as i32);
        let x0 = x.max(0);
        let x1 = (x + w).min(self.width as i32);
        for y in ya..yb {
            let t = ((y as f32 - y_top) / span).clamp(0.0, 1.0);
            let lum = if t < 0.5 {
                top as f32 + (mid as f32 - top as f32) * (t * 2.0)
            } else {
                mid as f32 + (bottom as f32 - mid as f32) * ((t - 0.5) * 2.0)
            };
            let color = gray(lum as u8);
            for xx in x0..x1 {
                self.set(xx as usize, y as usize, color);
            }
        }
    }

    /// Soft black strip fading downward: full `alpha` at the top,
    /// 40% at the 40% mark, transparent at the end
    pub fn contact_shadow(&mut self, x: i32, w: i32, y0: i32, len: i32, alpha: f32) {
        for dy in 0..len {
            let t = dy as f32 / len as f32;
            let a = if t < 0.4 {
                alpha * (1.0 - t / 0.4 * 0.6)
            } else {
                alpha * 0.4 * (1.0 - (t - 0.4) / 0.6)
            };
            for dx in 0..w {
                self.blend_px(x + dx, y0 + dy, gray(0), a);
            }
        }
    }

    /// Filled circle via alpha blend
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: u32, alpha: f32) {
        let r = radius.max(0.0);
        let x0 = (cx - r).floor() as i32;
        let x1 = (cx + r).ceil() as i32;
        let y0 = (cy - r).floor() as i32;
        let y1 = (cy + r).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.blend_px(x, y, color, alpha);
                }
            }
        }
    }

    /// Additive glow circle
    pub fn add_circle(&mut self, cx: f32, cy: f32, radius: f32, lum: u8, alpha: f32) {
        let r = radius.max(0.0);
        let x0 = (cx - r).floor() as i32;
        let x1 = (cx + r).ceil() as i32;
        let y0 = (cy - r).floor() as i32;
        let y1 = (cy + r).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.add_px(x, y, lum, alpha);
                }
            }
        }
    }

    /// Fill a convex quad by scanline, vertices in winding order
    pub fn fill_quad(&mut self, pts: [Vec2; 4], color: u32) {
        let y_min = pts.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let y_max = pts.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let ya = (y_min.floor() as i32).max(0);
        let yb = (y_max.ceil() as i32).min(self.height as i32 - 1);
        for y in ya..=yb {
            let fy = y as f32 + 0.5;
            let mut x_min = f32::INFINITY;
            let mut x_max = f32::NEG_INFINITY;
            for i in 0..4 {
                let a = pts[i];
                let b = pts[(i + 1) % 4];
                if (a.y <= fy && b.y > fy) || (b.y <= fy && a.y > fy) {
                    let t = (fy - a.y) / (b.y - a.y);
                    let x = a.x + (b.x - a.x) * t;
                    x_min = x_min.min(x);
                    x_max = x_max.max(x);
                }
            }
            if x_min <= x_max {
                let x0 = (x_min.floor() as i32).max(0);
                let x1 = (x_max.ceil() as i32).min(self.width as i32);
                for x in x0..x1 {
                    self.set(x as usize, y as usize, color);
                }
            }
        }
    }

    /// Draw text centered on (cx, cy) with the built-in 5x7 caption font
    pub fn draw_text_centered(&mut self, text: &str, cx: i32, cy: i32, scale: i32, color: u32) {
        let scale = scale.max(1);
        let glyph_w = 6 * scale; // 5 columns + 1 spacing
        let total_w = glyph_w * text.len() as i32;
        let mut pen_x = cx - total_w / 2;
        let pen_y = cy - 7 * scale / 2;
        for ch in text.chars() {
            if let Some(rows) = glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..5 {
                        if bits & (0b10000 >> col) != 0 {
                            self.fill_rect(
                                pen_x + col * scale,
                                pen_y + row as i32 * scale,
                                scale,
                                scale,
                                color,
                            );
                        }
                    }
                }
            }
            pen_x += glyph_w;
        }
    }
}

#[inline]
fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    let mix = |shift: u32| -> u32 {
        let d = (dst >> shift & 0xff) as f32;
        let s = (src >> shift & 0xff) as f32;
        (d + (s - d) * alpha) as u32
    };
    rgba(mix(0) as u8, mix(8) as u8, mix(16) as u8, 255)
}

/// 5x7 glyphs for the overlay captions; bit 4 is the left column
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_packing() {
        let c = rgba(1, 2, 3, 4);
        assert_eq!(c & 0xff, 1);
        assert_eq!(c >> 8 & 0xff, 2);
        assert_eq!(c >> 16 & 0xff, 3);
        assert_eq!(c >> 24 & 0xff, 4);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_rect(-2, -2, 10, 10, gray(200));
        assert!(fb.pixels().iter().all(|&p| p == gray(200)));
        // Fully off-screen rect is a no-op
        fb.fill_rect(10, 10, 3, 3, gray(50));
        assert!(fb.pixels().iter().all(|&p| p == gray(200)));
    }

    #[test]
    fn test_blend_halfway() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(gray(0));
        fb.blend_px(0, 0, gray(200), 0.5);
        assert_eq!(fb.get(0, 0) & 0xff, 100);
    }

    #[test]
    fn test_additive_saturates() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(gray(200));
        fb.add_px(0, 0, 255, 1.0);
        assert_eq!(fb.get(0, 0) & 0xff, 255);
    }

    #[test]
    fn test_quad_fill_covers_center() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill_quad(
            [
                Vec2::new(2.0, 2.0),
                Vec2::new(8.0, 2.0),
                Vec2::new(8.0, 8.0),
                Vec2::new(2.0, 8.0),
            ],
            gray(255),
        );
        assert_eq!(fb.get(5, 5), gray(255));
        assert_eq!(fb.get(0, 0), gray(0));
    }

    #[test]
    fn test_text_draws_pixels() {
        let mut fb = Framebuffer::new(100, 20);
        fb.draw_text_centered("PAUSED", 50, 10, 1, gray(255));
        assert!(fb.pixels().iter().any(|&p| p == gray(255)));
    }

    #[test]
    fn test_as_bytes_length() {
        let fb = Framebuffer::new(3, 2);
        assert_eq!(fb.as_bytes().len(), 3 * 2 * 4);
    }
}
