//! Fixed-resolution software frame buffer
//!
//! Pixels are `0xRRGGBB`. All drawing clips to the buffer, so callers can pass
//! any coordinates.

use crate::consts::{VIEW_H, VIEW_W};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u32>,
}

impl Default for FrameBuffer {
    /// The 256x240 logical render target
    fn default() -> Self {
        Self::new(VIEW_W, VIEW_H)
    }
}

impl FrameBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Row-major pixel data
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    pub fn fill_rect(&mut self, x0: i32, y0: i32, w: i32, h: i32, color: u32) {
        let x1 = x0.max(0);
        let y1 = y0.max(0);
        let x2 = x0.saturating_add(w).min(self.width);
        let y2 = y0.saturating_add(h).min(self.height);
        if x1 >= x2 || y1 >= y2 {
            return;
        }
        for y in y1..y2 {
            let off = (y * self.width) as usize;
            self.pixels[off + x1 as usize..off + x2 as usize].fill(color);
        }
    }

    /// One-pixel rectangle outline
    pub fn rect_outline(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        let r2 = radius * radius;
        for y in (cy - radius)..=(cy + radius) {
            let dy = y - cy;
            for x in (cx - radius)..=(cx + radius) {
                let dx = x - cx;
                if dx * dx + dy * dy <= r2 {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Blend every pixel toward black by `amount` (0 = unchanged, 1 = black)
    pub fn dim(&mut self, amount: f32) {
        let keep = (1.0 - amount.clamp(0.0, 1.0)) * 256.0;
        let keep = keep as u32;
        for p in &mut self.pixels {
            let r = ((*p >> 16) & 0xFF) * keep / 256;
            let g = ((*p >> 8) & 0xFF) * keep / 256;
            let b = (*p & 0xFF) * keep / 256;
            *p = (r << 16) | (g << 8) | b;
        }
    }

    /// Nearest-neighbour integer upscale for presentation
    pub fn scaled(&self, factor: u32) -> FrameBuffer {
        let factor = factor.max(1) as i32;
        let mut out = FrameBuffer::new(self.width * factor, self.height * factor);
        for y in 0..out.height {
            let src = ((y / factor) * self.width) as usize;
            let dst = (y * out.width) as usize;
            for x in 0..out.width {
                out.pixels[dst + x as usize] = self.pixels[src + (x / factor) as usize];
            }
        }
        out
    }
}
