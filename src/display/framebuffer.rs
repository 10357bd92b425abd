//! In-memory mirror of display RAM and the raster primitives that draw into it.
//!
//! The buffer uses the controller's native layout: pixel `(x, y)` lives in byte
//! `x + (y / 8) * width`, bit `y % 8`, so the whole buffer can be streamed to the display in
//! horizontal addressing mode without any reshuffling.
//!
//! Every drawing operation clips silently. Pixels that fall outside the buffer are dropped, which
//! keeps the primitives free of boundary handling and lets shapes hang partly off screen.

use core::ops::Range;

use itertools::iproduct;

use crate::font::{self, GLYPH_HEIGHT};

/// The value written to a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// Clear the pixel.
    Off,
    /// Light the pixel.
    On,
    /// Toggle whatever the pixel currently holds.
    Inverse,
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on {
            Color::On
        } else {
            Color::Off
        }
    }
}

#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u8,
    height: u8,
    buf: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a cleared buffer. `height` is rounded down to whole pages.
    pub fn new(width: u8, height: u8) -> Self {
        let height = height - height % 8;
        FrameBuffer {
            width,
            height,
            buf: vec![0; usize::from(width) * usize::from(height / 8)],
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn pages(&self) -> u8 {
        self.height / 8
    }

    /// The packed buffer, in the order the display expects it.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.fill(Color::Off)
    }

    pub fn fill(&mut self, color: Color) {
        for byte in self.buf.iter_mut() {
            *byte = match color {
                Color::Off => 0x00,
                Color::On => 0xFF,
                Color::Inverse => !*byte,
            };
        }
    }

    /// Byte index and bit mask of an in-bounds pixel.
    fn locate(&self, x: i64, y: i64) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((x + (y / 8) * usize::from(self.width), 1 << (y % 8)))
    }

    /// Columns of `start..start + len` that lie inside the buffer.
    fn columns(&self, start: i64, len: i64) -> Range<i64> {
        start.max(0)..(start + len).min(i64::from(self.width))
    }

    /// Rows of `start..start + len` that lie inside the buffer.
    fn rows(&self, start: i64, len: i64) -> Range<i64> {
        start.max(0)..(start + len).min(i64::from(self.height))
    }

    fn plot(&mut self, x: i64, y: i64, color: Color) {
        if let Some((idx, mask)) = self.locate(x, y) {
            match color {
                Color::On => self.buf[idx] |= mask,
                Color::Off => self.buf[idx] &= !mask,
                Color::Inverse => self.buf[idx] ^= mask,
            }
        }
    }

    fn fill_area(&mut self, x: i64, y: i64, w: i64, h: i64, color: Color) {
        for (py, px) in iproduct!(self.rows(y, h), self.columns(x, w)) {
            self.plot(px, py, color);
        }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.plot(i64::from(x), i64::from(y), color)
    }

    /// Read back a pixel. Anything outside the buffer reads as `Off`.
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        match self.locate(i64::from(x), i64::from(y)) {
            Some((idx, mask)) => Color::from(self.buf[idx] & mask != 0),
            None => Color::Off,
        }
    }

    /// Bresenham line from `(x0, y0)` to `(x1, y1)`, both endpoints included. Both axes may step
    /// in one iteration, so diagonals stay 8-connected without doubled pixels.
    ///
    /// The major axis steps on every iteration, and after `i` steps the minor axis has moved
    /// `round(i * minor / major)` with halves rounded up, so only the steps whose major
    /// coordinate lands inside the buffer are visited.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (x0, y0) = (i64::from(x0), i64::from(y0));
        let (x1, y1) = (i64::from(x1), i64::from(y1));
        let (dx, dy) = ((x1 - x0).abs(), (y1 - y0).abs());
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        let x_major = dx >= dy;
        let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
        if major == 0 {
            self.plot(x0, y0, color);
            return;
        }
        let (origin, step, limit) = if x_major {
            (x0, sx, i64::from(self.width))
        } else {
            (y0, sy, i64::from(self.height))
        };
        // Steps whose major coordinate `origin + step * i` lies in `0..limit`.
        let (first, last) = if step > 0 {
            (-origin, limit - 1 - origin)
        } else {
            (origin - (limit - 1), origin)
        };

        let steps = first.max(0)..=last.min(major);
        let (major, minor) = (i128::from(major), i128::from(minor));
        for i in steps {
            let offset = ((2 * i128::from(i) * minor + major) / (2 * major)) as i64;
            if x_major {
                self.plot(x0 + sx * i, y0 + sy * offset, color);
            } else {
                self.plot(x0 + sx * offset, y0 + sy * i, color);
            }
        }
    }

    /// Outline of the `w` x `h` rectangle with its upper left corner at `(x, y)`. Nothing is drawn
    /// unless both sides are positive.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let (w, h) = (i64::from(w), i64::from(h));
        for &row in &[y, y + h - 1] {
            self.fill_area(x, row, w, 1, color);
        }
        for &col in &[x, x + w - 1] {
            self.fill_area(col, y, 1, h, color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.fill_area(
            i64::from(x),
            i64::from(y),
            i64::from(w),
            i64::from(h),
            color,
        )
    }

    /// Midpoint circle of radius `r` centered on `(x0, y0)`, plotting all eight octants per step.
    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        if r < 0 || !self.outline_visible(x0, y0, r) {
            return;
        }
        let mut x = 0;
        let mut y = r;
        let mut d = 3 - 2 * r;

        while y >= x {
            for &(px, py) in &[
                (x, y),
                (-x, y),
                (x, -y),
                (-x, -y),
                (y, x),
                (-y, x),
                (y, -x),
                (-y, -x),
            ] {
                self.plot(x0 + px, y0 + py, color);
            }

            if d < 0 {
                d += 4 * x + 6;
            } else {
                d += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
    }

    /// Whether a circle outline of radius `r` around `(x0, y0)` can touch the buffer. Every
    /// outline pixel lies within one pixel of the true circle.
    fn outline_visible(&self, x0: i64, y0: i64, r: i64) -> bool {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        let dist2 = |x: i64, y: i64| {
            let (dx, dy) = (i128::from(x - x0), i128::from(y - y0));
            dx * dx + dy * dy
        };
        let near = dist2(x0.max(0).min(w - 1), y0.max(0).min(h - 1));
        let far = dist2(
            if x0 < w / 2 { w - 1 } else { 0 },
            if y0 < h / 2 { h - 1 } else { 0 },
        );
        let (outer, inner) = (i128::from(r + 2), i128::from(r - 2));
        near <= outer * outer && !(inner > 0 && far < inner * inner)
    }

    /// Disc of radius `r`: every point of the bounding square with `dx² + dy² <= r²`.
    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        let rows = self.rows(y0 - r, 2 * r + 1);
        let columns = self.columns(x0 - r, 2 * r + 1);
        for (y, x) in iproduct!(rows, columns) {
            let (dx, dy) = (x - x0, y - y0);
            if dx * dx + dy * dy <= r * r {
                self.plot(x, y, color);
            }
        }
    }

    /// Draw the glyph for `c` with its upper left corner at `(x, y)`, each glyph bit expanded to a
    /// `scale` x `scale` block. Unset bits are painted with `background` unless it equals `color`,
    /// in which case they are left alone so text can overlay existing content.
    pub fn draw_glyph(
        &mut self,
        x: i32,
        y: i32,
        c: char,
        color: Color,
        background: Color,
        scale: u8,
    ) {
        let (x, y) = (i64::from(x), i64::from(y));
        let scale = i64::from(scale.max(1));
        for (i, &column) in font::glyph(c).iter().enumerate() {
            for j in 0..GLYPH_HEIGHT {
                let paint = if column & (1 << j) != 0 {
                    color
                } else if background != color {
                    background
                } else {
                    continue;
                };
                self.fill_area(
                    x + i as i64 * scale,
                    y + i64::from(j) * scale,
                    scale,
                    scale,
                    paint,
                );
            }
        }
    }
}
