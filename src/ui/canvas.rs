/// Braille dot canvas: the terminal stand-in for a 2D drawing surface.
///
/// Every terminal cell holds a 2×4 grid of braille dots. Each dot stores the
/// opacity of white painted over it, blended "over" like a canvas fill:
///
///   a' = a + src × (1 − a)
///
/// Shapes arrive in px (`Surface` coordinates) and are mapped to dots with
/// the configured cell size. Anything off-canvas is dropped. A circle always
/// lights the dot under its centre, so a 2 px particle stays visible.

use crate::domain::field::Surface;
use crate::domain::geom::Vec2;

pub const DOTS_X: usize = 2;
pub const DOTS_Y: usize = 4;

/// Dots fainter than this are not drawn.
const MIN_VISIBLE: f32 = 0.01;

/// Braille bit for dot (dx, dy) inside a cell.
const BRAILLE_BITS: [[u8; DOTS_Y]; DOTS_X] = [
    [0x01, 0x02, 0x04, 0x40],
    [0x08, 0x10, 0x20, 0x80],
];

pub struct DotCanvas {
    cols: usize,
    rows: usize,
    dot_w: f32,
    dot_h: f32,
    alpha: Vec<f32>,
}

impl DotCanvas {
    /// `cell_px` is the size of one terminal cell in surface px.
    pub fn new(cols: usize, rows: usize, cell_px: (f32, f32)) -> Self {
        let mut canvas = DotCanvas {
            cols: 0,
            rows: 0,
            dot_w: cell_px.0 / DOTS_X as f32,
            dot_h: cell_px.1 / DOTS_Y as f32,
            alpha: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        if self.cols != cols || self.rows != rows || self.alpha.is_empty() {
            self.cols = cols;
            self.rows = rows;
            self.alpha = vec![0.0; self.dots_w() * self.dots_h()];
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn dots_w(&self) -> usize {
        self.cols * DOTS_X
    }

    fn dots_h(&self) -> usize {
        self.rows * DOTS_Y
    }

    fn to_dot(&self, p: Vec2) -> (i64, i64) {
        ((p.x / self.dot_w).floor() as i64, (p.y / self.dot_h).floor() as i64)
    }

    fn plot(&mut self, dx: i64, dy: i64, src: f32) {
        if dx < 0 || dy < 0 {
            return;
        }
        let (dx, dy) = (dx as usize, dy as usize);
        if dx >= self.dots_w() || dy >= self.dots_h() {
            return;
        }
        let i = dy * self.dots_w() + dx;
        let a = self.alpha[i];
        self.alpha[i] = a + src * (1.0 - a);
    }

    /// Opacity of one dot, 0 when out of range.
    pub fn dot(&self, dx: usize, dy: usize) -> f32 {
        if dx < self.dots_w() && dy < self.dots_h() {
            self.alpha[dy * self.dots_w() + dx]
        } else {
            0.0
        }
    }

    /// Braille glyph and brightest dot of a cell, `None` if nothing is lit.
    pub fn cell(&self, col: usize, row: usize) -> Option<(char, f32)> {
        let mut bits = 0u8;
        let mut peak = 0.0f32;
        for (dx, column) in BRAILLE_BITS.iter().enumerate() {
            for (dy, bit) in column.iter().enumerate() {
                let a = self.dot(col * DOTS_X + dx, row * DOTS_Y + dy);
                if a >= MIN_VISIBLE {
                    bits |= bit;
                    peak = peak.max(a);
                }
            }
        }
        if bits == 0 {
            return None;
        }
        char::from_u32(0x2800 + bits as u32).map(|ch| (ch, peak))
    }
}

impl Surface for DotCanvas {
    fn clear(&mut self) {
        self.alpha.fill(0.0);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, alpha: f32) {
        // The dot under the centre, plus every dot whose centre is covered.
        let (cx, cy) = self.to_dot(center);
        self.plot(cx, cy, alpha);

        let (x0, y0) = self.to_dot(Vec2::new(center.x - radius, center.y - radius));
        let (x1, y1) = self.to_dot(Vec2::new(center.x + radius, center.y + radius));
        for dy in y0..=y1 {
            for dx in x0..=x1 {
                if (dx, dy) == (cx, cy) {
                    continue;
                }
                let dot_center = Vec2::new(
                    (dx as f32 + 0.5) * self.dot_w,
                    (dy as f32 + 0.5) * self.dot_h,
                );
                if dot_center.distance(center) <= radius {
                    self.plot(dx, dy, alpha);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, alpha: f32) {
        let (mut x0, mut y0) = self.to_dot(from);
        let (x1, y1) = self.to_dot(to);

        // Bresenham over dots
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, alpha);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
