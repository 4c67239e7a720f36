use crate::math::edge_function;
use crate::render::Rgba;

/// On/off run length, in pixels, of dashed lines
const DASH_LENGTH: usize = 5;

/// An RGBA pixel buffer the console frontend draws into
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, background: Rgba) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![background; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Blends `color` over the pixel at `(x, y)`; out-of-bounds writes are dropped
    pub fn blend(&mut self, x: isize, y: isize, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let offset = y as usize * self.width + x as usize;
        self.pixels[offset] = blend_over(self.pixels[offset], color);
    }
}

/// Source-over compositing onto an opaque destination
pub fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    let alpha = src[3] as u32;
    let mix = |d: u8, s: u8| {
        ((s as u32 * alpha + d as u32 * (255 - alpha) + 127) / 255) as u8
    };
    [mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), 255]
}

/// Fills a convex polygon, whichever way it is wound.
///
/// Every pixel centre is tested against all edges at once, so each covered
/// pixel is blended exactly once.
pub fn fill_polygon(points: &[[f64; 2]], buffer: &mut PixelBuffer, color: Rgba) {
    if points.len() < 3 || buffer.width == 0 || buffer.height == 0 {
        return;
    }
    if !points.iter().flatten().all(|c| c.is_finite()) {
        return;
    }

    // Twice the signed area; its sign gives the winding
    let area: f64 = points[1..]
        .windows(2)
        .map(|pair| edge_function(&points[0], &pair[0], &pair[1]))
        .sum();
    if area == 0.0 {
        return;
    }
    let winding = area.signum();

    // Compute bounding box of the polygon
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p[0]);
        min_y = min_y.min(p[1]);
        max_x = max_x.max(p[0]);
        max_y = max_y.max(p[1]);
    }
    let max_x = max_x.ceil().min(buffer.width as f64 - 1.0);
    let max_y = max_y.ceil().min(buffer.height as f64 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let min_x = min_x.floor().max(0.0) as usize;
    let min_y = min_y.floor().max(0.0) as usize;
    let (max_x, max_y) = (max_x as usize, max_y as usize);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];
            let inside = points.iter().enumerate().all(|(index, a)| {
                let b = &points[(index + 1) % points.len()];
                edge_function(a, b, &p) * winding >= 0.0
            });
            if inside {
                buffer.blend(x as isize, y as isize, color);
            }
        }
    }
}

/// Outlines a closed polygon
pub fn stroke_polygon(points: &[[f64; 2]], buffer: &mut PixelBuffer, color: Rgba) {
    for (index, &start) in points.iter().enumerate() {
        let end = points[(index + 1) % points.len()];
        draw_line(start, end, buffer, color, false);
    }
}

/// Clips the segment `from -> to` to the rectangle `min..=max` (Liang-Barsky).
///
/// Returns the parameters `(t0, t1)` of the visible part, if any.
pub fn clip_segment(
    from: [f64; 2],
    to: [f64; 2],
    min: [f64; 2],
    max: [f64; 2],
) -> Option<(f64, f64)> {
    let d = [to[0] - from[0], to[1] - from[1]];
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let bounds = [
        (-d[0], from[0] - min[0]),
        (d[0], max[0] - from[0]),
        (-d[1], from[1] - min[1]),
        (d[1], max[1] - from[1]),
    ];
    for (p, q) in bounds {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}

/// Draws a line between two points in the pixel buffer using Bresenham's algorithm.
///
/// The segment is clipped to the buffer first, so only visible pixels are
/// walked; dashes keep the phase they would have had from `from`.
pub fn draw_line(
    from: [f64; 2],
    to: [f64; 2],
    buffer: &mut PixelBuffer,
    color: Rgba,
    dashed: bool,
) {
    if !(from.iter().chain(to.iter()).all(|c| c.is_finite())) {
        return;
    }

    // One pixel of margin so rounding never drops an edge pixel
    let max = [buffer.width as f64, buffer.height as f64];
    let Some((t0, t1)) = clip_segment(from, to, [-1.0, -1.0], max) else {
        return;
    };
    let d = [to[0] - from[0], to[1] - from[1]];
    let start = [from[0] + d[0] * t0, from[1] + d[1] * t0];
    let end = [from[0] + d[0] * t1, from[1] + d[1] * t1];

    let (mut x0, mut y0, x1, y1) = (
        start[0].round() as isize,
        start[1].round() as isize,
        end[0].round() as isize,
        end[1].round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy
    let mut step = (t0 * d[0].abs().max(d[1].abs())).round() as usize;

    loop {
        if !dashed || (step / DASH_LENGTH) % 2 == 0 {
            buffer.blend(x0, y0, color);
        }

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
        step += 1;
    }
}
