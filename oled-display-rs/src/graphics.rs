//! Integer-only drawing primitives.
//!
//! Every primitive is a free function over a [`Canvas`], which only has to
//! provide [`Canvas::set_pixel`] and its size. Single pixels outside the
//! canvas are dropped by the canvas itself, so shapes may be partly
//! off-screen.

use embedded_graphics::{geometry::Size, pixelcolor::BinaryColor, prelude::Point};

use crate::error::OledError;
use crate::trig::{fxp_cos, fxp_sin, FIXED_POINT_SCALE};

/// A 1-bit pixel sink.
pub trait Canvas {
    /// Set or clear one pixel. Out-of-range coordinates must be ignored.
    fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor);

    /// Canvas size in pixels.
    fn bounds(&self) -> Size;
}

// ── Points and lines ─────────────────────────────────────────────────────

pub fn draw_pixel<C: Canvas + ?Sized>(canvas: &mut C, at: Point, color: BinaryColor) {
    canvas.set_pixel(at.x, at.y, color);
}

/// Segments with an endpoint further than this from the origin are
/// clipped to the canvas before rasterising.
const CLIP_LIMIT: i64 = 1 << 10;

/// A point in widened coordinates, so offsets from an `i32` point never
/// overflow.
type Coord = (i64, i64);

/// Bresenham line from `from` to `to`, both endpoints included.
pub fn draw_line<C: Canvas + ?Sized>(canvas: &mut C, from: Point, to: Point, color: BinaryColor) {
    line(canvas, widen(from), widen(to), color);
}

fn widen(p: Point) -> Coord {
    (i64::from(p.x), i64::from(p.y))
}

fn line<C: Canvas + ?Sized>(canvas: &mut C, from: Coord, to: Coord, color: BinaryColor) {
    let far = [from.0, from.1, to.0, to.1]
        .iter()
        .any(|v| v.abs() > CLIP_LIMIT);
    let (from, to) = if far {
        match clip(canvas.bounds(), from, to) {
            Some(ends) => ends,
            None => return,
        }
    } else {
        (from, to)
    };

    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = (to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = (if dx > dy { dx } else { -dy }) / 2;

    loop {
        plot(canvas, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = err;
        if e2 > -dx {
            err -= dy;
            x += sx;
        }
        if e2 < dy {
            err += dx;
            y += sy;
        }
    }
}

/// Set a pixel given in widened coordinates. Anything outside `i32` is
/// off the canvas anyway.
fn plot<C: Canvas + ?Sized>(canvas: &mut C, x: i64, y: i64, color: BinaryColor) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        canvas.set_pixel(x, y, color);
    }
}

/// Liang-Barsky clip of segment `a`-`b` to the canvas. The entry and exit
/// parameters are kept as exact fractions `(num, den)` with `den > 0`.
fn clip(size: Size, a: Coord, b: Coord) -> Option<(Coord, Coord)> {
    let (ax, ay) = (i128::from(a.0), i128::from(a.1));
    let (dx, dy) = (i128::from(b.0) - ax, i128::from(b.1) - ay);
    let max_x = i128::from(size.width) - 1;
    let max_y = i128::from(size.height) - 1;

    let mut enter = (0i128, 1i128);
    let mut exit = (1i128, 1i128);
    for (p, q) in [(-dx, ax), (dx, max_x - ax), (-dy, ay), (dy, max_y - ay)] {
        if p == 0 {
            if q < 0 {
                return None;
            }
            continue;
        }
        if p < 0 {
            let t = (-q, -p);
            if t.0 * enter.1 > enter.0 * t.1 {
                enter = t;
            }
        } else {
            let t = (q, p);
            if t.0 * exit.1 < exit.0 * t.1 {
                exit = t;
            }
        }
    }
    if enter.0 * exit.1 > exit.0 * enter.1 {
        return None;
    }

    // Round to nearest; the exact point lies inside the canvas, so the
    // rounded one does too.
    let at = |(num, den): (i128, i128)| -> Coord {
        let x = ax + (2 * dx * num + den).div_euclid(2 * den);
        let y = ay + (2 * dy * num + den).div_euclid(2 * den);
        (x as i64, y as i64)
    };
    Some((at(enter), at(exit)))
}

/// Connect consecutive vertices. Fewer than two vertices draw nothing.
pub fn draw_polyline<C: Canvas + ?Sized>(canvas: &mut C, points: &[Point], color: BinaryColor) {
    for pair in points.windows(2) {
        draw_line(canvas, pair[0], pair[1], color);
    }
}

// ── Rectangles ───────────────────────────────────────────────────────────

/// Outline of the rectangle with opposite corners `a` and `b`.
pub fn draw_rectangle<C: Canvas + ?Sized>(canvas: &mut C, a: Point, b: Point, color: BinaryColor) {
    let top_right = Point::new(b.x, a.y);
    let bottom_left = Point::new(a.x, b.y);
    draw_line(canvas, a, top_right, color);
    draw_line(canvas, top_right, b, color);
    draw_line(canvas, b, bottom_left, color);
    draw_line(canvas, bottom_left, a, color);
}

/// Solid rectangle with opposite corners `a` and `b`, given in any order.
pub fn fill_rectangle<C: Canvas + ?Sized>(canvas: &mut C, a: Point, b: Point, color: BinaryColor) {
    let size = canvas.bounds();
    let x_start = a.x.min(b.x).max(0);
    let x_end = a.x.max(b.x).min(size.width as i32 - 1);
    let y_start = a.y.min(b.y).max(0);
    let y_end = a.y.max(b.y).min(size.height as i32 - 1);

    for y in y_start..=y_end {
        for x in x_start..=x_end {
            canvas.set_pixel(x, y, color);
        }
    }
}

// ── Circles ──────────────────────────────────────────────────────────────

/// Walk one octant of a midpoint circle, handing each step's offsets to `step`.
///
/// `x` runs from `-radius` up to 0 while `y` runs from 0 up to `radius`.
fn midpoint_circle(radius: u16, mut step: impl FnMut(i64, i64)) {
    let mut x = -i64::from(radius);
    let mut y = 0;
    let mut err = 2 + 2 * x;

    loop {
        step(x, y);
        let r = err;
        if r <= y {
            y += 1;
            err += y * 2 + 1;
        }
        if r > x || err > y {
            x += 1;
            err += x * 2 + 1;
        }
        if x >= 0 {
            break;
        }
    }
}

pub fn draw_circle<C: Canvas + ?Sized>(canvas: &mut C, center: Point, radius: u16, color: BinaryColor) {
    let (cx, cy) = widen(center);
    midpoint_circle(radius, |x, y| {
        plot(canvas, cx - x, cy + y, color);
        plot(canvas, cx - y, cy - x, color);
        plot(canvas, cx + x, cy - y, color);
        plot(canvas, cx + y, cy + x, color);
    });
}

/// Filled disc, drawn as horizontal spans between the symmetric x bounds.
pub fn fill_circle<C: Canvas + ?Sized>(canvas: &mut C, center: Point, radius: u16, color: BinaryColor) {
    let (cx, cy) = widen(center);
    midpoint_circle(radius, |x, y| {
        // x <= 0 here, so `cx + x` is the left bound.
        hline(canvas, cx + x, cx - x, cy + y, color);
        hline(canvas, cx + x, cx - x, cy - y, color);
        hline(canvas, cx - y, cx + y, cy + x, color);
        hline(canvas, cx - y, cx + y, cy - x, color);
    });
}

/// Span from `x1` to `x2` on row `y`, clipped to the canvas.
fn hline<C: Canvas + ?Sized>(canvas: &mut C, x1: i64, x2: i64, y: i64, color: BinaryColor) {
    let size = canvas.bounds();
    if y < 0 || y >= i64::from(size.height) {
        return;
    }
    for x in x1.max(0)..=x2.min(i64::from(size.width) - 1) {
        plot(canvas, x, y, color);
    }
}

// ── Arcs ─────────────────────────────────────────────────────────────────

/// On/off run-lengths for dashed arcs, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dash {
    pub on_deg: u16,
    pub off_deg: u16,
}

/// Rendering options for [`draw_arc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArcStyle {
    /// Segments used for a full 360° sweep. Default: 36.
    pub segments: u16,
    /// Dash pattern, measured from the start angle. `None` draws solid.
    pub dash: Option<Dash>,
    /// Draw radial lines from the center to both arc ends.
    pub caps: bool,
    /// Number of concentric one-pixel arcs, growing outward. Default: 1.
    pub thickness: u8,
    /// Draw every radius from 0 up to the given radius.
    pub fill: bool,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            segments: 36,
            dash: None,
            caps: false,
            thickness: 1,
            fill: false,
        }
    }
}

/// Normalize an angle in degrees.
///
/// Values up to 360 are returned unchanged. Larger values wrap, with exact
/// multiples of 360 mapping to 360 so a full sweep never collapses to zero.
pub fn normalize_degrees(deg: u16) -> u16 {
    if deg <= 360 {
        return deg;
    }
    match deg % 360 {
        0 => 360,
        d => d,
    }
}

/// Point at `deg` degrees on a circle of `radius` around `center`.
///
/// 0° points down the y axis, 90° along +x.
fn polar(center: Coord, radius: i64, deg: i32) -> Coord {
    let scale = i64::from(FIXED_POINT_SCALE);
    (
        center.0 + radius * i64::from(fxp_sin(deg)) / scale,
        center.1 + radius * i64::from(fxp_cos(deg)) / scale,
    )
}

/// Approximate an arc with straight segments.
///
/// The sweep is split into `max(1, style.segments * sweep / 360)` segments.
/// A zero sweep, zero segment count or zero thickness draws nothing.
pub fn draw_arc<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: Point,
    radius: u16,
    start_deg: u16,
    sweep_deg: u16,
    style: &ArcStyle,
    color: BinaryColor,
) {
    let start = normalize_degrees(start_deg) as i32;
    let sweep = normalize_degrees(sweep_deg) as i32;
    if sweep == 0 || style.segments == 0 || style.thickness == 0 {
        return;
    }
    let segments = (style.segments as i32 * sweep / 360).max(1);
    let center = widen(center);
    let radius = i64::from(radius);
    let outer = radius + i64::from(style.thickness) - 1;
    let inner = if style.fill { 0 } else { radius };

    for r in inner..=outer {
        for i in 0..segments {
            let a0 = start + sweep * i / segments;
            let a1 = start + sweep * (i + 1) / segments;
            if let Some(dash) = style.dash {
                let period = i32::from(dash.on_deg) + i32::from(dash.off_deg);
                if period > 0 && (a0 - start) % period >= i32::from(dash.on_deg) {
                    continue;
                }
            }
            line(canvas, polar(center, r, a0), polar(center, r, a1), color);
        }
    }

    if style.caps {
        line(canvas, center, polar(center, outer, start), color);
        line(canvas, center, polar(center, outer, start + sweep), color);
    }
}

// ── Bitmaps ──────────────────────────────────────────────────────────────

/// Blit a 1bpp bitmap with its top-left corner at `origin`.
///
/// Rows are MSB-first and padded to whole bytes. Only set bits are drawn;
/// clear bits leave the canvas untouched.
///
/// # Errors
///
/// Returns [`OledError::BitmapTooShort`] if `bitmap` holds fewer than
/// `ceil(width / 8) * height` bytes.
pub fn draw_bitmap<C: Canvas + ?Sized>(
    canvas: &mut C,
    origin: Point,
    bitmap: &[u8],
    width: u32,
    height: u32,
    color: BinaryColor,
) -> Result<(), OledError> {
    let byte_width = width.div_ceil(8) as usize;
    if bitmap.len() < byte_width * height as usize {
        return Err(OledError::BitmapTooShort);
    }

    let size = canvas.bounds();
    if origin.x >= size.width as i32 || origin.y >= size.height as i32 {
        return Ok(());
    }

    for row in 0..height as usize {
        for col in 0..width as usize {
            let byte = bitmap[row * byte_width + col / 8];
            if byte & (0x80 >> (col % 8)) != 0 {
                canvas.set_pixel(origin.x + col as i32, origin.y + row as i32, color);
            }
        }
    }
    Ok(())
}
