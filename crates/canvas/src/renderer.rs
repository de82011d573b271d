//! Per-tool compositing of stroke segments.
//!
//! Line tools paint a round-capped segment once per covered pixel at the
//! tool's opacity. The pencil instead scatters small square dabs along the
//! segment, one per two pixels of length, each with its own random opacity.
//! Work is bounded by the surface: only the part of a segment that can touch
//! a pixel is visited, however far away its endpoints lie.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::brush::{Brush, Composite, Tool};
use crate::surface::{Point, RasterSurface};

/// Spacing between pencil dabs, in pixels.
const PENCIL_DAB_SPACING: f32 = 2.0;
/// Dab side relative to the brush size.
const PENCIL_DAB_FACTOR: f32 = 0.3;
/// Maximum positional jitter of a dab, in pixels.
const PENCIL_JITTER: f32 = 1.0;

/// One square pencil mark. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dab {
    pub x: f32,
    pub y: f32,
    pub side: f32,
    pub opacity: f32,
}

pub struct StrokeRenderer {
    rng: StdRng,
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic renderer for reproducible pencil texture.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Composite the segment `from -> to` onto `surface` with `brush`.
    /// Segments with a non-finite endpoint are skipped.
    pub fn render_segment(
        &mut self,
        surface: &mut RasterSurface,
        brush: &Brush,
        from: Point,
        to: Point,
    ) {
        if !(from.is_finite() && to.is_finite()) {
            return;
        }
        match brush.tool() {
            Tool::Pencil => {
                let side = dab_side(brush.size());
                let steps = dab_count(from, to);
                let visible = visible_steps(
                    from,
                    to,
                    steps,
                    side + PENCIL_JITTER,
                    (surface.width(), surface.height()),
                );
                for dab in self.dabs_in(from, to, side, steps, visible) {
                    fill_square(surface, &dab, brush.color());
                }
            }
            tool => {
                let style = tool.style();
                let half_width = (brush.line_width() / 2.0).max(0.5);
                for_each_covered_pixel(surface, from, to, half_width, |surface, x, y| {
                    match style.composite {
                        Composite::SourceOver => surface.paint(x, y, brush.color(), style.opacity),
                        Composite::DestinationOut => surface.erase(x, y, style.opacity),
                    }
                });
            }
        }
    }

    /// Dabs the pencil lays down for one segment: `ceil(len / 2)` of them,
    /// generated lazily.
    pub fn pencil_dabs(
        &mut self,
        from: Point,
        to: Point,
        size: u32,
    ) -> impl Iterator<Item = Dab> + '_ {
        let steps = dab_count(from, to);
        self.dabs_in(from, to, dab_side(size), steps, 0..steps)
    }

    /// Dabs `range` out of the `steps` evenly spaced along `from -> to`.
    fn dabs_in(
        &mut self,
        from: Point,
        to: Point,
        side: f32,
        steps: usize,
        range: Range<usize>,
    ) -> impl Iterator<Item = Dab> + '_ {
        let (dx, dy) = (f64::from(to.x - from.x), f64::from(to.y - from.y));
        range.map(move |i| {
            let t = i as f64 / steps as f64;
            Dab {
                x: (f64::from(from.x) + dx * t) as f32 + self.jitter(),
                y: (f64::from(from.y) + dy * t) as f32 + self.jitter(),
                side,
                opacity: self.rng.random_range(0.1..0.4),
            }
        })
    }

    fn jitter(&mut self) -> f32 {
        self.rng.random_range(-PENCIL_JITTER..PENCIL_JITTER)
    }
}

fn dab_count(from: Point, to: Point) -> usize {
    let len = from.distance(to);
    if !len.is_finite() {
        return 0;
    }
    (len / PENCIL_DAB_SPACING).ceil() as usize
}

fn dab_side(size: u32) -> f32 {
    (size as f32 * PENCIL_DAB_FACTOR).max(1.0)
}

/// Indices of the dabs along `from -> to` that can land within `margin` of
/// a `width x height` surface (Liang-Barsky clipping of the segment).
fn visible_steps(
    from: Point,
    to: Point,
    steps: usize,
    margin: f32,
    (width, height): (u32, u32),
) -> Range<usize> {
    if steps == 0 {
        return 0..0;
    }
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    let margin = f64::from(margin);

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, x0 + margin),
        (dx, f64::from(width) + margin - x0),
        (-dy, y0 + margin),
        (dy, f64::from(height) + margin - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return 0..0;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
    }
    if t0 > t1 {
        return 0..0;
    }

    let n = steps as f64;
    let first = (t0 * n).floor() as usize;
    let last = ((t1 * n).ceil() as usize).saturating_add(1).min(steps);
    first..last
}

fn fill_square(surface: &mut RasterSurface, dab: &Dab, color: [u8; 3]) {
    let x0 = dab.x.round() as i64;
    let y0 = dab.y.round() as i64;
    let side = dab.side.round().max(1.0) as i64;
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            surface.paint(x, y, color, dab.opacity);
        }
    }
}

/// Visit each pixel whose centre lies within `half_width` of the segment.
fn for_each_covered_pixel(
    surface: &mut RasterSurface,
    from: Point,
    to: Point,
    half_width: f32,
    mut visit: impl FnMut(&mut RasterSurface, i64, i64),
) {
    let min_x = (from.x.min(to.x) - half_width).floor().max(0.0) as i64;
    let min_y = (from.y.min(to.y) - half_width).floor().max(0.0) as i64;
    let max_x = ((from.x.max(to.x) + half_width).ceil() as i64).min(surface.width() as i64 - 1);
    let max_y = ((from.y.max(to.y) + half_width).ceil() as i64).min(surface.height() as i64 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(centre, from, to) <= half_width {
                visit(surface, x, y);
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + dx * t, a.y + dy * t))
}
