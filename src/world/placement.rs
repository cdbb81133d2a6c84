//! Selection normalisation.

/// An inclusive, axis-aligned cell rectangle with `x <= x2` and `y <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    pub fn width(&self) -> i32 {
        self.x2 - self.x + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y + 1
    }

    /// Every cell in column-major order (x outer, y inner).
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let Area { x, y, x2, y2 } = *self;
        (x..=x2).flat_map(move |cx| (y..=y2).map(move |cy| (cx, cy)))
    }
}

/// Turns two arbitrary selection corners into an ordered, size-limited area.
pub trait Normalizer {
    fn normalize(&self, x1: i32, y1: i32, x2: i32, y2: i32, max_size: i32) -> Area;
}

/// The placement rule used by the build tools: the end corner is pulled
/// towards the start corner until neither axis spans more than `max_size`
/// steps, then the corners are ordered.
#[derive(Debug, Default, Clone, Copy)]
pub struct AreaNormalizer;

impl Normalizer for AreaNormalizer {
    fn normalize(&self, x1: i32, y1: i32, x2: i32, y2: i32, max_size: i32) -> Area {
        let mut end_x = x2;
        let mut end_y = y2;

        if (end_x - x1).abs() > max_size {
            end_x = (end_x - x1).signum() * max_size + x1;
        }
        if (end_y - y1).abs() > max_size {
            end_y = (end_y - y1).signum() * max_size + y1;
        }

        Area {
            x: x1.min(end_x),
            y: y1.min(end_y),
            x2: x1.max(end_x),
            y2: y1.max(end_y),
        }
    }
}
