//! Generated points and their transient identities

use glam::DVec2;

/// Identity of a generated point. Unique within a composition's lifetime and
/// meaningless geometrically; it only lets a UI track points across redraws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(pub u64);

/// A generated 2-D point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub pos: DVec2,
}

impl Point {
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    pub fn y(&self) -> f64 {
        self.pos.y
    }
}

/// Monotonic point ID source. IDs are never handed out twice.
#[derive(Debug, Default)]
pub struct PointIdAllocator {
    next: u64,
}

impl PointIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> PointId {
        let id = PointId(self.next);
        self.next += 1;
        id
    }

    /// Stamp a fresh ID on each position, in order.
    pub fn points(&mut self, positions: impl IntoIterator<Item = DVec2>) -> Vec<Point> {
        positions
            .into_iter()
            .map(|pos| Point { id: self.next(), pos })
            .collect()
    }

    /// Number of IDs handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn ids_strictly_increase() {
        let mut alloc = PointIdAllocator::new();
        let a = alloc.next();
        let b = alloc.next();
        let pts = alloc.points([dvec2(0.0, 0.0), dvec2(1.0, 1.0)]);
        assert!(a < b);
        assert!(b < pts[0].id);
        assert!(pts[0].id < pts[1].id);
        assert_eq!(alloc.issued(), 4);
    }
}
