//! Curve primitives for the lamina workspace.
//!
//! This crate provides:
//! - [`Rect`] - axis-aligned bounding rectangle in 2D
//! - [`bezier`] - evaluation, tangents, splits, and bounds for Bezier curves
//! - [`poly`] - power-basis coefficients and polynomial root solving

pub mod bezier;
pub mod poly;

use glam::DVec2;

/// Axis-aligned bounding rectangle (2D).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle enclosing all the given points.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether the point lies inside the rectangle (edges included).
    pub fn contains(&self, p: DVec2) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Whether `other` lies entirely inside this rectangle (edges included).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Whether the two rectangles overlap (edge contact counts).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Smallest rectangle enclosing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grows the rectangle by `d` on every side.
    pub fn inflate(&self, d: f64) -> Rect {
        let v = DVec2::splat(d);
        Rect {
            min: self.min - v,
            max: self.max + v,
        }
    }

    /// Expands the rectangle to cover `p`.
    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_points() {
        let r = Rect::from_points([
            DVec2::new(1.0, 5.0),
            DVec2::new(-2.0, 3.0),
            DVec2::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(r.min, DVec2::new(-2.0, -1.0));
        assert_eq!(r.max, DVec2::new(4.0, 5.0));
        assert!(Rect::from_points([]).is_none());
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(DVec2::ZERO, DVec2::new(2.0, 1.0));
        assert!(r.contains(DVec2::new(1.0, 0.5)));
        assert!(r.contains(DVec2::new(2.0, 1.0))); // edge
        assert!(!r.contains(DVec2::new(2.1, 0.5)));
    }

    #[test]
    fn test_rect_overlaps() {
        let a = Rect::new(DVec2::ZERO, DVec2::new(2.0, 2.0));
        let b = Rect::new(DVec2::new(1.0, 1.0), DVec2::new(3.0, 3.0));
        let c = Rect::new(DVec2::new(5.0, 5.0), DVec2::new(6.0, 6.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_rect_union_and_inflate() {
        let a = Rect::new(DVec2::ZERO, DVec2::new(1.0, 1.0));
        let b = Rect::new(DVec2::new(2.0, -1.0), DVec2::new(3.0, 0.5));
        let u = a.union(&b);
        assert_eq!(u.min, DVec2::new(0.0, -1.0));
        assert_eq!(u.max, DVec2::new(3.0, 1.0));

        let g = a.inflate(0.5);
        assert_eq!(g.min, DVec2::new(-0.5, -0.5));
        assert_eq!(g.max, DVec2::new(1.5, 1.5));
    }
}
