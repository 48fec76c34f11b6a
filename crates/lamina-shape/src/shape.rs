//! Closed planar regions with boolean set operations.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use glam::{DAffine2, DVec2};
use lamina_curve::Rect;

use crate::combine::{combine, Op};
use crate::contain::{chain_contains, crosses_rect};
use crate::error::ShapeError;
use crate::iter::PathIter;
use crate::path::{Path, PathBuilder, WindingRule};
use crate::segment::{chain_from_path, update_bounds, SegKind, Segment};

/// A closed 2D region bounded by line, quadratic, and cubic segments.
///
/// Shapes support union ([`add`](Shape::add)), difference
/// ([`subtract`](Shape::subtract)), and intersection
/// ([`intersect`](Shape::intersect)) with other shapes, point and rectangle
/// containment, affine transforms, and a compact textual form that round
/// trips through [`FromStr`].
///
/// Cloning is cheap: the segment chain is shared until one of the clones
/// mutates. The same sharing keeps a [`PathIter`] valid across mutation of
/// the shape it came from; the iterator goes on reading the pre-mutation
/// chain.
#[derive(Debug, Clone)]
pub struct Shape {
    segments: Arc<Vec<Segment>>,
    bounds: Rect,
    winding: WindingRule,
}

impl Default for Shape {
    fn default() -> Self {
        Shape {
            segments: Arc::new(Vec::new()),
            bounds: EMPTY_BOUNDS,
            winding: WindingRule::default(),
        }
    }
}

impl Shape {
    /// Creates an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a shape from a path, copying it into a segment chain.
    ///
    /// Every sub-path is closed; a closing line is inserted when the path
    /// leaves one open. The path's winding rule is kept for containment
    /// queries.
    ///
    /// Panics if the path starts drawing before any `MoveTo`.
    pub fn from_path(path: &Path) -> Self {
        // TODO: normalize self-overlapping non-zero paths to even-odd before
        // boolean ops; signed crossing counts already serve plain containment.
        let mut chain = chain_from_path(path);
        let bounds = update_bounds(&mut chain).unwrap_or(EMPTY_BOUNDS);
        Shape {
            segments: Arc::new(chain),
            bounds,
            winding: path.winding(),
        }
    }

    /// True when the region has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Aggregate bounds of the boundary. Zero-sized for an empty shape.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The winding rule used by containment queries.
    pub fn winding(&self) -> WindingRule {
        self.winding
    }

    /// Whether the point lies inside the region. Boundary points count as
    /// inside.
    pub fn contains(&self, p: DVec2) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        chain_contains(&self.segments, p, self.winding, true)
    }

    /// Whether the rectangle lies entirely inside the region.
    ///
    /// True only when no segment crosses the rectangle's sides or lies inside
    /// it, and the rectangle's center passes the point test.
    pub fn contains_rect(&self, r: Rect) -> bool {
        if self.is_empty() || !self.bounds.contains_rect(&r) {
            return false;
        }
        if crosses_rect(&self.segments, r) {
            return false;
        }
        self.contains(r.center())
    }

    /// Whether the rectangle touches the region at all.
    pub fn intersects_rect(&self, r: Rect) -> bool {
        if self.is_empty() || !self.bounds.overlaps(&r) {
            return false;
        }
        if crosses_rect(&self.segments, r) {
            return true;
        }
        self.contains(r.center())
    }

    /// Unions `other` into this shape: the result contains points that were
    /// in either operand.
    pub fn add(&mut self, other: &Shape) {
        if self.is_empty() {
            *self = other.clone();
            return;
        }
        if other.is_empty() || Arc::ptr_eq(&self.segments, &other.segments) {
            return;
        }
        self.apply(other, Op::Add);
    }

    /// Subtracts `other` from this shape: the result contains points that
    /// were in this shape but not in `other`.
    pub fn subtract(&mut self, other: &Shape) {
        if self.is_empty() || other.is_empty() {
            return;
        }
        if Arc::ptr_eq(&self.segments, &other.segments) {
            *self = Shape::new();
            return;
        }
        self.apply(other, Op::Subtract);
    }

    /// Intersects this shape with `other` (also called clipping): the result
    /// contains points that were in both operands.
    pub fn intersect(&mut self, other: &Shape) {
        if self.is_empty() || Arc::ptr_eq(&self.segments, &other.segments) {
            return;
        }
        if other.is_empty() {
            *self = Shape::new();
            return;
        }
        self.apply(other, Op::Intersect);
    }

    fn apply(&mut self, other: &Shape, op: Op) {
        let mut chain = combine(&self.segments, &other.segments, op);
        let bounds = update_bounds(&mut chain).unwrap_or(EMPTY_BOUNDS);
        // Fresh Arc: live iterators keep the chain they started on.
        self.segments = Arc::new(chain);
        self.bounds = bounds;
        self.winding = WindingRule::EvenOdd;
    }

    /// Applies an affine transform to every control point, in place.
    /// Identity transforms are a no-op.
    pub fn transform(&mut self, m: DAffine2) {
        if self.is_empty() || m == DAffine2::IDENTITY {
            return;
        }
        let chain = Arc::make_mut(&mut self.segments);
        for seg in chain.iter_mut() {
            for p in seg.points_mut() {
                *p = m.transform_point2(*p);
            }
        }
        self.bounds = update_bounds(chain).unwrap_or(EMPTY_BOUNDS);
    }

    /// A restartable iterator over the boundary's path commands.
    ///
    /// The iterator snapshots the chain: it stays valid, and keeps producing
    /// the same finite sequence, even if this shape is mutated or dropped.
    pub fn path_iter(&self) -> PathIter {
        PathIter::new(Arc::clone(&self.segments))
    }

    /// Materializes the boundary as a path.
    pub fn to_path(&self) -> Path {
        let mut path: Path = self.path_iter().collect();
        path.set_winding(self.winding);
        path
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

const EMPTY_BOUNDS: Rect = Rect {
    min: DVec2::ZERO,
    max: DVec2::ZERO,
};

impl From<&Path> for Shape {
    fn from(path: &Path) -> Self {
        Shape::from_path(path)
    }
}

impl fmt::Display for Shape {
    /// Compact serialized form: `Shape[m 0 0 l 10 0 ... z]`.
    ///
    /// Parsing the string back (via [`FromStr`]) reconstructs an equivalent
    /// shape with bounds recomputed from scratch.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape[")?;
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let ch = match seg.kind {
                SegKind::Move => 'm',
                SegKind::Line => 'l',
                SegKind::Quad => 'q',
                SegKind::Cubic => 'c',
                SegKind::Close => 'z',
            };
            write!(f, "{ch}")?;
            for p in seg.points() {
                write!(f, " {} {}", p.x, p.y)?;
            }
        }
        write!(f, "]")
    }
}

impl FromStr for Shape {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix("Shape[")
            .ok_or(ShapeError::Malformed("missing Shape[ prefix"))?
            .strip_suffix(']')
            .ok_or(ShapeError::Malformed("missing closing bracket"))?;

        let mut tokens = inner.split_whitespace();
        let mut builder = PathBuilder::new();
        while let Some(tok) = tokens.next() {
            let mut chars = tok.chars();
            let kind = chars.next().ok_or(ShapeError::UnexpectedEnd)?;
            if chars.next().is_some() {
                return Err(ShapeError::UnknownKind(kind));
            }
            builder = match kind {
                'm' => builder.move_to(read_point(&mut tokens)?),
                'l' => builder.line_to(read_point(&mut tokens)?),
                'q' => {
                    let control = read_point(&mut tokens)?;
                    let to = read_point(&mut tokens)?;
                    builder.quad_to(control, to)
                }
                'c' => {
                    let control1 = read_point(&mut tokens)?;
                    let control2 = read_point(&mut tokens)?;
                    let to = read_point(&mut tokens)?;
                    builder.cubic_to(control1, control2, to)
                }
                'z' => builder.close(),
                other => return Err(ShapeError::UnknownKind(other)),
            };
        }
        Ok(Shape::from_path(&builder.build()))
    }
}

fn read_f64<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<f64, ShapeError> {
    let tok = tokens.next().ok_or(ShapeError::UnexpectedEnd)?;
    tok.parse()
        .map_err(|_| ShapeError::InvalidNumber(tok.to_string()))
}

fn read_point<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<DVec2, ShapeError> {
    let x = read_f64(tokens)?;
    let y = read_f64(tokens)?;
    Ok(DVec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{circle, polygon, rect};
    use crate::segment::curve_at;

    fn shape(path: &Path) -> Shape {
        Shape::from_path(path)
    }

    fn rect_shape(x: f64, y: f64, w: f64, h: f64) -> Shape {
        shape(&rect(DVec2::new(x, y), DVec2::new(x + w, y + h)))
    }

    /// Sample grid chosen to avoid the axis-aligned edges of the fixtures.
    fn sample_grid() -> Vec<DVec2> {
        let mut points = Vec::new();
        let mut x = -13.3;
        while x < 115.0 {
            let mut y = -13.7;
            while y < 115.0 {
                points.push(DVec2::new(x, y));
                y += 9.1;
            }
            x += 8.7;
        }
        points
    }

    #[test]
    fn test_plus_sign_union() {
        let mut s1 = rect_shape(0.0, 50.0, 100.0, 20.0);
        let s2 = rect_shape(50.0, 0.0, 20.0, 100.0);
        s1.add(&s2);

        // Center, four arms, four notches.
        assert!(s1.contains(DVec2::new(60.0, 60.0)));
        assert!(s1.contains(DVec2::new(25.0, 60.0)));
        assert!(s1.contains(DVec2::new(85.0, 60.0)));
        assert!(s1.contains(DVec2::new(60.0, 25.0)));
        assert!(s1.contains(DVec2::new(60.0, 85.0)));
        assert!(!s1.contains(DVec2::new(25.0, 25.0)));
        assert!(!s1.contains(DVec2::new(85.0, 25.0)));
        assert!(!s1.contains(DVec2::new(25.0, 85.0)));
        assert!(!s1.contains(DVec2::new(85.0, 85.0)));

        let b = s1.bounds();
        assert_eq!(b.min, DVec2::new(0.0, 0.0));
        assert_eq!(b.max, DVec2::new(100.0, 100.0));
    }

    #[test]
    fn test_union_with_self_is_identity() {
        let original = rect_shape(10.0, 20.0, 60.0, 40.0);
        let mut s = original.clone();
        s.add(&original);

        assert_eq!(s.bounds(), original.bounds());
        for p in sample_grid() {
            assert_eq!(s.contains(p), original.contains(p), "at {p:?}");
        }
    }

    #[test]
    fn test_subtract_self_is_empty() {
        let original = rect_shape(10.0, 20.0, 60.0, 40.0);
        let mut s = original.clone();
        s.subtract(&original);
        assert!(s.is_empty());
        assert!(!s.contains(DVec2::new(30.0, 30.0)));
    }

    #[test]
    fn test_union_commutes_on_samples() {
        let a = rect_shape(0.0, 50.0, 100.0, 20.0);
        let b = rect_shape(50.0, 0.0, 20.0, 100.0);

        let mut ab = a.clone();
        ab.add(&b);
        let mut ba = b.clone();
        ba.add(&a);

        for p in sample_grid() {
            assert_eq!(ab.contains(p), ba.contains(p), "at {p:?}");
        }
    }

    #[test]
    fn test_union_matches_pointwise_or() {
        let a = rect_shape(0.0, 50.0, 100.0, 20.0);
        let b = rect_shape(50.0, 0.0, 20.0, 100.0);
        let mut u = a.clone();
        u.add(&b);

        for p in sample_grid() {
            assert_eq!(u.contains(p), a.contains(p) || b.contains(p), "at {p:?}");
        }
    }

    #[test]
    fn test_intersect_matches_pointwise_and() {
        let a = rect_shape(0.0, 50.0, 100.0, 20.0);
        let b = rect_shape(50.0, 0.0, 20.0, 100.0);
        let mut i = a.clone();
        i.intersect(&b);

        for p in sample_grid() {
            assert_eq!(i.contains(p), a.contains(p) && b.contains(p), "at {p:?}");
        }
    }

    #[test]
    fn test_subtract_matches_pointwise_difference() {
        let a = rect_shape(0.0, 50.0, 100.0, 20.0);
        let b = rect_shape(50.0, 0.0, 20.0, 100.0);
        let mut d = a.clone();
        d.subtract(&b);

        for p in sample_grid() {
            assert_eq!(d.contains(p), a.contains(p) && !b.contains(p), "at {p:?}");
        }
    }

    #[test]
    fn test_circle_union_matches_pointwise_or() {
        let a = shape(&circle(DVec2::new(20.0, 20.0), 15.0));
        let b = shape(&circle(DVec2::new(38.0, 20.0), 15.0));
        let mut u = a.clone();
        u.add(&b);

        for p in sample_grid() {
            assert_eq!(u.contains(p), a.contains(p) || b.contains(p), "at {p:?}");
        }
    }

    #[test]
    fn test_serialize_round_trip_triangle() {
        let tri = shape(&polygon(&[
            DVec2::new(10.0, 10.0),
            DVec2::new(90.0, 15.0),
            DVec2::new(45.0, 80.0),
        ]));

        let text = tri.to_string();
        assert!(text.starts_with("Shape[m "));
        assert!(text.ends_with("z]"));

        let parsed: Shape = text.parse().unwrap();
        // Points near the centroid agree on containment.
        let centroid = DVec2::new(48.333, 35.0);
        for offset in [
            DVec2::new(0.0, 0.0),
            DVec2::new(6.1, -4.3),
            DVec2::new(-7.7, 5.9),
        ] {
            let p = centroid + offset;
            assert!(tri.contains(p));
            assert_eq!(parsed.contains(p), tri.contains(p));
        }
        // And an exterior point stays exterior.
        assert!(!parsed.contains(DVec2::new(9.0, 70.0)));
    }

    #[test]
    fn test_serialize_round_trip_curves() {
        let s = shape(
            &PathBuilder::new()
                .move_to(DVec2::ZERO)
                .quad_to(DVec2::new(30.0, 50.0), DVec2::new(60.0, 0.0))
                .cubic_to(
                    DVec2::new(60.0, -40.0),
                    DVec2::new(0.0, -40.0),
                    DVec2::ZERO,
                )
                .close()
                .build(),
        );
        let parsed: Shape = s.to_string().parse().unwrap();

        for p in [
            DVec2::new(30.1, 10.3),
            DVec2::new(30.1, -15.7),
            DVec2::new(30.1, 40.0),
            DVec2::new(-5.0, 0.3),
        ] {
            assert_eq!(parsed.contains(p), s.contains(p), "at {p:?}");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "nope".parse::<Shape>().unwrap_err(),
            ShapeError::Malformed("missing Shape[ prefix")
        );
        assert_eq!(
            "Shape[m 0 0".parse::<Shape>().unwrap_err(),
            ShapeError::Malformed("missing closing bracket")
        );
        assert_eq!(
            "Shape[x 0 0]".parse::<Shape>().unwrap_err(),
            ShapeError::UnknownKind('x')
        );
        assert_eq!(
            "Shape[m 0]".parse::<Shape>().unwrap_err(),
            ShapeError::UnexpectedEnd
        );
        assert_eq!(
            "Shape[m 0 banana]".parse::<Shape>().unwrap_err(),
            ShapeError::InvalidNumber("banana".into())
        );
    }

    #[test]
    fn test_contains_rect_inner() {
        let s = rect_shape(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(DVec2::new(10.0, 10.0), DVec2::new(15.0, 15.0));
        assert!(s.contains_rect(inner));

        // Straddling the boundary fails.
        let straddling = Rect::new(DVec2::new(-5.0, 10.0), DVec2::new(15.0, 15.0));
        assert!(!s.contains_rect(straddling));
    }

    #[test]
    fn test_contains_rect_rejects_hole() {
        let mut s = rect_shape(0.0, 0.0, 100.0, 100.0);
        s.subtract(&rect_shape(40.0, 40.0, 20.0, 20.0));

        // A rectangle spanning the hole is not contained even though its
        // corners are.
        let over_hole = Rect::new(DVec2::new(30.0, 30.0), DVec2::new(70.0, 70.0));
        assert!(!s.contains_rect(over_hole));
        // One that stays clear of the hole is.
        let clear = Rect::new(DVec2::new(5.0, 5.0), DVec2::new(30.0, 30.0));
        assert!(s.contains_rect(clear));
    }

    #[test]
    fn test_intersects_rect() {
        let s = rect_shape(0.0, 0.0, 100.0, 100.0);
        assert!(s.intersects_rect(Rect::new(
            DVec2::new(-10.0, 40.0),
            DVec2::new(10.0, 60.0)
        )));
        assert!(s.intersects_rect(Rect::new(DVec2::new(40.0, 40.0), DVec2::new(60.0, 60.0))));
        assert!(!s.intersects_rect(Rect::new(
            DVec2::new(150.0, 40.0),
            DVec2::new(170.0, 60.0)
        )));
    }

    #[test]
    fn test_transform_translate() {
        let mut s = rect_shape(0.0, 0.0, 10.0, 10.0);
        s.transform(DAffine2::from_translation(DVec2::new(5.0, -3.0)));

        assert_eq!(s.bounds().min, DVec2::new(5.0, -3.0));
        assert_eq!(s.bounds().max, DVec2::new(15.0, 7.0));
        assert!(s.contains(DVec2::new(14.0, 6.0)));
        assert!(!s.contains(DVec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_transform_identity_is_noop() {
        let mut s = rect_shape(0.0, 0.0, 10.0, 10.0);
        let before = s.to_string();
        s.transform(DAffine2::IDENTITY);
        assert_eq!(s.to_string(), before);
    }

    #[test]
    fn test_segment_bounds_enclose_curve_points() {
        let mut s = shape(&circle(DVec2::new(20.0, 20.0), 15.0));
        s.transform(DAffine2::from_scale_angle_translation(
            DVec2::new(1.5, 0.75),
            0.4,
            DVec2::new(-3.0, 8.0),
        ));

        let chain = s.segments();
        for (idx, seg) in chain.iter().enumerate() {
            if !seg.kind.is_curve() {
                continue;
            }
            let curve = curve_at(chain, idx);
            let bounds = seg.bounds.inflate(1e-9);
            for i in 0..=64 {
                let t = i as f64 / 64.0;
                assert!(
                    bounds.contains(curve.point_at(t)),
                    "segment {idx} bounds miss t={t}"
                );
            }
        }
    }

    #[test]
    fn test_empty_shape_operations() {
        let mut empty = Shape::new();
        assert!(empty.is_empty());
        assert!(!empty.contains(DVec2::ZERO));

        let square = rect_shape(0.0, 0.0, 10.0, 10.0);
        empty.add(&square);
        assert!(empty.contains(DVec2::new(5.0, 5.0)));

        let mut s = rect_shape(0.0, 0.0, 10.0, 10.0);
        s.intersect(&Shape::new());
        assert!(s.is_empty());

        let mut s = rect_shape(0.0, 0.0, 10.0, 10.0);
        s.subtract(&Shape::new());
        assert!(s.contains(DVec2::new(5.0, 5.0)));

        assert_eq!(Shape::new().to_string(), "Shape[]");
        assert!("Shape[]".parse::<Shape>().unwrap().is_empty());
    }
}
