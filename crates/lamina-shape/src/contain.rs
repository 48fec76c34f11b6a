//! Point and rectangle queries against a segment chain.
//!
//! Point containment casts an imaginary ray from (-inf, y) to (x, y) and
//! accumulates a signed crossing count over every curve segment whose bounds
//! straddle the ray. Rectangle containment additionally solves each curve
//! against the rectangle's four sides.

use glam::DVec2;
use lamina_curve::poly;
use lamina_curve::Rect;

use crate::path::WindingRule;
use crate::segment::{curve_from, Curve, SegKind, Segment, T_MAX, T_MIN};

/// Roots where the curve's `axis` coordinate equals `v`, written into `out`.
fn axis_roots(curve: &Curve, axis: usize, v: f64, out: &mut [f64; 3]) -> usize {
    match *curve {
        Curve::Line { p0, p1 } => {
            let [a, b] = poly::line_poly(p0[axis], p1[axis]);
            if a.abs() < 1e-12 {
                0
            } else {
                out[0] = (v - b) / a;
                1
            }
        }
        Curve::Quad { p0, c, p1 } => {
            let [a, b, c0] = poly::quadratic_poly(p0[axis], c[axis], p1[axis]);
            let mut two = [0.0f64; 2];
            let n = poly::solve_quadratic(a, b, c0 - v, &mut two);
            out[..n].copy_from_slice(&two[..n]);
            n
        }
        Curve::Cubic { p0, c1, c2, p1 } => {
            let [a, b, c0, d] = poly::cubic_poly(p0[axis], c1[axis], c2[axis], p1[axis]);
            poly::solve_cubic(a, b, c0, d - v, out)
        }
    }
}

/// Signed crossing count of the ray from (-inf, y) to (x, y).
///
/// Ascending segments count +1, descending -1. With `include_edges`, points
/// exactly on the boundary register as crossings.
pub(crate) fn count_crossings(chain: &[Segment], x: f64, y: f64, include_edges: bool) -> i32 {
    let mut crossings = 0;
    let mut last = DVec2::ZERO;
    let mut roots = [0.0f64; 3];

    for seg in chain {
        match seg.kind {
            SegKind::Move => last = seg.points()[0],
            SegKind::Close => {}
            _ => {
                let b = seg.bounds;
                let hit = if include_edges {
                    y >= b.min.y && y <= b.max.y && x >= b.min.x
                } else {
                    y > b.min.y && y < b.max.y && x > b.min.x
                };
                if hit {
                    let curve = curve_from(last, seg);
                    let n = axis_roots(&curve, 1, y, &mut roots);
                    for &t in &roots[..n] {
                        if !(T_MIN..=T_MAX).contains(&t) {
                            continue;
                        }
                        let px = curve.point_at(t).x;
                        if (include_edges && px <= x) || (!include_edges && px < x) {
                            let slope = curve.tangent_at(t).y;
                            if slope > 0.0 {
                                crossings += 1;
                            } else if slope < 0.0 {
                                crossings -= 1;
                            }
                        }
                    }
                }
                last = seg.last_point();
            }
        }
    }
    crossings
}

/// Whether the chain contains the point under the given winding rule.
pub(crate) fn chain_contains(
    chain: &[Segment],
    p: DVec2,
    rule: WindingRule,
    include_edges: bool,
) -> bool {
    let crossings = count_crossings(chain, p.x, p.y, include_edges);
    match rule {
        WindingRule::EvenOdd => crossings & 1 != 0,
        WindingRule::NonZero => crossings != 0,
    }
}

/// Whether any segment lies strictly inside `r` or crosses one of its sides.
///
/// A curve passing through the rectangle's interior either crosses a side or
/// lies entirely within it, so side-crossing roots plus the strict
/// bounds-inside check cover both failure modes of rectangle containment.
pub(crate) fn crosses_rect(chain: &[Segment], r: Rect) -> bool {
    let mut last = DVec2::ZERO;
    let mut roots = [0.0f64; 3];

    for seg in chain {
        match seg.kind {
            SegKind::Move => last = seg.points()[0],
            SegKind::Close => {}
            _ => {
                let b = seg.bounds;
                if r.min.x < b.min.x && b.max.x < r.max.x && r.min.y < b.min.y && b.max.y < r.max.y
                {
                    return true;
                }
                if b.overlaps(&r) {
                    let curve = curve_from(last, seg);
                    // Horizontal sides, then vertical sides.
                    for (axis, v, lo, hi) in [
                        (1, r.min.y, r.min.x, r.max.x),
                        (1, r.max.y, r.min.x, r.max.x),
                        (0, r.min.x, r.min.y, r.max.y),
                        (0, r.max.x, r.min.y, r.max.y),
                    ] {
                        let n = axis_roots(&curve, axis, v, &mut roots);
                        for &t in &roots[..n] {
                            if t <= 0.0 || t >= 1.0 {
                                continue;
                            }
                            let other = curve.point_at(t)[1 - axis];
                            if lo < other && other < hi {
                                return true;
                            }
                        }
                    }
                }
                last = seg.last_point();
            }
        }
    }
    false
}
