//! Power-basis polynomial forms of curve segments and root solving.
//!
//! The solvers treat near-zero leading coefficients as lower-degree
//! polynomials instead of failing, so degenerate curves (a line encoded as a
//! cubic, say) still solve cleanly.

/// Threshold below which a leading coefficient is treated as zero.
const DEGENERATE_EPS: f64 = 1e-12;

/// Power-basis coefficients `[a, b]` of a line: `x(t) = a*t + b`.
#[inline]
pub fn line_poly(p0: f64, p1: f64) -> [f64; 2] {
    [p1 - p0, p0]
}

/// Power-basis coefficients `[a, b, c]` of a quadratic Bezier:
/// `x(t) = a*t^2 + b*t + c`.
#[inline]
pub fn quadratic_poly(p0: f64, c: f64, p1: f64) -> [f64; 3] {
    [p0 - 2.0 * c + p1, -2.0 * p0 + 2.0 * c, p0]
}

/// Power-basis coefficients `[a, b, c, d]` of a cubic Bezier:
/// `x(t) = a*t^3 + b*t^2 + c*t + d`.
#[inline]
pub fn cubic_poly(p0: f64, c1: f64, c2: f64, p1: f64) -> [f64; 4] {
    [
        -p0 + 3.0 * c1 - 3.0 * c2 + p1,
        3.0 * p0 - 6.0 * c1 + 3.0 * c2,
        -3.0 * p0 + 3.0 * c1,
        p0,
    ]
}

/// Solves `a*t^2 + b*t + c = 0`, writing roots into `out`.
///
/// Falls back to the linear solution when `a` is (near) zero. Returns the
/// number of roots found; two roots are in ascending order.
pub fn solve_quadratic(a: f64, b: f64, c: f64, out: &mut [f64; 2]) -> usize {
    if a.abs() < DEGENERATE_EPS {
        if b.abs() < DEGENERATE_EPS {
            return 0;
        }
        out[0] = -c / b;
        return 1;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return 0;
    }
    if disc == 0.0 {
        out[0] = -b / (2.0 * a);
        return 1;
    }
    // Numerically stable form: avoid cancellation between -b and the root.
    let root = disc.sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - root)
    } else {
        -0.5 * (b + root)
    };
    out[0] = q / a;
    out[1] = c / q;
    if out[0] > out[1] {
        out.swap(0, 1);
    }
    2
}

/// Solves `a*t^3 + b*t^2 + c*t + d = 0`, writing roots into `out`.
///
/// Falls back to the quadratic solver when `a` is (near) zero. Returns the
/// number of roots found. Each root gets one Newton polish step against the
/// original polynomial.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64, out: &mut [f64; 3]) -> usize {
    if a.abs() < DEGENERATE_EPS {
        let mut two = [0.0f64; 2];
        let n = solve_quadratic(b, c, d, &mut two);
        out[..n].copy_from_slice(&two[..n]);
        return n;
    }

    let bn = b / a;
    let cn = c / a;
    let dn = d / a;

    let q = (bn * bn - 3.0 * cn) / 9.0;
    let r = (2.0 * bn * bn * bn - 9.0 * bn * cn + 27.0 * dn) / 54.0;

    let n = if r * r < q * q * q {
        // Three real roots (trigonometric branch).
        let theta = (r / (q * q * q).sqrt()).clamp(-1.0, 1.0).acos();
        let m = -2.0 * q.sqrt();
        out[0] = m * (theta / 3.0).cos() - bn / 3.0;
        out[1] = m * ((theta + 2.0 * std::f64::consts::PI) / 3.0).cos() - bn / 3.0;
        out[2] = m * ((theta - 2.0 * std::f64::consts::PI) / 3.0).cos() - bn / 3.0;
        3
    } else {
        // One real root (Cardano branch).
        let s = (r * r - q * q * q).sqrt();
        let big_a = if r > 0.0 { -cbrt(r + s) } else { cbrt(-r + s) };
        let big_b = if big_a.abs() > DEGENERATE_EPS {
            q / big_a
        } else {
            0.0
        };
        out[0] = (big_a + big_b) - bn / 3.0;
        1
    };

    for t in out[..n].iter_mut() {
        *t = refine_cubic(a, b, c, d, *t);
    }
    n
}

/// One Newton step of `a*t^3 + b*t^2 + c*t + d` at `t`.
#[inline]
fn refine_cubic(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let f = ((a * t + b) * t + c) * t + d;
    let df = (3.0 * a * t + 2.0 * b) * t + c;
    if df.abs() > DEGENERATE_EPS {
        t - f / df
    } else {
        t
    }
}

#[inline]
fn cbrt(x: f64) -> f64 {
    if x > 0.0 {
        x.powf(1.0 / 3.0)
    } else if x < 0.0 {
        -(-x).powf(1.0 / 3.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roots(found: &[f64], expected: &[f64]) {
        assert_eq!(found.len(), expected.len(), "root count");
        let mut sorted: Vec<f64> = found.to_vec();
        sorted.sort_by(f64::total_cmp);
        for (f, e) in sorted.iter().zip(expected) {
            assert!((f - e).abs() < 1e-9, "root {f} != {e}");
        }
    }

    #[test]
    fn test_quadratic_two_roots() {
        // (t - 1)(t - 3) = t^2 - 4t + 3
        let mut out = [0.0; 2];
        let n = solve_quadratic(1.0, -4.0, 3.0, &mut out);
        assert_roots(&out[..n], &[1.0, 3.0]);
    }

    #[test]
    fn test_quadratic_no_roots() {
        let mut out = [0.0; 2];
        assert_eq!(solve_quadratic(1.0, 0.0, 1.0, &mut out), 0);
    }

    #[test]
    fn test_quadratic_linear_fallback() {
        // 0*t^2 + 2t - 1
        let mut out = [0.0; 2];
        let n = solve_quadratic(0.0, 2.0, -1.0, &mut out);
        assert_roots(&out[..n], &[0.5]);
    }

    #[test]
    fn test_cubic_three_roots() {
        // (t - 1)(t - 2)(t - 3) = t^3 - 6t^2 + 11t - 6
        let mut out = [0.0; 3];
        let n = solve_cubic(1.0, -6.0, 11.0, -6.0, &mut out);
        assert_roots(&out[..n], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cubic_single_root() {
        // t^3 + t - 2 = (t - 1)(t^2 + t + 2)
        let mut out = [0.0; 3];
        let n = solve_cubic(1.0, 0.0, 1.0, -2.0, &mut out);
        assert_roots(&out[..n], &[1.0]);
    }

    #[test]
    fn test_cubic_quadratic_fallback() {
        let mut out = [0.0; 3];
        let n = solve_cubic(0.0, 1.0, -4.0, 3.0, &mut out);
        assert_roots(&out[..n], &[1.0, 3.0]);
    }

    #[test]
    fn test_poly_forms_match_bezier() {
        use crate::bezier::{cubic_point, quadratic_point};
        use glam::DVec2;

        let p0 = DVec2::new(1.0, 2.0);
        let c1 = DVec2::new(3.0, -1.0);
        let c2 = DVec2::new(0.5, 4.0);
        let p1 = DVec2::new(-2.0, 1.0);

        for i in 0..=8 {
            let t = i as f64 / 8.0;
            let [a, b, c] = quadratic_poly(p0.x, c1.x, p1.x);
            let x = (a * t + b) * t + c;
            assert!((x - quadratic_point(p0, c1, p1, t).x).abs() < 1e-12);

            let [a, b, c, d] = cubic_poly(p0.y, c1.y, c2.y, p1.y);
            let y = ((a * t + b) * t + c) * t + d;
            assert!((y - cubic_point(p0, c1, c2, p1, t).y).abs() < 1e-12);
        }
    }
}
