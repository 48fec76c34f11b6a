//! Bezier curve evaluation and manipulation.
//!
//! Evaluation, tangents, de Casteljau splits, and tight bounds for quadratic
//! and cubic Bezier curves.

use glam::DVec2;

/// Evaluates a quadratic Bezier curve at parameter `t`.
///
/// # Example
///
/// ```
/// use lamina_curve::bezier::quadratic_point;
/// use glam::DVec2;
///
/// let mid = quadratic_point(DVec2::ZERO, DVec2::new(0.5, 1.0), DVec2::X, 0.5);
/// assert!((mid.y - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn quadratic_point(p0: DVec2, p1: DVec2, p2: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    p0 * mt2 + p1 * (2.0 * mt * t) + p2 * t2
}

/// Evaluates the tangent (derivative) of a quadratic Bezier curve at `t`.
///
/// Returns the unnormalized tangent vector.
#[inline]
pub fn quadratic_tangent(p0: DVec2, p1: DVec2, p2: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    (p1 - p0) * (2.0 * mt) + (p2 - p1) * (2.0 * t)
}

/// Evaluates a cubic Bezier curve at parameter `t`.
#[inline]
pub fn cubic_point(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    let t2 = t * t;
    let t3 = t2 * t;
    p0 * mt3 + p1 * (3.0 * mt2 * t) + p2 * (3.0 * mt * t2) + p3 * t3
}

/// Evaluates the tangent (derivative) of a cubic Bezier curve at `t`.
///
/// Returns the unnormalized tangent vector.
#[inline]
pub fn cubic_tangent(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    (p1 - p0) * (3.0 * mt2) + (p2 - p1) * (6.0 * mt * t) + (p3 - p2) * (3.0 * t2)
}

/// Splits a quadratic Bezier curve at parameter `t`.
///
/// Returns two sets of control points: (left curve, right curve).
#[inline]
pub fn quadratic_split(p0: DVec2, p1: DVec2, p2: DVec2, t: f64) -> ([DVec2; 3], [DVec2; 3]) {
    let p01 = p0.lerp(p1, t);
    let p12 = p1.lerp(p2, t);
    let p012 = p01.lerp(p12, t);

    ([p0, p01, p012], [p012, p12, p2])
}

/// Splits a cubic Bezier curve at parameter `t` using de Casteljau's algorithm.
///
/// Returns two sets of control points: (left curve, right curve).
#[inline]
pub fn cubic_split(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> ([DVec2; 4], [DVec2; 4]) {
    let p01 = p0.lerp(p1, t);
    let p12 = p1.lerp(p2, t);
    let p23 = p2.lerp(p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let p0123 = p012.lerp(p123, t);

    ([p0, p01, p012, p0123], [p0123, p123, p23, p3])
}

/// Computes the tight bounding box of a quadratic Bezier curve.
///
/// Returns (min, max) corners of the axis-aligned bounding box.
pub fn quadratic_bounds(p0: DVec2, p1: DVec2, p2: DVec2) -> (DVec2, DVec2) {
    let mut min = p0.min(p2);
    let mut max = p0.max(p2);

    // One potential extremum per axis where the derivative vanishes.
    for axis in 0..2 {
        let denom = p0[axis] - 2.0 * p1[axis] + p2[axis];
        if denom.abs() > 1e-12 {
            let t = (p0[axis] - p1[axis]) / denom;
            if t > 0.0 && t < 1.0 {
                let pt = quadratic_point(p0, p1, p2, t);
                min[axis] = min[axis].min(pt[axis]);
                max[axis] = max[axis].max(pt[axis]);
            }
        }
    }

    (min, max)
}

/// Computes the tight bounding box of a cubic Bezier curve.
///
/// Returns (min, max) corners of the axis-aligned bounding box.
pub fn cubic_bounds(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2) -> (DVec2, DVec2) {
    // Start with endpoints
    let mut min = p0.min(p3);
    let mut max = p0.max(p3);

    // Find extrema by solving derivative = 0, a quadratic in t per axis.
    for axis in 0..2 {
        let a = -p0[axis] + 3.0 * p1[axis] - 3.0 * p2[axis] + p3[axis];
        let b = 2.0 * p0[axis] - 4.0 * p1[axis] + 2.0 * p2[axis];
        let c = -p0[axis] + p1[axis];

        if a.abs() < 1e-12 {
            // Linear case
            if b.abs() > 1e-12 {
                let t = -c / b;
                if t > 0.0 && t < 1.0 {
                    let pt = cubic_point(p0, p1, p2, p3, t);
                    min[axis] = min[axis].min(pt[axis]);
                    max[axis] = max[axis].max(pt[axis]);
                }
            }
        } else {
            let discriminant = b * b - 4.0 * a * c;
            if discriminant >= 0.0 {
                let sqrt_d = discriminant.sqrt();
                for t in [(-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a)] {
                    if t > 0.0 && t < 1.0 {
                        let pt = cubic_point(p0, p1, p2, p3, t);
                        min[axis] = min[axis].min(pt[axis]);
                        max[axis] = max[axis].max(pt[axis]);
                    }
                }
            }
        }
    }

    (min, max)
}
