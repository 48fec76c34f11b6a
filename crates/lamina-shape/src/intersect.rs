//! Pairwise curve intersection and the per-combine crossing arena.
//!
//! Line pairs solve in closed form; a line against a Bezier substitutes the
//! line's implicit form into the curve polynomial and solves that; two
//! Beziers fall back to recursive bounding-box subdivision with a Newton
//! polish at the end. All parameters honor the slightly-open [0,1] interval.

use crate::segment::{curve_at, Curve, Segment, T_MAX, T_MIN};

/// Parameter pair where two curves coincide.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Hit {
    pub t1: f64,
    pub t2: f64,
}

const SUBDIV_TOL: f64 = 1e-4;
const MAX_DEPTH: usize = 48;
/// Hits closer than this in both parameters are the same intersection.
const DEDUP_EPS: f64 = 1e-5;

#[inline]
fn in_band(t: f64) -> bool {
    (T_MIN..=T_MAX).contains(&t)
}

/// All intersections of two curves, ascending by `t1`.
pub(crate) fn curve_curve(c1: &Curve, c2: &Curve, out: &mut Vec<Hit>) {
    out.clear();
    match (c1, c2) {
        (Curve::Line { .. }, Curve::Line { .. }) => line_line(c1, c2, out),
        (Curve::Line { .. }, _) => {
            line_curve(c1, c2, out);
        }
        (_, Curve::Line { .. }) => {
            let mut swapped = Vec::new();
            line_curve(c2, c1, &mut swapped);
            out.extend(swapped.iter().map(|h| Hit {
                t1: h.t2,
                t2: h.t1,
            }));
        }
        _ => {
            subdivide(c1, c2, (0.0, 1.0), (0.0, 1.0), 0, out);
            for h in out.iter_mut() {
                *h = polish(c1, c2, *h);
            }
        }
    }
    out.sort_by(|a, b| a.t1.total_cmp(&b.t1));
    out.dedup_by(|a, b| (a.t1 - b.t1).abs() < DEDUP_EPS && (a.t2 - b.t2).abs() < DEDUP_EPS);
}

fn line_line(c1: &Curve, c2: &Curve, out: &mut Vec<Hit>) {
    let (Curve::Line { p0: a1, p1: a2 }, Curve::Line { p0: b1, p1: b2 }) = (c1, c2) else {
        unreachable!()
    };
    let d1 = *a2 - *a1;
    let d2 = *b2 - *b1;

    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < 1e-12 {
        return; // parallel (coincident overlaps yield no point crossings)
    }

    let d = *b1 - *a1;
    let t1 = (d.x * d2.y - d.y * d2.x) / cross;
    let t2 = (d.x * d1.y - d.y * d1.x) / cross;

    if in_band(t1) && in_band(t2) {
        out.push(Hit { t1, t2 });
    }
}

/// Intersections of a line with a quadratic or cubic Bezier.
fn line_curve(line: &Curve, curve: &Curve, out: &mut Vec<Hit>) {
    let Curve::Line { p0, p1 } = line else {
        unreachable!()
    };
    let d = *p1 - *p0;
    if d.length_squared() < 1e-24 {
        return;
    }

    // Substitute the curve into the line's implicit form
    // cross(d, C(t) - p0) = 0 and solve the resulting polynomial.
    let mut roots = [0.0f64; 3];
    let n = match *curve {
        Curve::Quad {
            p0: q0,
            c,
            p1: q1,
        } => {
            let ax = lamina_curve::poly::quadratic_poly(q0.x, c.x, q1.x);
            let ay = lamina_curve::poly::quadratic_poly(q0.y, c.y, q1.y);
            let k2 = d.x * ay[0] - d.y * ax[0];
            let k1 = d.x * ay[1] - d.y * ax[1];
            let k0 = d.x * (ay[2] - p0.y) - d.y * (ax[2] - p0.x);
            let mut two = [0.0f64; 2];
            let n = lamina_curve::poly::solve_quadratic(k2, k1, k0, &mut two);
            roots[..n].copy_from_slice(&two[..n]);
            n
        }
        Curve::Cubic {
            p0: q0,
            c1,
            c2,
            p1: q1,
        } => {
            let ax = lamina_curve::poly::cubic_poly(q0.x, c1.x, c2.x, q1.x);
            let ay = lamina_curve::poly::cubic_poly(q0.y, c1.y, c2.y, q1.y);
            let k3 = d.x * ay[0] - d.y * ax[0];
            let k2 = d.x * ay[1] - d.y * ax[1];
            let k1 = d.x * ay[2] - d.y * ax[2];
            let k0 = d.x * (ay[3] - p0.y) - d.y * (ax[3] - p0.x);
            lamina_curve::poly::solve_cubic(k3, k2, k1, k0, &mut roots)
        }
        Curve::Line { .. } => unreachable!(),
    };

    for &t2 in &roots[..n] {
        if !in_band(t2) {
            continue;
        }
        let p = curve.point_at(t2);
        // Recover the line parameter along the dominant axis.
        let t1 = if d.x.abs() > d.y.abs() {
            (p.x - p0.x) / d.x
        } else {
            (p.y - p0.y) / d.y
        };
        if in_band(t1) {
            out.push(Hit { t1, t2 });
        }
    }
}

fn bounds_size(c: &Curve) -> f64 {
    let b = c.hull_bounds();
    (b.max - b.min).length()
}

/// Recursive bounding-box subdivision for Bezier/Bezier pairs.
fn subdivide(
    c1: &Curve,
    c2: &Curve,
    r1: (f64, f64),
    r2: (f64, f64),
    depth: usize,
    out: &mut Vec<Hit>,
) {
    if !c1.hull_bounds().overlaps(&c2.hull_bounds()) {
        return;
    }

    let size1 = bounds_size(c1);
    let size2 = bounds_size(c2);

    if (size1 < SUBDIV_TOL && size2 < SUBDIV_TOL) || depth >= MAX_DEPTH {
        out.push(Hit {
            t1: 0.5 * (r1.0 + r1.1),
            t2: 0.5 * (r2.0 + r2.1),
        });
        return;
    }

    if size1 > size2 {
        let (left, right) = c1.split(0.5);
        let mid = 0.5 * (r1.0 + r1.1);
        subdivide(&left, c2, (r1.0, mid), r2, depth + 1, out);
        subdivide(&right, c2, (mid, r1.1), r2, depth + 1, out);
    } else {
        let (left, right) = c2.split(0.5);
        let mid = 0.5 * (r2.0 + r2.1);
        subdivide(c1, &left, r1, (r2.0, mid), depth + 1, out);
        subdivide(c1, &right, r1, (mid, r2.1), depth + 1, out);
    }
}

/// Newton refinement of a subdivision hit against the full curves.
fn polish(c1: &Curve, c2: &Curve, hit: Hit) -> Hit {
    let mut t1 = hit.t1;
    let mut t2 = hit.t2;
    for _ in 0..8 {
        let f = c1.point_at(t1) - c2.point_at(t2);
        if f.length_squared() < 1e-24 {
            break;
        }
        let j1 = c1.tangent_at(t1);
        let j2 = c2.tangent_at(t2);
        let det = j2.x * j1.y - j1.x * j2.y;
        if det.abs() < 1e-12 {
            break;
        }
        let dt1 = (f.x * j2.y - j2.x * f.y) / det;
        let dt2 = (f.x * j1.y - j1.x * f.y) / det;
        t1 = (t1 + dt1).clamp(0.0, 1.0);
        t2 = (t2 + dt2).clamp(0.0, 1.0);
    }
    Hit { t1, t2 }
}

/// Which operand chain a crossing is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// One half of an intersection: anchored on a segment, paired with its
/// mirror record on the other chain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crossing {
    pub side: Side,
    pub seg: usize,
    pub t: f64,
    pub complement: usize,
    pub claimed: bool,
    /// Rank within the owning segment's ascending-t list.
    pub rank: usize,
}

/// Per-combine arena of crossings, ordered by ascending t on each segment.
///
/// Created at the start of a boolean combine and dropped with it; crossings
/// never outlive the operation.
pub(crate) struct CrossingSet {
    pub all: Vec<Crossing>,
    per_seg_a: Vec<Vec<usize>>,
    per_seg_b: Vec<Vec<usize>>,
}

impl CrossingSet {
    /// Finds every pairwise intersection between the curve segments of the
    /// two chains. Segment bounds must be up to date.
    pub fn find(a: &[Segment], b: &[Segment]) -> CrossingSet {
        let mut all: Vec<Crossing> = Vec::new();
        let mut per_seg_a: Vec<Vec<usize>> = vec![Vec::new(); a.len()];
        let mut per_seg_b: Vec<Vec<usize>> = vec![Vec::new(); b.len()];
        let mut hits = Vec::new();

        for (i, sa) in a.iter().enumerate() {
            if !sa.kind.is_curve() {
                continue;
            }
            let ca = curve_at(a, i);
            for (j, sb) in b.iter().enumerate() {
                if !sb.kind.is_curve() {
                    continue;
                }
                if !sa.bounds.inflate(1e-9).overlaps(&sb.bounds) {
                    continue;
                }
                let cb = curve_at(b, j);
                curve_curve(&ca, &cb, &mut hits);
                for h in &hits {
                    let ia = all.len();
                    let ib = ia + 1;
                    all.push(Crossing {
                        side: Side::A,
                        seg: i,
                        t: h.t1,
                        complement: ib,
                        claimed: false,
                        rank: 0,
                    });
                    all.push(Crossing {
                        side: Side::B,
                        seg: j,
                        t: h.t2,
                        complement: ia,
                        claimed: false,
                        rank: 0,
                    });
                    per_seg_a[i].push(ia);
                    per_seg_b[j].push(ib);
                }
            }
        }

        for list in per_seg_a.iter_mut().chain(per_seg_b.iter_mut()) {
            list.sort_by(|&x, &y| all[x].t.total_cmp(&all[y].t));
            for (rank, &id) in list.iter().enumerate() {
                all[id].rank = rank;
            }
        }

        CrossingSet {
            all,
            per_seg_a,
            per_seg_b,
        }
    }

    /// Crossing ids on a segment, ascending by t.
    pub fn on_segment(&self, side: Side, seg: usize) -> &[usize] {
        match side {
            Side::A => &self.per_seg_a[seg],
            Side::B => &self.per_seg_b[seg],
        }
    }

    /// The next crossing after `id` on the same segment.
    pub fn next_on_segment(&self, id: usize) -> Option<usize> {
        let c = &self.all[id];
        self.on_segment(c.side, c.seg).get(c.rank + 1).copied()
    }

    /// The previous crossing before `id` on the same segment.
    pub fn prev_on_segment(&self, id: usize) -> Option<usize> {
        let c = &self.all[id];
        let rank = c.rank.checked_sub(1)?;
        Some(self.on_segment(c.side, c.seg)[rank])
    }

    pub fn first_unclaimed(&self) -> Option<usize> {
        self.all.iter().position(|c| !c.claimed)
    }

    /// Marks a crossing and its complement consumed.
    pub fn claim_pair(&mut self, id: usize) {
        let comp = self.all[id].complement;
        self.all[id].claimed = true;
        self.all[comp].claimed = true;
    }
}
