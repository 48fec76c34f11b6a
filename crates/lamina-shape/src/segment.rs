//! Segment chains: the edge-list representation behind [`Shape`](crate::Shape).
//!
//! A chain is a `Vec<Segment>` in drawing order. Every sub-path runs from a
//! `Move` to a `Close`; construction inserts a closing line when the source
//! path leaves a sub-path open. A segment stores only its own control points;
//! its start point is the previous segment's endpoint.

use glam::DVec2;
use lamina_curve::bezier;
use lamina_curve::Rect;

use crate::path::{Path, PathCommand};

/// Tolerance for treating two positions as coincident when closing.
pub(crate) const CLOSE_EPS: f64 = 1e-5;
/// Slightly-open parametric interval, absorbing round-off at segment ends.
pub(crate) const T_MIN: f64 = -1e-6;
pub(crate) const T_MAX: f64 = 1.0 + 1e-6;

/// Kind of one edge in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegKind {
    Move,
    Line,
    Quad,
    Cubic,
    Close,
}

impl SegKind {
    /// Whether this kind carries a curve that can be evaluated.
    #[inline]
    pub fn is_curve(self) -> bool {
        matches!(self, SegKind::Line | SegKind::Quad | SegKind::Cubic)
    }

    /// Number of control points the kind carries.
    #[inline]
    pub fn point_count(self) -> usize {
        match self {
            SegKind::Close => 0,
            SegKind::Move | SegKind::Line => 1,
            SegKind::Quad => 2,
            SegKind::Cubic => 3,
        }
    }
}

/// One edge of a closed boundary.
#[derive(Debug, Clone)]
pub struct Segment {
    pub kind: SegKind,
    pts: [DVec2; 3],
    /// Valid only after a bounds pass over the chain.
    pub bounds: Rect,
}

impl Segment {
    pub(crate) fn new(kind: SegKind, pts: [DVec2; 3]) -> Self {
        Segment {
            kind,
            pts,
            bounds: Rect::new(DVec2::ZERO, DVec2::ZERO),
        }
    }

    pub(crate) fn close() -> Self {
        Segment::new(SegKind::Close, [DVec2::ZERO; 3])
    }

    /// The control points this segment carries.
    pub fn points(&self) -> &[DVec2] {
        &self.pts[..self.kind.point_count()]
    }

    pub(crate) fn points_mut(&mut self) -> &mut [DVec2] {
        let n = self.kind.point_count();
        &mut self.pts[..n]
    }

    /// The endpoint this segment leaves the pen at.
    ///
    /// Close segments carry no points; callers navigate back to the sub-path
    /// start instead.
    pub(crate) fn last_point(&self) -> DVec2 {
        match self.kind.point_count() {
            0 => panic!("close segment has no endpoint"),
            n => self.pts[n - 1],
        }
    }
}

/// A segment resolved against its start point, ready for evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Curve {
    Line {
        p0: DVec2,
        p1: DVec2,
    },
    Quad {
        p0: DVec2,
        c: DVec2,
        p1: DVec2,
    },
    Cubic {
        p0: DVec2,
        c1: DVec2,
        c2: DVec2,
        p1: DVec2,
    },
}

impl Curve {
    pub fn point_at(&self, t: f64) -> DVec2 {
        match *self {
            Curve::Line { p0, p1 } => p0 + (p1 - p0) * t,
            Curve::Quad { p0, c, p1 } => bezier::quadratic_point(p0, c, p1, t),
            Curve::Cubic { p0, c1, c2, p1 } => bezier::cubic_point(p0, c1, c2, p1, t),
        }
    }

    /// Unnormalized derivative at `t`.
    pub fn tangent_at(&self, t: f64) -> DVec2 {
        match *self {
            Curve::Line { p0, p1 } => p1 - p0,
            Curve::Quad { p0, c, p1 } => bezier::quadratic_tangent(p0, c, p1, t),
            Curve::Cubic { p0, c1, c2, p1 } => bezier::cubic_tangent(p0, c1, c2, p1, t),
        }
    }

    /// Tight axis-aligned bounds (solves for derivative roots).
    pub fn tight_bounds(&self) -> Rect {
        let (min, max) = match *self {
            Curve::Line { p0, p1 } => (p0.min(p1), p0.max(p1)),
            Curve::Quad { p0, c, p1 } => bezier::quadratic_bounds(p0, c, p1),
            Curve::Cubic { p0, c1, c2, p1 } => bezier::cubic_bounds(p0, c1, c2, p1),
        };
        Rect::new(min, max)
    }

    /// Loose bounds from the control-point hull. Cheap; used by the
    /// subdivision intersection search.
    pub fn hull_bounds(&self) -> Rect {
        let (min, max) = match *self {
            Curve::Line { p0, p1 } => (p0.min(p1), p0.max(p1)),
            Curve::Quad { p0, c, p1 } => (p0.min(c).min(p1), p0.max(c).max(p1)),
            Curve::Cubic { p0, c1, c2, p1 } => {
                (p0.min(c1).min(c2).min(p1), p0.max(c1).max(c2).max(p1))
            }
        };
        Rect::new(min, max)
    }

    /// Splits the curve at parameter `t`, returning two subcurves.
    pub fn split(&self, t: f64) -> (Curve, Curve) {
        match *self {
            Curve::Line { p0, p1 } => {
                let mid = p0 + (p1 - p0) * t;
                (
                    Curve::Line { p0, p1: mid },
                    Curve::Line { p0: mid, p1 },
                )
            }
            Curve::Quad { p0, c, p1 } => {
                let (l, r) = bezier::quadratic_split(p0, c, p1, t);
                (
                    Curve::Quad {
                        p0: l[0],
                        c: l[1],
                        p1: l[2],
                    },
                    Curve::Quad {
                        p0: r[0],
                        c: r[1],
                        p1: r[2],
                    },
                )
            }
            Curve::Cubic { p0, c1, c2, p1 } => {
                let (l, r) = bezier::cubic_split(p0, c1, c2, p1, t);
                (
                    Curve::Cubic {
                        p0: l[0],
                        c1: l[1],
                        c2: l[2],
                        p1: l[3],
                    },
                    Curve::Cubic {
                        p0: r[0],
                        c1: r[1],
                        c2: r[2],
                        p1: r[3],
                    },
                )
            }
        }
    }
}

/// Resolves `seg` against an explicit start point.
///
/// Panics on `Move` and `Close` segments, which have no curve to evaluate.
pub(crate) fn curve_from(start: DVec2, seg: &Segment) -> Curve {
    match seg.kind {
        SegKind::Line => Curve::Line {
            p0: start,
            p1: seg.pts[0],
        },
        SegKind::Quad => Curve::Quad {
            p0: start,
            c: seg.pts[0],
            p1: seg.pts[1],
        },
        SegKind::Cubic => Curve::Cubic {
            p0: start,
            c1: seg.pts[0],
            c2: seg.pts[1],
            p1: seg.pts[2],
        },
        SegKind::Move => panic!("parametric query on a move segment"),
        SegKind::Close => panic!("parametric query on a close segment"),
    }
}

/// The start point of segment `idx`: the previous segment's endpoint.
pub(crate) fn start_of(chain: &[Segment], idx: usize) -> DVec2 {
    debug_assert!(idx > 0, "chain starts with a move");
    chain[idx - 1].last_point()
}

/// Resolves segment `idx` of the chain for evaluation.
pub(crate) fn curve_at(chain: &[Segment], idx: usize) -> Curve {
    curve_from(start_of(chain, idx), &chain[idx])
}

/// Index of the `Move` that opens the sub-path containing `idx`.
pub(crate) fn subpath_start(chain: &[Segment], idx: usize) -> usize {
    let mut i = idx;
    while chain[i].kind != SegKind::Move {
        i -= 1;
    }
    i
}

/// Index of the `Close` that ends the sub-path containing `idx`.
pub(crate) fn subpath_end(chain: &[Segment], idx: usize) -> usize {
    let mut i = idx;
    while chain[i].kind != SegKind::Close {
        i += 1;
    }
    i
}

/// The next curve segment within the sub-path, wrapping past the `Close`.
pub(crate) fn next_in_subpath(chain: &[Segment], idx: usize) -> usize {
    let j = idx + 1;
    if j >= chain.len() || !chain[j].kind.is_curve() {
        subpath_start(chain, idx) + 1
    } else {
        j
    }
}

/// The previous curve segment within the sub-path, wrapping past the `Move`.
pub(crate) fn prev_in_subpath(chain: &[Segment], idx: usize) -> usize {
    if idx == 0 || !chain[idx - 1].kind.is_curve() {
        subpath_end(chain, idx) - 1
    } else {
        idx - 1
    }
}

/// Builds a chain from a path, closing every sub-path.
///
/// Panics if the path starts drawing before any `MoveTo`.
pub(crate) fn chain_from_path(path: &Path) -> Vec<Segment> {
    let mut chain: Vec<Segment> = Vec::with_capacity(path.len() + 2);
    let mut move_pt = DVec2::ZERO;
    let mut current = DVec2::ZERO;
    let mut open = false;

    for cmd in path.commands() {
        if !open && !matches!(cmd, PathCommand::MoveTo(_) | PathCommand::Close) {
            panic!("path drawing command before any move");
        }
        match *cmd {
            PathCommand::MoveTo(p) => {
                if open {
                    close_subpath(&mut chain, current, move_pt);
                }
                chain.push(Segment::new(SegKind::Move, [p, DVec2::ZERO, DVec2::ZERO]));
                move_pt = p;
                current = p;
                open = true;
            }
            PathCommand::LineTo(p) => {
                chain.push(Segment::new(SegKind::Line, [p, DVec2::ZERO, DVec2::ZERO]));
                current = p;
            }
            PathCommand::QuadTo { control, to } => {
                chain.push(Segment::new(SegKind::Quad, [control, to, DVec2::ZERO]));
                current = to;
            }
            PathCommand::CubicTo {
                control1,
                control2,
                to,
            } => {
                chain.push(Segment::new(SegKind::Cubic, [control1, control2, to]));
                current = to;
            }
            PathCommand::Close => {
                if open {
                    close_subpath(&mut chain, current, move_pt);
                    current = move_pt;
                    open = false;
                }
            }
        }
    }
    if open {
        close_subpath(&mut chain, current, move_pt);
    }
    chain
}

fn close_subpath(chain: &mut Vec<Segment>, current: DVec2, move_pt: DVec2) {
    if (current.x - move_pt.x).abs() > CLOSE_EPS || (current.y - move_pt.y).abs() > CLOSE_EPS {
        chain.push(Segment::new(
            SegKind::Line,
            [move_pt, DVec2::ZERO, DVec2::ZERO],
        ));
    }
    chain.push(Segment::close());
}

/// Recomputes every segment's cached bounds in one linear pass.
///
/// Returns the aggregate bounds over the whole chain, or `None` when the
/// chain is empty.
pub(crate) fn update_bounds(chain: &mut [Segment]) -> Option<Rect> {
    let mut last = DVec2::ZERO;
    let mut total: Option<Rect> = None;

    for seg in chain.iter_mut() {
        match seg.kind {
            SegKind::Move => {
                let p = seg.pts[0];
                seg.bounds = Rect::new(p, p);
                last = p;
            }
            SegKind::Close => {
                seg.bounds = Rect::new(last, last);
                continue;
            }
            _ => {
                let b = curve_from(last, seg).tight_bounds();
                seg.bounds = b;
                last = seg.last_point();
            }
        }
        total = Some(match total {
            Some(t) => t.union(&seg.bounds),
            None => seg.bounds,
        });
    }
    total
}

/// Re-derives a same-kind segment whose [0,1] parameter range maps to
/// `[t0,t1]` of `curve`.
///
/// The range may run backwards (`t0 > t1`) to copy the piece reversed. The
/// new control points are recovered by sampling the source polynomial at 2-4
/// evenly spaced parameters and solving the coefficient system, so the copy
/// stays exact for polynomial curves instead of accumulating truncation.
pub(crate) fn partial_segment(curve: &Curve, t0: f64, t1: f64) -> Segment {
    match curve {
        Curve::Line { .. } => {
            let p = curve.point_at(t1);
            Segment::new(SegKind::Line, [p, DVec2::ZERO, DVec2::ZERO])
        }
        Curve::Quad { .. } => {
            let tm = 0.5 * (t0 + t1);
            let f0 = curve.point_at(t0);
            let f1 = curve.point_at(tm);
            let f2 = curve.point_at(t1);

            // Power coefficients of the reparameterized quadratic, from the
            // three samples at u = 0, 1/2, 1.
            let a = f2 * 2.0 - f1 * 4.0 + f0 * 2.0;
            let b = f2 - f0 - a;

            let p0 = f0;
            let c = (p0 * 2.0 + b) * 0.5;
            let p1 = a - p0 + c * 2.0;
            Segment::new(SegKind::Quad, [c, p1, DVec2::ZERO])
        }
        Curve::Cubic { .. } => {
            let tw = (2.0 * t0 + t1) / 3.0;
            let tz = (t0 + 2.0 * t1) / 3.0;
            let f0 = curve.point_at(t0);
            let f1 = curve.point_at(tw);
            let f2 = curve.point_at(tz);
            let f3 = curve.point_at(t1);

            // Power coefficients of the reparameterized cubic, from the four
            // samples at u = 0, 1/3, 2/3, 1.
            let c = (f0 * -11.0 + f1 * 18.0 - f2 * 9.0 + f3 * 2.0) * 0.5;
            let b = (f0 * -19.0 + f2 * 27.0 - f3 * 8.0 - c * 10.0) * 0.25;
            let a = f3 - b - c - f0;

            let p0 = f0;
            let c1 = (p0 * 3.0 + c) / 3.0;
            let c2 = (b - p0 * 3.0 + c1 * 6.0) / 3.0;
            let p1 = a + p0 - c1 * 3.0 + c2 * 3.0;
            Segment::new(SegKind::Cubic, [c1, c2, p1])
        }
    }
}

/// Exact whole-segment copy of `curve`, optionally reversed.
pub(crate) fn full_segment(curve: &Curve, reversed: bool) -> Segment {
    match (*curve, reversed) {
        (Curve::Line { p1, .. }, false) => {
            Segment::new(SegKind::Line, [p1, DVec2::ZERO, DVec2::ZERO])
        }
        (Curve::Line { p0, .. }, true) => {
            Segment::new(SegKind::Line, [p0, DVec2::ZERO, DVec2::ZERO])
        }
        (Curve::Quad { c, p1, .. }, false) => Segment::new(SegKind::Quad, [c, p1, DVec2::ZERO]),
        (Curve::Quad { p0, c, .. }, true) => Segment::new(SegKind::Quad, [c, p0, DVec2::ZERO]),
        (Curve::Cubic { c1, c2, p1, .. }, false) => Segment::new(SegKind::Cubic, [c1, c2, p1]),
        (Curve::Cubic { p0, c1, c2, .. }, true) => Segment::new(SegKind::Cubic, [c2, c1, p0]),
    }
}

/// Incrementally builds a closed chain during a combine walk.
pub(crate) struct ChainBuilder {
    chain: Vec<Segment>,
    move_pt: DVec2,
    current: DVec2,
    open: bool,
}

impl ChainBuilder {
    pub fn new() -> Self {
        ChainBuilder {
            chain: Vec::new(),
            move_pt: DVec2::ZERO,
            current: DVec2::ZERO,
            open: false,
        }
    }

    /// Opens a new sub-path, closing any previous one.
    pub fn move_to(&mut self, p: DVec2) {
        if self.open {
            self.close();
        }
        self.chain
            .push(Segment::new(SegKind::Move, [p, DVec2::ZERO, DVec2::ZERO]));
        self.move_pt = p;
        self.current = p;
        self.open = true;
    }

    /// Closes the open sub-path, inserting a connecting line when needed.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        close_subpath(&mut self.chain, self.current, self.move_pt);
        self.current = self.move_pt;
        self.open = false;
    }

    /// Appends the piece of `curve` between parameters `t0` and `t1`.
    pub fn append_partial(&mut self, curve: &Curve, t0: f64, t1: f64) {
        let seg = partial_segment(curve, t0, t1);
        self.current = seg.last_point();
        self.chain.push(seg);
    }

    /// Appends the whole of `curve`, optionally reversed.
    pub fn append_curve(&mut self, curve: &Curve, reversed: bool) {
        let seg = full_segment(curve, reversed);
        self.current = seg.last_point();
        self.chain.push(seg);
    }

    pub fn finish(mut self) -> Vec<Segment> {
        self.close();
        self.chain
    }
}
