//! Boolean combination of two segment chains.
//!
//! Every intersection is a crossroads: the walk arrives on one chain, picks
//! the branch that serves the operation by probing points just ahead of and
//! behind the crossing against the other chain, copies curve fragments until
//! the next crossing, and hops to the mirror record there. Sub-paths that
//! never intersect the other chain are appended whole afterwards when the
//! operation's containment rule keeps them.

use glam::DVec2;

use crate::contain::chain_contains;
use crate::intersect::{CrossingSet, Side};
use crate::path::WindingRule;
use crate::segment::{
    curve_at, next_in_subpath, prev_in_subpath, subpath_end, ChainBuilder, SegKind, Segment,
};

/// The set operation a combine performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Add,
    Subtract,
    Intersect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Sample points just ahead of (increasing t) and behind a crossing.
struct Neighborhood {
    ahead: DVec2,
    behind: DVec2,
}

/// Whether a walk on `side`'s chain keeps material whose neighborhood has the
/// given containment in the other chain.
fn keep_rule(op: Op, side: Side, inside_other: bool) -> bool {
    match op {
        Op::Add => !inside_other,
        Op::Intersect => inside_other,
        // A minus B: outside-of-B pieces of A, inside-of-A pieces of B (the
        // retained B pieces bound the holes under even-odd fill).
        Op::Subtract => match side {
            Side::A => !inside_other,
            Side::B => inside_other,
        },
    }
}

/// Combines two closed chains. Segment bounds of both must be up to date.
pub(crate) fn combine(a: &[Segment], b: &[Segment], op: Op) -> Vec<Segment> {
    let set = CrossingSet::find(a, b);
    let mut walker = Walker {
        a,
        b,
        set,
        out: ChainBuilder::new(),
        op,
    };

    let mut last_dir = None;
    while let Some(start) = walker.set.first_unclaimed() {
        walker.walk_loop(start, &mut last_dir);
    }

    append_untouched(&mut walker.out, a, b, Side::A, &walker.set, op);
    append_untouched(&mut walker.out, b, a, Side::B, &walker.set, op);
    walker.out.finish()
}

struct Walker<'a> {
    a: &'a [Segment],
    b: &'a [Segment],
    set: CrossingSet,
    out: ChainBuilder,
    op: Op,
}

impl<'a> Walker<'a> {
    fn chain(&self, side: Side) -> &'a [Segment] {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    fn keep(&self, walk_side: Side, p: DVec2) -> bool {
        let inside = chain_contains(
            self.chain(walk_side.other()),
            p,
            WindingRule::EvenOdd,
            true,
        );
        keep_rule(self.op, walk_side, inside)
    }

    /// One closed output sub-path: starts at an unclaimed crossing and
    /// follows the graph until it returns to a claimed one.
    fn walk_loop(&mut self, mut id: usize, last_dir: &mut Option<Direction>) {
        let mut started = false;
        while !self.set.all[id].claimed {
            let (chosen, dir) = self.choose(id, *last_dir);
            id = chosen;
            if !started {
                let c = self.set.all[id];
                let p = curve_at(self.chain(c.side), c.seg).point_at(c.t);
                self.out.move_to(p);
                started = true;
            }
            *last_dir = Some(dir);
            id = self.follow(id, dir);
        }
        self.out.close();
    }

    /// Picks the branch to leave a crossroads by, possibly switching to the
    /// complement record on the other chain.
    fn choose(&self, id: usize, last_dir: Option<Direction>) -> (usize, Direction) {
        let near = self.neighborhood(id);
        let comp_id = self.set.all[id].complement;
        let comp = self.neighborhood(comp_id);
        let side = self.set.all[id].side;
        let comp_side = side.other();

        if self.keep(side, near.ahead) {
            (id, Direction::Forward)
        } else if self.keep(side, near.behind) {
            (id, Direction::Backward)
        } else if self.keep(comp_side, comp.ahead) && last_dir != Some(Direction::Backward) {
            (comp_id, Direction::Forward)
        } else if self.keep(comp_side, comp.behind) && last_dir != Some(Direction::Forward) {
            (comp_id, Direction::Backward)
        } else if let Some(dir) = last_dir {
            // Overlapping segments leave no side to prefer; stay the course
            // on the other chain.
            (comp_id, dir)
        } else {
            (id, Direction::Forward)
        }
    }

    /// Probes arbitrary points a little ahead of and behind the crossing,
    /// between it and its parametric neighbors. When the crossing sits at a
    /// segment end, the probe steps into the adjacent segment of the
    /// sub-path.
    fn neighborhood(&self, id: usize) -> Neighborhood {
        let c = self.set.all[id];
        let chain = self.chain(c.side);

        let (seg_f, t_f) = match self.set.next_on_segment(id) {
            Some(nid) => (c.seg, (c.t * 17.0 + self.set.all[nid].t * 19.0) / 36.0),
            None => {
                let t = (c.t + 1.0) / 2.0;
                if t > 0.9999 {
                    let next = next_in_subpath(chain, c.seg);
                    match self.set.on_segment(c.side, next).first() {
                        Some(&fid) => (next, self.set.all[fid].t / 2.0),
                        None => (next, 0.5),
                    }
                } else {
                    (c.seg, t)
                }
            }
        };

        let (seg_b, t_b) = match self.set.prev_on_segment(id) {
            Some(pid) => (c.seg, (c.t * 17.0 + self.set.all[pid].t * 19.0) / 36.0),
            None => {
                let t = c.t / 2.0;
                if t < 1e-4 {
                    let prev = prev_in_subpath(chain, c.seg);
                    match self.set.on_segment(c.side, prev).last() {
                        Some(&lid) => (prev, (self.set.all[lid].t + 1.0) / 2.0),
                        None => (prev, 0.5),
                    }
                } else {
                    (c.seg, t)
                }
            }
        };

        Neighborhood {
            ahead: curve_at(chain, seg_f).point_at(t_f),
            behind: curve_at(chain, seg_b).point_at(t_b),
        }
    }

    /// Copies fragments from the crossing to the next one in the chosen
    /// direction, continuing straight through crossing-free segments of the
    /// sub-path, and returns the complement of the crossing it arrives at.
    fn follow(&mut self, id: usize, dir: Direction) -> usize {
        let c = self.set.all[id];
        let chain = self.chain(c.side);
        let curve = curve_at(chain, c.seg);

        match dir {
            Direction::Forward => {
                if let Some(nid) = self.set.next_on_segment(id) {
                    self.set.claim_pair(id);
                    self.out.append_partial(&curve, c.t, self.set.all[nid].t);
                    self.set.all[nid].complement
                } else {
                    self.out.append_partial(&curve, c.t, 1.0);
                    self.set.claim_pair(id);

                    let mut seg = c.seg;
                    loop {
                        seg = next_in_subpath(chain, seg);
                        if !self.set.on_segment(c.side, seg).is_empty() {
                            break;
                        }
                        self.out.append_curve(&curve_at(chain, seg), false);
                    }
                    let first = self.set.on_segment(c.side, seg)[0];
                    self.out
                        .append_partial(&curve_at(chain, seg), 0.0, self.set.all[first].t);
                    self.set.all[first].complement
                }
            }
            Direction::Backward => {
                if let Some(pid) = self.set.prev_on_segment(id) {
                    self.set.claim_pair(id);
                    self.out.append_partial(&curve, c.t, self.set.all[pid].t);
                    self.set.all[pid].complement
                } else {
                    self.out.append_partial(&curve, c.t, 0.0);
                    self.set.claim_pair(id);

                    let mut seg = c.seg;
                    loop {
                        seg = prev_in_subpath(chain, seg);
                        if !self.set.on_segment(c.side, seg).is_empty() {
                            break;
                        }
                        self.out.append_curve(&curve_at(chain, seg), true);
                    }
                    let list = self.set.on_segment(c.side, seg);
                    let last = list[list.len() - 1];
                    self.out
                        .append_partial(&curve_at(chain, seg), 1.0, self.set.all[last].t);
                    self.set.all[last].complement
                }
            }
        }
    }
}

/// Appends whole sub-paths that never crossed the other chain, when the
/// operation's containment rule keeps them.
fn append_untouched(
    out: &mut ChainBuilder,
    chain: &[Segment],
    other: &[Segment],
    side: Side,
    set: &CrossingSet,
    op: Op,
) {
    let mut idx = 0;
    while idx < chain.len() {
        debug_assert_eq!(chain[idx].kind, SegKind::Move);
        let end = subpath_end(chain, idx);
        let touched = (idx..end).any(|k| !set.on_segment(side, k).is_empty());
        if !touched {
            let start_pt = chain[idx].points()[0];
            let inside = chain_contains(other, start_pt, WindingRule::EvenOdd, true);
            if keep_rule(op, side, inside) {
                out.move_to(start_pt);
                for k in idx + 1..end {
                    out.append_curve(&curve_at(chain, k), false);
                }
                out.close();
            }
        }
        idx = end + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{circle, rect, Path};
    use crate::segment::{chain_from_path, update_bounds};

    fn chain_of(path: &Path) -> Vec<Segment> {
        let mut chain = chain_from_path(path);
        update_bounds(&mut chain);
        chain
    }

    fn combined(a: &Path, b: &Path, op: Op) -> Vec<Segment> {
        let mut result = combine(&chain_of(a), &chain_of(b), op);
        update_bounds(&mut result);
        result
    }

    fn inside(chain: &[Segment], x: f64, y: f64) -> bool {
        chain_contains(chain, DVec2::new(x, y), WindingRule::EvenOdd, true)
    }

    #[test]
    fn test_union_plus_sign() {
        // Two rectangles forming a plus sign.
        let r1 = rect(DVec2::new(0.0, 50.0), DVec2::new(100.0, 70.0));
        let r2 = rect(DVec2::new(50.0, 0.0), DVec2::new(70.0, 100.0));
        let union = combined(&r1, &r2, Op::Add);

        // Center and the four arms are inside.
        assert!(inside(&union, 60.0, 60.0));
        assert!(inside(&union, 25.0, 60.0));
        assert!(inside(&union, 85.0, 60.0));
        assert!(inside(&union, 60.0, 25.0));
        assert!(inside(&union, 60.0, 85.0));
        // The four notches are outside.
        assert!(!inside(&union, 25.0, 25.0));
        assert!(!inside(&union, 85.0, 25.0));
        assert!(!inside(&union, 25.0, 85.0));
        assert!(!inside(&union, 85.0, 85.0));
    }

    #[test]
    fn test_union_emits_single_loop() {
        let r1 = rect(DVec2::new(0.0, 50.0), DVec2::new(100.0, 70.0));
        let r2 = rect(DVec2::new(50.0, 0.0), DVec2::new(70.0, 100.0));
        let union = combined(&r1, &r2, Op::Add);

        let moves = union.iter().filter(|s| s.kind == SegKind::Move).count();
        let closes = union.iter().filter(|s| s.kind == SegKind::Close).count();
        assert_eq!(moves, 1);
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_intersect_overlapping_rects() {
        let r1 = rect(DVec2::new(0.0, 50.0), DVec2::new(100.0, 70.0));
        let r2 = rect(DVec2::new(50.0, 0.0), DVec2::new(70.0, 100.0));
        let result = combined(&r1, &r2, Op::Intersect);

        assert!(inside(&result, 60.0, 60.0));
        assert!(!inside(&result, 25.0, 60.0));
        assert!(!inside(&result, 60.0, 25.0));

        let total = update_bounds(&mut result.clone()).unwrap();
        assert!((total.min.x - 50.0).abs() < 1e-9);
        assert!((total.max.x - 70.0).abs() < 1e-9);
        assert!((total.min.y - 50.0).abs() < 1e-9);
        assert!((total.max.y - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_subtract_splits_bar() {
        // Subtracting the vertical bar cuts the horizontal bar in two.
        let r1 = rect(DVec2::new(0.0, 50.0), DVec2::new(100.0, 70.0));
        let r2 = rect(DVec2::new(50.0, 0.0), DVec2::new(70.0, 100.0));
        let result = combined(&r1, &r2, Op::Subtract);

        assert!(inside(&result, 25.0, 60.0));
        assert!(inside(&result, 85.0, 60.0));
        assert!(!inside(&result, 60.0, 60.0));
        assert!(!inside(&result, 60.0, 25.0));

        let moves = result.iter().filter(|s| s.kind == SegKind::Move).count();
        assert_eq!(moves, 2);
    }

    #[test]
    fn test_union_disjoint_keeps_both() {
        let r1 = rect(DVec2::ZERO, DVec2::new(10.0, 10.0));
        let r2 = rect(DVec2::new(20.0, 0.0), DVec2::new(30.0, 10.0));
        let union = combined(&r1, &r2, Op::Add);

        assert!(inside(&union, 5.0, 5.0));
        assert!(inside(&union, 25.0, 5.0));
        assert!(!inside(&union, 15.0, 5.0));
    }

    #[test]
    fn test_union_nested_keeps_outer() {
        let outer = rect(DVec2::ZERO, DVec2::new(100.0, 100.0));
        let inner = rect(DVec2::new(40.0, 40.0), DVec2::new(60.0, 60.0));
        let union = combined(&outer, &inner, Op::Add);

        // The inner sub-path is swallowed whole.
        let moves = union.iter().filter(|s| s.kind == SegKind::Move).count();
        assert_eq!(moves, 1);
        assert!(inside(&union, 50.0, 50.0));
        assert!(inside(&union, 10.0, 10.0));
    }

    #[test]
    fn test_subtract_nested_leaves_hole() {
        let outer = rect(DVec2::ZERO, DVec2::new(100.0, 100.0));
        let inner = rect(DVec2::new(40.0, 40.0), DVec2::new(60.0, 60.0));
        let result = combined(&outer, &inner, Op::Subtract);

        // Both boundaries survive; even-odd turns the inner one into a hole.
        assert!(inside(&result, 10.0, 10.0));
        assert!(!inside(&result, 50.0, 50.0));
        let moves = result.iter().filter(|s| s.kind == SegKind::Move).count();
        assert_eq!(moves, 2);
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let r1 = rect(DVec2::ZERO, DVec2::new(10.0, 10.0));
        let r2 = rect(DVec2::new(20.0, 0.0), DVec2::new(30.0, 10.0));
        let result = combined(&r1, &r2, Op::Intersect);
        assert!(result.is_empty());
    }

    #[test]
    fn test_subtract_swallowing_shape_empties() {
        // Subtracting a covering shape leaves the even-odd equivalent of an
        // empty region: the kept boundaries cancel on sampled points.
        let small = rect(DVec2::new(40.0, 40.0), DVec2::new(60.0, 60.0));
        let big = rect(DVec2::ZERO, DVec2::new(100.0, 100.0));
        let result = combined(&small, &big, Op::Subtract);
        assert!(!inside(&result, 50.0, 50.0));
        assert!(!inside(&result, 45.0, 55.0));
    }

    #[test]
    fn test_union_overlapping_circles() {
        let c1 = circle(DVec2::ZERO, 10.0);
        let c2 = circle(DVec2::new(12.0, 0.0), 10.0);
        let union = combined(&c1, &c2, Op::Add);

        // Far interiors of each circle, probed off-axis.
        assert!(inside(&union, -5.1, 0.3));
        assert!(inside(&union, 17.1, 0.3));
        // The lens between the centers.
        assert!(inside(&union, 6.1, 0.3));
        // Above the overlap waist: outside both circles.
        assert!(!inside(&union, 6.1, 9.7));
        // Well outside.
        assert!(!inside(&union, 25.0, 0.3));
    }

    #[test]
    fn test_intersect_overlapping_circles() {
        let c1 = circle(DVec2::ZERO, 10.0);
        let c2 = circle(DVec2::new(12.0, 0.0), 10.0);
        let result = combined(&c1, &c2, Op::Intersect);

        assert!(inside(&result, 6.1, 0.3)); // in the lens
        assert!(!inside(&result, -5.1, 0.3)); // only in the first circle
        assert!(!inside(&result, 17.1, 0.3)); // only in the second
    }
}
