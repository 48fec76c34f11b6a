//! Iterator adapter producing a shape's boundary as path commands.

use std::sync::Arc;

use crate::path::PathCommand;
use crate::segment::{SegKind, Segment};

/// A restartable, finite iterator over a shape's path commands.
///
/// The iterator holds its own handle to the segment chain, so it keeps
/// producing the sequence it started with even if the owning
/// [`Shape`](crate::Shape) is mutated or dropped in the meantime; mutation
/// replaces the shape's chain rather than editing the shared one.
#[derive(Debug, Clone)]
pub struct PathIter {
    segments: Arc<Vec<Segment>>,
    pos: usize,
}

impl PathIter {
    pub(crate) fn new(segments: Arc<Vec<Segment>>) -> Self {
        PathIter { segments, pos: 0 }
    }

    /// Rewinds to the first command; the sequence replays identically.
    pub fn restart(&mut self) {
        self.pos = 0;
    }
}

impl Iterator for PathIter {
    type Item = PathCommand;

    fn next(&mut self) -> Option<PathCommand> {
        let seg = self.segments.get(self.pos)?;
        self.pos += 1;
        Some(command_of(seg))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.segments.len() - self.pos.min(self.segments.len());
        (left, Some(left))
    }
}

impl ExactSizeIterator for PathIter {}

fn command_of(seg: &Segment) -> PathCommand {
    let pts = seg.points();
    match seg.kind {
        SegKind::Move => PathCommand::MoveTo(pts[0]),
        SegKind::Line => PathCommand::LineTo(pts[0]),
        SegKind::Quad => PathCommand::QuadTo {
            control: pts[0],
            to: pts[1],
        },
        SegKind::Cubic => PathCommand::CubicTo {
            control1: pts[0],
            control2: pts[1],
            to: pts[2],
        },
        SegKind::Close => PathCommand::Close,
    }
}
