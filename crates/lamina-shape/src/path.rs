//! 2D path representation and building.
//!
//! This is the producer/consumer protocol the engine speaks with the outside
//! world: a finite sequence of drawing commands plus a winding rule as a side
//! channel.

use glam::DVec2;

use crate::error::ShapeError;

/// A path command in an SVG-like path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathCommand {
    /// Move to a point without drawing.
    MoveTo(DVec2),
    /// Draw a line to a point.
    LineTo(DVec2),
    /// Quadratic bezier curve to a point with one control point.
    QuadTo { control: DVec2, to: DVec2 },
    /// Cubic bezier curve to a point with two control points.
    CubicTo {
        control1: DVec2,
        control2: DVec2,
        to: DVec2,
    },
    /// Close the current subpath by drawing a line to the start.
    Close,
}

/// Policy for deciding "inside" from a directional crossing count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindingRule {
    /// Inside iff the crossing count is odd.
    #[default]
    EvenOdd,
    /// Inside iff the signed crossing count is nonzero.
    NonZero,
}

/// A 2D path consisting of path commands.
#[derive(Debug, Clone, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
    winding: WindingRule,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path commands.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Returns the winding rule.
    pub fn winding(&self) -> WindingRule {
        self.winding
    }

    /// Sets the winding rule.
    pub fn set_winding(&mut self, winding: WindingRule) {
        self.winding = winding;
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Appends commands from another path.
    pub fn extend(&mut self, other: &Path) {
        self.commands.extend_from_slice(&other.commands);
    }
}

impl FromIterator<PathCommand> for Path {
    fn from_iter<I: IntoIterator<Item = PathCommand>>(iter: I) -> Self {
        Path {
            commands: iter.into_iter().collect(),
            winding: WindingRule::default(),
        }
    }
}

/// Builder for constructing paths.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    path: Path,
    current: DVec2,
    start: DVec2,
}

impl PathBuilder {
    /// Creates a new path builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to a point without drawing.
    pub fn move_to(mut self, to: DVec2) -> Self {
        self.path.commands.push(PathCommand::MoveTo(to));
        self.current = to;
        self.start = to;
        self
    }

    /// Draws a line to a point.
    pub fn line_to(mut self, to: DVec2) -> Self {
        self.path.commands.push(PathCommand::LineTo(to));
        self.current = to;
        self
    }

    /// Draws a quadratic bezier curve.
    pub fn quad_to(mut self, control: DVec2, to: DVec2) -> Self {
        self.path.commands.push(PathCommand::QuadTo { control, to });
        self.current = to;
        self
    }

    /// Draws a cubic bezier curve.
    pub fn cubic_to(mut self, control1: DVec2, control2: DVec2, to: DVec2) -> Self {
        self.path.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            to,
        });
        self.current = to;
        self
    }

    /// Closes the current subpath.
    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self.current = self.start;
        self
    }

    /// Sets the winding rule of the path being built.
    pub fn winding(mut self, winding: WindingRule) -> Self {
        self.path.winding = winding;
        self
    }

    /// Builds the final path.
    pub fn build(self) -> Path {
        self.path
    }
}

// Path primitives

/// Creates a rectangle.
pub fn rect(min: DVec2, max: DVec2) -> Path {
    PathBuilder::new()
        .move_to(min)
        .line_to(DVec2::new(max.x, min.y))
        .line_to(max)
        .line_to(DVec2::new(min.x, max.y))
        .close()
        .build()
}

/// Creates a closed polygon.
pub fn polygon(points: &[DVec2]) -> Path {
    if points.is_empty() {
        return Path::new();
    }

    let mut builder = PathBuilder::new().move_to(points[0]);
    for &p in &points[1..] {
        builder = builder.line_to(p);
    }
    builder.close().build()
}

/// Creates a circle approximated with cubic beziers.
///
/// Uses 4 cubic bezier curves for a good approximation.
pub fn circle(center: DVec2, radius: f64) -> Path {
    // Magic number for circular arc approximation with cubics
    // k = 4/3 * tan(π/8) ≈ 0.5522847498
    const K: f64 = 0.552_284_749_830_793_4;

    let r = radius;
    let c = center;
    let k = K * r;

    PathBuilder::new()
        .move_to(DVec2::new(c.x + r, c.y))
        .cubic_to(
            DVec2::new(c.x + r, c.y + k),
            DVec2::new(c.x + k, c.y + r),
            DVec2::new(c.x, c.y + r),
        )
        .cubic_to(
            DVec2::new(c.x - k, c.y + r),
            DVec2::new(c.x - r, c.y + k),
            DVec2::new(c.x - r, c.y),
        )
        .cubic_to(
            DVec2::new(c.x - r, c.y - k),
            DVec2::new(c.x - k, c.y - r),
            DVec2::new(c.x, c.y - r),
        )
        .cubic_to(
            DVec2::new(c.x + k, c.y - r),
            DVec2::new(c.x + r, c.y - k),
            DVec2::new(c.x + r, c.y),
        )
        .close()
        .build()
}

/// Creates a closed quadrilateral from four corners.
///
/// Fails when the corners describe a self-crossing ("bow tie") outline, which
/// has no well-defined interior.
pub fn quadrilateral(corners: [DVec2; 4]) -> Result<Path, ShapeError> {
    let [a, b, c, d] = corners;
    if edges_cross(a, b, c, d) || edges_cross(b, c, d, a) {
        return Err(ShapeError::DegenerateQuad);
    }
    Ok(polygon(&corners))
}

/// Whether segment a1-a2 properly crosses segment b1-b2 (interior to both).
fn edges_cross(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let d1 = a2 - a1;
    let d2 = b2 - b1;

    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < 1e-12 {
        return false; // parallel
    }

    let d = b1 - a1;
    let t = (d.x * d2.y - d.y * d2.x) / cross;
    let u = (d.x * d1.y - d.y * d1.x) / cross;

    t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0
}
