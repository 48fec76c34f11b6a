//! Planar shape boolean algebra.
//!
//! A [`Shape`] is a closed 2D region bounded by a chain of line, quadratic,
//! and cubic Bezier segments. Shapes combine with [`Shape::add`] (union),
//! [`Shape::subtract`] (difference), and [`Shape::intersect`] (clipping),
//! answer point and rectangle containment queries, transform by affine
//! matrices, and serialize to a compact string that parses back.
//!
//! Shapes are built from [`Path`] command sequences and produce them again
//! through [`Shape::path_iter`], so any producer or consumer of path
//! commands interoperates without depending on the engine internals.
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use lamina_shape::{rect, Shape};
//!
//! let mut plus = Shape::from_path(&rect(DVec2::new(0.0, 50.0), DVec2::new(100.0, 70.0)));
//! let bar = Shape::from_path(&rect(DVec2::new(50.0, 0.0), DVec2::new(70.0, 100.0)));
//! plus.add(&bar);
//!
//! assert!(plus.contains(DVec2::new(60.0, 25.0)));
//! assert!(!plus.contains(DVec2::new(25.0, 25.0)));
//! ```

mod combine;
mod contain;
mod error;
mod intersect;
mod iter;
mod path;
mod segment;
mod shape;

pub use error::ShapeError;
pub use iter::PathIter;
pub use path::{circle, polygon, quadrilateral, rect, Path, PathBuilder, PathCommand, WindingRule};
pub use shape::Shape;

pub use lamina_curve::Rect;
