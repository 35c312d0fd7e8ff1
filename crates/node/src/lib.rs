//! Shape value model for the map tagging workspace.
//!
//! Shapes are immutable snapshots of what a rendering surface currently
//! shows: an identity, an opaque geometry payload, the source properties
//! and the style it is painted with. Nothing here holds a live handle into
//! a surface.

mod geometry;
mod shape;
mod shape_id;
mod style;

pub use geometry::{Extent, Geometry, GeometryRecord};
pub use shape::Shape;
pub use shape_id::ShapeId;
pub use style::{Color, ColorError, Fill, Stroke, Style, StylePatch};
