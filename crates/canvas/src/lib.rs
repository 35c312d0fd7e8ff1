//! Rendering-surface boundary for the tagging workspace.
//!
//! The engine never talks to a map widget directly. It is handed something
//! implementing [`Surface`], which owns the rendered shapes and issues their
//! identities. [`MemorySurface`] is the in-process implementation used by
//! the CLI and by tests.

mod canvas;
mod labels;
mod registry;
mod surface;
mod viewport;

pub use canvas::MemorySurface;
pub use labels::LabelVisibility;
pub use registry::ShapeRegistry;
pub use surface::Surface;
pub use viewport::Viewport;
