use crate::Viewport;
use node::{Extent, GeometryRecord, Shape, ShapeId, Style, StylePatch};

/// Capability to render shapes.
///
/// Every read returns an owned [`Shape`] snapshot; callers never keep a
/// reference into the surface across calls.
pub trait Surface {
    /// Attach a new shape built from `record` and return its identity.
    fn add_shape(&mut self, record: GeometryRecord, style: Style) -> ShapeId;

    /// Detach a shape. Returns `false` when the identity is not rendered.
    fn remove_shape(&mut self, id: ShapeId) -> bool;

    /// Snapshot of a rendered shape.
    fn shape(&self, id: ShapeId) -> Option<Shape>;

    /// Replace a shape's style. Returns `false` when the identity is not rendered.
    fn set_style(&mut self, id: ShapeId, style: Style) -> bool;

    /// Bind or clear a permanent label.
    fn set_label(&mut self, id: ShapeId, label: Option<String>) -> bool;

    /// Recenter and zoom the view so `extent` is fully visible.
    fn fit_extent(&mut self, extent: Extent);

    /// Show or hide every permanent label at once.
    fn set_labels_visible(&mut self, visible: bool);

    /// The current view, for surfaces that expose one.
    fn current_viewport(&self) -> Option<Viewport> {
        None
    }

    fn contains(&self, id: ShapeId) -> bool {
        self.shape(id).is_some()
    }

    /// Apply a partial style on top of the shape's current style.
    fn patch_style(&mut self, id: ShapeId, patch: &StylePatch) -> bool {
        match self.shape(id) {
            Some(shape) => self.set_style(id, shape.style.patched(patch)),
            None => false,
        }
    }
}
