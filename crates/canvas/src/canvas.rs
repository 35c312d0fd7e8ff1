use crate::{ShapeRegistry, Surface, Viewport};
use node::{Extent, GeometryRecord, Shape, ShapeId, Style, StylePatch};

/// A surface that renders into memory.
///
/// Keeps shapes, the viewport and label visibility exactly as a map widget
/// would, without drawing anything.
#[derive(Clone, Debug)]
pub struct MemorySurface {
    registry: ShapeRegistry,
    viewport: Viewport,
    labels_visible: bool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            registry: ShapeRegistry::new(),
            viewport: Viewport::new(),
            labels_visible: true,
        }
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn shape_count(&self) -> usize {
        self.registry.len()
    }
}

impl Surface for MemorySurface {
    fn add_shape(&mut self, record: GeometryRecord, style: Style) -> ShapeId {
        let id = self.registry.insert(Shape::from_record(record, style));
        log::trace!("surface: attached {}", id);
        id
    }

    fn remove_shape(&mut self, id: ShapeId) -> bool {
        let removed = self.registry.remove(id).is_some();
        if removed {
            log::trace!("surface: detached {}", id);
        }
        removed
    }

    fn shape(&self, id: ShapeId) -> Option<Shape> {
        self.registry.get(id).cloned()
    }

    fn set_style(&mut self, id: ShapeId, style: Style) -> bool {
        match self.registry.get_mut(id) {
            Some(shape) => {
                shape.style = style;
                true
            }
            None => false,
        }
    }

    fn set_label(&mut self, id: ShapeId, label: Option<String>) -> bool {
        match self.registry.get_mut(id) {
            Some(shape) => {
                shape.label = label;
                true
            }
            None => false,
        }
    }

    fn fit_extent(&mut self, extent: Extent) {
        self.viewport.fit(extent);
    }

    fn set_labels_visible(&mut self, visible: bool) {
        self.labels_visible = visible;
    }

    fn current_viewport(&self) -> Option<Viewport> {
        Some(self.viewport.clone())
    }

    fn contains(&self, id: ShapeId) -> bool {
        self.registry.contains(id)
    }

    fn patch_style(&mut self, id: ShapeId, patch: &StylePatch) -> bool {
        match self.registry.get_mut(id) {
            Some(shape) => {
                shape.style = shape.style.patched(patch);
                true
            }
            None => false,
        }
    }
}
