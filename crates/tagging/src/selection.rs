//! Single-shape selection with highlight.

use canvas::Surface;
use node::{Shape, ShapeId, Style, StylePatch};
use serde::Serialize;

/// Transition taken by [`Selection::select`] or [`Selection::clear`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum SelectionChange {
    Selected { id: ShapeId },
    Switched { from: ShapeId, to: ShapeId },
    Cleared { id: ShapeId },
}

impl SelectionChange {
    /// The shape selected after the transition.
    pub fn current(&self) -> Option<ShapeId> {
        match *self {
            SelectionChange::Selected { id } => Some(id),
            SelectionChange::Switched { to, .. } => Some(to),
            SelectionChange::Cleared { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Selected {
    id: ShapeId,
    /// Style the shape had right before it was highlighted.
    base: Style,
}

/// At most one shape is highlighted at a time. Selecting the highlighted
/// shape again toggles it off.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    current: Option<Selected>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.current.map(|s| s.id)
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected() == Some(id)
    }

    pub fn select(
        &mut self,
        shape: &Shape,
        surface: &mut dyn Surface,
        highlight: &StylePatch,
    ) -> SelectionChange {
        match self.current.take() {
            Some(prev) if prev.id == shape.id => {
                restore(surface, prev);
                SelectionChange::Cleared { id: prev.id }
            }
            Some(prev) => {
                restore(surface, prev);
                self.highlight(shape, surface, highlight);
                SelectionChange::Switched {
                    from: prev.id,
                    to: shape.id,
                }
            }
            None => {
                self.highlight(shape, surface, highlight);
                SelectionChange::Selected { id: shape.id }
            }
        }
    }

    fn highlight(&mut self, shape: &Shape, surface: &mut dyn Surface, highlight: &StylePatch) {
        surface.set_style(shape.id, shape.style.patched(highlight));
        if let Some(extent) = shape.extent() {
            surface.fit_extent(extent);
        }
        self.current = Some(Selected {
            id: shape.id,
            base: shape.style,
        });
    }

    /// Deselect, restoring the base style.
    pub fn clear(&mut self, surface: &mut dyn Surface) -> Option<SelectionChange> {
        let prev = self.current.take()?;
        restore(surface, prev);
        Some(SelectionChange::Cleared { id: prev.id })
    }

    /// Drop the selection without touching the surface, for a shape that has
    /// already left it.
    pub fn forget(&mut self, id: ShapeId) -> bool {
        if self.is_selected(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Restyle the selected shape underneath its highlight.
    ///
    /// The patch lands on the base style, so it survives deselection, and
    /// the highlight is reapplied on top.
    pub fn patch_base(
        &mut self,
        id: ShapeId,
        patch: &StylePatch,
        surface: &mut dyn Surface,
        highlight: &StylePatch,
    ) -> bool {
        match self.current.as_mut() {
            Some(selected) if selected.id == id => {
                selected.base = selected.base.patched(patch);
                surface.set_style(id, selected.base.patched(highlight));
                true
            }
            _ => false,
        }
    }
}

fn restore(surface: &mut dyn Surface, selected: Selected) {
    if !surface.set_style(selected.id, selected.base) {
        log::debug!("deselected shape {} is no longer on the surface", selected.id);
    }
}
