use node::{Shape, ShapeId};

/// Shapes currently attached to a surface, in z-order (back to front).
///
/// The registry is the source of truth for identity: an id resolves here
/// exactly as long as its shape is attached.
#[derive(Clone, Debug, Default)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a shape on top of the stack.
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    /// Detach a shape, returning it if it was attached.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let pos = self.shapes.iter().position(|s| s.id == id)?;
        Some(self.shapes.remove(pos))
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
