use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a shape on a surface.
///
/// Issued by the surface when a shape is attached and valid until the shape
/// is detached. Re-adding the same geometry yields a fresh id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(uuid::Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a full UUID string.
    pub fn parse(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the full UUID string.
    pub fn to_uuid_string(&self) -> String {
        self.0.to_string()
    }

    /// Create a ShapeId from a u128 (useful for tests).
    pub fn from_u128(value: u128) -> Self {
        Self(uuid::Uuid::from_u128(value))
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(ShapeId::new(), ShapeId::new());
    }

    #[test]
    fn parse_accepts_full_uuid_only() {
        let id = ShapeId::from_u128(42);
        assert_eq!(ShapeId::parse(&id.to_uuid_string()), Some(id));
        assert_eq!(ShapeId::parse(&id.to_string()), None);
    }

    #[test]
    fn serializes_as_plain_uuid_string() {
        let id = ShapeId::from_u128(7);
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!(id.to_uuid_string()));
    }
}
