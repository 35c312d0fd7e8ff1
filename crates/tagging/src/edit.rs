use node::{GeometryRecord, ShapeId};
use serde::{Deserialize, Serialize};

/// One change committed by the editing surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EditOperation {
    Create {
        group: String,
        features: Vec<GeometryRecord>,
    },
    /// Replace a shape. The new shapes get fresh identities.
    Update {
        group: String,
        id: ShapeId,
        features: Vec<GeometryRecord>,
    },
    Remove {
        group: String,
        id: ShapeId,
    },
}

/// Shapes attached and detached by a commit, in operation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub created: Vec<ShapeId>,
    pub removed: Vec<ShapeId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operations_are_tagged_by_kind() {
        let id = ShapeId::from_u128(7);
        let op: EditOperation = serde_json::from_value(json!({
            "operation": "update",
            "group": "lotes",
            "id": id,
            "features": [{ "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } }]
        }))
        .unwrap();

        match &op {
            EditOperation::Update { group, id: got, features } => {
                assert_eq!(group, "lotes");
                assert_eq!(*got, id);
                assert_eq!(features.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
