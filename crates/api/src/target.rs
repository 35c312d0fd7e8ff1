//! Shape references for commands.
//!
//! Identities are issued by the surface at load time, so a script written
//! ahead of time cannot know them. It can instead name a shape by its
//! position within a group.

use crate::ApiError;
use node::ShapeId;
use serde::{Deserialize, Serialize};
use tagging::LayerGroups;

/// Which shape a command acts on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeRef {
    /// A shape by identity.
    Id(ShapeId),

    /// The shape at `index` in the group's current member order.
    Member { group: String, index: usize },
}

impl ShapeRef {
    pub fn resolve(&self, groups: &LayerGroups) -> Result<ShapeId, ApiError> {
        match self {
            ShapeRef::Id(id) => Ok(*id),
            ShapeRef::Member { group, index } => groups
                .members(group)?
                .get(*index)
                .copied()
                .ok_or_else(|| ApiError::NoSuchMember {
                    group: group.clone(),
                    index: *index,
                }),
        }
    }
}

impl From<ShapeId> for ShapeRef {
    fn from(id: ShapeId) -> Self {
        Self::Id(id)
    }
}
