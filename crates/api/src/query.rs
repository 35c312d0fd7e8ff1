//! Queries: read-only access to workspace state.

use crate::ShapeRef;
use canvas::Viewport;
use interchange::FeatureCollection;
use node::{Shape, ShapeId};
use serde::{Deserialize, Serialize};
use tagging::{ClassificationRow, EditToolState};

/// A query for workspace state (read-only).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Get the selected shape.
    GetSelection,

    /// List the vector layer groups.
    GetGroups,

    /// Get the members of one group.
    GetMembers { group: String },

    /// Get a shape snapshot.
    GetShape { shape: ShapeRef },

    /// Get the edit tool state.
    GetEditTool,

    /// Get the open classification, if any.
    GetClassification,

    /// Get the classified features so far.
    GetAggregate,

    /// Get the current viewport.
    GetViewport,
}

/// Response to a query.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Selection { id: Option<ShapeId> },

    Groups { groups: Vec<GroupInfo> },

    Members { group: String, ids: Vec<ShapeId> },

    Shape { shape: Option<Shape> },

    EditTool { state: EditToolState },

    Classification { session: Option<ClassificationInfo> },

    Aggregate { collection: FeatureCollection },

    Viewport { viewport: Option<Viewport> },

    Error { message: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    pub shapes: usize,
}

/// Summary of an open classification session.
#[derive(Clone, Debug, Serialize)]
pub struct ClassificationInfo {
    pub classification_id: String,
    pub classification_name: String,
    pub group: String,
    pub rows: Vec<ClassificationRow>,
    pub features: usize,
}
