//! Commands: every event that changes workspace state.
//!
//! Commands describe what happened in the UI, not how the workspace
//! reacts to it. The executor routes them to the workspace.

use crate::ShapeRef;
use interchange::{Feature, FeatureCollection};
use node::ShapeId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tagging::{Bucket, ClassificationType};

/// A command that modifies workspace state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Layers ===
    /// Load a base layer into a new group and fit the view to it.
    LoadBase {
        group: String,
        collection: FeatureCollection,
    },

    /// Load a base layer from a GeoJSON file.
    LoadBaseFile { group: String, path: PathBuf },

    /// Detach every shape of a group and delete it.
    Teardown { group: String },

    // === Selection ===
    /// A shape was clicked.
    Click { shape: ShapeRef },

    // === Editing ===
    /// Mount the editor over a shape.
    EnableEdit { shape: ShapeRef, group: String },

    /// Cancel editing.
    DisableEdit,

    /// The editor committed its changes.
    Commit { operations: Vec<EditCommand> },

    // === View ===
    /// The map zoom level changed.
    Zoom { level: f64 },

    // === Classification ===
    /// Open a classification of a group against a vocabulary.
    BeginClassification {
        classification: ClassificationType,
        group: String,
    },

    /// Assign a vocabulary option to a bucket.
    Assign { bucket: Bucket, option_id: String },

    /// Report the classified features so far.
    Export,

    /// Close the classification and report its features.
    Finish,

    // === Batch ===
    /// Run commands in order, stopping at the first failure.
    Batch { commands: Vec<Command> },
}

/// One operation committed by the editor, with GeoJSON features.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EditCommand {
    Create {
        group: String,
        features: Vec<Feature>,
    },
    Update {
        group: String,
        shape: ShapeRef,
        features: Vec<Feature>,
    },
    Remove {
        group: String,
        shape: ShapeRef,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    Success {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<ShapeId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<ShapeId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<ShapeId>,
        /// Selected shape after the command, when it changed the selection.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selected: Option<ShapeId>,
    },
    Exported {
        collection: FeatureCollection,
    },
    Error {
        message: String,
    },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
            selected: None,
        }
    }

    pub fn created(ids: Vec<ShapeId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
            selected: None,
        }
    }

    pub fn modified(ids: Vec<ShapeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
            selected: None,
        }
    }

    pub fn deleted(ids: Vec<ShapeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
            selected: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_serialize_with_type_field() {
        let cmd = Command::Assign {
            bucket: Bucket::VeryLow,
            option_id: "opt-3".into(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "assign");
        assert_eq!(json["bucket"], "very-low");
    }

    #[test]
    fn commit_parses_geojson_features() {
        let cmd: Command = serde_json::from_value(json!({
            "type": "commit",
            "operations": [
                {
                    "operation": "create",
                    "group": "lotes",
                    "features": [{
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [1.0, 2.0] },
                        "properties": { "Class": 2 }
                    }]
                },
                { "operation": "remove", "group": "lotes", "shape": { "group": "lotes", "index": 0 } }
            ]
        }))
        .unwrap();

        let Command::Commit { operations } = cmd else {
            panic!("expected commit");
        };
        assert_eq!(operations.len(), 2);
        assert!(matches!(&operations[0], EditCommand::Create { features, .. } if features.len() == 1));
        assert!(matches!(
            &operations[1],
            EditCommand::Remove { shape: ShapeRef::Member { index: 0, .. }, .. }
        ));
    }

    #[test]
    fn unit_commands_need_only_type() {
        let cmd: Command = serde_json::from_str(r#"{ "type": "disable_edit" }"#).unwrap();
        assert!(matches!(cmd, Command::DisableEdit));
    }

    #[test]
    fn success_omits_empty_fields() {
        let json = serde_json::to_value(CommandResult::success()).unwrap();
        assert_eq!(json, json!({ "status": "success" }));
    }

    #[test]
    fn error_result_carries_message() {
        let json = serde_json::to_value(CommandResult::error("boom")).unwrap();
        assert_eq!(json, json!({ "status": "error", "message": "boom" }));
    }
}
