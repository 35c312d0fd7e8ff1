//! Workspace configuration.
//!
//! Every field has a default, so a config document only needs the values it
//! overrides.

use crate::{Bucket, WorkspaceError};
use node::{Color, Fill, Stroke, Style, StylePatch};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Pairs a bucket with the class attribute value it matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BucketRule {
    pub bucket: Bucket,
    pub match_class: i64,
}

/// Which group gets permanent labels and which properties build them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub group: String,
    pub fields: Vec<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    "\n".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Style of shapes as they are loaded or created.
    pub base_style: Style,
    /// Applied on top of a shape's style while it is selected.
    pub highlight: StylePatch,
    /// Applied on classification. The fill colour comes from the chosen option.
    pub classified: StylePatch,
    /// Source property holding the numeric class attribute.
    pub class_property: String,
    pub buckets: Vec<BucketRule>,
    /// Labels are visible at or above this zoom level.
    pub label_zoom_threshold: f64,
    pub labels: Option<LabelConfig>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        let crimson = Color::rgb(0xbd, 0x00, 0x26);
        Self {
            base_style: Style {
                fill: Fill {
                    color: crimson,
                    opacity: 0.0,
                },
                stroke: Stroke {
                    color: crimson,
                    width: 1.0,
                    opacity: 1.0,
                },
            },
            highlight: StylePatch {
                fill_opacity: Some(0.2),
                stroke_color: Some(Color::BLACK),
                stroke_width: Some(6.0),
                stroke_opacity: Some(1.0),
                ..Default::default()
            },
            classified: StylePatch {
                fill_opacity: Some(1.0),
                stroke_color: Some(Color::BLACK),
                stroke_width: Some(1.0),
                ..Default::default()
            },
            class_property: "Class".to_string(),
            buckets: Bucket::iter()
                .map(|bucket| BucketRule {
                    bucket,
                    match_class: bucket.default_match_class(),
                })
                .collect(),
            label_zoom_threshold: 14.0,
            labels: Some(LabelConfig {
                group: "lotes".to_string(),
                fields: vec!["Field".to_string(), "Crop".to_string()],
                separator: default_separator(),
            }),
        }
    }
}

impl WorkspaceConfig {
    pub fn from_json(input: &str) -> Result<Self, WorkspaceError> {
        Ok(serde_json::from_str(input)?)
    }
}
