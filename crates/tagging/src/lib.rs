//! Feature tagging and vector-layer synchronization.
//!
//! A [`Workspace`] owns a rendering [`canvas::Surface`], the registry of named
//! vector layer groups drawn on it, a single-selection highlight, the edit
//! tool gate and, while one is open, a classification session whose
//! aggregate is the deduplicated set of classified features.
//!
//! All mutation goes through `Workspace` methods. Each call runs to
//! completion and observes the fully settled result of the previous one.

mod aggregate;
mod classification;
mod config;
mod edit;
mod edit_tool;
mod error;
mod event;
mod layers;
mod selection;
mod workspace;

pub use aggregate::{Aggregate, AggregateFeature, FeatureProperties, MergeOutcome};
pub use classification::{
    Bucket, ClassificationOutcome, ClassificationRow, ClassificationSession, ClassificationType,
    VocabularyOption,
};
pub use config::{BucketRule, LabelConfig, WorkspaceConfig};
pub use edit::{CommitOutcome, EditOperation};
pub use edit_tool::{EditTool, EditToolState};
pub use error::WorkspaceError;
pub use event::WorkspaceEvent;
pub use layers::{LayerGroups, UpdateOutcome, VectorLayerGroup};
pub use selection::{Selection, SelectionChange};
pub use workspace::Workspace;
