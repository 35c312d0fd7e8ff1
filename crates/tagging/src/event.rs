use crate::{EditToolState, SelectionChange};
use node::ShapeId;
use serde::Serialize;

/// Notifications queued by the workspace, drained with
/// [`Workspace::drain_events`](crate::Workspace::drain_events).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    GroupLoaded { group: String, shapes: Vec<ShapeId> },
    ShapeAdded { group: String, id: ShapeId },
    ShapeRemoved { group: String, id: ShapeId },
    GroupTornDown { group: String },
    SelectionChanged { change: SelectionChange },
    EditToolChanged { state: EditToolState },
    /// The aggregate now holds `features` entries.
    AggregateChanged { features: usize },
    LabelsToggled { visible: bool },
}
