//! Edit tool activation.

use crate::WorkspaceError;
use node::Shape;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditToolState {
    #[default]
    Inactive,
    /// Editing `target`, with commits routed to `group`.
    Active { target: Shape, group: String },
}

/// Gate for the single editing surface a workspace may mount.
#[derive(Clone, Debug, Default)]
pub struct EditTool {
    state: EditToolState,
}

impl EditTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditToolState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EditToolState::Active { .. })
    }

    pub fn target(&self) -> Option<&Shape> {
        match &self.state {
            EditToolState::Active { target, .. } => Some(target),
            EditToolState::Inactive => None,
        }
    }

    pub fn group(&self) -> Option<&str> {
        match &self.state {
            EditToolState::Active { group, .. } => Some(group),
            EditToolState::Inactive => None,
        }
    }

    /// Mount the editor over `target`. A second activation is rejected and
    /// leaves the current one in place.
    pub fn enable(&mut self, target: Shape, group: impl Into<String>) -> Result<(), WorkspaceError> {
        if self.is_active() {
            return Err(WorkspaceError::DuplicateActivation);
        }
        let group = group.into();
        log::debug!("edit tool enabled on {} in {:?}", target.id, group);
        self.state = EditToolState::Active { target, group };
        Ok(())
    }

    /// Unmount the editor. Safe to call when inactive; returns whether an
    /// activation was cancelled.
    pub fn disable(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            EditToolState::Active { target, .. } => {
                log::debug!("edit tool disabled on {}", target.id);
                true
            }
            EditToolState::Inactive => false,
        }
    }
}
