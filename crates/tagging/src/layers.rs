//! Named groups of shapes attached to the surface.

use crate::WorkspaceError;
use canvas::Surface;
use node::{GeometryRecord, ShapeId, Style};
use serde::{Deserialize, Serialize};

/// A named, ordered set of shapes on the surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorLayerGroup {
    pub name: String,
    pub members: Vec<ShapeId>,
}

impl VectorLayerGroup {
    fn new(name: String) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.members.contains(&id)
    }
}

/// Result of replacing a shape with a fresh batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The replaced shape, when it was still attached.
    pub removed: Option<ShapeId>,
    pub created: Vec<ShapeId>,
}

/// Registry of vector layer groups. Group names are unique.
#[derive(Clone, Debug, Default)]
pub struct LayerGroups {
    groups: Vec<VectorLayerGroup>,
}

impl LayerGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty group.
    pub fn register(&mut self, name: impl Into<String>) -> Result<(), WorkspaceError> {
        let name = name.into();
        if self.contains_group(&name) {
            return Err(WorkspaceError::DuplicateGroup(name));
        }
        log::debug!("registered group {:?}", name);
        self.groups.push(VectorLayerGroup::new(name));
        Ok(())
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    pub fn group(&self, name: &str) -> Option<&VectorLayerGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn group_mut(&mut self, name: &str) -> Result<&mut VectorLayerGroup, WorkspaceError> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| WorkspaceError::GroupNotFound(name.to_string()))
    }

    pub fn members(&self, name: &str) -> Result<&[ShapeId], WorkspaceError> {
        self.group(name)
            .map(|g| g.members.as_slice())
            .ok_or_else(|| WorkspaceError::GroupNotFound(name.to_string()))
    }

    /// Name of the group a shape belongs to.
    pub fn group_of(&self, id: ShapeId) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.contains(id))
            .map(|g| g.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VectorLayerGroup> {
        self.groups.iter()
    }

    /// Attach one shape per record to the group, in batch order.
    pub fn create(
        &mut self,
        name: &str,
        batch: Vec<GeometryRecord>,
        style: &Style,
        surface: &mut dyn Surface,
    ) -> Result<Vec<ShapeId>, WorkspaceError> {
        let group = self.group_mut(name)?;
        let created: Vec<ShapeId> = batch
            .into_iter()
            .map(|record| surface.add_shape(record, *style))
            .collect();
        group.members.extend(created.iter().copied());
        log::debug!("group {:?}: created {} shape(s)", name, created.len());
        Ok(created)
    }

    /// Replace a shape with shapes built from `batch`.
    ///
    /// The replacements get new identities. A stale `id` is tolerated: the
    /// batch is still added.
    pub fn update(
        &mut self,
        name: &str,
        id: ShapeId,
        batch: Vec<GeometryRecord>,
        style: &Style,
        surface: &mut dyn Surface,
    ) -> Result<UpdateOutcome, WorkspaceError> {
        let removed = self.remove(name, id, surface)?.then_some(id);
        let created = self.create(name, batch, style, surface)?;
        Ok(UpdateOutcome { removed, created })
    }

    /// Detach a shape from the group. Returns `false` if it was not a member.
    pub fn remove(
        &mut self,
        name: &str,
        id: ShapeId,
        surface: &mut dyn Surface,
    ) -> Result<bool, WorkspaceError> {
        let group = self.group_mut(name)?;
        let Some(pos) = group.members.iter().position(|m| *m == id) else {
            log::warn!("group {:?}: shape {} already gone, ignoring remove", name, id);
            return Ok(false);
        };
        group.members.remove(pos);
        if !surface.remove_shape(id) {
            log::warn!("group {:?}: shape {} was not on the surface", name, id);
        }
        Ok(true)
    }

    /// Detach every member and delete the group. The name becomes free.
    pub fn teardown(
        &mut self,
        name: &str,
        surface: &mut dyn Surface,
    ) -> Result<Vec<ShapeId>, WorkspaceError> {
        let pos = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| WorkspaceError::GroupNotFound(name.to_string()))?;
        let group = self.groups.remove(pos);
        for id in &group.members {
            surface.remove_shape(*id);
        }
        log::debug!("group {:?}: torn down, {} shape(s) detached", name, group.members.len());
        Ok(group.members)
    }
}
