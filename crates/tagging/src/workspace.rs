use crate::{
    Bucket, ClassificationOutcome, ClassificationSession, ClassificationType, CommitOutcome,
    EditOperation, EditTool, LayerGroups, Selection, SelectionChange, WorkspaceConfig,
    WorkspaceError, WorkspaceEvent,
};
use canvas::{LabelVisibility, Surface};
use interchange::FeatureCollection;
use node::{Extent, GeometryRecord, Shape, ShapeId};

/// Owns the surface and every piece of tagging state drawn on it.
///
/// Components never hold a reference into each other; each method reads the
/// shapes it needs from the surface as snapshots, runs the transition and
/// queues the resulting [`WorkspaceEvent`]s.
pub struct Workspace<S: Surface> {
    surface: S,
    config: WorkspaceConfig,
    groups: LayerGroups,
    selection: Selection,
    edit_tool: EditTool,
    session: Option<ClassificationSession>,
    labels: LabelVisibility,
    events: Vec<WorkspaceEvent>,
}

impl<S: Surface> Workspace<S> {
    pub fn new(surface: S, config: WorkspaceConfig) -> Self {
        let labels = LabelVisibility::new(config.label_zoom_threshold);
        Self {
            surface,
            config,
            groups: LayerGroups::new(),
            selection: Selection::new(),
            edit_tool: EditTool::new(),
            session: None,
            labels,
            events: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn groups(&self) -> &LayerGroups {
        &self.groups
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn edit_tool(&self) -> &EditTool {
        &self.edit_tool
    }

    pub fn session(&self) -> Option<&ClassificationSession> {
        self.session.as_ref()
    }

    /// Snapshot of a rendered shape.
    pub fn shape(&self, id: ShapeId) -> Result<Shape, WorkspaceError> {
        self.surface.shape(id).ok_or(WorkspaceError::ShapeNotFound(id))
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register `group`, attach one shape per record and fit the view to
    /// the whole batch.
    pub fn load_base_geometry(
        &mut self,
        group: &str,
        records: Vec<GeometryRecord>,
    ) -> Result<Vec<ShapeId>, WorkspaceError> {
        let extent = Extent::union_all(records.iter().filter_map(GeometryRecord::extent));

        self.groups.register(group)?;
        let style = self.config.base_style;
        let created = self.groups.create(group, records, &style, &mut self.surface)?;
        self.bind_labels(group, &created);

        match extent {
            Some(extent) => self.surface.fit_extent(extent),
            None => log::warn!("group {:?} has no geometry to fit", group),
        }

        log::info!("loaded {} shape(s) into {:?}", created.len(), group);
        self.events.push(WorkspaceEvent::GroupLoaded {
            group: group.to_string(),
            shapes: created.clone(),
        });
        Ok(created)
    }

    pub fn on_shape_click(&mut self, id: ShapeId) -> Result<SelectionChange, WorkspaceError> {
        let shape = self.shape(id)?;
        let change = self
            .selection
            .select(&shape, &mut self.surface, &self.config.highlight);
        log::debug!("selection: {:?}", change);
        self.events.push(WorkspaceEvent::SelectionChanged { change });
        Ok(change)
    }

    /// Mount the editor over a shape. Commits will be routed to `group`.
    ///
    /// The shape must be a member of `group`.
    pub fn enable_edit_tool(&mut self, id: ShapeId, group: &str) -> Result<(), WorkspaceError> {
        if self.edit_tool.is_active() {
            return Err(WorkspaceError::DuplicateActivation);
        }
        if !self.groups.contains_group(group) {
            return Err(WorkspaceError::GroupNotFound(group.to_string()));
        }
        let shape = self.shape(id)?;
        if self.groups.group_of(id) != Some(group) {
            return Err(WorkspaceError::NotInGroup {
                id,
                group: group.to_string(),
            });
        }
        self.edit_tool.enable(shape, group)?;
        self.push_edit_tool_state();
        Ok(())
    }

    /// Cancel editing. Always safe to call.
    pub fn disable_edit_tool(&mut self) -> bool {
        let disabled = self.edit_tool.disable();
        if disabled {
            self.push_edit_tool_state();
        }
        disabled
    }

    /// Apply committed edits in order, then clear the selection and return
    /// the edit tool to inactive.
    ///
    /// A failing operation stops the commit. Operations before it stay
    /// applied and the selection and tool are reset either way.
    pub fn on_edit_commit(
        &mut self,
        operations: Vec<EditOperation>,
    ) -> Result<CommitOutcome, WorkspaceError> {
        if !self.edit_tool.is_active() {
            log::debug!("commit of {} operation(s) without an edit target", operations.len());
        }

        let mut outcome = CommitOutcome::default();
        let result = operations
            .into_iter()
            .try_for_each(|op| self.apply_edit(op, &mut outcome));

        self.prune_aggregate();
        if let Some(change) = self.selection.clear(&mut self.surface) {
            self.events.push(WorkspaceEvent::SelectionChanged { change });
        }
        self.disable_edit_tool();

        result.map(|()| outcome)
    }

    fn apply_edit(
        &mut self,
        operation: EditOperation,
        outcome: &mut CommitOutcome,
    ) -> Result<(), WorkspaceError> {
        let style = self.config.base_style;
        match operation {
            EditOperation::Create { group, features } => {
                let created = self.groups.create(&group, features, &style, &mut self.surface)?;
                self.attached(&group, &created);
                outcome.created.extend(created);
            }
            EditOperation::Update { group, id, features } => {
                let update = self
                    .groups
                    .update(&group, id, features, &style, &mut self.surface)?;
                if let Some(removed) = update.removed {
                    self.detached(&group, removed);
                    outcome.removed.push(removed);
                }
                self.attached(&group, &update.created);
                outcome.created.extend(update.created);
            }
            EditOperation::Remove { group, id } => {
                if self.groups.remove(&group, id, &mut self.surface)? {
                    self.detached(&group, id);
                    outcome.removed.push(id);
                }
            }
        }
        Ok(())
    }

    fn attached(&mut self, group: &str, ids: &[ShapeId]) {
        self.bind_labels(group, ids);
        self.events.extend(ids.iter().map(|&id| WorkspaceEvent::ShapeAdded {
            group: group.to_string(),
            id,
        }));
    }

    fn detached(&mut self, group: &str, id: ShapeId) {
        self.selection.forget(id);
        self.events.push(WorkspaceEvent::ShapeRemoved {
            group: group.to_string(),
            id,
        });
    }

    /// Detach every shape of a group and delete it.
    pub fn teardown_group(&mut self, group: &str) -> Result<Vec<ShapeId>, WorkspaceError> {
        let detached = self.groups.teardown(group, &mut self.surface)?;

        if let Some(id) = self.selection.selected() {
            if detached.contains(&id) {
                self.selection.forget(id);
                self.events.push(WorkspaceEvent::SelectionChanged {
                    change: SelectionChange::Cleared { id },
                });
            }
        }
        let editing_here = self.edit_tool.group() == Some(group);
        if editing_here {
            self.disable_edit_tool();
        }
        self.prune_aggregate();

        log::info!("tore down {:?} ({} shape(s))", group, detached.len());
        self.events.push(WorkspaceEvent::GroupTornDown {
            group: group.to_string(),
        });
        Ok(detached)
    }

    /// Track a zoom change and show or hide labels when it crosses the
    /// threshold.
    pub fn on_zoom(&mut self, zoom: f64) -> Option<bool> {
        let visible = self.labels.on_zoom(zoom)?;
        self.surface.set_labels_visible(visible);
        self.events.push(WorkspaceEvent::LabelsToggled { visible });
        Some(visible)
    }

    /// Open a classification of `group` against a vocabulary.
    pub fn begin_classification(
        &mut self,
        classification: ClassificationType,
        group: &str,
    ) -> Result<(), WorkspaceError> {
        if self.session.is_some() {
            return Err(WorkspaceError::ClassificationInProgress);
        }
        if !self.groups.contains_group(group) {
            return Err(WorkspaceError::GroupNotFound(group.to_string()));
        }
        log::info!(
            "classifying {:?} as {:?} ({} option(s))",
            group,
            classification.name,
            classification.options.len()
        );
        self.session = Some(ClassificationSession::new(
            classification,
            group,
            &self.config.buckets,
        ));
        Ok(())
    }

    /// Assign an option to a bucket, classifying every shape of the session
    /// group whose class attribute matches it.
    pub fn assign(
        &mut self,
        bucket: Bucket,
        option_id: &str,
    ) -> Result<ClassificationOutcome, WorkspaceError> {
        let session = self
            .session
            .as_mut()
            .ok_or(WorkspaceError::NoClassificationSession)?;
        let option = session.option(option_id)?;
        let row = session
            .row(bucket)
            .cloned()
            .ok_or(WorkspaceError::UnknownBucket(bucket))?;

        let members = self.groups.members(session.group())?;
        let affected: Vec<Shape> = members
            .iter()
            .filter_map(|&id| self.surface.shape(id))
            .filter(|shape| row.matches(shape, &self.config.class_property))
            .collect();

        let restyle = self.config.classified.with_fill_color(option.color);
        let outcome = session.apply_classification(
            bucket,
            option,
            &affected,
            &mut self.surface,
            &self.config.classified,
        )?;

        if let Some(id) = self.selection.selected() {
            if affected.iter().any(|shape| shape.id == id) {
                self.selection
                    .patch_base(id, &restyle, &mut self.surface, &self.config.highlight);
            }
        }
        if !outcome.is_empty() {
            self.events.push(WorkspaceEvent::AggregateChanged {
                features: session.aggregate().len(),
            });
        }
        Ok(outcome)
    }

    /// The classified features so far. Empty when no session is open.
    pub fn export_aggregate(&self) -> FeatureCollection {
        self.session
            .as_ref()
            .map(|s| s.aggregate().to_collection())
            .unwrap_or_default()
    }

    /// Close the session, returning its features, and tear down the group
    /// it classified.
    pub fn finish_classification(&mut self) -> Result<FeatureCollection, WorkspaceError> {
        let session = self
            .session
            .take()
            .ok_or(WorkspaceError::NoClassificationSession)?;
        let collection = session.aggregate().to_collection();

        if self.groups.contains_group(session.group()) {
            self.teardown_group(session.group())?;
        } else {
            log::warn!(
                "classified group {:?} was already torn down",
                session.group()
            );
        }
        log::info!("classification finished with {} feature(s)", collection.len());
        Ok(collection)
    }

    fn bind_labels(&mut self, group: &str, ids: &[ShapeId]) {
        let Some(labels) = self.config.labels.as_ref().filter(|l| l.group == group) else {
            return;
        };
        for &id in ids {
            let Some(shape) = self.surface.shape(id) else {
                continue;
            };
            let text = labels
                .fields
                .iter()
                .filter_map(|field| shape.property_text(field))
                .collect::<Vec<_>>()
                .join(labels.separator.as_str());
            if !text.is_empty() {
                self.surface.set_label(id, Some(text));
            }
        }
    }

    fn prune_aggregate(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let surface = &self.surface;
        let dropped = session
            .aggregate_mut()
            .retain_rendered(|id| surface.contains(id));
        if dropped > 0 {
            log::debug!("dropped {} classified feature(s) no longer rendered", dropped);
            self.events.push(WorkspaceEvent::AggregateChanged {
                features: session.aggregate().len(),
            });
        }
    }

    fn push_edit_tool_state(&mut self) {
        self.events.push(WorkspaceEvent::EditToolChanged {
            state: self.edit_tool.state().clone(),
        });
    }
}
