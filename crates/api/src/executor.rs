//! Command and query execution against a workspace.

use crate::{
    ApiError, ClassificationInfo, Command, CommandResult, EditCommand, GroupInfo, Query,
    QueryResult,
};
use canvas::Surface;
use interchange::{read_collection, Feature};
use node::GeometryRecord;
use tagging::{EditOperation, LayerGroups, SelectionChange, Workspace};

/// Execute a command against a workspace.
pub fn execute_command<S: Surface>(workspace: &mut Workspace<S>, command: Command) -> CommandResult {
    match execute_command_inner(workspace, command) {
        Ok(result) => result,
        Err(err) => {
            log::warn!("command failed: {}", err);
            CommandResult::error(err.to_string())
        }
    }
}

fn execute_command_inner<S: Surface>(
    workspace: &mut Workspace<S>,
    command: Command,
) -> Result<CommandResult, ApiError> {
    let result = match command {
        Command::LoadBase { group, collection } => {
            let ids = workspace.load_base_geometry(&group, collection.into_records())?;
            CommandResult::created(ids)
        }

        Command::LoadBaseFile { group, path } => {
            let collection = read_collection(&path)?;
            let ids = workspace.load_base_geometry(&group, collection.into_records())?;
            CommandResult::created(ids)
        }

        Command::Teardown { group } => CommandResult::deleted(workspace.teardown_group(&group)?),

        Command::Click { shape } => {
            let id = shape.resolve(workspace.groups())?;
            let change = workspace.on_shape_click(id)?;
            let modified = match change {
                SelectionChange::Selected { id } => vec![id],
                SelectionChange::Switched { from, to } => vec![from, to],
                SelectionChange::Cleared { id } => vec![id],
            };
            CommandResult::Success {
                created: vec![],
                modified,
                deleted: vec![],
                selected: change.current(),
            }
        }

        Command::EnableEdit { shape, group } => {
            let id = shape.resolve(workspace.groups())?;
            workspace.enable_edit_tool(id, &group)?;
            CommandResult::success()
        }

        Command::DisableEdit => {
            workspace.disable_edit_tool();
            CommandResult::success()
        }

        Command::Commit { operations } => {
            let groups = workspace.groups();
            let operations = operations
                .into_iter()
                .map(|op| to_operation(groups, op))
                .collect::<Result<Vec<_>, _>>()?;
            let outcome = workspace.on_edit_commit(operations)?;
            CommandResult::Success {
                created: outcome.created,
                modified: vec![],
                deleted: outcome.removed,
                selected: None,
            }
        }

        Command::Zoom { level } => {
            workspace.on_zoom(level);
            CommandResult::success()
        }

        Command::BeginClassification {
            classification,
            group,
        } => {
            workspace.begin_classification(classification, &group)?;
            CommandResult::success()
        }

        Command::Assign { bucket, option_id } => {
            let outcome = workspace.assign(bucket, &option_id)?;
            CommandResult::modified(outcome.affected().collect())
        }

        Command::Export => CommandResult::Exported {
            collection: workspace.export_aggregate(),
        },

        Command::Finish => CommandResult::Exported {
            collection: workspace.finish_classification()?,
        },

        Command::Batch { commands } => {
            let mut all_created = Vec::new();
            let mut all_modified = Vec::new();
            let mut all_deleted = Vec::new();
            let mut last_selected = None;
            let mut exported = None;

            for cmd in commands {
                match execute_command_inner(workspace, cmd) {
                    Ok(CommandResult::Success {
                        created,
                        modified,
                        deleted,
                        selected,
                    }) => {
                        all_created.extend(created);
                        all_modified.extend(modified);
                        all_deleted.extend(deleted);
                        last_selected = selected.or(last_selected);
                    }
                    Ok(CommandResult::Exported { collection }) => exported = Some(collection),
                    Ok(CommandResult::Error { message }) => {
                        return Ok(CommandResult::error(format!("Batch failed: {}", message)));
                    }
                    Err(err) => {
                        return Ok(CommandResult::error(format!("Batch failed: {}", err)));
                    }
                }
            }

            // A batch that exports reports the last exported collection.
            match exported {
                Some(collection) => CommandResult::Exported { collection },
                None => CommandResult::Success {
                    created: all_created,
                    modified: all_modified,
                    deleted: all_deleted,
                    selected: last_selected,
                },
            }
        }
    };
    Ok(result)
}

fn to_operation(groups: &LayerGroups, command: EditCommand) -> Result<EditOperation, ApiError> {
    Ok(match command {
        EditCommand::Create { group, features } => EditOperation::Create {
            group,
            features: to_records(features),
        },
        EditCommand::Update {
            group,
            shape,
            features,
        } => EditOperation::Update {
            id: shape.resolve(groups)?,
            group,
            features: to_records(features),
        },
        EditCommand::Remove { group, shape } => EditOperation::Remove {
            id: shape.resolve(groups)?,
            group,
        },
    })
}

fn to_records(features: Vec<Feature>) -> Vec<GeometryRecord> {
    features.into_iter().map(Feature::into_record).collect()
}

/// Execute a query against a workspace.
pub fn execute_query<S: Surface>(workspace: &Workspace<S>, query: Query) -> QueryResult {
    match query {
        Query::GetSelection => QueryResult::Selection {
            id: workspace.selection().selected(),
        },

        Query::GetGroups => QueryResult::Groups {
            groups: workspace
                .groups()
                .iter()
                .map(|g| GroupInfo {
                    name: g.name.clone(),
                    shapes: g.members.len(),
                })
                .collect(),
        },

        Query::GetMembers { group } => match workspace.groups().members(&group) {
            Ok(ids) => QueryResult::Members {
                ids: ids.to_vec(),
                group,
            },
            Err(err) => QueryResult::Error {
                message: err.to_string(),
            },
        },

        Query::GetShape { shape } => match shape.resolve(workspace.groups()) {
            Ok(id) => QueryResult::Shape {
                shape: workspace.surface().shape(id),
            },
            Err(err) => QueryResult::Error {
                message: err.to_string(),
            },
        },

        Query::GetEditTool => QueryResult::EditTool {
            state: workspace.edit_tool().state().clone(),
        },

        Query::GetClassification => QueryResult::Classification {
            session: workspace.session().map(|session| ClassificationInfo {
                classification_id: session.classification().id.clone(),
                classification_name: session.classification().name.clone(),
                group: session.group().to_string(),
                rows: session.rows().to_vec(),
                features: session.aggregate().len(),
            }),
        },

        Query::GetAggregate => QueryResult::Aggregate {
            collection: workspace.export_aggregate(),
        },

        Query::GetViewport => QueryResult::Viewport {
            viewport: workspace.surface().current_viewport(),
        },
    }
}
