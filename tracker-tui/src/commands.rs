//! Mutation commands.
//!
//! Each command mutates the store, persists the full collection, adjusts the
//! page and re-renders the view, in that order. Validation happens before
//! anything is touched, so a rejected command leaves every piece of state
//! as it was.

use uuid::Uuid;

use crate::error::{StoreError, ValidationError};
use crate::models::NewProject;
use crate::store::Store;
use crate::view::ViewState;

/// Result of a command that changed the collection
#[derive(Debug)]
pub struct CommandOutcome {
    /// Success message for the user
    pub notice: String,
    /// Set when the change is in memory but could not be written
    pub persist_error: Option<StoreError>,
}

impl CommandOutcome {
    fn after_persist(notice: &str, store: &mut Store) -> Self {
        let persist_error = store.persist().err();
        if let Some(ref error) = persist_error {
            tracing::error!(%error, "failed to persist projects");
        }
        Self {
            notice: notice.to_string(),
            persist_error,
        }
    }
}

/// Validate and append a new project, then show the last page
pub fn add_project(
    store: &mut Store,
    view: &mut ViewState,
    input: &NewProject,
) -> Result<CommandOutcome, ValidationError> {
    let project = input.build().inspect_err(|error| {
        tracing::info!(%error, name = %input.name, "project submission rejected");
    })?;

    tracing::info!(id = %project.id, name = %project.name, tasks = project.tasks.len(), "adding project");
    store.push(project);
    let outcome = CommandOutcome::after_persist("Project added successfully", store);

    view.pages.jump_to_last(store.len());
    view.render_all(store.projects());
    Ok(outcome)
}

/// Remove a project. Unknown ids are ignored and return `None`.
pub fn delete_project(store: &mut Store, view: &mut ViewState, id: Uuid) -> Option<CommandOutcome> {
    let Some(removed) = store.remove(id) else {
        tracing::debug!(%id, "delete ignored, project not found");
        return None;
    };

    tracing::info!(%id, name = %removed.name, "deleted project");
    let outcome = CommandOutcome::after_persist("Project deleted successfully", store);

    view.pages.clamp_after_delete(store.len());
    view.render_all(store.projects());
    Some(outcome)
}

/// Placeholder edit: reports the project and closes its popover. Nothing is
/// modified.
pub fn edit_project(store: &Store, view: &mut ViewState, id: Uuid) -> Option<String> {
    let Some(project) = store.get(id) else {
        tracing::debug!(%id, "edit ignored, project not found");
        return None;
    };
    if view.actions_open_for(id) {
        view.close_all_actions();
    }
    Some(format!("Edit project: {}", project.name))
}
