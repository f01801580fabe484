// Launch commands
// Open a project in a cataloged tool

use super::AppState;
use crate::models::{LaunchOutcome, LaunchRequest};
use crate::services::launcher;
use crate::utils::error::Result;

/// Launch with an explicit tool, or let preferences and priority decide
pub async fn launch_project(
    state: &AppState,
    project_id: &str,
    ide_id: Option<String>,
) -> Result<LaunchOutcome> {
    let mut request = LaunchRequest::new(project_id);
    request.ide_id = ide_id;
    launch(state, request).await
}

/// Full-control launch: explicit preference set and blocking console tools
pub async fn launch(state: &AppState, request: LaunchRequest) -> Result<LaunchOutcome> {
    launcher::launch(
        &state.db,
        state.platform.as_ref(),
        &state.locks,
        request,
    )
    .await
}
