// Launch Orchestrator
// Resolves the tool for a project, assembles arguments, spawns and records the launch

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::platform::{LaunchCommand, Platform};
use super::preferences::PreferenceList;
use crate::models::ide::{IdeCategory, IdeConfig};
use crate::models::launch::{LaunchOptions, LaunchOutcome, LaunchRequest};
use crate::models::project::Project;
use crate::repositories::{IdeRepository, ProjectRepository};
use crate::utils::database::Database;
use crate::utils::entity_lock::EntityLocks;
use crate::utils::error::{DevNestError, Result};
use crate::utils::path_resolver;

pub const PROJECT_PATH_PLACEHOLDER: &str = "{projectPath}";
pub const PROJECT_NAME_PLACEHOLDER: &str = "{projectName}";

/// Split a template into arguments using shell-word rules.
/// An empty template yields no arguments.
pub fn split_args_template(template: &str) -> Result<Vec<String>> {
    let trimmed = template.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    shlex::split(trimmed).ok_or_else(|| {
        DevNestError::InvalidInput(format!("Malformed argument template: {}", template))
    })
}

/// Expand placeholders token by token.
///
/// Splitting happens before substitution so paths containing spaces or
/// backslashes stay a single argument. A template without placeholders is
/// used as-is; the project path is never appended implicitly.
pub fn expand_args(template: &str, project_path: &str, project_name: &str) -> Result<Vec<String>> {
    Ok(split_args_template(template)?
        .into_iter()
        .map(|arg| {
            arg.replace(PROJECT_PATH_PLACEHOLDER, project_path)
                .replace(PROJECT_NAME_PLACEHOLDER, project_name)
        })
        .collect())
}

/// Pick the IDE for a launch.
///
/// Explicit id (must exist), else the first stored preference still in the
/// catalog, else the lowest priority value.
pub fn resolve_ide(project: &Project, ide_id: Option<&str>, catalog: &[IdeConfig]) -> Result<IdeConfig> {
    if let Some(requested) = ide_id {
        return catalog
            .iter()
            .find(|ide| ide.id == requested)
            .cloned()
            .ok_or_else(|| DevNestError::ide_not_found(requested));
    }

    let preferred = project
        .metadata
        .ide_preferences
        .iter()
        .find_map(|id| catalog.iter().find(|ide| &ide.id == id));
    if let Some(ide) = preferred {
        return Ok(ide.clone());
    }

    catalog
        .iter()
        .min_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)))
        .cloned()
        .ok_or(DevNestError::NoIdeConfigured)
}

/// How a resolved tool is started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnPlan {
    pub command: LaunchCommand,
    pub wait: bool,
}

/// Map the tool category to its spawn strategy
pub fn plan_spawn(
    platform: &dyn Platform,
    ide: &IdeConfig,
    program: &Path,
    args: &[String],
    cwd: &Path,
    options: LaunchOptions,
) -> SpawnPlan {
    let direct = || {
        LaunchCommand::new(program)
            .args(args.iter().cloned())
            .current_dir(cwd)
    };
    match ide.category {
        IdeCategory::Gui | IdeCategory::Browser => SpawnPlan {
            command: direct(),
            wait: false,
        },
        IdeCategory::Cli | IdeCategory::Terminal if options.wait => SpawnPlan {
            command: direct(),
            wait: true,
        },
        IdeCategory::Cli | IdeCategory::Terminal => SpawnPlan {
            command: platform.console_command(ide.category, program, args, cwd),
            wait: false,
        },
    }
}

fn build_command(command: &LaunchCommand) -> Command {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args);
    if let Some(cwd) = &command.cwd {
        cmd.current_dir(cwd);
    }
    cmd
}

/// Start a process without waiting; exit status is collected in the background
pub async fn spawn_detached(command: &LaunchCommand) -> Result<()> {
    let mut cmd = build_command(command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    #[cfg(unix)]
    cmd.process_group(0);
    #[cfg(windows)]
    {
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }

    let mut child = cmd.spawn().map_err(|e| {
        DevNestError::launch_failed(command.program.to_string_lossy(), e.to_string())
    })?;

    let program = command.program.display().to_string();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => log::debug!("[Launcher] {} exited with {}", program, status),
            Err(e) => log::warn!("[Launcher] Failed to reap {}: {}", program, e),
        }
    });
    Ok(())
}

/// Run a process attached to the caller's console and wait for it
pub async fn run_to_completion(command: &LaunchCommand) -> Result<()> {
    let status = build_command(command)
        .status()
        .await
        .map_err(|e| {
            DevNestError::launch_failed(command.program.to_string_lossy(), e.to_string())
        })?;
    if !status.success() {
        return Err(DevNestError::launch_failed(
            command.program.to_string_lossy(),
            format!("exited with {}", status),
        ));
    }
    Ok(())
}

/// Launch a project.
///
/// State is only written after a successful spawn (or a clean exit when
/// waiting). The write holds the project's lock and re-reads the row so
/// concurrent scans and stats runs are not clobbered.
pub async fn launch(
    db: &Database,
    platform: &dyn Platform,
    locks: &EntityLocks,
    request: LaunchRequest,
) -> Result<LaunchOutcome> {
    let project = ProjectRepository::new(db.clone())
        .get(&request.project_id)?
        .ok_or_else(|| DevNestError::project_not_found(&request.project_id))?;
    let catalog = IdeRepository::new(db.clone()).list()?;
    let ide = resolve_ide(&project, request.ide_id.as_deref(), &catalog)?;

    let args = expand_args(&ide.args_template, &project.path, &project.name)?;
    let program = path_resolver::resolve_executable(&ide.executable)?;
    let plan = plan_spawn(
        platform,
        &ide,
        &program,
        &args,
        Path::new(&project.path),
        request.options(),
    );

    log::info!(
        "[Launcher] Launching {} with {} ({:?})",
        project.name,
        ide.name,
        ide.category
    );
    if plan.wait {
        run_to_completion(&plan.command).await?;
    } else {
        spawn_detached(&plan.command).await?;
    }

    let _guard = locks.acquire(&project.id).await;
    let launched_at = chrono::Utc::now().to_rfc3339();
    let known_ids: Vec<&str> = catalog.iter().map(|i| i.id.as_str()).collect();
    db.with_transaction(|conn| {
        let mut current = ProjectRepository::get_in(conn, &project.id)?
            .ok_or_else(|| DevNestError::project_not_found(&project.id))?;
        current.last_opened = Some(launched_at.clone());
        if let Some(preferences) = &request.preferences {
            let mut list = PreferenceList::from_ranked(
                preferences
                    .iter()
                    .filter(|id| known_ids.contains(&id.as_str()))
                    .cloned(),
            );
            list.promote(&ide.id);
            current.metadata.ide_preferences = list.into_vec();
        }
        ProjectRepository::save_in(conn, &current)
    })?;

    Ok(LaunchOutcome {
        project_id: project.id,
        ide_id: ide.id,
        args,
        launched_at,
    })
}
