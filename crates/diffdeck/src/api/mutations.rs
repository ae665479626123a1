use std::path::PathBuf;

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use diffdeck_git::ChangeArea;

use super::{ApiError, ApiJson, AppState};

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

fn ok() -> Json<SuccessBody> {
    Json(SuccessBody { success: true })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRequest {
    pub repo_path: PathBuf,
    pub file: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRequest {
    pub repo_path: PathBuf,
}

/// What `/undo` should do with a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoCommand {
    /// Move a staged change back to the working tree
    #[serde(alias = "staged")]
    Unstage,
    /// Throw away working-tree edits
    #[serde(alias = "working")]
    Discard,
}

impl UndoCommand {
    pub fn area(self) -> ChangeArea {
        match self {
            UndoCommand::Unstage => ChangeArea::Staged,
            UndoCommand::Discard => ChangeArea::Working,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoRequest {
    pub command: UndoCommand,
    pub repo_path: PathBuf,
    pub file: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub repo_path: PathBuf,
    #[serde(rename = "type")]
    pub commit_type: String,
    pub message: String,
}

fn require_file(file: &str) -> Result<(), ApiError> {
    if file.is_empty() {
        return Err(ApiError::bad_request("A file path is required"));
    }
    Ok(())
}

pub async fn stage(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FileRequest>,
) -> Result<Json<SuccessBody>, ApiError> {
    state.require_known_repo(&req.repo_path)?;
    require_file(&req.file)?;

    state.executor.stage_file(&req.repo_path, &req.file).await?;
    Ok(ok())
}

pub async fn stage_all(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RepoRequest>,
) -> Result<Json<SuccessBody>, ApiError> {
    state.require_known_repo(&req.repo_path)?;

    state.executor.stage_all(&req.repo_path).await?;
    Ok(ok())
}

pub async fn undo(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UndoRequest>,
) -> Result<Json<SuccessBody>, ApiError> {
    state.require_known_repo(&req.repo_path)?;
    require_file(&req.file)?;

    state
        .executor
        .unstage_or_discard(&req.repo_path, &req.file, req.command.area())
        .await?;
    Ok(ok())
}

pub async fn undo_all_working(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RepoRequest>,
) -> Result<Json<SuccessBody>, ApiError> {
    state.require_known_repo(&req.repo_path)?;

    state.executor.discard_all_working(&req.repo_path).await?;
    Ok(ok())
}

pub async fn commit(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CommitRequest>,
) -> Result<Json<SuccessBody>, ApiError> {
    state.require_known_repo(&req.repo_path)?;

    state
        .executor
        .commit(&req.repo_path, &req.commit_type, &req.message)
        .await?;

    info!(
        repo = %req.repo_path.display(),
        commit_type = %req.commit_type,
        "Created commit"
    );
    Ok(ok())
}
