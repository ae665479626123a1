mod error;
mod json;
mod mutations;
mod refresh;

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use diffdeck_core::{ProjectSnapshot, SnapshotAssembler, SnapshotError};
use diffdeck_git::MutationExecutor;
use diffdeck_render::{render_document, RenderOptions};

pub use error::{ApiError, ErrorBody};
pub use json::ApiJson;

#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<SnapshotAssembler>,
    pub executor: Arc<MutationExecutor>,
    pub server_url: Arc<str>,
}

impl AppState {
    pub fn new(assembler: SnapshotAssembler, executor: MutationExecutor, server_url: &str) -> Self {
        Self {
            assembler: Arc::new(assembler),
            executor: Arc::new(executor),
            server_url: Arc::from(server_url),
        }
    }

    /// Only repositories from the configured project map may be touched.
    pub fn require_known_repo(&self, repo: &Path) -> Result<(), ApiError> {
        if self.assembler.projects().contains_path(repo) {
            Ok(())
        } else {
            Err(SnapshotError::UnknownRepository(repo.to_path_buf()).into())
        }
    }

    pub fn render(&self, snapshots: &[ProjectSnapshot]) -> String {
        render_document(snapshots, &RenderOptions::new(self.server_url.as_ref()))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/stage", post(mutations::stage))
        .route("/stage-all", post(mutations::stage_all))
        .route("/undo", post(mutations::undo))
        .route("/undo-all-working", post(mutations::undo_all_working))
        .route("/commit", post(mutations::commit))
        .route(
            "/refresh",
            get(refresh::refresh_query).post(refresh::refresh_body),
        )
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub projects: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        projects: state.assembler.projects().len(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use diffdeck_core::{Project, ProjectMap, SnapshotAssembler};
    use diffdeck_git::testing::ScriptedRunner;
    use diffdeck_git::{CommandRunner, MutationExecutor};

    use super::AppState;

    pub const REPO: &str = "/srv/en";

    pub fn state_with(runner: Arc<ScriptedRunner>) -> AppState {
        let runner: Arc<dyn CommandRunner> = runner;
        let projects = ProjectMap::new(vec![
            Project::new("en", REPO),
            Project::new("de", "/srv/de"),
        ])
        .unwrap();
        AppState::new(
            SnapshotAssembler::new(runner.clone(), projects),
            MutationExecutor::new(runner),
            "http://127.0.0.1:6060",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{state_with, REPO};
    use super::*;
    use axum::http::StatusCode;
    use diffdeck_git::testing::ScriptedRunner;

    #[tokio::test]
    async fn test_health_counts_projects() {
        let state = state_with(Arc::new(ScriptedRunner::new()));
        let Json(health) = health(State(state)).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.projects, 2);
    }

    #[test]
    fn test_require_known_repo() {
        let state = state_with(Arc::new(ScriptedRunner::new()));
        assert!(state.require_known_repo(Path::new(REPO)).is_ok());

        let err = state.require_known_repo(Path::new("/etc")).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_router_builds() {
        let _router = create_router(state_with(Arc::new(ScriptedRunner::new())));
    }
}
