use std::path::PathBuf;

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use super::{ApiError, ApiJson, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshQuery {
    pub repo_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub repo_paths: Vec<PathBuf>,
    #[serde(default)]
    pub repo_path: Option<PathBuf>,
}

impl RefreshRequest {
    fn paths(self) -> Vec<PathBuf> {
        let mut paths = self.repo_paths;
        paths.extend(self.repo_path);
        paths
    }
}

/// `GET /refresh?repoPath=...`
pub async fn refresh_query(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> Result<Html<String>, ApiError> {
    let paths: Vec<PathBuf> = query.repo_path.into_iter().collect();
    render(&state, &paths).await
}

/// `POST /refresh` with `{"repoPaths": [...]}`
pub async fn refresh_body(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Html<String>, ApiError> {
    render(&state, &req.paths()).await
}

/// Re-scan and re-render; no paths means every configured project.
async fn render(state: &AppState, paths: &[PathBuf]) -> Result<Html<String>, ApiError> {
    let snapshots = state.assembler.assemble_paths(paths).await?;
    Ok(Html(state.render(&snapshots)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{state_with, REPO};
    use axum::http::StatusCode;
    use diffdeck_git::testing::ScriptedRunner;
    use std::path::Path;
    use std::sync::Arc;

    const WORKING_SCAN: &[&str] = &["diff", "--no-color", "--name-status", "-z"];

    #[tokio::test]
    async fn test_refresh_all_projects() {
        let runner = Arc::new(
            ScriptedRunner::new().respond_in(Path::new(REPO), WORKING_SCAN, "M\0index.html\0"),
        );

        let Html(html) = refresh_body(
            State(state_with(runner)),
            ApiJson(RefreshRequest::default()),
        )
        .await
        .unwrap();

        assert!(html.contains(">EN</li>"));
        assert!(html.contains(">DE</li>"));
        assert!(html.contains("index.html"));
    }

    #[tokio::test]
    async fn test_refresh_query_single_repo() {
        let Html(html) = refresh_query(
            State(state_with(Arc::new(ScriptedRunner::new()))),
            Query(RefreshQuery {
                repo_path: Some(PathBuf::from("/srv/de")),
            }),
        )
        .await
        .unwrap();

        assert!(html.contains(">DE</li>"));
        assert!(!html.contains(">EN</li>"));
    }

    #[tokio::test]
    async fn test_refresh_failure_is_500() {
        let runner = Arc::new(ScriptedRunner::new().fail(
            WORKING_SCAN,
            "fatal: not a git repository",
            128,
        ));

        let err = refresh_body(
            State(state_with(runner)),
            ApiJson(RefreshRequest {
                repo_paths: vec![PathBuf::from(REPO)],
                repo_path: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("not a git repository"));
    }

    #[tokio::test]
    async fn test_refresh_unknown_path_is_400() {
        let err = refresh_query(
            State(state_with(Arc::new(ScriptedRunner::new()))),
            Query(RefreshQuery {
                repo_path: Some(PathBuf::from("/tmp")),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_request_merges_single_and_list() {
        let req: RefreshRequest =
            serde_json::from_str(r#"{"repoPaths":["/srv/en"],"repoPath":"/srv/de"}"#).unwrap();
        assert_eq!(
            req.paths(),
            vec![PathBuf::from("/srv/en"), PathBuf::from("/srv/de")]
        );
    }
}
