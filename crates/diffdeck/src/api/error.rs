use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use diffdeck_core::SnapshotError;
use diffdeck_git::GitError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error response: status code plus `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<GitError> for ApiError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::CommitBlocked(_) => ApiError::bad_request(err.to_string()),
            GitError::RepositoryAccess { .. } | GitError::Mutation { .. } => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Git(git) => git.into(),
            SnapshotError::UnknownRepository(_) => ApiError::bad_request(err.to_string()),
            _ => ApiError::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let blocked: ApiError = GitError::CommitBlocked("stage first".to_string()).into();
        assert_eq!(blocked.status(), StatusCode::BAD_REQUEST);
        assert_eq!(blocked.message(), "stage first");

        let mutation: ApiError = GitError::Mutation {
            repo: PathBuf::from("/r"),
            operation: "add".to_string(),
            message: "fatal: index.lock exists".to_string(),
        }
        .into();
        assert_eq!(mutation.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(mutation.message().contains("index.lock"));

        let access: ApiError = SnapshotError::Git(GitError::RepositoryAccess {
            repo: PathBuf::from("/r"),
            message: "fatal: not a git repository".to_string(),
        })
        .into();
        assert_eq!(access.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let unknown: ApiError = SnapshotError::UnknownRepository(PathBuf::from("/etc")).into();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
