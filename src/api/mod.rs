//! REST API module.
//!
//! Public site views, session endpoints and the admin dashboard. Every
//! response uses the same envelope carrying the document revision.

mod admin;
mod media;
mod session;
mod site;

pub use admin::*;
pub use media::*;
pub use session::*;
pub use site::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(err.with_revision(revision_id))
}

/// Wrap an operation result in the envelope.
pub fn respond<T: Serialize>(result: Result<T, AppError>, revision_id: i64) -> ApiResult<T> {
    result
        .map(|data| ApiResponse::new(data, revision_id))
        .map_err(|e| e.with_revision(revision_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::new(vec!["n1"], 3)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0], "n1");
        assert_eq!(json["revisionId"], 3);
    }

    #[test]
    fn test_respond_keeps_revision_on_error() {
        let result: ApiResult<()> = respond(Err(AppError::NotFound("gone".into())), 9);
        let err = result.unwrap_err();
        assert_eq!(err.revision_id, 9);
        assert_eq!(err.error.error_code(), "NOT_FOUND");
    }
}
