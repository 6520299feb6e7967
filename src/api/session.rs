//! Login, logout and password reset endpoints.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::auth::{self, SessionKind};
use crate::errors::AppError;
use crate::sync::SaveReport;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub kind: SessionKind,
}

/// POST /api/auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let doc = state.store.snapshot().await;

    if let Err(e) = auth::verify_admin(&doc, &request.username, &request.password) {
        tracing::warn!("admin login rejected");
        return error(e, doc.revision);
    }

    let token = state
        .sessions
        .create(SessionKind::Admin, Some((*doc).clone()))
        .await;
    success(
        LoginResponse {
            token,
            kind: SessionKind::Admin,
        },
        doc.revision,
    )
}

/// POST /api/auth/office/login
pub async fn office_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let doc = state.store.snapshot().await;

    if let Err(e) = auth::verify_office(&doc, &request.username, &request.password) {
        tracing::warn!("office login rejected");
        return error(e, doc.revision);
    }

    let token = state.sessions.create(SessionKind::Office, None).await;
    success(
        LoginResponse {
            token,
            kind: SessionKind::Office,
        },
        doc.revision,
    )
}

/// POST /api/auth/logout - Close the presented session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<bool> {
    let revision_id = state.store.revision().await;
    let Some(token) = auth::session_token(&headers) else {
        return error(
            AppError::Unauthorized("Login required".to_string()),
            revision_id,
        );
    };
    success(state.sessions.remove(&token).await, revision_id)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub reset_code: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<SaveReport>,
}

/// POST /api/auth/reset-password - Set a new admin password with the reset code.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<ResetPasswordResponse> {
    let result = state
        .store
        .modify(&state.coordinator, |doc| {
            auth::reset_password(
                doc,
                &request.reset_code,
                &request.new_password,
                &request.confirm_password,
            )
        })
        .await;

    let revision_id = state.store.revision().await;
    match result {
        Ok(committed) => {
            tracing::info!("admin password reset");
            success(
                ResetPasswordResponse {
                    message: "Password updated successfully!",
                    save: committed.map(|c| c.report),
                },
                revision_id,
            )
        }
        Err(e) => error(e, revision_id),
    }
}
