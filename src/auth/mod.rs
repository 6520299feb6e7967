//! Session-based authentication.
//!
//! Credentials live in the document itself. A successful login issues an
//! opaque token held in memory; requests present it in the
//! `x-session-token` header or as a bearer token. Comparisons of secrets
//! are constant-time to mitigate timing attacks.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::editor::EditMode;
use crate::errors::{codes, AppError, ErrorDetails, ErrorResponse};
use crate::models::Document;

/// Header carrying the session token.
pub const SESSION_HEADER: &str = "x-session-token";

pub const ADMIN_LOGIN_FAILED: &str = "Wrong ID or password! Try again.";
pub const OFFICE_LOGIN_FAILED: &str = "Invalid Access Credentials";
pub const INVALID_RESET_CODE: &str = "Invalid Security Reset Code!";
pub const PASSWORD_TOO_SHORT: &str = "New password must be at least 6 characters.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match!";

const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKind {
    Admin,
    Office,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub kind: SessionKind,
    pub edit_mode: EditMode,
    /// Staged document an admin edits before committing.
    pub draft: Option<Document>,
    pub created_at: DateTime<Utc>,
}

/// Token and kind of the authenticated caller, placed in request extensions.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub kind: SessionKind,
}

/// In-memory session table. Sessions do not survive a restart.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session and return its token.
    pub async fn create(&self, kind: SessionKind, draft: Option<Document>) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let session = Session {
            kind,
            edit_mode: EditMode::View,
            draft,
            created_at: Utc::now(),
        };
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);
        tracing::info!(kind = ?kind, active = sessions.len(), "session opened");
        token
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn kind_of(&self, token: &str) -> Option<SessionKind> {
        self.sessions.read().await.get(token).map(|s| s.kind)
    }

    /// Run `f` against a live session.
    pub async fn with_session<R>(
        &self,
        token: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        self.sessions.write().await.get_mut(token).map(f)
    }

    /// Close a session. Returns whether it existed.
    pub async fn remove(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token).is_some();
        if removed {
            tracing::info!("session closed");
        }
        removed
    }
}

/// Extract the session token from `x-session-token` or `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Middleware admitting only requests that carry a session of `required` kind.
pub async fn require_session(
    sessions: Arc<SessionStore>,
    required: SessionKind,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return unauthorized_response("Login required");
    };

    match sessions.kind_of(&token).await {
        Some(kind) if kind == required => {
            request.extensions_mut().insert(AuthSession { token, kind });
            next.run(request).await
        }
        Some(_) => unauthorized_response("Session does not grant access"),
        None => unauthorized_response("Session expired or invalid"),
    }
}

/// Check admin credentials against the document.
pub fn verify_admin(doc: &Document, username: &str, password: &str) -> Result<(), AppError> {
    let user_ok = constant_time_compare(username, &doc.admin_username);
    let pass_ok = constant_time_compare(password, &doc.admin_password);
    if user_ok && pass_ok {
        Ok(())
    } else {
        Err(AppError::Unauthorized(ADMIN_LOGIN_FAILED.to_string()))
    }
}

/// Check office profile credentials against the document.
pub fn verify_office(doc: &Document, username: &str, password: &str) -> Result<(), AppError> {
    let user_ok = constant_time_compare(username, &doc.office_access_user);
    let pass_ok = constant_time_compare(password, &doc.office_access_pass);
    if user_ok && pass_ok {
        Ok(())
    } else {
        Err(AppError::Unauthorized(OFFICE_LOGIN_FAILED.to_string()))
    }
}

/// Validate a reset request and return the document with the new password.
///
/// Checks run in a fixed order and the first failure is reported; the
/// document is untouched unless every check passes.
pub fn reset_password(
    doc: &Document,
    reset_code: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<Document, AppError> {
    if !constant_time_compare(reset_code, &doc.admin_reset_code) {
        return Err(AppError::Validation(INVALID_RESET_CODE.to_string()));
    }
    if new_password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(PASSWORD_TOO_SHORT.to_string()));
    }
    if new_password != confirm_password {
        return Err(AppError::Validation(PASSWORD_MISMATCH.to_string()));
    }

    let mut next = doc.clone();
    next.admin_password = new_password.to_string();
    Ok(next)
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    a_bytes.ct_eq(b_bytes).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
