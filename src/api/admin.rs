//! Admin dashboard endpoints.
//!
//! Edits apply to the caller's draft through the record editor and only
//! reach the shared document on commit.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{error, respond, success, ApiResult};
use crate::auth::AuthSession;
use crate::editor::{list_json, BlockKind, CollectionKind, EditMode, RecordEditor, SingletonField};
use crate::errors::AppError;
use crate::models::Document;
use crate::sync::{SaveReport, SyncSnapshot};
use crate::AppState;

/// Apply `change` to the session's draft, seeding it from the current document.
pub(crate) async fn apply_to_draft<F>(
    state: &AppState,
    auth: &AuthSession,
    change: F,
) -> Result<Document, AppError>
where
    F: FnOnce(&RecordEditor, &Document) -> Result<Document, AppError>,
{
    let current = state.store.snapshot().await;
    state
        .sessions
        .with_session(&auth.token, |session| {
            let editor = RecordEditor::new(session.edit_mode);
            let draft = session.draft.get_or_insert_with(|| (*current).clone());
            let next = change(&editor, draft)?;
            *draft = next.clone();
            Ok(next)
        })
        .await
        .unwrap_or_else(|| Err(session_gone()))
}

fn session_gone() -> AppError {
    AppError::Unauthorized("Session expired or invalid".to_string())
}

fn parse_kind(name: &str) -> Result<CollectionKind, AppError> {
    let kind = CollectionKind::parse(name)
        .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", name)))?;
    tracing::debug!(collection = kind.as_str(), "record request");
    Ok(kind)
}

fn list_of(kind: CollectionKind, doc: &Document) -> Result<Value, AppError> {
    list_json(kind, doc).map_err(|e| AppError::Internal(e.to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionView {
    pub edit_mode: EditMode,
    /// Whether the draft differs from the committed document.
    pub dirty: bool,
    pub logged_in_at: String,
}

/// GET /api/admin/session
pub async fn get_admin_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> ApiResult<AdminSessionView> {
    let doc = state.store.snapshot().await;
    match state.sessions.get(&auth.token).await {
        Some(session) => success(
            AdminSessionView {
                edit_mode: session.edit_mode,
                dirty: session.draft.as_ref().is_some_and(|d| d != &*doc),
                logged_in_at: session.created_at.to_rfc3339(),
            },
            doc.revision,
        ),
        None => error(session_gone(), doc.revision),
    }
}

#[derive(Debug, Deserialize)]
pub struct EditModeRequest {
    pub enabled: bool,
}

/// PUT /api/admin/edit-mode
pub async fn set_edit_mode(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(request): Json<EditModeRequest>,
) -> ApiResult<EditMode> {
    let revision_id = state.store.revision().await;
    let mode = EditMode::from_enabled(request.enabled);
    match state
        .sessions
        .with_session(&auth.token, |session| {
            session.edit_mode = mode;
            session.edit_mode
        })
        .await
    {
        Some(mode) => success(mode, revision_id),
        None => error(session_gone(), revision_id),
    }
}

/// GET /api/admin/draft - The full staged document, credentials included.
pub async fn get_draft(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> ApiResult<Document> {
    let revision_id = state.store.revision().await;
    let result = apply_to_draft(&state, &auth, |_, draft| Ok(draft.clone())).await;
    respond(result, revision_id)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<SaveReport>,
}

/// POST /api/admin/draft/commit - Publish the draft and save it.
pub async fn commit_draft(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> ApiResult<CommitResponse> {
    let revision_id = state.store.revision().await;
    let draft = match apply_to_draft(&state, &auth, |_, draft| Ok(draft.clone())).await {
        Ok(draft) => draft,
        Err(e) => return error(e, revision_id),
    };

    let committed = state.store.commit(draft, &state.coordinator).await;
    let current = state.store.snapshot().await;

    // Re-seed so the draft carries the new revision.
    state
        .sessions
        .with_session(&auth.token, |session| {
            session.draft = Some((*current).clone());
        })
        .await;

    match committed {
        Some(committed) => {
            tracing::info!(
                revision = committed.document.revision,
                remote = ?committed.report.remote,
                "draft committed"
            );
            success(
                CommitResponse {
                    changed: true,
                    save: Some(committed.report),
                },
                current.revision,
            )
        }
        None => success(
            CommitResponse {
                changed: false,
                save: None,
            },
            current.revision,
        ),
    }
}

/// POST /api/admin/draft/discard - Reset the draft to the current document.
pub async fn discard_draft(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> ApiResult<bool> {
    let current = state.store.snapshot().await;
    match state
        .sessions
        .with_session(&auth.token, |session| {
            session.draft = Some((*current).clone());
        })
        .await
    {
        Some(()) => success(true, current.revision),
        None => error(session_gone(), current.revision),
    }
}

/// GET /api/admin/records/{kind}
pub async fn list_records(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(kind): Path<String>,
) -> ApiResult<Value> {
    let revision_id = state.store.revision().await;
    let result: Result<Value, AppError> = async {
        let kind = parse_kind(&kind)?;
        let draft = apply_to_draft(&state, &auth, |_, draft| Ok(draft.clone())).await?;
        list_of(kind, &draft)
    }
    .await;
    respond(result, revision_id)
}

/// POST /api/admin/records/{kind} - Add a record, returns the new list.
pub async fn add_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(kind): Path<String>,
    Json(partial): Json<Map<String, Value>>,
) -> ApiResult<Value> {
    let revision_id = state.store.revision().await;
    let result: Result<Value, AppError> = async {
        let kind = parse_kind(&kind)?;
        let draft = apply_to_draft(&state, &auth, |editor, draft| {
            editor.add_json(kind, draft, &partial)
        })
        .await?;
        list_of(kind, &draft)
    }
    .await;
    respond(result, revision_id)
}

/// PUT /api/admin/records/{kind}/{id} - Merge fields into a record.
pub async fn update_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path((kind, id)): Path<(String, String)>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Value> {
    let revision_id = state.store.revision().await;
    let result: Result<Value, AppError> = async {
        let kind = parse_kind(&kind)?;
        let draft = apply_to_draft(&state, &auth, |editor, draft| {
            editor.update_json(kind, draft, &id, &patch)
        })
        .await?;
        list_of(kind, &draft)
    }
    .await;
    respond(result, revision_id)
}

/// DELETE /api/admin/records/{kind}/{id}
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let revision_id = state.store.revision().await;
    let result: Result<Value, AppError> = async {
        let kind = parse_kind(&kind)?;
        let draft = apply_to_draft(&state, &auth, |editor, draft| {
            Ok(editor.delete_by_kind(kind, draft, &id))
        })
        .await?;
        list_of(kind, &draft)
    }
    .await;
    respond(result, revision_id)
}

fn parse_singleton(name: &str) -> Result<SingletonField, AppError> {
    SingletonField::parse(name)
        .ok_or_else(|| AppError::NotFound(format!("Field {} not found", name)))
}

/// PUT /api/admin/singletons/{field} - Merge into a single-record field.
pub async fn patch_singleton(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(field): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Document> {
    let revision_id = state.store.revision().await;
    let result: Result<Document, AppError> = async {
        let field = parse_singleton(&field)?;
        apply_to_draft(&state, &auth, |editor, draft| {
            editor.patch_singleton(draft, field, &patch)
        })
        .await
    }
    .await;
    respond(result, revision_id)
}

/// DELETE /api/admin/singletons/{field} - Clear a single-record field.
pub async fn clear_singleton(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(field): Path<String>,
) -> ApiResult<Document> {
    let revision_id = state.store.revision().await;
    let result: Result<Document, AppError> = async {
        let field = parse_singleton(&field)?;
        apply_to_draft(&state, &auth, |editor, draft| {
            Ok(editor.clear_singleton(draft, field))
        })
        .await
    }
    .await;
    respond(result, revision_id)
}

/// PUT /api/admin/blocks/{block} - Merge into themeConfig, tickerConfig or stats.
pub async fn patch_block(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(block): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Document> {
    let revision_id = state.store.revision().await;
    let result: Result<Document, AppError> = async {
        let block = BlockKind::parse(&block)
            .ok_or_else(|| AppError::NotFound(format!("Block {} not found", block)))?;
        apply_to_draft(&state, &auth, |editor, draft| {
            editor.patch_block(draft, block, &patch)
        })
        .await
    }
    .await;
    respond(result, revision_id)
}

/// PATCH /api/admin/document - Replace top-level fields of the draft.
pub async fn patch_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Document> {
    let revision_id = state.store.revision().await;
    let result = apply_to_draft(&state, &auth, |editor, draft| {
        editor.patch_document(draft, &patch)
    })
    .await;
    respond(result, revision_id)
}

/// POST /api/admin/reset-code - Issue a new reset code in the draft.
pub async fn regenerate_reset_code(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> ApiResult<String> {
    let revision_id = state.store.revision().await;
    let result = apply_to_draft(&state, &auth, |editor, draft| {
        Ok(editor.regenerate_reset_code(draft))
    })
    .await;
    respond(result.map(|draft| draft.admin_reset_code), revision_id)
}

#[derive(Debug, Deserialize)]
pub struct ConnectivityRequest {
    pub online: bool,
}

/// POST /api/admin/connectivity - Report connectivity to the coordinator.
pub async fn set_connectivity(
    State(state): State<AppState>,
    Json(request): Json<ConnectivityRequest>,
) -> ApiResult<SyncSnapshot> {
    let revision_id = state.store.revision().await;
    state.coordinator.set_online(request.online);
    success(state.coordinator.snapshot().await, revision_id)
}
