//! Upload endpoints.

use axum::extract::{Multipart, State};
use axum::Extension;

use super::{admin::apply_to_draft, error, success, ApiResult};
use crate::auth::AuthSession;
use crate::editor::Gallery;
use crate::errors::AppError;
use crate::media::{self, EncodedMedia, GalleryIngest, IngestFailure, MediaFile};
use crate::AppState;

/// Files read from a multipart body, plus the part that broke the stream.
#[derive(Debug, Default)]
struct Uploaded {
    files: Vec<MediaFile>,
    failed: Vec<IngestFailure>,
}

/// Read every file part of a multipart body.
///
/// A part that cannot be read ends the stream; files read before it are kept.
async fn read_files(mut multipart: Multipart) -> Uploaded {
    let mut uploaded = Uploaded::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable multipart part");
                uploaded.failed.push(IngestFailure {
                    file_name: String::new(),
                    reason: format!("Invalid upload: {}", e),
                });
                break;
            }
        };
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => uploaded.files.push(MediaFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            }),
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "upload truncated");
                uploaded.failed.push(IngestFailure {
                    reason: format!("Failed to read {}: {}", file_name, e),
                    file_name,
                });
                break;
            }
        }
    }
    uploaded
}

/// POST /api/admin/media - Encode one file as a data URL.
pub async fn upload_media(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<EncodedMedia> {
    let revision_id = state.store.revision().await;
    let uploaded = read_files(multipart).await;
    match (uploaded.files.first(), uploaded.failed.first()) {
        (Some(file), _) => success(media::ingest_single(file), revision_id),
        (None, Some(failure)) => error(
            AppError::BadRequest(failure.reason.clone()),
            revision_id,
        ),
        (None, None) => error(
            AppError::Validation("No file provided".to_string()),
            revision_id,
        ),
    }
}

/// POST /api/admin/gallery/upload - Add many images or videos to the draft gallery.
///
/// Items are appended to the draft as each file finishes. Rejected files,
/// unreadable parts and items the draft did not take are listed as failed.
pub async fn upload_gallery(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    multipart: Multipart,
) -> ApiResult<GalleryIngest> {
    let revision_id = state.store.revision().await;
    let Uploaded { files, failed } = read_files(multipart).await;
    tracing::info!(files = files.len(), unreadable = failed.len(), "bulk gallery upload");

    let mut outcome = media::ingest_gallery(files, |item| {
        let state = state.clone();
        let auth = auth.clone();
        async move {
            let id = item.id.clone();
            let draft = apply_to_draft(&state, &auth, |editor, draft| {
                Ok(editor.append::<Gallery>(draft, item))
            })
            .await
            .map_err(|e| e.message())?;
            if draft.gallery.iter().any(|g| g.id == id) {
                Ok(())
            } else {
                Err("Edit mode is off; item not added".to_string())
            }
        }
    })
    .await;
    outcome.failed.extend(failed);

    success(outcome, revision_id)
}
