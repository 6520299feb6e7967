//! Media ingestion: uploaded files become inline `data:` URLs.

use std::future::Future;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::editor::random_token;
use crate::models::{GalleryItem, MediaType};

/// An uploaded file, read fully into memory.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    /// Encode as `data:<mime>;base64,<payload>`.
    pub fn to_data_url(&self) -> String {
        let mime = if self.content_type.is_empty() {
            "application/octet-stream"
        } else {
            self.content_type.as_str()
        };
        format!("data:{};base64,{}", mime, STANDARD.encode(&self.bytes))
    }
}

/// A single file encoded for direct use in a record field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedMedia {
    pub file_name: String,
    pub content_type: String,
    pub data_url: String,
}

pub fn ingest_single(file: &MediaFile) -> EncodedMedia {
    EncodedMedia {
        file_name: file.file_name.clone(),
        content_type: file.content_type.clone(),
        data_url: file.to_data_url(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestFailure {
    pub file_name: String,
    pub reason: String,
}

/// Result of a bulk gallery upload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryIngest {
    pub added: Vec<GalleryItem>,
    pub failed: Vec<IngestFailure>,
}

fn gallery_item(file: MediaFile) -> Result<GalleryItem, IngestFailure> {
    let Some(media_type) = MediaType::from_mime(&file.content_type) else {
        return Err(IngestFailure {
            reason: format!("unsupported media type '{}'", file.content_type),
            file_name: file.file_name,
        });
    };
    Ok(GalleryItem {
        id: random_token(),
        url: file.to_data_url(),
        media_type,
        caption: String::new(),
    })
}

/// Convert each file on its own task and hand items to `on_item` as they
/// finish. A failing file is reported and does not affect the rest; an
/// item counts as added only when `on_item` accepts it.
pub async fn ingest_gallery<F, Fut>(files: Vec<MediaFile>, mut on_item: F) -> GalleryIngest
where
    F: FnMut(GalleryItem) -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    let mut tasks = JoinSet::new();
    for file in files {
        let file_name = file.file_name.clone();
        tasks.spawn(async move { (file_name, gallery_item(file)) });
    }

    let mut outcome = GalleryIngest::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((file_name, Ok(item))) => {
                debug!(id = %item.id, "gallery item ready");
                match on_item(item.clone()).await {
                    Ok(()) => outcome.added.push(item),
                    Err(reason) => {
                        warn!(file = %file_name, reason = %reason, "gallery item not stored");
                        outcome.failed.push(IngestFailure { file_name, reason });
                    }
                }
            }
            Ok((file_name, Err(failure))) => {
                warn!(file = %file_name, reason = %failure.reason, "gallery file rejected");
                outcome.failed.push(failure);
            }
            Err(e) => {
                warn!(error = %e, "gallery ingestion task aborted");
                outcome.failed.push(IngestFailure {
                    file_name: String::new(),
                    reason: e.to_string(),
                });
            }
        }
    }
    outcome
}
