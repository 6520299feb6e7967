//! Generic record editor.
//!
//! Uniform add/update/delete-by-id over every list field of the document.
//! Every operation takes the current document by reference and returns a
//! new one; only the named field differs. When the editor is not in edit
//! mode every mutating call returns an unchanged copy.

mod collections;
mod merge;

pub use collections::*;
pub use merge::*;

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::{Document, Record};

/// Whether mutating operations are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditMode {
    #[default]
    View,
    Edit,
}

impl EditMode {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            EditMode::Edit
        } else {
            EditMode::View
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, EditMode::Edit)
    }
}

static LAST_RECORD_ID: AtomicI64 = AtomicI64::new(0);

/// Timestamp id in milliseconds, bumped past the last issued value.
pub fn next_record_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut previous = LAST_RECORD_ID.load(Ordering::SeqCst);
    loop {
        let candidate = now.max(previous + 1);
        match LAST_RECORD_ID.compare_exchange(
            previous,
            candidate,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => previous = actual,
        }
    }
}

/// Nine-character base36 token for records created in bulk.
pub fn random_token() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Applies record operations to document values.
#[derive(Debug, Clone, Copy)]
pub struct RecordEditor {
    mode: EditMode,
}

impl RecordEditor {
    pub fn new(mode: EditMode) -> Self {
        Self { mode }
    }

    /// Assign a fresh id and prepend the record.
    pub fn add<C: Collection>(&self, doc: &Document, mut record: C::Item) -> Document {
        let mut next = doc.clone();
        if !self.mode.is_enabled() {
            return next;
        }
        record.set_id(next_record_id());
        C::items_mut(&mut next).insert(0, record);
        next
    }

    /// Append a record that already carries its id.
    pub fn append<C: Collection>(&self, doc: &Document, record: C::Item) -> Document {
        let mut next = doc.clone();
        if self.mode.is_enabled() {
            C::items_mut(&mut next).push(record);
        }
        next
    }

    /// Shallow-merge `patch` into the record with `id`. Unknown ids are a no-op.
    pub fn update<C: Collection>(
        &self,
        doc: &Document,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<Document, AppError> {
        let mut next = doc.clone();
        if !self.mode.is_enabled() {
            return Ok(next);
        }
        for record in C::items_mut(&mut next).iter_mut() {
            if record.id() == id {
                *record = shallow_merge(record, patch).map_err(|e| {
                    AppError::BadRequest(format!("Invalid {} record: {}", C::FIELD, e))
                })?;
            }
        }
        Ok(next)
    }

    /// Remove every record with `id`.
    pub fn delete<C: Collection>(&self, doc: &Document, id: &str) -> Document {
        let mut next = doc.clone();
        if self.mode.is_enabled() {
            C::items_mut(&mut next).retain(|record| record.id() != id);
        }
        next
    }

    /// Clear a singleton field to unset.
    pub fn clear_singleton(&self, doc: &Document, field: SingletonField) -> Document {
        let mut next = doc.clone();
        if self.mode.is_enabled() {
            *field.slot(&mut next) = None;
        }
        next
    }

    /// Merge into a singleton field, creating it when unset.
    pub fn patch_singleton(
        &self,
        doc: &Document,
        field: SingletonField,
        patch: &Map<String, Value>,
    ) -> Result<Document, AppError> {
        let mut next = doc.clone();
        if !self.mode.is_enabled() {
            return Ok(next);
        }
        let slot = field.slot(&mut next);
        let current = slot.take().unwrap_or_else(|| {
            let mut fresh = crate::models::Faculty::default();
            fresh.set_id(next_record_id());
            fresh
        });
        *slot = Some(
            shallow_merge(&current, patch)
                .map_err(|e| AppError::BadRequest(format!("Invalid record: {}", e)))?,
        );
        Ok(next)
    }

    /// Replace fields of a configuration block.
    pub fn patch_block(
        &self,
        doc: &Document,
        block: BlockKind,
        patch: &Map<String, Value>,
    ) -> Result<Document, AppError> {
        let mut next = doc.clone();
        if !self.mode.is_enabled() {
            return Ok(next);
        }
        let invalid = |e: serde_json::Error| AppError::BadRequest(format!("Invalid block: {}", e));
        match block {
            BlockKind::Theme => {
                next.theme_config = shallow_merge(&next.theme_config, patch).map_err(invalid)?
            }
            BlockKind::Ticker => {
                next.ticker_config = shallow_merge(&next.ticker_config, patch).map_err(invalid)?
            }
            BlockKind::Stats => next.stats = shallow_merge(&next.stats, patch).map_err(invalid)?,
        }
        Ok(next)
    }

    /// Replace top-level fields of the document.
    pub fn patch_document(
        &self,
        doc: &Document,
        patch: &Map<String, Value>,
    ) -> Result<Document, AppError> {
        if !self.mode.is_enabled() {
            return Ok(doc.clone());
        }
        shallow_merge(doc, patch)
            .map_err(|e| AppError::BadRequest(format!("Invalid document fields: {}", e)))
    }

    /// Issue a new six-digit password reset code.
    pub fn regenerate_reset_code(&self, doc: &Document) -> Document {
        let mut next = doc.clone();
        if self.mode.is_enabled() {
            next.admin_reset_code = rand::thread_rng().gen_range(100_000..1_000_000).to_string();
        }
        next
    }
}
