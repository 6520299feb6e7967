//! Shallow merge of JSON patches into typed values.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Keys a patch may never overwrite.
const PROTECTED_KEYS: &[&str] = &["id", "schemaVersion", "revision"];

/// Replace the top-level fields of `value` named in `patch`.
///
/// A `null` in the patch unsets the field, falling back to its default.
pub fn shallow_merge<T>(value: &T, patch: &Map<String, Value>) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut current = serde_json::to_value(value)?;
    if let Value::Object(fields) = &mut current {
        for (key, new_value) in patch {
            if PROTECTED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if new_value.is_null() {
                fields.remove(key);
            } else {
                fields.insert(key.clone(), normalize_link(key, new_value));
            }
        }
    }
    serde_json::from_value(current)
}

fn normalize_link(key: &str, value: &Value) -> Value {
    match value {
        Value::String(url) if key.to_ascii_lowercase().ends_with("url") => {
            Value::String(optimize_drive_link(url))
        }
        other => other.clone(),
    }
}

/// Rewrite Google Drive share links to their embeddable preview form.
pub fn optimize_drive_link(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.contains("drive.google.com") && url.contains("/view") {
        let base = url.split('?').next().unwrap_or(url);
        return base.replacen("/view", "/preview", 1);
    }
    if url.contains("drive.google.com/file/d/") {
        let parts: Vec<&str> = url.split('/').collect();
        if let Some(pos) = parts.iter().position(|p| *p == "d") {
            if let Some(file_id) = parts.get(pos + 1).filter(|id| !id.is_empty()) {
                return format!("https://drive.google.com/file/d/{}/preview", file_id);
            }
        }
    }
    url.to_string()
}
