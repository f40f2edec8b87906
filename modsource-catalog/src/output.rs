//! Publishing the assembled catalog.
//!
//! The catalog is only rewritten when its content actually changed: the
//! previously published file is compared against the new document with the
//! `lastUpdated` stamp removed from both sides, so an unchanged catalog is a
//! no-op and the file mtime is left alone.

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use crate::types::Catalog;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the catalog to `path` if it differs from what is already there.
///
/// Returns `true` when a new file was written (with a fresh `lastUpdated`
/// stamp), `false` when the existing file already matches. A prior file that
/// fails to parse is treated as absent and overwritten.
pub fn write_if_changed(path: &Path, catalog: &Catalog) -> Result<bool, OutputError> {
    let mut next = serde_json::to_value(catalog)?;
    strip_timestamp(&mut next);

    if let Ok(prior) = std::fs::read_to_string(path) {
        if let Ok(mut prior_value) = serde_json::from_str::<serde_json::Value>(&prior) {
            strip_timestamp(&mut prior_value);
            if prior_value == next {
                return Ok(false);
            }
        }
    }

    let mut stamped = catalog.clone();
    stamped.last_updated = Some(Utc::now());
    let rendered = serde_json::to_string_pretty(&stamped)?;
    std::fs::write(path, rendered).map_err(|e| OutputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(true)
}

fn strip_timestamp(value: &mut serde_json::Value) {
    if let Some(obj) = value.as_object_mut() {
        obj.remove("lastUpdated");
    }
}
