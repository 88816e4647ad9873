//! Feature flag document inspection and editing.
//!
//! `show` reports what the server would see, so a malformed document prints
//! every flag as off. `set` refuses to touch a malformed document rather than
//! replacing it.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;
use toggle_checkout_core::{FeatureFlag, FeatureFlags, FlagDocumentError};
use tracing::{info, warn};

/// Errors editing a flag document.
#[derive(Debug, Error)]
pub enum FlagFileError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to edit malformed flag document: {0}")]
    Malformed(#[from] FlagDocumentError),

    #[error("failed to encode flag document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read the flags the server would see for the document at `path`.
///
/// A missing or malformed document yields the defaults, with a warning.
pub async fn effective(path: &Path) -> FeatureFlags {
    match tokio::fs::read_to_string(path).await {
        Ok(document) => FeatureFlags::from_json(&document).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Malformed flag document, using defaults");
            FeatureFlags::default()
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Flag document unreadable, using defaults");
            FeatureFlags::default()
        }
    }
}

/// Print the effective value of every flag in the document at `path`.
#[allow(clippy::print_stdout)]
pub async fn show(path: &Path) {
    print!("{}", render(&effective(path).await));
}

/// Set `flag` to `enabled` in the document at `path`, creating it if needed.
///
/// # Errors
///
/// Returns `FlagFileError` if the existing document is malformed or the file
/// cannot be read or written.
pub async fn set(path: &Path, flag: FeatureFlag, enabled: bool) -> Result<(), FlagFileError> {
    let io_error = |source| FlagFileError::Io {
        path: path.display().to_string(),
        source,
    };

    let existing = match tokio::fs::read_to_string(path).await {
        Ok(document) => Some(document),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(io_error(e)),
    };

    let updated = set_in_document(existing.as_deref(), flag, enabled)?;
    tokio::fs::write(path, updated).await.map_err(io_error)?;

    info!(path = %path.display(), flag = %flag, enabled, "Flag updated");
    Ok(())
}

/// Return `document` with `flag` set to `enabled`.
///
/// Unknown keys are preserved so documents shared with newer servers survive
/// an edit.
fn set_in_document(
    document: Option<&str>,
    flag: FeatureFlag,
    enabled: bool,
) -> Result<String, FlagFileError> {
    let mut map = match document {
        Some(document) => {
            let map: Map<String, Value> = match serde_json::from_str(document) {
                Ok(Value::Object(map)) => map,
                Ok(_) => return Err(FlagDocumentError::NotAnObject.into()),
                Err(e) => return Err(FlagDocumentError::Syntax(e).into()),
            };
            // Validates the known keys
            FeatureFlags::from_map(&map)?;
            map
        }
        None => Map::new(),
    };

    map.insert(flag.key().to_string(), Value::Bool(enabled));

    let mut out = serde_json::to_string_pretty(&Value::Object(map))?;
    out.push('\n');
    Ok(out)
}

fn render(flags: &FeatureFlags) -> String {
    FeatureFlag::ALL
        .iter()
        .map(|flag| {
            let state = if flags.is_enabled(*flag) { "on" } else { "off" };
            format!("{:<28} {state}\n", flag.key())
        })
        .collect()
}
