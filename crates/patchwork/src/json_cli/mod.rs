//! Core logic behind the command-line tools:
//! - `json-patch`: apply a JSON Patch to a document
//! - `json-pointer`: resolve a JSON Pointer, optionally against a document

use patchwork_pointer::{JsonPath, JsonPointerError};
use serde_json::{json, Value};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::json_patch::{
    apply_patch, from_json_patch, get, ApplyError, ApplyPatchOptions, PatchError,
};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Patch(#[from] ApplyError),
    #[error(transparent)]
    Pointer(#[from] JsonPointerError),
    #[error(transparent)]
    Lookup(#[from] PatchError),
}

// ── Logging ───────────────────────────────────────────────────────────────

/// Install the stderr subscriber used by both binaries. `RUST_LOG` wins;
/// otherwise the level is `warn`, or `debug` with `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── json-patch ────────────────────────────────────────────────────────────

/// Apply a JSON Patch (RFC 6902) to a document.
///
/// `doc_json`: the document as a JSON string.
/// `patch_json`: the patch instructions as a JSON array string.
pub fn apply_json_patch(
    doc_json: &str,
    patch_json: &str,
    options: &ApplyPatchOptions,
) -> Result<Value, CliError> {
    let mut doc: Value = serde_json::from_str(doc_json)?;
    let raw: Value = serde_json::from_str(patch_json)?;
    let patch = from_json_patch(&raw)?;
    apply_patch(&mut doc, &patch, options)?;
    Ok(doc)
}

// ── json-pointer ──────────────────────────────────────────────────────────

/// Describe how each token of `pointer` can be read: as a property, as an
/// element, or both.
pub fn describe_pointer(pointer: &str) -> Result<Value, CliError> {
    let path = JsonPath::parse(pointer)?;
    let segments: Vec<Value> = path
        .segments()
        .iter()
        .map(|segment| {
            let element = segment.element();
            let element = if element.is_last_element_marker() {
                json!("-")
            } else {
                json!(element.index())
            };
            json!({
                "token": segment.token(),
                "property": segment.property().name(),
                "element": element,
            })
        })
        .collect();
    Ok(json!({
        "pointer": path.to_string(),
        "segments": segments,
    }))
}

/// Look up a JSON Pointer (RFC 6901) in a document. On arrays `-` designates
/// the last element.
pub fn lookup_pointer(doc_json: &str, pointer: &str) -> Result<Value, CliError> {
    let doc: Value = serde_json::from_str(doc_json)?;
    let path = JsonPath::parse(pointer)?;
    Ok(get(&doc, &path)?.clone())
}

// ── Tests ─────────────────────────────────────────────────────────────────
