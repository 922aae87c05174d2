//! patchwork: JSON Patch (RFC 6902) over JSON Pointer (RFC 6901) paths.
//!
//! Two ways to apply a patch document:
//!
//! - contextual: [`json_patch::apply_patch`] edits any tree implementing
//!   [`json_patch::Node`] (`serde_json::Value` out of the box);
//! - explicit: [`json_patch::HandlerSet`] dispatches each instruction to a
//!   handler written for a specific resource type.
//!
//! ```
//! use patchwork::json_patch::{apply_patch, ApplyPatchOptions, PatchDocument};
//! use serde_json::json;
//!
//! let patch: PatchDocument = serde_json::from_value(json!([
//!     {"op": "add", "path": "/tags/-", "value": "new"},
//!     {"op": "move", "from": "/name", "path": "/title"}
//! ]))
//! .unwrap();
//!
//! let mut doc = json!({"name": "x", "tags": ["old"]});
//! apply_patch(&mut doc, &patch, &ApplyPatchOptions::default()).unwrap();
//! assert_eq!(doc, json!({"tags": ["old", "new"], "title": "x"}));
//! ```

pub mod json_cli;
pub mod json_patch;

pub use patchwork_pointer::{JsonPath, JsonPointerError};
