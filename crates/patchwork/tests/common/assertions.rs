use patchwork::json_patch::{apply_patch, ApplyError, ApplyPatchOptions, PatchDocument, PatchError};
use serde_json::Value;

pub fn patch(raw: Value) -> PatchDocument {
    serde_json::from_value(raw).expect("patch fixture must decode")
}

/// Apply with default options, returning the patched document.
pub fn apply(doc: &Value, raw_patch: Value) -> Result<Value, ApplyError> {
    let mut working = doc.clone();
    apply_patch(&mut working, &patch(raw_patch), &ApplyPatchOptions::default())?;
    Ok(working)
}

/// Apply a patch that must fail, and check the document was left alone.
pub fn apply_err(doc: &Value, raw_patch: Value) -> ApplyError {
    let mut working = doc.clone();
    let err = apply_patch(&mut working, &patch(raw_patch), &ApplyPatchOptions::default())
        .expect_err("patch should fail");
    assert_eq!(&working, doc, "failed patch must not change the document");
    err
}

pub fn error_kind(error: &PatchError) -> &'static str {
    match error {
        PatchError::InvalidPointerSyntax(_) => "InvalidPointerSyntax",
        PatchError::InvalidPayload(_) => "InvalidPayload",
        PatchError::PathNotFound(_) => "PathNotFound",
        PatchError::InvalidPath(_) => "InvalidPath",
        PatchError::TestFailed { .. } => "TestFailed",
        PatchError::UnsupportedOperation(_) => "UnsupportedOperation",
        PatchError::Handler(_) => "Handler",
    }
}
