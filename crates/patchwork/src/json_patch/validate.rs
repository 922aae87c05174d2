//! JSON Patch instruction validator.
//!
//! Checks the per-operation field requirements of RFC 6902: `add`,
//! `replace` and `test` need a `value`; `move` and `copy` need a `from`;
//! `remove` needs only a `path`. Pointer syntax is checked later, when the
//! instruction is resolved.

use super::types::{
    ApplyError, ApplyPatchOptions, PatchDocument, PatchError, PatchInstruction, PatchOperationKind,
    PatchValue,
};

/// The error reported when `op` lacks `field`.
pub fn missing_field(op: PatchOperationKind, field: &str) -> PatchError {
    PatchError::InvalidPayload(format!("\"{op}\" operation requires \"{field}\""))
}

pub(crate) fn required_value(instruction: &PatchInstruction) -> Result<&PatchValue, PatchError> {
    instruction
        .value()
        .ok_or_else(|| missing_field(instruction.op(), "value"))
}

pub(crate) fn required_from(instruction: &PatchInstruction) -> Result<&str, PatchError> {
    instruction
        .from()
        .ok_or_else(|| missing_field(instruction.op(), "from"))
}

/// Validate a single instruction.
pub fn validate_instruction(instruction: &PatchInstruction) -> Result<(), PatchError> {
    let op = instruction.op();
    if op.requires_value() {
        required_value(instruction)?;
    }
    if op.requires_from() {
        required_from(instruction)?;
    }
    Ok(())
}

/// Validate every instruction of a document, and its size against
/// `options.max_operations`.
///
/// Errors carry the index of the first failing instruction.
pub fn validate_document(
    document: &PatchDocument,
    options: &ApplyPatchOptions,
) -> Result<(), ApplyError> {
    if let Some(max) = options.max_operations {
        if let Some(first_rejected) = document.get(max) {
            return Err(ApplyError::new(
                max,
                first_rejected,
                PatchError::InvalidPayload(format!(
                    "patch has {} operations, at most {max} are allowed",
                    document.len()
                )),
            ));
        }
    }
    for (index, instruction) in document.iter().enumerate() {
        validate_instruction(instruction).map_err(|e| ApplyError::new(index, instruction, e))?;
    }
    Ok(())
}
