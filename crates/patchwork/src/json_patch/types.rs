//! Core types for the JSON Patch module: operation kinds, instructions,
//! documents, resolved operations, results and errors.

use std::fmt;
use std::str::FromStr;

use patchwork_pointer::{JsonPath, JsonPointerError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::validate::{required_from, required_value, validate_instruction};

// ── Errors ────────────────────────────────────────────────────────────────

/// Failure of a single patch instruction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("invalid pointer syntax: {0}")]
    InvalidPointerSyntax(#[from] JsonPointerError),
    #[error("invalid patch payload: {0}")]
    InvalidPayload(String),
    #[error("path not found: \"{0}\"")]
    PathNotFound(String),
    #[error("invalid patch path: {0}")]
    InvalidPath(String),
    #[error("test failed: value at \"{path}\" is not equal to {expected}")]
    TestFailed { path: String, expected: Value },
    #[error("operation \"{0}\" is not supported")]
    UnsupportedOperation(PatchOperationKind),
    /// Domain failure raised by an explicit-mode handler.
    #[error("{0}")]
    Handler(String),
}

/// Failure of a patch document: which instruction failed, and why.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Error in operation [index = {index}] at \"{path}\": {error}")]
pub struct ApplyError {
    pub index: usize,
    /// `None` when the instruction could not be decoded far enough to know.
    pub op: Option<PatchOperationKind>,
    pub path: String,
    #[source]
    pub error: PatchError,
}

impl ApplyError {
    pub fn new(index: usize, instruction: &PatchInstruction, error: PatchError) -> Self {
        Self {
            index,
            op: Some(instruction.op()),
            path: instruction.path().to_string(),
            error,
        }
    }
}

// ── Operation kind ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperationKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl PatchOperationKind {
    pub const ALL: [PatchOperationKind; 6] = [
        PatchOperationKind::Add,
        PatchOperationKind::Remove,
        PatchOperationKind::Replace,
        PatchOperationKind::Move,
        PatchOperationKind::Copy,
        PatchOperationKind::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOperationKind::Add => "add",
            PatchOperationKind::Remove => "remove",
            PatchOperationKind::Replace => "replace",
            PatchOperationKind::Move => "move",
            PatchOperationKind::Copy => "copy",
            PatchOperationKind::Test => "test",
        }
    }

    /// `add`, `replace` and `test` carry a `value`.
    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            PatchOperationKind::Add | PatchOperationKind::Replace | PatchOperationKind::Test
        )
    }

    /// `move` and `copy` carry a `from` pointer.
    pub fn requires_from(&self) -> bool {
        matches!(self, PatchOperationKind::Move | PatchOperationKind::Copy)
    }
}

impl fmt::Display for PatchOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchOperationKind {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatchOperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PatchError::InvalidPayload(format!("unknown operation \"{s}\"")))
    }
}

// ── Value payload ─────────────────────────────────────────────────────────

/// The `value` member of an instruction.
///
/// Handlers can read it either as a single node or as a list: an array
/// payload lists its elements, anything else is a one-element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchValue(Value);

impl PatchValue {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn node(&self) -> &Value {
        &self.0
    }

    pub fn into_node(self) -> Value {
        self.0
    }

    pub fn values(&self) -> &[Value] {
        match &self.0 {
            Value::Array(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl From<Value> for PatchValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ── Instruction ───────────────────────────────────────────────────────────

/// One operation of a patch document, as submitted (paths still strings).
#[derive(Debug, Clone, PartialEq)]
pub struct PatchInstruction {
    op: PatchOperationKind,
    path: String,
    value: Option<PatchValue>,
    from: Option<String>,
}

impl PatchInstruction {
    /// Build an instruction from its raw parts, enforcing the field
    /// requirements of `op`.
    pub fn new(
        op: PatchOperationKind,
        path: impl Into<String>,
        value: Option<PatchValue>,
        from: Option<String>,
    ) -> Result<Self, PatchError> {
        let instruction = Self {
            op,
            path: path.into(),
            value,
            from,
        };
        validate_instruction(&instruction)?;
        Ok(instruction)
    }

    pub fn add(path: impl Into<String>, value: impl Into<PatchValue>) -> Self {
        Self::with_value(PatchOperationKind::Add, path, value)
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOperationKind::Remove,
            path: path.into(),
            value: None,
            from: None,
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<PatchValue>) -> Self {
        Self::with_value(PatchOperationKind::Replace, path, value)
    }

    pub fn move_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_from(PatchOperationKind::Move, from, path)
    }

    pub fn copy_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_from(PatchOperationKind::Copy, from, path)
    }

    pub fn test(path: impl Into<String>, value: impl Into<PatchValue>) -> Self {
        Self::with_value(PatchOperationKind::Test, path, value)
    }

    fn with_value(
        op: PatchOperationKind,
        path: impl Into<String>,
        value: impl Into<PatchValue>,
    ) -> Self {
        Self {
            op,
            path: path.into(),
            value: Some(value.into()),
            from: None,
        }
    }

    fn with_from(op: PatchOperationKind, from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            value: None,
            from: Some(from.into()),
        }
    }

    pub fn op(&self) -> PatchOperationKind {
        self.op
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> Option<&PatchValue> {
        self.value.as_ref()
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn validate(&self) -> Result<(), PatchError> {
        validate_instruction(self)
    }

    /// Validate and resolve the pointer strings.
    pub fn resolve(&self) -> Result<Operation, PatchError> {
        Operation::resolve(self)
    }
}

// ── Document ──────────────────────────────────────────────────────────────

/// An ordered list of instructions. Order is application order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchDocument {
    instructions: Vec<PatchInstruction>,
}

impl PatchDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: PatchInstruction) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PatchInstruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchInstruction> {
        self.instructions.iter()
    }

    pub fn instructions(&self) -> &[PatchInstruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<PatchInstruction> {
        self.instructions
    }
}

impl From<Vec<PatchInstruction>> for PatchDocument {
    fn from(instructions: Vec<PatchInstruction>) -> Self {
        Self { instructions }
    }
}

impl FromIterator<PatchInstruction> for PatchDocument {
    fn from_iter<I: IntoIterator<Item = PatchInstruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PatchDocument {
    type Item = PatchInstruction;
    type IntoIter = std::vec::IntoIter<PatchInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchDocument {
    type Item = &'a PatchInstruction;
    type IntoIter = std::slice::Iter<'a, PatchInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

// ── Resolved operation ────────────────────────────────────────────────────

/// A validated instruction with its pointers resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Add { path: JsonPath, value: PatchValue },
    Remove { path: JsonPath },
    Replace { path: JsonPath, value: PatchValue },
    Move { from: JsonPath, path: JsonPath },
    Copy { from: JsonPath, path: JsonPath },
    Test { path: JsonPath, value: PatchValue },
}

impl Operation {
    pub fn resolve(instruction: &PatchInstruction) -> Result<Self, PatchError> {
        let path = JsonPath::parse(instruction.path())?;
        let op = match instruction.op() {
            PatchOperationKind::Add => Operation::Add {
                path,
                value: required_value(instruction)?.clone(),
            },
            PatchOperationKind::Remove => Operation::Remove { path },
            PatchOperationKind::Replace => Operation::Replace {
                path,
                value: required_value(instruction)?.clone(),
            },
            PatchOperationKind::Move => Operation::Move {
                from: JsonPath::parse(required_from(instruction)?)?,
                path,
            },
            PatchOperationKind::Copy => Operation::Copy {
                from: JsonPath::parse(required_from(instruction)?)?,
                path,
            },
            PatchOperationKind::Test => Operation::Test {
                path,
                value: required_value(instruction)?.clone(),
            },
        };
        Ok(op)
    }

    pub fn kind(&self) -> PatchOperationKind {
        match self {
            Operation::Add { .. } => PatchOperationKind::Add,
            Operation::Remove { .. } => PatchOperationKind::Remove,
            Operation::Replace { .. } => PatchOperationKind::Replace,
            Operation::Move { .. } => PatchOperationKind::Move,
            Operation::Copy { .. } => PatchOperationKind::Copy,
            Operation::Test { .. } => PatchOperationKind::Test,
        }
    }

    pub fn path(&self) -> &JsonPath {
        match self {
            Operation::Add { path, .. }
            | Operation::Remove { path }
            | Operation::Replace { path, .. }
            | Operation::Move { path, .. }
            | Operation::Copy { path, .. }
            | Operation::Test { path, .. } => path,
        }
    }

    pub fn from(&self) -> Option<&JsonPath> {
        match self {
            Operation::Move { from, .. } | Operation::Copy { from, .. } => Some(from),
            _ => None,
        }
    }
}

// ── Results and options ───────────────────────────────────────────────────

/// Result of applying a single operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpResult<T = Value> {
    /// The value displaced by the operation: the removed or replaced value,
    /// or the object member overwritten by `add`/`copy`/`move`.
    pub old: Option<T>,
}

/// Result of applying a full patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchResult<T = Value> {
    pub doc: T,
    pub res: Vec<OpResult<T>>,
}

/// Options for `apply_patch`.
#[derive(Debug, Clone, Default)]
pub struct ApplyPatchOptions {
    /// If true, instructions mutate the caller's tree directly and a failure
    /// leaves the earlier instructions applied. If false, a working copy is
    /// patched and only committed back when every instruction succeeds.
    pub mutate: bool,
    /// Reject documents with more instructions than this before applying
    /// anything.
    pub max_operations: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in PatchOperationKind::ALL {
            assert_eq!(kind.as_str().parse::<PatchOperationKind>().unwrap(), kind);
        }
        assert!(matches!(
            "frobnicate".parse::<PatchOperationKind>(),
            Err(PatchError::InvalidPayload(_))
        ));
    }

    #[test]
    fn value_list_view() {
        let list = PatchValue::new(json!([1, 2]));
        assert_eq!(list.values(), &[json!(1), json!(2)]);
        let single = PatchValue::new(json!({"a": 1}));
        assert_eq!(single.values(), &[json!({"a": 1})]);
        let empty = PatchValue::new(json!([]));
        assert!(empty.values().is_empty());
    }

    #[test]
    fn instruction_equality_is_structural() {
        assert_eq!(
            PatchInstruction::add("/a", json!(1)),
            PatchInstruction::new(
                PatchOperationKind::Add,
                "/a",
                Some(PatchValue::new(json!(1))),
                None
            )
            .unwrap()
        );
        assert_ne!(
            PatchInstruction::add("/a", json!(1)),
            PatchInstruction::add("/a", json!(2))
        );
        assert_ne!(
            PatchInstruction::move_from("/a", "/b"),
            PatchInstruction::copy_from("/a", "/b")
        );
    }

    #[test]
    fn resolve_builds_operation() {
        let op = PatchInstruction::move_from("/a/0", "/b").resolve().unwrap();
        assert_eq!(op.kind(), PatchOperationKind::Move);
        assert_eq!(op.path().to_string(), "/b");
        assert_eq!(op.from().map(ToString::to_string), Some("/a/0".to_string()));
    }

    #[test]
    fn resolve_reports_pointer_syntax() {
        let err = PatchInstruction::remove("/a~9").resolve().unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointerSyntax(_)));

        let err = PatchInstruction::copy_from("nope", "/b").resolve().unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointerSyntax(_)));
    }

    #[test]
    fn apply_error_display_names_index_and_path() {
        let instruction = PatchInstruction::remove("/missing");
        let err = ApplyError::new(3, &instruction, PatchError::PathNotFound("/missing".into()));
        assert_eq!(
            err.to_string(),
            "Error in operation [index = 3] at \"/missing\": path not found: \"/missing\""
        );
    }
}
