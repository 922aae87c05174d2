//! JSON Patch implementation (RFC 6902).
//!
//! # Operations
//!
//! All six RFC 6902 operations are supported:
//! `add`, `remove`, `replace`, `copy`, `move`, `test`.
//!
//! # Modes
//!
//! * Contextual: [`apply_patch`] and friends edit any tree implementing
//!   [`Node`], choosing the property or element reading of each path segment
//!   from the node actually found.
//! * Explicit: a [`HandlerSet`] hands each resolved instruction to a
//!   caller-supplied handler for its kind.

pub mod apply;
pub mod codec;
pub mod explicit;
pub mod node;
pub mod types;
pub mod util;
pub mod validate;

pub use apply::{apply_op, apply_ops, apply_patch, get};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use explicit::{
    AddHandler, CopyHandler, Handler, HandlerSet, MoveHandler, RemoveHandler, ReplaceHandler,
    TestHandler,
};
pub use node::{Node, NodeKind};
pub use types::{
    ApplyError, ApplyPatchOptions, OpResult, Operation, PatchDocument, PatchError,
    PatchInstruction, PatchOperationKind, PatchResult, PatchValue,
};
pub use validate::{validate_document, validate_instruction};
