//! JSON Patch apply logic (contextual mode).
//!
//! Every algorithm works on a [`Node`] tree and a resolved [`JsonPath`].
//! A path segment is read as a property on objects and as an element on
//! arrays; the facet is chosen by the node found, never up front.

use patchwork_pointer::{JsonPath, PathSegment};

use super::node::{Node, NodeKind};
use super::types::{
    ApplyError, ApplyPatchOptions, OpResult, Operation, PatchDocument, PatchError, PatchResult,
    PatchValue,
};
use super::validate::validate_document;

// ── Path navigation ───────────────────────────────────────────────────────

fn not_found(path: &JsonPath) -> PatchError {
    PatchError::PathNotFound(path.to_string())
}

/// Child of `node` reached through an intermediate segment. The `-` marker
/// never descends.
fn child<'a, T: Node>(node: &'a T, segment: &PathSegment) -> Option<&'a T> {
    match node.kind() {
        NodeKind::Object => node.get_property(segment.property().name()?),
        NodeKind::Array => node.get_element(segment.element().index()?),
        NodeKind::Scalar => None,
    }
}

fn child_mut<'a, T: Node>(node: &'a mut T, segment: &PathSegment) -> Option<&'a mut T> {
    match node.kind() {
        NodeKind::Object => node.get_property_mut(segment.property().name()?),
        NodeKind::Array => node.get_element_mut(segment.element().index()?),
        NodeKind::Scalar => None,
    }
}

/// Walk segments `0..upto` of `path`.
fn descend<'a, T: Node>(doc: &'a T, path: &JsonPath, upto: usize) -> Result<&'a T, PatchError> {
    let mut current = doc;
    for segment in &path.segments()[..upto] {
        current = child(current, segment).ok_or_else(|| not_found(path))?;
    }
    Ok(current)
}

fn descend_mut<'a, T: Node>(
    doc: &'a mut T,
    path: &JsonPath,
    upto: usize,
) -> Result<&'a mut T, PatchError> {
    let mut current = doc;
    for segment in &path.segments()[..upto] {
        current = child_mut(current, segment).ok_or_else(|| not_found(path))?;
    }
    Ok(current)
}

/// The existing value at `path`. On an array, the `-` marker designates the
/// last element.
pub fn get<'a, T: Node>(doc: &'a T, path: &JsonPath) -> Result<&'a T, PatchError> {
    let Some(last) = path.last() else {
        return Ok(doc);
    };
    let parent = descend(doc, path, path.len() - 1)?;
    let target = match parent.kind() {
        NodeKind::Object => last.property().name().and_then(|n| parent.get_property(n)),
        NodeKind::Array => last
            .element()
            .existing_index(parent.element_count())
            .and_then(|i| parent.get_element(i)),
        NodeKind::Scalar => None,
    };
    target.ok_or_else(|| not_found(path))
}

fn get_mut<'a, T: Node>(doc: &'a mut T, path: &JsonPath) -> Result<&'a mut T, PatchError> {
    let Some(last) = path.last() else {
        return Ok(doc);
    };
    let parent = descend_mut(doc, path, path.len() - 1)?;
    let target = match parent.kind() {
        NodeKind::Object => match last.property().name() {
            Some(name) => parent.get_property_mut(name),
            None => None,
        },
        NodeKind::Array => match last.element().existing_index(parent.element_count()) {
            Some(index) => parent.get_element_mut(index),
            None => None,
        },
        NodeKind::Scalar => None,
    };
    target.ok_or_else(|| not_found(path))
}

// ── Individual operation applicators ─────────────────────────────────────

/// Insert `value` at `path`, handing it back on failure so a caller can put
/// it somewhere else.
fn insert<T: Node>(doc: &mut T, path: &JsonPath, value: T) -> Result<Option<T>, (PatchError, T)> {
    let Some(last) = path.last() else {
        return Ok(Some(std::mem::replace(doc, value)));
    };
    let parent = match descend_mut(doc, path, path.len() - 1) {
        Ok(parent) => parent,
        Err(e) => return Err((e, value)),
    };
    match parent.kind() {
        NodeKind::Object => match last.property().name() {
            Some(name) => Ok(parent.set_property(name, value)),
            None => Err((not_found(path), value)),
        },
        NodeKind::Array => match last.element().insertion_index(parent.element_count()) {
            Some(index) => {
                parent.insert_element(index, value);
                Ok(None)
            }
            None => Err((not_found(path), value)),
        },
        NodeKind::Scalar => Err((not_found(path), value)),
    }
}

pub(crate) fn apply_add<T: Node>(
    doc: &mut T,
    path: &JsonPath,
    value: T,
) -> Result<Option<T>, PatchError> {
    insert(doc, path, value).map_err(|(e, _)| e)
}

pub(crate) fn apply_remove<T: Node>(doc: &mut T, path: &JsonPath) -> Result<T, PatchError> {
    let Some(last) = path.last() else {
        return Err(PatchError::InvalidPath(
            "the document root cannot be removed".to_string(),
        ));
    };
    let parent = descend_mut(doc, path, path.len() - 1)?;
    let removed = match parent.kind() {
        NodeKind::Object => match last.property().name() {
            Some(name) => parent.remove_property(name),
            None => None,
        },
        NodeKind::Array => match last.element().existing_index(parent.element_count()) {
            Some(index) => parent.remove_element(index),
            None => None,
        },
        NodeKind::Scalar => None,
    };
    removed.ok_or_else(|| not_found(path))
}

pub(crate) fn apply_replace<T: Node>(
    doc: &mut T,
    path: &JsonPath,
    value: T,
) -> Result<T, PatchError> {
    let target = get_mut(doc, path)?;
    Ok(std::mem::replace(target, value))
}

pub(crate) fn apply_copy<T: Node>(
    doc: &mut T,
    from: &JsonPath,
    path: &JsonPath,
) -> Result<Option<T>, PatchError> {
    let value = get(doc, from)?.clone();
    apply_add(doc, path, value)
}

/// Where the property named by the last segment of `path` sits in its parent
/// object.
fn source_position<T: Node>(doc: &T, path: &JsonPath) -> Option<usize> {
    let name = path.last()?.property().name()?;
    let parent = descend(doc, path, path.len() - 1).ok()?;
    match parent.kind() {
        NodeKind::Object => parent.property_position(name),
        _ => None,
    }
}

/// Put a moved value back where it was taken from.
fn restore<T: Node>(
    doc: &mut T,
    from: &JsonPath,
    position: Option<usize>,
    value: T,
) -> Result<(), PatchError> {
    match (position, from.last().and_then(|last| last.property().name())) {
        (Some(position), Some(name)) => {
            descend_mut(doc, from, from.len() - 1)?.insert_property_at(position, name, value);
            Ok(())
        }
        _ => insert(doc, from, value).map(|_| ()).map_err(|(e, _)| e),
    }
}

/// Remove at `from`, then add at `path` against the tree left by the
/// removal. A failed add puts the value back at `from`.
pub(crate) fn apply_move<T: Node>(
    doc: &mut T,
    from: &JsonPath,
    path: &JsonPath,
) -> Result<Option<T>, PatchError> {
    get(doc, from)?;
    if from.is_prefix_of(path) {
        return Err(PatchError::InvalidPath(format!(
            "cannot move \"{from}\" to itself or one of its children (\"{path}\")"
        )));
    }
    let position = source_position(doc, from);
    let value = apply_remove(doc, from)?;
    match insert(doc, path, value) {
        Ok(displaced) => Ok(displaced),
        Err((error, value)) => {
            if let Err(restore_error) = restore(doc, from, position, value) {
                tracing::warn!(
                    from = %from,
                    path = %path,
                    error = %restore_error,
                    "could not restore move source after failed move"
                );
            }
            Err(error)
        }
    }
}

pub(crate) fn apply_test<T: Node>(
    doc: &T,
    path: &JsonPath,
    expected: &PatchValue,
) -> Result<(), PatchError> {
    if get(doc, path)?.equals_json(expected.node()) {
        Ok(())
    } else {
        Err(PatchError::TestFailed {
            path: path.to_string(),
            expected: expected.node().clone(),
        })
    }
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single operation to the document (in-place mutation).
///
/// Returns the value displaced by the operation, if any.
pub fn apply_op<T: Node>(doc: &mut T, op: &Operation) -> Result<Option<T>, PatchError> {
    match op {
        Operation::Add { path, value } => apply_add(doc, path, T::from_json(value.node())),
        Operation::Remove { path } => apply_remove(doc, path).map(Some),
        Operation::Replace { path, value } => {
            apply_replace(doc, path, T::from_json(value.node())).map(Some)
        }
        Operation::Copy { from, path } => apply_copy(doc, from, path),
        Operation::Move { from, path } => apply_move(doc, from, path),
        Operation::Test { path, value } => {
            apply_test(doc, path, value)?;
            Ok(None)
        }
    }
}

/// Apply resolved operations in order, returning the final document and
/// per-op results.
pub fn apply_ops<T: Node>(mut doc: T, ops: &[Operation]) -> Result<PatchResult<T>, ApplyError> {
    let mut res = Vec::with_capacity(ops.len());
    for (index, op) in ops.iter().enumerate() {
        let old = apply_op(&mut doc, op).map_err(|error| ApplyError {
            index,
            op: Some(op.kind()),
            path: op.path().to_string(),
            error,
        })?;
        res.push(OpResult { old });
    }
    Ok(PatchResult { doc, res })
}

fn apply_document<T: Node>(
    doc: &mut T,
    document: &PatchDocument,
) -> Result<Vec<OpResult<T>>, ApplyError> {
    let mut res = Vec::with_capacity(document.len());
    for (index, instruction) in document.iter().enumerate() {
        tracing::debug!(
            index,
            op = %instruction.op(),
            path = instruction.path(),
            "applying patch operation"
        );
        let old = instruction
            .resolve()
            .and_then(|op| apply_op(doc, &op))
            .map_err(|e| ApplyError::new(index, instruction, e))?;
        res.push(OpResult { old });
    }
    Ok(res)
}

/// Apply a patch document to `doc`.
///
/// With `options.mutate == false` the instructions run against a working
/// copy that replaces `doc` only when all of them succeed; on failure `doc`
/// is untouched. With `options.mutate == true` they run against `doc`
/// itself and a failure leaves the earlier instructions applied.
pub fn apply_patch<T: Node>(
    doc: &mut T,
    document: &PatchDocument,
    options: &ApplyPatchOptions,
) -> Result<Vec<OpResult<T>>, ApplyError> {
    validate_document(document, options)?;
    if options.mutate {
        return apply_document(doc, document);
    }
    let mut working = doc.clone();
    let res = apply_document(&mut working, document)?;
    *doc = working;
    Ok(res)
}

impl PatchDocument {
    /// Apply to a copy of `doc` and return the patched copy.
    pub fn apply_to<T: Node>(&self, doc: &T) -> Result<T, ApplyError> {
        let mut working = doc.clone();
        apply_document(&mut working, self)?;
        Ok(working)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
