//! Explicit mode: each resolved instruction is handed to a handler supplied
//! by the resource author.
//!
//! The dispatcher never interprets a path against the resource. It validates
//! the document, resolves pointers, looks up the handler registered for the
//! instruction's kind and calls it. What `/a/b` means for a concrete resource
//! is up to the handler.
//!
//! ```
//! use patchwork::json_patch::{HandlerSet, PatchDocument, PatchInstruction, PatchError};
//! use patchwork_pointer::JsonPath;
//! use patchwork::json_patch::PatchValue;
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Profile {
//!     name: String,
//! }
//!
//! let mut handlers = HandlerSet::new().on_replace(
//!     |profile: &mut Profile, path: &JsonPath, value: &PatchValue| match path.as_pointer() {
//!         "/name" => {
//!             profile.name = value.node().as_str().unwrap_or_default().to_string();
//!             Ok(())
//!         }
//!         other => Err(PatchError::PathNotFound(other.to_string())),
//!     },
//! );
//!
//! let mut profile = Profile::default();
//! let patch = PatchDocument::from(vec![PatchInstruction::replace("/name", json!("Ada"))]);
//! handlers.apply(&mut profile, &patch).unwrap();
//! assert_eq!(profile.name, "Ada");
//!
//! let patch = PatchDocument::from(vec![PatchInstruction::remove("/name")]);
//! assert!(handlers.apply(&mut profile, &patch).is_err());
//! ```

use std::fmt;

use patchwork_pointer::JsonPath;

use super::apply::{apply_add, apply_copy, apply_move, apply_remove, apply_replace, get};
use super::node::Node;
use super::types::{
    ApplyError, ApplyPatchOptions, Operation, PatchDocument, PatchError, PatchOperationKind,
    PatchValue,
};
use super::validate::validate_document;

// ── Handler roles ─────────────────────────────────────────────────────────

pub trait AddHandler<R: ?Sized> {
    fn add(
        &mut self,
        resource: &mut R,
        path: &JsonPath,
        value: &PatchValue,
    ) -> Result<(), PatchError>;
}

pub trait RemoveHandler<R: ?Sized> {
    fn remove(&mut self, resource: &mut R, path: &JsonPath) -> Result<(), PatchError>;
}

pub trait ReplaceHandler<R: ?Sized> {
    fn replace(
        &mut self,
        resource: &mut R,
        path: &JsonPath,
        value: &PatchValue,
    ) -> Result<(), PatchError>;
}

pub trait MoveHandler<R: ?Sized> {
    fn move_value(
        &mut self,
        resource: &mut R,
        from: &JsonPath,
        path: &JsonPath,
    ) -> Result<(), PatchError>;
}

pub trait CopyHandler<R: ?Sized> {
    fn copy(
        &mut self,
        resource: &mut R,
        from: &JsonPath,
        path: &JsonPath,
    ) -> Result<(), PatchError>;
}

/// Returns whether the value at `path` matches. A `false` result is turned
/// into [`PatchError::TestFailed`] by the dispatcher.
pub trait TestHandler<R: ?Sized> {
    fn test(
        &mut self,
        resource: &mut R,
        path: &JsonPath,
        value: &PatchValue,
    ) -> Result<bool, PatchError>;
}

impl<R: ?Sized, F> AddHandler<R> for F
where
    F: FnMut(&mut R, &JsonPath, &PatchValue) -> Result<(), PatchError>,
{
    fn add(
        &mut self,
        resource: &mut R,
        path: &JsonPath,
        value: &PatchValue,
    ) -> Result<(), PatchError> {
        self(resource, path, value)
    }
}

impl<R: ?Sized, F> RemoveHandler<R> for F
where
    F: FnMut(&mut R, &JsonPath) -> Result<(), PatchError>,
{
    fn remove(&mut self, resource: &mut R, path: &JsonPath) -> Result<(), PatchError> {
        self(resource, path)
    }
}

impl<R: ?Sized, F> ReplaceHandler<R> for F
where
    F: FnMut(&mut R, &JsonPath, &PatchValue) -> Result<(), PatchError>,
{
    fn replace(
        &mut self,
        resource: &mut R,
        path: &JsonPath,
        value: &PatchValue,
    ) -> Result<(), PatchError> {
        self(resource, path, value)
    }
}

impl<R: ?Sized, F> MoveHandler<R> for F
where
    F: FnMut(&mut R, &JsonPath, &JsonPath) -> Result<(), PatchError>,
{
    fn move_value(
        &mut self,
        resource: &mut R,
        from: &JsonPath,
        path: &JsonPath,
    ) -> Result<(), PatchError> {
        self(resource, from, path)
    }
}

impl<R: ?Sized, F> CopyHandler<R> for F
where
    F: FnMut(&mut R, &JsonPath, &JsonPath) -> Result<(), PatchError>,
{
    fn copy(
        &mut self,
        resource: &mut R,
        from: &JsonPath,
        path: &JsonPath,
    ) -> Result<(), PatchError> {
        self(resource, from, path)
    }
}

impl<R: ?Sized, F> TestHandler<R> for F
where
    F: FnMut(&mut R, &JsonPath, &PatchValue) -> Result<bool, PatchError>,
{
    fn test(
        &mut self,
        resource: &mut R,
        path: &JsonPath,
        value: &PatchValue,
    ) -> Result<bool, PatchError> {
        self(resource, path, value)
    }
}

// ── Registration ──────────────────────────────────────────────────────────

/// A boxed handler tagged with the role it fills.
pub enum Handler<'h, R: ?Sized> {
    Add(Box<dyn AddHandler<R> + 'h>),
    Remove(Box<dyn RemoveHandler<R> + 'h>),
    Replace(Box<dyn ReplaceHandler<R> + 'h>),
    Move(Box<dyn MoveHandler<R> + 'h>),
    Copy(Box<dyn CopyHandler<R> + 'h>),
    Test(Box<dyn TestHandler<R> + 'h>),
}

impl<R: ?Sized> Handler<'_, R> {
    pub fn kind(&self) -> PatchOperationKind {
        match self {
            Handler::Add(_) => PatchOperationKind::Add,
            Handler::Remove(_) => PatchOperationKind::Remove,
            Handler::Replace(_) => PatchOperationKind::Replace,
            Handler::Move(_) => PatchOperationKind::Move,
            Handler::Copy(_) => PatchOperationKind::Copy,
            Handler::Test(_) => PatchOperationKind::Test,
        }
    }
}

impl<R: ?Sized> fmt::Debug for Handler<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.kind()).finish()
    }
}

/// At most one handler per operation kind for resources of type `R`.
pub struct HandlerSet<'h, R: ?Sized> {
    add: Option<Box<dyn AddHandler<R> + 'h>>,
    remove: Option<Box<dyn RemoveHandler<R> + 'h>>,
    replace: Option<Box<dyn ReplaceHandler<R> + 'h>>,
    move_value: Option<Box<dyn MoveHandler<R> + 'h>>,
    copy: Option<Box<dyn CopyHandler<R> + 'h>>,
    test: Option<Box<dyn TestHandler<R> + 'h>>,
}

impl<R: ?Sized> Default for HandlerSet<'_, R> {
    fn default() -> Self {
        Self {
            add: None,
            remove: None,
            replace: None,
            move_value: None,
            copy: None,
            test: None,
        }
    }
}

impl<R: ?Sized> fmt::Debug for HandlerSet<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSet")
            .field("supported", &self.supported())
            .finish()
    }
}

impl<'h, R: ?Sized> HandlerSet<'h, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_add<H>(mut self, handler: H) -> Self
    where
        H: FnMut(&mut R, &JsonPath, &PatchValue) -> Result<(), PatchError> + 'h,
    {
        self.add = Some(Box::new(handler));
        self
    }

    pub fn on_remove<H>(mut self, handler: H) -> Self
    where
        H: FnMut(&mut R, &JsonPath) -> Result<(), PatchError> + 'h,
    {
        self.remove = Some(Box::new(handler));
        self
    }

    pub fn on_replace<H>(mut self, handler: H) -> Self
    where
        H: FnMut(&mut R, &JsonPath, &PatchValue) -> Result<(), PatchError> + 'h,
    {
        self.replace = Some(Box::new(handler));
        self
    }

    pub fn on_move<H>(mut self, handler: H) -> Self
    where
        H: FnMut(&mut R, &JsonPath, &JsonPath) -> Result<(), PatchError> + 'h,
    {
        self.move_value = Some(Box::new(handler));
        self
    }

    pub fn on_copy<H>(mut self, handler: H) -> Self
    where
        H: FnMut(&mut R, &JsonPath, &JsonPath) -> Result<(), PatchError> + 'h,
    {
        self.copy = Some(Box::new(handler));
        self
    }

    pub fn on_test<H>(mut self, handler: H) -> Self
    where
        H: FnMut(&mut R, &JsonPath, &PatchValue) -> Result<bool, PatchError> + 'h,
    {
        self.test = Some(Box::new(handler));
        self
    }

    /// Install `handler` in its role, replacing any earlier registration for
    /// the same kind.
    pub fn register(&mut self, handler: Handler<'h, R>) -> &mut Self {
        match handler {
            Handler::Add(h) => self.add = Some(h),
            Handler::Remove(h) => self.remove = Some(h),
            Handler::Replace(h) => self.replace = Some(h),
            Handler::Move(h) => self.move_value = Some(h),
            Handler::Copy(h) => self.copy = Some(h),
            Handler::Test(h) => self.test = Some(h),
        }
        self
    }

    pub fn supports(&self, kind: PatchOperationKind) -> bool {
        match kind {
            PatchOperationKind::Add => self.add.is_some(),
            PatchOperationKind::Remove => self.remove.is_some(),
            PatchOperationKind::Replace => self.replace.is_some(),
            PatchOperationKind::Move => self.move_value.is_some(),
            PatchOperationKind::Copy => self.copy.is_some(),
            PatchOperationKind::Test => self.test.is_some(),
        }
    }

    pub fn supported(&self) -> Vec<PatchOperationKind> {
        PatchOperationKind::ALL
            .into_iter()
            .filter(|kind| self.supports(*kind))
            .collect()
    }

    /// Hand one resolved operation to its handler.
    pub fn dispatch(&mut self, resource: &mut R, op: &Operation) -> Result<(), PatchError> {
        let unsupported = || PatchError::UnsupportedOperation(op.kind());
        match op {
            Operation::Add { path, value } => {
                let handler = self.add.as_mut().ok_or_else(unsupported)?;
                handler.add(resource, path, value)
            }
            Operation::Remove { path } => {
                let handler = self.remove.as_mut().ok_or_else(unsupported)?;
                handler.remove(resource, path)
            }
            Operation::Replace { path, value } => {
                let handler = self.replace.as_mut().ok_or_else(unsupported)?;
                handler.replace(resource, path, value)
            }
            Operation::Move { from, path } => {
                let handler = self.move_value.as_mut().ok_or_else(unsupported)?;
                handler.move_value(resource, from, path)
            }
            Operation::Copy { from, path } => {
                let handler = self.copy.as_mut().ok_or_else(unsupported)?;
                handler.copy(resource, from, path)
            }
            Operation::Test { path, value } => {
                let handler = self.test.as_mut().ok_or_else(unsupported)?;
                if handler.test(resource, path, value)? {
                    Ok(())
                } else {
                    Err(PatchError::TestFailed {
                        path: path.to_string(),
                        expected: value.node().clone(),
                    })
                }
            }
        }
    }

    /// Apply every instruction of `document` to `resource`, in order,
    /// stopping at the first failure.
    ///
    /// The whole document is validated before any handler runs. Handler side
    /// effects of instructions before a failing one are not undone.
    pub fn apply(&mut self, resource: &mut R, document: &PatchDocument) -> Result<(), ApplyError> {
        self.apply_with(resource, document, &ApplyPatchOptions::default())
    }

    /// [`HandlerSet::apply`] honouring `options.max_operations`. `mutate` has
    /// no meaning here: handlers always act on the resource itself.
    pub fn apply_with(
        &mut self,
        resource: &mut R,
        document: &PatchDocument,
        options: &ApplyPatchOptions,
    ) -> Result<(), ApplyError> {
        validate_document(document, options)?;
        for (index, instruction) in document.iter().enumerate() {
            tracing::debug!(
                index,
                op = %instruction.op(),
                path = instruction.path(),
                "dispatching patch operation"
            );
            instruction
                .resolve()
                .and_then(|op| self.dispatch(resource, &op))
                .map_err(|e| ApplyError::new(index, instruction, e))?;
        }
        Ok(())
    }
}

impl<'h, T: Node + 'h> HandlerSet<'h, T> {
    /// All six roles backed by the contextual algorithms.
    pub fn for_tree() -> Self {
        HandlerSet::new()
            .on_add(|doc: &mut T, path: &JsonPath, value: &PatchValue| {
                apply_add(doc, path, T::from_json(value.node())).map(drop)
            })
            .on_remove(|doc: &mut T, path: &JsonPath| apply_remove(doc, path).map(drop))
            .on_replace(|doc: &mut T, path: &JsonPath, value: &PatchValue| {
                apply_replace(doc, path, T::from_json(value.node())).map(drop)
            })
            .on_move(|doc: &mut T, from: &JsonPath, path: &JsonPath| {
                apply_move(doc, from, path).map(drop)
            })
            .on_copy(|doc: &mut T, from: &JsonPath, path: &JsonPath| {
                apply_copy(doc, from, path).map(drop)
            })
            .on_test(|doc: &mut T, path: &JsonPath, value: &PatchValue| {
                Ok(get(doc, path)?.equals_json(value.node()))
            })
    }
}
