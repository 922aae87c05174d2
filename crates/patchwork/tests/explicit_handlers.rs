use std::cell::RefCell;

use patchwork::json_patch::{
    from_json_patch, CopyHandler, Handler, HandlerSet, PatchDocument, PatchError,
    PatchOperationKind, PatchValue,
};
use patchwork::JsonPath;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq)]
struct Ticket {
    title: String,
    labels: Vec<String>,
    assignee: Option<String>,
}

fn not_found(path: &JsonPath) -> PatchError {
    PatchError::PathNotFound(path.to_string())
}

fn as_text(value: &Value) -> Result<String, PatchError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PatchError::Handler(format!("expected a string, got {value}")))
}

/// Position in `labels` addressed by `/labels/<i>` or `/labels/-`.
fn label_slot(path: &JsonPath, len: usize, inserting: bool) -> Result<usize, PatchError> {
    if path.len() != 2 || path.property(0).name() != Some("labels") || !path.ends_at(1) {
        return Err(not_found(path));
    }
    let element = path.element(1);
    let slot = if inserting {
        element.insertion_index(len)
    } else {
        element.existing_index(len)
    };
    slot.ok_or_else(|| not_found(path))
}

fn ticket_handlers<'h>() -> HandlerSet<'h, Ticket> {
    HandlerSet::new()
        .on_add(|t: &mut Ticket, path: &JsonPath, value: &PatchValue| {
            if path.as_pointer() == "/assignee" {
                t.assignee = Some(as_text(value.node())?);
                return Ok(());
            }
            let mut at = label_slot(path, t.labels.len(), true)?;
            for label in value.values() {
                t.labels.insert(at, as_text(label)?);
                at += 1;
            }
            Ok(())
        })
        .on_remove(|t: &mut Ticket, path: &JsonPath| {
            if path.as_pointer() == "/assignee" {
                return t.assignee.take().map(drop).ok_or_else(|| not_found(path));
            }
            let at = label_slot(path, t.labels.len(), false)?;
            t.labels.remove(at);
            Ok(())
        })
        .on_replace(|t: &mut Ticket, path: &JsonPath, value: &PatchValue| {
            match path.as_pointer() {
                "/title" => t.title = as_text(value.node())?,
                _ => {
                    let at = label_slot(path, t.labels.len(), false)?;
                    t.labels[at] = as_text(value.node())?;
                }
            }
            Ok(())
        })
        .on_test(|t: &mut Ticket, path: &JsonPath, value: &PatchValue| {
            match path.as_pointer() {
                "/title" => Ok(value.node() == t.title.as_str()),
                "/assignee" => Ok(t.assignee.as_deref() == value.node().as_str()),
                _ => Err(not_found(path)),
            }
        })
}

fn patch(raw: Value) -> PatchDocument {
    from_json_patch(&raw).unwrap()
}

#[test]
fn handlers_map_paths_onto_fields() {
    let mut ticket = Ticket {
        title: "Crash on start".into(),
        labels: vec!["bug".into()],
        assignee: None,
    };
    ticket_handlers()
        .apply(
            &mut ticket,
            &patch(json!([
                {"op": "test", "path": "/title", "value": "Crash on start"},
                {"op": "replace", "path": "/title", "value": "Crash on startup"},
                {"op": "add", "path": "/labels/-", "value": ["p1", "ui"]},
                {"op": "add", "path": "/labels/0", "value": "triaged"},
                {"op": "remove", "path": "/labels/-"},
                {"op": "add", "path": "/assignee", "value": "sam"}
            ])),
        )
        .unwrap();
    assert_eq!(
        ticket,
        Ticket {
            title: "Crash on startup".into(),
            labels: vec!["triaged".into(), "bug".into(), "p1".into()],
            assignee: Some("sam".into()),
        }
    );
}

#[test]
fn unregistered_kinds_fail_with_their_kind() {
    let mut handlers = ticket_handlers();
    assert!(!handlers.supports(PatchOperationKind::Move));
    let mut ticket = Ticket::default();
    let err = handlers
        .apply(
            &mut ticket,
            &patch(json!([{"op": "move", "from": "/title", "path": "/assignee"}])),
        )
        .unwrap_err();
    assert_eq!(err.index, 0);
    assert_eq!(err.path, "/assignee");
    assert_eq!(
        err.error,
        PatchError::UnsupportedOperation(PatchOperationKind::Move)
    );
}

#[test]
fn test_mismatch_reports_expected_value() {
    let mut ticket = Ticket::default();
    let err = ticket_handlers()
        .apply(
            &mut ticket,
            &patch(json!([{"op": "test", "path": "/assignee", "value": "kim"}])),
        )
        .unwrap_err();
    assert_eq!(
        err.error,
        PatchError::TestFailed {
            path: "/assignee".into(),
            expected: json!("kim"),
        }
    );
}

#[test]
fn domain_errors_stop_the_document() {
    let mut ticket = Ticket::default();
    let err = ticket_handlers()
        .apply(
            &mut ticket,
            &patch(json!([
                {"op": "add", "path": "/labels/-", "value": "ok"},
                {"op": "add", "path": "/labels/-", "value": 7},
                {"op": "add", "path": "/labels/-", "value": "never"}
            ])),
        )
        .unwrap_err();
    assert_eq!(err.index, 1);
    assert!(matches!(err.error, PatchError::Handler(_)));
    // Explicit mode has no working copy: earlier instructions stay applied.
    assert_eq!(ticket.labels, vec!["ok".to_string()]);
}

#[test]
fn pointer_errors_stop_at_their_instruction() {
    let calls = RefCell::new(Vec::new());
    let mut handlers = HandlerSet::new().on_remove(|_: &mut Ticket, path: &JsonPath| {
        calls.borrow_mut().push(path.to_string());
        Ok(())
    });
    let raw = json!([
        {"op": "remove", "path": "/labels/0"},
        {"op": "remove", "path": "labels"}
    ]);
    let err = handlers
        .apply(&mut Ticket::default(), &patch(raw))
        .unwrap_err();
    assert_eq!(err.index, 1);
    assert!(matches!(err.error, PatchError::InvalidPointerSyntax(_)));
    drop(handlers);
    // Pointer syntax is checked per instruction, so the first one ran.
    assert_eq!(calls.into_inner(), vec!["/labels/0".to_string()]);
}

#[test]
fn struct_handlers_register_by_role() {
    struct CopyLabels;

    impl CopyHandler<Ticket> for CopyLabels {
        fn copy(
            &mut self,
            t: &mut Ticket,
            from: &JsonPath,
            path: &JsonPath,
        ) -> Result<(), PatchError> {
            let src = label_slot(from, t.labels.len(), false)?;
            let dst = label_slot(path, t.labels.len(), true)?;
            let label = t.labels[src].clone();
            t.labels.insert(dst, label);
            Ok(())
        }
    }

    let mut handlers = ticket_handlers();
    handlers.register(Handler::Copy(Box::new(CopyLabels)));
    assert!(handlers.supports(PatchOperationKind::Copy));

    let mut ticket = Ticket {
        labels: vec!["a".into(), "b".into()],
        ..Ticket::default()
    };
    handlers
        .apply(
            &mut ticket,
            &patch(json!([{"op": "copy", "from": "/labels/0", "path": "/labels/-"}])),
        )
        .unwrap();
    assert_eq!(ticket.labels, vec!["a", "b", "a"]);
}

#[test]
fn tree_handlers_apply_like_contextual_mode() {
    let mut handlers = HandlerSet::<Value>::for_tree();
    let mut doc = json!({"items": ["a", "b", "c"]});
    handlers
        .apply(
            &mut doc,
            &patch(json!([
                {"op": "move", "from": "/items/0", "path": "/items/2"},
                {"op": "copy", "from": "/items/-", "path": "/last"},
                {"op": "test", "path": "/last", "value": "a"}
            ])),
        )
        .unwrap();
    assert_eq!(doc, json!({"items": ["b", "c", "a"], "last": "a"}));
}
