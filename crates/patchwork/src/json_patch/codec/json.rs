//! JSON codec for JSON Patch instructions.
//!
//! Converts instructions to/from `serde_json::Value` in the RFC 6902 wire
//! format: `{"op": ..., "path": ..., "value": ..., "from": ...}`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::json_patch::types::{
    ApplyError, PatchDocument, PatchError, PatchInstruction, PatchOperationKind, PatchValue,
};
use crate::json_patch::validate::missing_field;

// ── Field helpers ─────────────────────────────────────────────────────────

fn decode_op(obj: &Map<String, Value>) -> Result<PatchOperationKind, PatchError> {
    match obj.get("op") {
        None => Err(PatchError::InvalidPayload(
            "operation is missing \"op\"".into(),
        )),
        Some(Value::String(s)) => s.parse(),
        Some(_) => Err(PatchError::InvalidPayload("\"op\" must be a string".into())),
    }
}

fn decode_pointer(
    obj: &Map<String, Value>,
    op: PatchOperationKind,
    key: &str,
) -> Result<Option<String>, PatchError> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(PatchError::InvalidPayload(format!(
            "\"{key}\" of \"{op}\" operation must be a string"
        ))),
    }
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an instruction to a `serde_json::Value` in the JSON Patch
/// format. Absent members are omitted.
pub fn to_json(instruction: &PatchInstruction) -> Value {
    let mut m = Map::new();
    m.insert("op".into(), Value::String(instruction.op().as_str().into()));
    m.insert("path".into(), Value::String(instruction.path().into()));
    if let Some(value) = instruction.value() {
        m.insert("value".into(), value.node().clone());
    }
    if let Some(from) = instruction.from() {
        m.insert("from".into(), Value::String(from.into()));
    }
    Value::Object(m)
}

/// Serialize a patch document to a JSON array.
pub fn to_json_patch(document: &PatchDocument) -> Value {
    Value::Array(document.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one instruction.
///
/// `op` is inspected first. Members the operation does not use are dropped.
pub fn from_json(v: &Value) -> Result<PatchInstruction, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidPayload("operation must be an object".into()))?;
    let op = decode_op(obj)?;
    let path = decode_pointer(obj, op, "path")?.ok_or_else(|| missing_field(op, "path"))?;
    let value = if op.requires_value() {
        obj.get("value").cloned().map(PatchValue::new)
    } else {
        None
    };
    let from = if op.requires_from() {
        decode_pointer(obj, op, "from")?
    } else {
        None
    };
    PatchInstruction::new(op, path, value, from)
}

/// Deserialize a JSON array into a patch document.
///
/// The error names the index of the first instruction that failed to decode.
pub fn from_json_patch(v: &Value) -> Result<PatchDocument, ApplyError> {
    let arr = v.as_array().ok_or_else(|| ApplyError {
        index: 0,
        op: None,
        path: String::new(),
        error: PatchError::InvalidPayload("patch must be an array".into()),
    })?;
    arr.iter()
        .enumerate()
        .map(|(index, item)| {
            from_json(item).map_err(|error| ApplyError {
                index,
                op: item
                    .get("op")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse().ok()),
                path: item
                    .get("path")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                error,
            })
        })
        .collect()
}

// ── serde ─────────────────────────────────────────────────────────────────

impl Serialize for PatchInstruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PatchInstruction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        from_json(&v).map_err(serde::de::Error::custom)
    }
}

impl Serialize for PatchDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json_patch(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PatchDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        from_json_patch(&v).map_err(serde::de::Error::custom)
    }
}
