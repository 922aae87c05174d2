//! The tree a patch is applied to.
//!
//! The patch algorithms never look inside a concrete document type; they go
//! through [`Node`]. `serde_json::Value` is the implementation shipped here.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    Scalar,
}

/// Child access, mutation and equality on a JSON-shaped tree.
///
/// Property methods only act on objects and element methods only on arrays;
/// on any other node they return `None` (or do nothing).
pub trait Node: Clone {
    fn kind(&self) -> NodeKind;

    fn get_property(&self, name: &str) -> Option<&Self>;

    fn get_property_mut(&mut self, name: &str) -> Option<&mut Self>;

    fn get_element(&self, index: usize) -> Option<&Self>;

    fn get_element_mut(&mut self, index: usize) -> Option<&mut Self>;

    /// Insert or overwrite a property, returning the previous value.
    fn set_property(&mut self, name: &str, value: Self) -> Option<Self>;

    /// Remove a property, keeping the order of the ones that remain.
    fn remove_property(&mut self, name: &str) -> Option<Self>;

    /// Position of a property among its siblings, for trees that keep
    /// insertion order.
    fn property_position(&self, _name: &str) -> Option<usize> {
        None
    }

    /// Insert a property at `position`. Unordered trees ignore the position.
    fn insert_property_at(&mut self, _position: usize, name: &str, value: Self) -> Option<Self> {
        self.set_property(name, value)
    }

    /// Insert at `index`, shifting later elements right. `index` must be at
    /// most [`Node::element_count`].
    fn insert_element(&mut self, index: usize, value: Self);

    /// Remove at `index`, shifting later elements left.
    fn remove_element(&mut self, index: usize) -> Option<Self>;

    /// Number of elements of an array, zero for anything else.
    fn element_count(&self) -> usize;

    fn deep_equals(&self, other: &Self) -> bool;

    /// Convert a patch payload into a node.
    fn from_json(value: &Value) -> Self;

    /// Compare against a patch payload.
    fn equals_json(&self, value: &Value) -> bool {
        self.deep_equals(&Self::from_json(value))
    }
}

impl Node for Value {
    fn kind(&self) -> NodeKind {
        match self {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            _ => NodeKind::Scalar,
        }
    }

    fn get_property(&self, name: &str) -> Option<&Self> {
        self.as_object()?.get(name)
    }

    fn get_property_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.as_object_mut()?.get_mut(name)
    }

    fn get_element(&self, index: usize) -> Option<&Self> {
        self.as_array()?.get(index)
    }

    fn get_element_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.as_array_mut()?.get_mut(index)
    }

    fn set_property(&mut self, name: &str, value: Self) -> Option<Self> {
        self.as_object_mut()?.insert(name.to_string(), value)
    }

    fn remove_property(&mut self, name: &str) -> Option<Self> {
        self.as_object_mut()?.shift_remove(name)
    }

    fn property_position(&self, name: &str) -> Option<usize> {
        self.as_object()?.keys().position(|key| key == name)
    }

    fn insert_property_at(&mut self, position: usize, name: &str, value: Self) -> Option<Self> {
        let map = self.as_object_mut()?;
        let position = position.min(map.len());
        map.shift_insert(position, name.to_string(), value)
    }

    fn insert_element(&mut self, index: usize, value: Self) {
        if let Value::Array(items) = self {
            if index <= items.len() {
                items.insert(index, value);
            }
        }
    }

    fn remove_element(&mut self, index: usize) -> Option<Self> {
        let items = self.as_array_mut()?;
        (index < items.len()).then(|| items.remove(index))
    }

    fn element_count(&self) -> usize {
        self.as_array().map_or(0, Vec::len)
    }

    fn deep_equals(&self, other: &Self) -> bool {
        self == other
    }

    fn from_json(value: &Value) -> Self {
        value.clone()
    }

    fn equals_json(&self, value: &Value) -> bool {
        self == value
    }
}
