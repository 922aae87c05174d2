//! Structured JSON Pointer paths.
//!
//! A [`JsonPath`] keeps, for every pointer token, two independent readings:
//! a [`PropertySegment`] (the token as an object key) and an
//! [`ElementSegment`] (the token as an array index or the `-` marker).
//! Parsing only records which readings are possible; code walking a real
//! tree picks the facet that matches the node it finds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::{escape_component, is_valid_index, parse_json_pointer, LAST_ELEMENT_MARKER};
use crate::validate::validate_path;
use crate::JsonPointerError;

static EMPTY_PROPERTY: PropertySegment = PropertySegment { name: None };
static EMPTY_ELEMENT: ElementSegment = ElementSegment { target: None };

// ── Property facet ────────────────────────────────────────────────────────

/// A pointer token read as an object property name.
///
/// Absent when the token is empty or is the `-` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertySegment {
    name: Option<String>,
}

impl PropertySegment {
    fn classify(token: &str) -> Self {
        if token.is_empty() || token == LAST_ELEMENT_MARKER {
            return Self::default();
        }
        Self {
            name: Some(token.to_string()),
        }
    }

    pub fn exists(&self) -> bool {
        self.name.is_some()
    }

    /// The unescaped property name, if this token can be a property.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// ── Element facet ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ElementTarget {
    Index(usize),
    Last,
}

/// A pointer token read as an array element reference.
///
/// Absent when the token is neither a canonical non-negative integer nor the
/// `-` marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElementSegment {
    target: Option<ElementTarget>,
}

impl ElementSegment {
    fn classify(token: &str) -> Self {
        if token == LAST_ELEMENT_MARKER {
            return Self {
                target: Some(ElementTarget::Last),
            };
        }
        if !is_valid_index(token) {
            return Self::default();
        }
        // Digits that overflow usize cannot address any array.
        Self {
            target: token.parse().ok().map(ElementTarget::Index),
        }
    }

    pub fn exists(&self) -> bool {
        self.target.is_some()
    }

    /// The numeric index, `None` for the `-` marker or a non-element token.
    pub fn index(&self) -> Option<usize> {
        match self.target {
            Some(ElementTarget::Index(i)) => Some(i),
            _ => None,
        }
    }

    pub fn is_last_element_marker(&self) -> bool {
        self.target == Some(ElementTarget::Last)
    }

    /// Position of an *existing* element in an array of `len` elements.
    ///
    /// The `-` marker designates the last element, so it fails on an empty
    /// array.
    pub fn existing_index(&self, len: usize) -> Option<usize> {
        match self.target? {
            ElementTarget::Index(i) if i < len => Some(i),
            ElementTarget::Index(_) => None,
            ElementTarget::Last => len.checked_sub(1),
        }
    }

    /// Position at which a new element is inserted into an array of `len`
    /// elements. The `-` marker appends.
    pub fn insertion_index(&self, len: usize) -> Option<usize> {
        match self.target? {
            ElementTarget::Index(i) if i <= len => Some(i),
            ElementTarget::Index(_) => None,
            ElementTarget::Last => Some(len),
        }
    }
}

// ── Segment ───────────────────────────────────────────────────────────────

/// One unescaped pointer token with both of its readings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    token: String,
    property: PropertySegment,
    element: ElementSegment,
}

impl PathSegment {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            property: PropertySegment::classify(&token),
            element: ElementSegment::classify(&token),
            token,
        }
    }

    /// The unescaped token as it appeared in the pointer.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn property(&self) -> &PropertySegment {
        &self.property
    }

    pub fn element(&self) -> &ElementSegment {
        &self.element
    }

    /// `false` when neither facet exists; such a segment cannot address
    /// anything.
    pub fn is_resolvable(&self) -> bool {
        self.property.exists() || self.element.exists()
    }
}

// ── Path ──────────────────────────────────────────────────────────────────

/// A parsed JSON Pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
    pointer: String,
}

impl JsonPath {
    /// Resolve a pointer string.
    ///
    /// # Errors
    ///
    /// [`JsonPointerError::InvalidSyntax`] for a missing leading `/` or a stray
    /// `~`; [`JsonPointerError::PointerTooLong`] / [`JsonPointerError::PathTooLong`]
    /// when the configured limits are exceeded.
    pub fn parse(pointer: &str) -> Result<Self, JsonPointerError> {
        let tokens = parse_json_pointer(pointer)?;
        let path = Self::from_tokens(tokens)?;
        tracing::trace!(pointer, segments = path.len(), "resolved JSON pointer");
        Ok(path)
    }

    /// The empty pointer, addressing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from already unescaped tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, JsonPointerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<PathSegment> = tokens.into_iter().map(PathSegment::new).collect();
        validate_path(&segments.iter().map(PathSegment::token).collect::<Vec<_>>())?;
        Ok(Self::from_segments(segments))
    }

    fn from_segments(segments: Vec<PathSegment>) -> Self {
        let mut pointer = String::new();
        for segment in &segments {
            pointer.push('/');
            pointer.push_str(&escape_component(segment.token()));
        }
        Self { segments, pointer }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&PathSegment> {
        self.segments.get(index)
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The property facet of segment `index`. Never fails: an out-of-range
    /// index yields a segment whose [`PropertySegment::exists`] is `false`.
    pub fn property(&self, index: usize) -> &PropertySegment {
        self.segments
            .get(index)
            .map_or(&EMPTY_PROPERTY, PathSegment::property)
    }

    /// The element facet of segment `index`. Never fails: an out-of-range
    /// index yields a segment whose [`ElementSegment::exists`] is `false`.
    pub fn element(&self, index: usize) -> &ElementSegment {
        self.segments
            .get(index)
            .map_or(&EMPTY_ELEMENT, PathSegment::element)
    }

    /// Whether segment `index` is the last addressable one, i.e. segment
    /// `index + 1` is missing or has neither a property nor an element facet.
    ///
    /// For `/a/b/c`, `ends_at(2)` is true while `ends_at(1)` is false.
    pub fn ends_at(&self, index: usize) -> bool {
        let next = index.saturating_add(1);
        !self.property(next).exists() && !self.element(next).exists()
    }

    /// Unescaped tokens, front to back.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(PathSegment::token)
    }

    /// The path without its last segment.
    pub fn parent(&self) -> Result<JsonPath, JsonPointerError> {
        match self.segments.split_last() {
            Some((_, init)) => Ok(Self::from_segments(init.to_vec())),
            None => Err(JsonPointerError::NoParent),
        }
    }

    /// `true` when `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &JsonPath) -> bool {
        self.len() <= other.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.token == b.token)
    }

    /// The canonical (re-escaped) pointer string.
    pub fn as_pointer(&self) -> &str {
        &self.pointer
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer)
    }
}

impl FromStr for JsonPath {
    type Err = JsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}

impl Serialize for JsonPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pointer)
    }
}

impl<'de> Deserialize<'de> for JsonPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pointer = String::deserialize(deserializer)?;
        JsonPath::parse(&pointer).map_err(serde::de::Error::custom)
    }
}
