//! Shared-ownership JSON tree.
//!
//! A [`Document`] is a cheap handle over an `Arc`'d [`Node`]. Inserting a
//! handle into a parent clones the handle, which bumps the strong count of the
//! child sub-tree; dropping the parent drops its child handles and any
//! sub-tree whose last handle goes away is freed with it.
//!
//! Mutation is copy-on-write: editing a node that is also held elsewhere
//! clones that one node (its children stay shared), so a sub-tree handed to
//! another owner is never changed underneath it.

mod codec;

use std::{fmt, sync::Arc};

pub use serde_json::Number;

/// The kind of value a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A single node of the tree. Children are [`Document`] handles, so cloning a
/// node is shallow.
#[derive(Debug, Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Document>),
    /// Keys keep insertion order; inserting an existing key replaces its value
    /// in place.
    Object(Vec<(String, Document)>),
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Null => Kind::Null,
            Node::Bool(_) => Kind::Bool,
            Node::Number(_) => Kind::Number,
            Node::String(_) => Kind::String,
            Node::Array(_) => Kind::Array,
            Node::Object(_) => Kind::Object,
        }
    }
}

/// Raised when an edit targets a node of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    KindMismatch { expected: Kind, found: Kind },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::KindMismatch { expected, found } => {
                write!(f, "Expected a JSON {expected}, found a JSON {found}")
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Handle to a shared, reference-counted JSON node.
#[derive(Clone)]
pub struct Document(Arc<Node>);

impl Document {
    pub fn new(node: Node) -> Self {
        Self(Arc::new(node))
    }

    pub fn null() -> Self {
        Self::new(Node::Null)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(Node::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Node::String(value.into()))
    }

    pub fn number(value: impl Into<Number>) -> Self {
        Self::new(Node::Number(value.into()))
    }

    /// Non-finite floats have no JSON form and become `null`.
    pub fn float(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Self::new(Node::Number(n)),
            None => Self::null(),
        }
    }

    /// An empty array.
    pub fn array() -> Self {
        Self::new(Node::Array(Vec::new()))
    }

    /// An empty object.
    pub fn object() -> Self {
        Self::new(Node::Object(Vec::new()))
    }

    /// Builds an object from `(key, value)` pairs. Later duplicates replace
    /// earlier ones, keeping the first key's position.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Document)>,
    {
        let mut fields: Vec<(String, Document)> = Vec::new();
        for (key, value) in entries {
            insert_field(&mut fields, key.into(), value);
        }
        Self::new(Node::Object(fields))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn kind(&self) -> Kind {
        self.0.kind()
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.node() {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.node() {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.node() {
            Node::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.node() {
            Node::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.node() {
            Node::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self.node() {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Object fields in insertion order.
    pub fn entries(&self) -> Option<&[(String, Document)]> {
        match self.node() {
            Node::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up `key` on an object. Non-objects have no keys.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Looks up `key` and returns it only if it holds a node of `kind`.
    pub fn get_typed(&self, key: &str, kind: Kind) -> Option<&Document> {
        self.get(key).filter(|v| v.kind() == kind)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of elements for arrays and fields for objects; zero otherwise.
    pub fn len(&self) -> usize {
        match self.node() {
            Node::Array(items) => items.len(),
            Node::Object(fields) => fields.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `value` under `key`, returning the handle it replaced.
    ///
    /// The value handle is moved in, so the parent now holds one strong
    /// reference to it. If this node is shared with another owner it is
    /// copied first.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Document,
    ) -> Result<Option<Document>, DocumentError> {
        let found = self.ensure_kind(Kind::Object)?;
        match Arc::make_mut(&mut self.0) {
            Node::Object(fields) => Ok(insert_field(fields, key.into(), value)),
            _ => Err(DocumentError::KindMismatch {
                expected: Kind::Object,
                found,
            }),
        }
    }

    /// Removes `key` from an object, handing back its handle.
    pub fn remove(&mut self, key: &str) -> Result<Option<Document>, DocumentError> {
        let found = self.ensure_kind(Kind::Object)?;
        match Arc::make_mut(&mut self.0) {
            Node::Object(fields) => {
                let removed = fields
                    .iter()
                    .position(|(k, _)| k == key)
                    .map(|idx| fields.remove(idx).1);
                Ok(removed)
            }
            _ => Err(DocumentError::KindMismatch {
                expected: Kind::Object,
                found,
            }),
        }
    }

    /// Appends `value` to an array.
    pub fn push(&mut self, value: Document) -> Result<(), DocumentError> {
        let found = self.ensure_kind(Kind::Array)?;
        match Arc::make_mut(&mut self.0) {
            Node::Array(items) => {
                items.push(value);
                Ok(())
            }
            _ => Err(DocumentError::KindMismatch {
                expected: Kind::Array,
                found,
            }),
        }
    }

    /// Fails before any copy-on-write happens, so a rejected edit never
    /// detaches this handle from its co-owners.
    fn ensure_kind(&self, expected: Kind) -> Result<Kind, DocumentError> {
        match self.kind() {
            found if found == expected => Ok(found),
            found => Err(DocumentError::KindMismatch { expected, found }),
        }
    }

    /// Number of live handles to this node, the caller's included.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// `true` when both handles point at the same node.
    pub fn ptr_eq(a: &Document, b: &Document) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

fn insert_field(fields: &mut Vec<(String, Document)>, key: String, value: Document) -> Option<Document> {
    match fields.iter_mut().find(|(k, _)| *k == key) {
        Some((_, slot)) => Some(std::mem::replace(slot, value)),
        None => {
            fields.push((key, value));
            None
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        if Document::ptr_eq(self, other) {
            return true;
        }
        match (self.node(), other.node()) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => a == b,
            // object equality ignores key order
            (Node::Object(a), Node::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| other.get(k).is_some_and(|w| v == w))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Null => f.write_str("null"),
            Node::Bool(b) => write!(f, "{b}"),
            Node::Number(n) => write!(f, "{n}"),
            Node::String(s) => write!(f, "{s:?}"),
            Node::Array(items) => f.debug_list().entries(items).finish(),
            Node::Object(fields) => f
                .debug_map()
                .entries(fields.iter().map(|(k, v)| (k, v)))
                .finish(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::null()
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Self::bool(value)
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Self::number(value)
    }
}

impl From<u64> for Document {
    fn from(value: u64) -> Self {
        Self::number(value)
    }
}

impl From<f64> for Document {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Self::new(Node::Array(items))
    }
}

impl FromIterator<Document> for Document {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(Node::Array(iter.into_iter().collect()))
    }
}
