//! In-memory representation of the configuration document.
//!
//! A document is a tree of [`Node`]s: every node is either a [`Section`]
//! (an insertion-ordered map of child nodes) or a [`Scalar`] leaf. The tree is
//! converted to and from [`toml`] only at the I/O boundary.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{Error, Result};

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Arrays and datetimes from a hand-edited file, carried through verbatim.
    Other(toml::Value),
}

impl Scalar {
    /// Coerce a raw command-line string into its native scalar type.
    ///
    /// Rules are tried in order: boolean literal (`true`/`false`), integer
    /// literal, finite float literal, and otherwise the string itself. An
    /// integer literal outside the `i64` range stays a string rather than
    /// losing digits as a float.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => return Scalar::Boolean(true),
            "false" => return Scalar::Boolean(false),
            _ => {}
        }

        if let Ok(i) = raw.parse::<i64>() {
            return Scalar::Integer(i);
        }

        let has_fraction_or_exponent = raw.contains(|c: char| matches!(c, '.' | 'e' | 'E'));
        if !has_fraction_or_exponent {
            return Scalar::String(raw.to_string());
        }

        if let Ok(f) = raw.parse::<f64>() {
            // Rejects "inf", "nan" and friends, which TOML spells differently.
            if f.is_finite() {
                return Scalar::Float(f);
            }
        }

        Scalar::String(raw.to_string())
    }

    /// Get the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a TOML value.
    pub fn to_toml(&self) -> toml::Value {
        match self {
            Scalar::String(s) => toml::Value::String(s.clone()),
            Scalar::Integer(i) => toml::Value::Integer(*i),
            Scalar::Float(f) => toml::Value::Float(*f),
            Scalar::Boolean(b) => toml::Value::Boolean(*b),
            Scalar::Other(v) => v.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_toml()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Section(Section),
    Scalar(Scalar),
}

impl Node {
    /// Get the section, if this node is one.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Node::Section(section) => Some(section),
            Node::Scalar(_) => None,
        }
    }

    /// Get the scalar, if this node is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            Node::Section(_) => None,
        }
    }

    /// Convert to a TOML value.
    pub fn to_toml(&self) -> toml::Value {
        match self {
            Node::Section(section) => toml::Value::Table(section.to_toml()),
            Node::Scalar(scalar) => scalar.to_toml(),
        }
    }
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::Table(table) => Node::Section(Section::from(table)),
            toml::Value::String(s) => Node::Scalar(Scalar::String(s)),
            toml::Value::Integer(i) => Node::Scalar(Scalar::Integer(i)),
            toml::Value::Float(f) => Node::Scalar(Scalar::Float(f)),
            toml::Value::Boolean(b) => Node::Scalar(Scalar::Boolean(b)),
            other => Node::Scalar(Scalar::Other(other)),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::from(s))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::from(s))
    }
}

impl From<Section> for Node {
    fn from(section: Section) -> Self {
        Node::Section(section)
    }
}

/// An insertion-ordered mapping of keys to nodes.
///
/// Replacing an existing key keeps its original position; new keys are
/// appended. Order only affects output: two sections with the same keys
/// mapping to equal nodes compare equal.
#[derive(Debug, Clone, Default)]
pub struct Section {
    entries: Vec<(String, Node)>,
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, node)| other.get(key).is_some_and(|theirs| theirs == node))
    }
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(key, node);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert a node, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let node = node.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, node)),
            None => {
                self.entries.push((key, node));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert `node` at `leaf` below the chain of `sections`.
    ///
    /// Existing sections along the chain are descended into. Anything else at
    /// a section position is replaced, in place, with a new section.
    pub(crate) fn insert_path(&mut self, sections: &[String], leaf: &str, node: Node) {
        let Some((name, rest)) = sections.split_first() else {
            self.insert(leaf, node);
            return;
        };

        if let Some(Node::Section(child)) = self.get_mut(name) {
            child.insert_path(rest, leaf, node);
            return;
        }

        let mut child = Section::new();
        child.insert_path(rest, leaf, node);
        self.insert(name.clone(), child);
    }

    /// Convert to a TOML table, preserving key order.
    pub fn to_toml(&self) -> toml::Table {
        let mut table = toml::Table::new();
        for (key, node) in &self.entries {
            table.insert(key.clone(), node.to_toml());
        }
        table
    }
}

impl IntoIterator for Section {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<toml::Table> for Section {
    fn from(table: toml::Table) -> Self {
        Self {
            entries: table
                .into_iter()
                .map(|(key, value)| (key, Node::from(value)))
                .collect(),
        }
    }
}

/// The whole configuration document: a root section of top-level keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    root: Section,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from TOML text.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(text)?;
        Ok(Self::from(Section::from(table)))
    }

    /// Serialize the document to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        // Serializing through `toml::Value` emits bare keys before tables
        // regardless of their position in the section.
        let value = toml::Value::Table(self.root.to_toml());
        toml::to_string(&value).map_err(Error::from)
    }

    /// Get the root section.
    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Consume the document, returning its root section.
    pub fn into_root(self) -> Section {
        self.root
    }
}

impl From<Section> for ConfigDocument {
    fn from(root: Section) -> Self {
        Self { root }
    }
}

impl Deref for ConfigDocument {
    type Target = Section;

    fn deref(&self) -> &Section {
        &self.root
    }
}

impl DerefMut for ConfigDocument {
    fn deref_mut(&mut self) -> &mut Section {
        &mut self.root
    }
}
