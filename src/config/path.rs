//! Dotted-path addressing of document values.
//!
//! A key such as `github.user` names the `user` leaf of the `github`
//! section. Assignment creates missing sections on the way down and returns
//! the minimal subtree that was written, for echoing back to the user.

use super::document::{ConfigDocument, Node, Scalar, Section};
use super::schema::REPO_CHOICE_KEY;
use crate::{Error, Result};

/// A validated assignment target: `sections.leaf = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct DottedPath {
    sections: Vec<String>,
    leaf: String,
    value: Scalar,
}

/// Split a dotted key, rejecting empty segments.
fn split_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::InvalidPath(format!(
            "empty segment in key '{}'",
            key
        )));
    }
    Ok(segments)
}

impl DottedPath {
    /// Parse a dotted key and a raw command-line value.
    ///
    /// The value is coerced with [`Scalar::coerce`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the key has fewer than two segments,
    /// contains an empty segment, or targets the transient `repo_choice` key.
    pub fn parse(key: &str, raw_value: &str) -> Result<Self> {
        let segments = split_key(key)?;
        Self::new(segments, Scalar::coerce(raw_value))
    }

    /// Build a path from explicit segments and an already typed value.
    pub fn new<I, S>(segments: I, value: Scalar) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sections: Vec<String> = segments.into_iter().map(Into::into).collect();
        let key = sections.join(".");

        if sections.iter().any(String::is_empty) {
            return Err(Error::InvalidPath(format!(
                "empty segment in key '{}'",
                key
            )));
        }
        if sections.len() < 2 {
            return Err(Error::InvalidPath(format!(
                "'{}' must name a section and a key, e.g. github.user",
                key
            )));
        }
        if sections[0] == REPO_CHOICE_KEY {
            return Err(Error::InvalidPath(format!(
                "'{}' is not a configurable setting",
                REPO_CHOICE_KEY
            )));
        }

        // Length checked above.
        let leaf = sections.pop().unwrap_or_default();
        Ok(Self {
            sections,
            leaf,
            value,
        })
    }

    /// Section names leading to the leaf, outermost first.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    pub fn value(&self) -> &Scalar {
        &self.value
    }

    /// The dot-joined key.
    pub fn key(&self) -> String {
        let mut key = self.sections.join(".");
        key.push('.');
        key.push_str(&self.leaf);
        key
    }
}

/// Apply an assignment to `config` in place.
///
/// Existing sections along the path are descended into. Anything else at a
/// section position, including a scalar, is replaced with a new empty
/// section: setting `core.path` when `core` is a string discards the string.
///
/// Returns a document containing only the written path.
pub fn set_path(config: &mut ConfigDocument, path: &DottedPath) -> ConfigDocument {
    config.remove(REPO_CHOICE_KEY);

    config.insert_path(&path.sections, &path.leaf, Node::from(path.value.clone()));

    let mut changed = Section::new().with(path.leaf.clone(), path.value.clone());
    for name in path.sections.iter().rev() {
        changed = Section::new().with(name.clone(), changed);
    }
    ConfigDocument::from(changed)
}

/// Parse `key`/`raw_value` and apply the assignment.
///
/// On error `config` is left untouched.
pub fn set_value(
    config: &mut ConfigDocument,
    key: &str,
    raw_value: &str,
) -> Result<ConfigDocument> {
    let path = DottedPath::parse(key, raw_value)?;
    Ok(set_path(config, &path))
}

/// Look up the node at a dotted key (one or more segments).
pub fn get_path<'a>(config: &'a ConfigDocument, key: &str) -> Result<&'a Node> {
    let segments = split_key(key)?;
    let not_found = || Error::KeyNotFound(key.to_string());

    let (first, rest) = segments.split_first().ok_or_else(not_found)?;
    let mut node = config.get(first).ok_or_else(not_found)?;
    for segment in rest {
        node = node
            .as_section()
            .and_then(|section| section.get(segment))
            .ok_or_else(not_found)?;
    }
    Ok(node)
}

/// Mutable lookup of the scalar at a dotted key, if present.
pub(crate) fn get_scalar_mut<'a>(
    config: &'a mut ConfigDocument,
    key: &str,
) -> Option<&'a mut Scalar> {
    let mut segments = key.split('.');
    let mut node = config.get_mut(segments.next()?)?;
    for segment in segments {
        node = match node {
            Node::Section(section) => section.get_mut(segment)?,
            Node::Scalar(_) => return None,
        };
    }
    match node {
        Node::Scalar(scalar) => Some(scalar),
        Node::Section(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::defaults;

    fn scalar_at<'a>(doc: &'a ConfigDocument, key: &str) -> &'a Scalar {
        get_path(doc, key).unwrap().as_scalar().unwrap()
    }

    // ==================== Parse Tests ====================

    #[test]
    fn test_parse_two_segments() {
        let path = DottedPath::parse("github.user", "ofek").unwrap();
        assert_eq!(path.sections(), ["github".to_string()]);
        assert_eq!(path.leaf(), "user");
        assert_eq!(path.value(), &Scalar::from("ofek"));
        assert_eq!(path.key(), "github.user");
    }

    #[test]
    fn test_parse_coerces_value() {
        let path = DottedPath::parse("agent.port", "8125").unwrap();
        assert_eq!(path.value(), &Scalar::Integer(8125));

        let path = DottedPath::parse("agent.debug", "true").unwrap();
        assert_eq!(path.value(), &Scalar::Boolean(true));
    }

    #[test]
    fn test_parse_single_segment_rejected() {
        let err = DottedPath::parse("core", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn test_parse_empty_segments_rejected() {
        for key in ["", ".user", "github.", "a..b"] {
            assert!(
                matches!(DottedPath::parse(key, "x"), Err(Error::InvalidPath(_))),
                "{:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_parse_repo_choice_rejected() {
        let err = DottedPath::parse("repo_choice.value", "extras").unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    // ==================== Set Tests ====================

    #[test]
    fn test_set_new_value_from_defaults() {
        let mut doc = defaults();
        let original = defaults();

        let changed = set_value(&mut doc, "github.user", "ofek").unwrap();

        assert_eq!(scalar_at(&doc, "github.user"), &Scalar::from("ofek"));
        // Sibling key untouched
        assert_eq!(scalar_at(&doc, "github.token"), &Scalar::from(""));
        for key in ["core", "extras", "pypi"] {
            assert_eq!(doc.get(key), original.get(key));
        }

        let expected = ConfigDocument::from(
            Section::new().with("github", Section::new().with("user", "ofek")),
        );
        assert_eq!(changed, expected);
    }

    #[test]
    fn test_set_creates_nested_sections() {
        let mut doc = defaults();

        let changed = set_value(&mut doc, "agent.dev.image", "datadog/agent:7").unwrap();

        assert_eq!(
            scalar_at(&doc, "agent.dev.image"),
            &Scalar::from("datadog/agent:7")
        );
        assert_eq!(
            doc.keys().collect::<Vec<_>>(),
            vec!["core", "extras", "github", "pypi", "agent"]
        );
        assert_eq!(changed.keys().collect::<Vec<_>>(), vec!["agent"]);
        assert_eq!(
            scalar_at(&changed, "agent.dev.image"),
            &Scalar::from("datadog/agent:7")
        );
    }

    #[test]
    fn test_set_scalar_becomes_section() {
        let mut doc = defaults();
        assert!(doc.get("core").unwrap().as_scalar().is_some());

        set_value(&mut doc, "core.path", "/x").unwrap();

        let core = doc.get("core").and_then(Node::as_section).unwrap();
        assert_eq!(core.len(), 1);
        assert_eq!(scalar_at(&doc, "core.path"), &Scalar::from("/x"));
    }

    #[test]
    fn test_set_overwrites_existing_leaf_in_place() {
        let mut doc = defaults();

        set_value(&mut doc, "pypi.user", "first").unwrap();
        set_value(&mut doc, "pypi.user", "second").unwrap();

        let pypi = doc.get("pypi").and_then(Node::as_section).unwrap();
        assert_eq!(pypi.keys().collect::<Vec<_>>(), vec!["user", "pass"]);
        assert_eq!(scalar_at(&doc, "pypi.user"), &Scalar::from("second"));
    }

    #[test]
    fn test_set_invalid_path_leaves_document_unmodified() {
        let mut doc = defaults();
        doc.insert(REPO_CHOICE_KEY, "core");
        let before = doc.clone();

        let err = set_value(&mut doc, "core", "x").unwrap_err();

        assert!(matches!(err, Error::InvalidPath(_)));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_set_removes_repo_choice() {
        let mut doc = defaults();
        doc.insert(REPO_CHOICE_KEY, "extras");

        set_value(&mut doc, "github.user", "ofek").unwrap();

        assert!(!doc.contains_key(REPO_CHOICE_KEY));
    }

    #[test]
    fn test_set_typed_values() {
        let mut doc = defaults();
        set_value(&mut doc, "agent.retries", "3").unwrap();
        set_value(&mut doc, "agent.ratio", "0.5").unwrap();
        set_value(&mut doc, "agent.enabled", "false").unwrap();

        assert_eq!(scalar_at(&doc, "agent.retries"), &Scalar::Integer(3));
        assert_eq!(scalar_at(&doc, "agent.ratio"), &Scalar::Float(0.5));
        assert_eq!(scalar_at(&doc, "agent.enabled"), &Scalar::Boolean(false));
    }

    // ==================== Get Tests ====================

    #[test]
    fn test_get_path_scalar_and_section() {
        let doc = defaults();

        assert!(get_path(&doc, "github").unwrap().as_section().is_some());
        assert_eq!(scalar_at(&doc, "pypi.pass"), &Scalar::from(""));
        assert!(get_path(&doc, "core").unwrap().as_scalar().is_some());
    }

    #[test]
    fn test_get_path_missing() {
        let doc = defaults();

        assert!(matches!(
            get_path(&doc, "github.missing"),
            Err(Error::KeyNotFound(_))
        ));
        // Descending through a scalar is not found
        assert!(matches!(
            get_path(&doc, "core.path"),
            Err(Error::KeyNotFound(_))
        ));
        assert!(matches!(get_path(&doc, "a..b"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_get_scalar_mut() {
        let mut doc = defaults();

        if let Some(token) = get_scalar_mut(&mut doc, "github.token") {
            *token = Scalar::from("secret");
        }

        assert_eq!(scalar_at(&doc, "github.token"), &Scalar::from("secret"));
        assert!(get_scalar_mut(&mut doc, "github").is_none());
        assert!(get_scalar_mut(&mut doc, "nope.token").is_none());
    }
}
