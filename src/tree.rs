//! Locale tree data model
//!
//! A locale file is a JSON object whose values are either translatable
//! strings or nested objects:
//!
//! ```json
//! {
//!   "header": { "title": "Flash {{boardName}}" },
//!   "ok": "OK"
//! }
//! ```
//!
//! Leaves are addressed by a [`LeafPath`], written dot-joined
//! (`header.title`). Values that are neither strings nor objects are kept
//! as [`LocaleTree::Opaque`] so they survive a read/write cycle, but the
//! sync engine never diffs, translates or descends into them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a leaf whose translation previously failed
pub const SENTINEL_PREFIX: &str = "TODO: ";

/// Returns true if a target value carries the failure marker
pub fn is_sentinel(value: &str) -> bool {
    value.starts_with(SENTINEL_PREFIX)
}

/// Build the failure marker for an untranslated source text
pub fn mark_failed(original: &str) -> String {
    format!("{}{}", SENTINEL_PREFIX, original)
}

/// A node in a locale tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleTree {
    /// A translatable string
    Leaf(String),
    /// A mapping from key to subtree, in file order
    Node(IndexMap<String, LocaleTree>),
    /// Arrays, numbers, booleans and null. Carried through untouched.
    Opaque(serde_json::Value),
}

impl LocaleTree {
    /// An empty mapping
    pub fn empty() -> Self {
        LocaleTree::Node(IndexMap::new())
    }

    pub fn leaf(text: impl Into<String>) -> Self {
        LocaleTree::Leaf(text.into())
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            LocaleTree::Leaf(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&IndexMap<String, LocaleTree>> {
        match self {
            LocaleTree::Node(children) => Some(children),
            _ => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, LocaleTree::Node(_))
    }

    /// Look up a direct child. Leaves and opaque values have no children.
    pub fn get(&self, key: &str) -> Option<&LocaleTree> {
        self.as_node().and_then(|children| children.get(key))
    }

    /// Look up the value at `path`, if every segment resolves
    pub fn get_path(&self, path: &LeafPath) -> Option<&LocaleTree> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// Convenience accessor for the string leaf at a dotted path
    pub fn get_leaf(&self, dotted: &str) -> Option<&str> {
        let path = LeafPath::parse(dotted)?;
        self.get_path(&path).and_then(LocaleTree::as_leaf)
    }
}

impl Default for LocaleTree {
    fn default() -> Self {
        LocaleTree::empty()
    }
}

/// Address of one leaf: non-empty key segments, none containing `.`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LeafPath(Vec<String>);

impl LeafPath {
    /// The empty path, i.e. the tree root
    pub fn root() -> Self {
        LeafPath(Vec::new())
    }

    /// Parse a dotted path. Returns `None` for an empty path or an empty segment.
    pub fn parse(dotted: &str) -> Option<Self> {
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(LeafPath(segments))
    }

    /// Extend this path by one key
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        LeafPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for LeafPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_tree() {
        let tree: LocaleTree = serde_json::from_value(json!({
            "header": { "title": "Armbian" },
            "ok": "OK"
        }))
        .unwrap();

        assert!(tree.is_node());
        assert_eq!(tree.get_leaf("header.title"), Some("Armbian"));
        assert_eq!(tree.get_leaf("ok"), Some("OK"));
        assert_eq!(tree.get_leaf("header.missing"), None);
    }

    #[test]
    fn test_key_order_survives_round_trip() {
        let source = r#"{"zeta":"z","alpha":{"beta":"b","aaa":"a"},"mid":"m"}"#;
        let tree: LocaleTree = serde_json::from_str(source).unwrap();
        assert_eq!(serde_json::to_string(&tree).unwrap(), source);
    }

    #[test]
    fn test_non_string_values_are_opaque() {
        let tree: LocaleTree = serde_json::from_value(json!({
            "list": ["a", "b"],
            "count": 3,
            "flag": true,
            "nothing": null
        }))
        .unwrap();

        for key in ["list", "count", "flag", "nothing"] {
            assert!(
                matches!(tree.get(key), Some(LocaleTree::Opaque(_))),
                "{} should be opaque",
                key
            );
        }
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"list": ["a", "b"], "count": 3, "flag": true, "nothing": null})
        );
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = LocaleTree::leaf("text");
        assert!(leaf.get("anything").is_none());
        assert_eq!(leaf.as_leaf(), Some("text"));
    }

    #[test]
    fn test_sentinel_helpers() {
        assert!(is_sentinel("TODO: Hello"));
        assert!(!is_sentinel("TODO:Hello"));
        assert!(!is_sentinel("Hello TODO: "));
        assert_eq!(mark_failed("Hello {{name}}"), "TODO: Hello {{name}}");
    }

    #[test]
    fn test_leaf_path_parse_and_display() {
        let path = LeafPath::parse("flash.progress.title").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "flash.progress.title");

        assert!(LeafPath::parse("").is_none());
        assert!(LeafPath::parse("a..b").is_none());
        assert!(LeafPath::parse(".a").is_none());
    }

    #[test]
    fn test_leaf_path_child() {
        let root = LeafPath::root();
        assert!(root.segments().is_empty());
        assert_eq!(root.to_string(), "");

        let nested = root.child("modal").child("title");
        assert_eq!(nested.to_string(), "modal.title");
        assert!(root.segments().is_empty());
    }
}
