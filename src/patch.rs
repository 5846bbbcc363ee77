use indexmap::IndexMap;
use tracing::debug;

use crate::tree::{LeafPath, LocaleTree};

/// Write `value` at `path`, creating intermediate mappings as needed.
///
/// An intermediate segment that currently holds a leaf or an opaque value
/// is replaced by an empty mapping; whatever it held is lost. The root is
/// treated the same way. Writing at the root path is a no-op.
pub fn set_by_path(tree: &mut LocaleTree, path: &LeafPath, value: LocaleTree) {
    let Some((last, parents)) = path.segments().split_last() else {
        return;
    };

    let mut current = tree;
    for segment in parents {
        let children = ensure_node(current, segment);
        current = children
            .entry(segment.clone())
            .or_insert_with(LocaleTree::empty);
    }

    ensure_node(current, last).insert(last.clone(), value);
}

fn ensure_node<'a>(
    node: &'a mut LocaleTree,
    segment: &str,
) -> &'a mut IndexMap<String, LocaleTree> {
    if !node.is_node() {
        debug!("Replacing non-mapping value with a mapping to insert '{}'", segment);
        *node = LocaleTree::empty();
    }
    match node {
        LocaleTree::Node(children) => children,
        _ => unreachable!("node was just replaced by a mapping"),
    }
}

/// Write a string leaf at `path`
pub fn set_leaf(tree: &mut LocaleTree, path: &LeafPath, text: impl Into<String>) {
    set_by_path(tree, path, LocaleTree::Leaf(text.into()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(dotted: &str) -> LeafPath {
        LeafPath::parse(dotted).unwrap()
    }

    #[test]
    fn test_set_top_level_leaf() {
        let mut tree = LocaleTree::empty();
        set_leaf(&mut tree, &path("ok"), "OK");
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!({"ok": "OK"}));
    }

    #[test]
    fn test_creates_intermediate_mappings() {
        let mut tree = LocaleTree::empty();
        set_leaf(&mut tree, &path("a.b.c"), "deep");
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"a": {"b": {"c": "deep"}}})
        );
    }

    #[test]
    fn test_preserves_siblings_in_existing_mapping() {
        let mut tree: LocaleTree =
            serde_json::from_value(json!({"modal": {"title": "Titel", "x": "X"}})).unwrap();
        set_leaf(&mut tree, &path("modal.close"), "Schließen");

        assert_eq!(tree.get_leaf("modal.title"), Some("Titel"));
        assert_eq!(tree.get_leaf("modal.x"), Some("X"));
        assert_eq!(tree.get_leaf("modal.close"), Some("Schließen"));
    }

    #[test]
    fn test_overwrites_existing_leaf() {
        let mut tree: LocaleTree = serde_json::from_value(json!({"a": "TODO: A"})).unwrap();
        set_leaf(&mut tree, &path("a"), "Ah");
        assert_eq!(tree.get_leaf("a"), Some("Ah"));
    }

    #[test]
    fn test_appends_new_keys_at_end() {
        let mut tree: LocaleTree = serde_json::from_value(json!({"b": "B", "a": "A"})).unwrap();
        set_leaf(&mut tree, &path("c"), "C");
        assert_eq!(
            serde_json::to_string(&tree).unwrap(),
            r#"{"b":"B","a":"A","c":"C"}"#
        );
    }

    #[test]
    fn test_leaf_intermediate_is_replaced() {
        let mut tree: LocaleTree = serde_json::from_value(json!({"section": "flat"})).unwrap();
        set_leaf(&mut tree, &path("section.title"), "Title");
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"section": {"title": "Title"}})
        );
    }

    #[test]
    fn test_root_path_is_noop() {
        let mut tree: LocaleTree = serde_json::from_value(json!({"a": "A"})).unwrap();
        set_leaf(&mut tree, &LeafPath::root(), "ignored");
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!({"a": "A"}));
    }
}
