//! Source/target tree comparison
//!
//! Finds the leaves a target locale still needs: leaves that are absent
//! altogether, and (in retry mode) leaves whose previous translation
//! failed and were left with the sentinel marker.

use crate::tree::{LeafPath, LocaleTree, is_sentinel};

/// One leaf that needs a translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    /// Where the translation goes in the target tree
    pub path: LeafPath,
    /// Source text to translate
    pub value: String,
    /// Hint for the provider, e.g. `Section: flash, Key: title`
    pub context: String,
    /// True when this entry replaces a sentinel-marked value
    pub is_retry: bool,
}

fn context_for(parent: &LeafPath, key: &str) -> String {
    format!("Section: {}, Key: {}", parent, key)
}

/// Collect every source leaf that has no counterpart in `target`, in source order.
///
/// Existing target leaves are never reported, whatever their content.
pub fn collect_missing(source: &LocaleTree, target: &LocaleTree) -> Vec<MissingEntry> {
    let mut missing = Vec::new();
    walk_missing(source, Some(target), &LeafPath::root(), &mut missing);
    missing
}

fn walk_missing(
    source: &LocaleTree,
    target: Option<&LocaleTree>,
    parent: &LeafPath,
    missing: &mut Vec<MissingEntry>,
) {
    let Some(children) = source.as_node() else {
        return;
    };

    for (key, source_value) in children {
        // A target that is not a mapping here is treated as empty
        let target_value = target.and_then(|t| t.get(key));
        match (source_value, target_value) {
            (LocaleTree::Node(_), _) => {
                walk_missing(source_value, target_value, &parent.child(key), missing);
            }
            (LocaleTree::Leaf(text), None) => missing.push(MissingEntry {
                path: parent.child(key),
                value: text.clone(),
                context: context_for(parent, key),
                is_retry: false,
            }),
            _ => {}
        }
    }
}

/// Collect source leaves whose target counterpart carries the failure marker.
///
/// The entries carry the source text, not the marked target text.
pub fn collect_failed(source: &LocaleTree, target: &LocaleTree) -> Vec<MissingEntry> {
    let mut failed = Vec::new();
    walk_failed(source, target, &LeafPath::root(), &mut failed);
    failed
}

fn walk_failed(
    source: &LocaleTree,
    target: &LocaleTree,
    parent: &LeafPath,
    failed: &mut Vec<MissingEntry>,
) {
    let Some(children) = source.as_node() else {
        return;
    };

    for (key, source_value) in children {
        let Some(target_value) = target.get(key) else {
            continue;
        };
        match (source_value, target_value) {
            (LocaleTree::Node(_), _) => {
                walk_failed(source_value, target_value, &parent.child(key), failed);
            }
            (LocaleTree::Leaf(text), LocaleTree::Leaf(existing)) if is_sentinel(existing) => {
                failed.push(MissingEntry {
                    path: parent.child(key),
                    value: text.clone(),
                    context: format!("{} (retry)", context_for(parent, key)),
                    is_retry: true,
                });
            }
            _ => {}
        }
    }
}

/// Number of string leaves in a tree
pub fn count_leaves(tree: &LocaleTree) -> usize {
    match tree {
        LocaleTree::Leaf(_) => 1,
        LocaleTree::Node(children) => children.values().map(count_leaves).sum(),
        LocaleTree::Opaque(_) => 0,
    }
}
