//! Removal of sources that an existing link already points at.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use linker_core::Node;

/// Remove source nodes already represented by one of `target_links`.
///
/// Comparison is by canonical path: link sources are resolved relative to
/// the link's own directory and every symlink along the way is followed.
/// A matching branch is dropped together with its whole subtree. Branches
/// left empty by filtering are kept, since an unlinked empty directory is
/// still something a rule may want to link.
pub fn filter_linked(sources: &[Node], target_links: &[Node]) -> Vec<Node> {
    let linked: HashSet<PathBuf> = target_links
        .par_iter()
        .filter_map(|node| match node {
            Node::Link { path, source } => Some(resolve_link_source(path, source)),
            _ => None,
        })
        .collect();

    debug!(links = linked.len(), "Resolved target link sources");
    filter_nodes(sources, &linked)
}

fn filter_nodes(nodes: &[Node], linked: &HashSet<PathBuf>) -> Vec<Node> {
    nodes
        .par_iter()
        .filter_map(|node| filter_node(node, linked))
        .collect()
}

fn filter_node(node: &Node, linked: &HashSet<PathBuf>) -> Option<Node> {
    if linked.contains(&canonical_path(node.path())) {
        debug!(path = %node.path().display(), "Already linked");
        return None;
    }

    match node {
        Node::Branch { children, .. } => Some(node.with_children(filter_nodes(children, linked))),
        Node::Leaf { .. } | Node::Link { .. } => Some(node.clone()),
    }
}

/// Canonical path of a link's target, interpreting a relative `source`
/// against the directory containing `link`.
pub fn resolve_link_source(link: &Path, source: &Path) -> PathBuf {
    if source.is_absolute() {
        return canonical_path(source);
    }

    match link.parent() {
        Some(parent) => canonical_path(&parent.join(source)),
        None => canonical_path(source),
    }
}

/// Fully resolved absolute path.
///
/// Paths that cannot be resolved (dangling links, missing entries) fall back
/// to an absolute, lexically normalized form.
pub fn canonical_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        normalize_lexically(&absolute)
    })
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
