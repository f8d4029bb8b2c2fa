//! Basename exclusion.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use linker_core::Node;

/// Case-insensitive set of excluded basenames.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    names: HashSet<String>,
}

impl ExcludeSet {
    /// Create a set from basenames.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Check if `basename` is excluded.
    pub fn contains(&self, basename: &str) -> bool {
        self.names.contains(&basename.to_lowercase())
    }

    /// Number of excluded names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExcludeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Remove excluded nodes from a forest.
///
/// Children are filtered before their parent is checked. Branches are never
/// pruned for becoming empty.
pub fn exclude(nodes: &[Node], excludes: &ExcludeSet) -> Vec<Node> {
    if excludes.is_empty() {
        return nodes.to_vec();
    }

    nodes
        .par_iter()
        .map(|node| match node {
            Node::Branch { children, .. } => node.with_children(exclude(children, excludes)),
            _ => node.clone(),
        })
        .filter(|node| !is_excluded(node, excludes))
        .collect()
}

fn is_excluded(node: &Node, excludes: &ExcludeSet) -> bool {
    let excluded = node.basename().is_some_and(|name| excludes.contains(name));
    if excluded {
        debug!(path = %node.path().display(), "Excluding node");
    }
    excluded
}
