//! Filesystem node types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A discovered filesystem entry.
///
/// Trees built from nodes are snapshots: pipeline stages only ever drop
/// nodes or hand back a branch with a new children list, they never add
/// entries that were not present at discovery time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// Regular file (or anything that is neither a directory nor a symlink).
    Leaf {
        /// Absolute path of the entry.
        path: PathBuf,
    },
    /// Directory.
    Branch {
        /// Absolute path of the directory.
        path: PathBuf,
        /// Direct children, ordered by basename ascending.
        children: Vec<Node>,
    },
    /// Symbolic link.
    Link {
        /// Absolute path of the link itself.
        path: PathBuf,
        /// Raw link target as read from disk, or the desired target when
        /// produced by rule matching.
        source: PathBuf,
    },
}

impl Node {
    /// Create a leaf node.
    pub fn leaf(path: impl Into<PathBuf>) -> Self {
        Self::Leaf { path: path.into() }
    }

    /// Create a branch node.
    pub fn branch(path: impl Into<PathBuf>, children: Vec<Node>) -> Self {
        Self::Branch {
            path: path.into(),
            children,
        }
    }

    /// Create a link node.
    pub fn link(path: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self::Link {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Path of this node.
    pub fn path(&self) -> &Path {
        match self {
            Self::Leaf { path } | Self::Branch { path, .. } | Self::Link { path, .. } => path,
        }
    }

    /// Final path component, if it is non-empty valid UTF-8.
    pub fn basename(&self) -> Option<&str> {
        self.path()
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
    }

    /// Check if this is a link.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }

    /// Children of a branch, empty for leaves and links.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Branch { children, .. } => children,
            _ => &[],
        }
    }

    /// Recorded source of a link.
    pub fn source(&self) -> Option<&Path> {
        match self {
            Self::Link { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Return a copy of this branch carrying `children` instead of its own.
    ///
    /// Leaves and links are returned unchanged.
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        match self {
            Self::Branch { path, .. } => Self::branch(path.clone(), children),
            other => other.clone(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_size(&self) -> usize {
        1 + count_nodes(self.children())
    }
}

/// Total number of nodes in a forest, descendants included.
pub fn count_nodes(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::subtree_size).sum()
}

/// Recursively order a forest by path.
pub fn sort_by_path(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| a.path().cmp(b.path()));
    for node in nodes.iter_mut() {
        if let Node::Branch { children, .. } = node {
            sort_by_path(children);
        }
    }
}
