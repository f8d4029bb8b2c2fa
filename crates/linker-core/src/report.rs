//! Run results.

use std::fmt;
use std::path::PathBuf;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::node::{Node, sort_by_path};

/// A symbolic link that a rule asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlannedLink {
    /// Where the link is created.
    pub path: PathBuf,
    /// What the link points to.
    pub source: PathBuf,
}

impl PlannedLink {
    /// Create a new planned link.
    pub fn new(path: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for PlannedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.path.display(), self.source.display())
    }
}

/// A link that could not be created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFailure {
    /// The link that was attempted.
    pub link: PlannedLink,
    /// Human-readable reason.
    pub message: String,
}

impl LinkFailure {
    /// Create a new link failure.
    pub fn new(link: PlannedLink, message: impl Into<String>) -> Self {
        Self {
            link,
            message: message.into(),
        }
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Number of existing links discovered under the targets.
    pub target_links: usize,
    /// Source nodes that are not represented by a link.
    pub residual: Vec<Node>,
    /// Links created (or announced, for dry runs).
    pub created: Vec<PlannedLink>,
    /// Links that could not be created.
    pub failures: Vec<LinkFailure>,
}

impl Report {
    /// Number of top-level residual sources.
    pub fn residual_sources(&self) -> usize {
        self.residual.len()
    }

    /// Check if every discovered source is represented by a link.
    pub fn is_converged(&self) -> bool {
        self.residual.is_empty()
    }

    /// Render the report, one line per residual node in path order.
    pub fn lines(&self) -> Vec<String> {
        let mut residual = self.residual.clone();
        sort_by_path(&mut residual);

        let mut lines = vec![
            format!("Targets: {}", self.target_links),
            format!("Sources: {}", self.residual_sources()),
        ];
        for node in &residual {
            render(node, &mut lines);
        }
        lines
    }
}

fn render(node: &Node, lines: &mut Vec<String>) {
    match node {
        Node::Leaf { path } => lines.push(path.display().to_string()),
        Node::Link { path, source } => {
            lines.push(format!("{} -> {}", path.display(), source.display()))
        }
        Node::Branch { path, children } => {
            lines.push(path.display().to_string());
            for child in children {
                render(child, lines);
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().iter().join("\n"))
    }
}
