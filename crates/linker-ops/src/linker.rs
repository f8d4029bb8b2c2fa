//! Rule-driven link creation over a source forest.

use strum::Display;
use tracing::{info, warn};

use linker_core::{LinkFailure, LinkMap, Node, PlannedLink, Report};

use crate::matcher::RuleMatcher;
use crate::symlink::create_symlink;

/// Whether links are actually created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LinkMode {
    /// Create links on disk.
    #[default]
    Real,
    /// Announce links without touching the filesystem. Every link counts as
    /// created, so the residual tree is the one a fully successful real run
    /// would leave.
    DryRun,
}

/// Result of linking a forest.
#[derive(Debug, Clone, Default)]
pub struct LinkOutcome {
    /// Nodes not represented by a link after this run.
    pub residual: Vec<Node>,
    /// Links created, or announced in a dry run.
    pub created: Vec<PlannedLink>,
    /// Links that could not be created.
    pub failures: Vec<LinkFailure>,
}

impl LinkOutcome {
    /// Turn the outcome into a report.
    pub fn into_report(self, target_links: usize) -> Report {
        Report {
            target_links,
            residual: self.residual,
            created: self.created,
            failures: self.failures,
        }
    }
}

/// Walks a forest and links every node a rule matches.
///
/// A node is matched before its children are looked at, so a rule matching
/// a directory links the whole directory and nothing below it is evaluated.
/// Unmatched branches are descended into and dropped once every child has
/// been linked.
#[derive(Debug, Clone, Copy)]
pub struct Linker<'a> {
    matcher: RuleMatcher<'a>,
    mode: LinkMode,
}

impl<'a> Linker<'a> {
    /// Create a linker for `rules`.
    pub fn new(rules: &'a [LinkMap], mode: LinkMode) -> Self {
        Self {
            matcher: RuleMatcher::new(rules),
            mode,
        }
    }

    /// Link `nodes`, returning the residual forest alongside what was done.
    pub fn link(&self, nodes: &[Node]) -> LinkOutcome {
        let mut outcome = LinkOutcome::default();
        outcome.residual = self.link_nodes(nodes, &mut outcome);
        outcome
    }

    fn link_nodes(&self, nodes: &[Node], outcome: &mut LinkOutcome) -> Vec<Node> {
        let mut residual = Vec::with_capacity(nodes.len());
        for node in nodes {
            if let Some(node) = self.link_node(node, outcome) {
                residual.push(node);
            }
        }
        residual
    }

    fn link_node(&self, node: &Node, outcome: &mut LinkOutcome) -> Option<Node> {
        if let Some(planned) = self.matcher.match_node(node) {
            return match self.realize(&planned) {
                Ok(()) => {
                    outcome.created.push(planned);
                    None
                }
                Err(failure) => {
                    outcome.failures.push(failure);
                    Some(node.clone())
                }
            };
        }

        match node {
            Node::Branch { children, .. } => {
                let remaining = self.link_nodes(children, outcome);
                if remaining.is_empty() {
                    None
                } else {
                    Some(node.with_children(remaining))
                }
            }
            Node::Leaf { .. } | Node::Link { .. } => Some(node.clone()),
        }
    }

    fn realize(&self, planned: &PlannedLink) -> Result<(), LinkFailure> {
        match self.mode {
            LinkMode::DryRun => {
                info!(link = %planned, "Creating symbolic link (dry run)");
                Ok(())
            }
            LinkMode::Real => match create_symlink(planned) {
                Ok(()) => {
                    info!(link = %planned, "Symbolic link was successfully created");
                    Ok(())
                }
                Err(err) => {
                    warn!(link = %planned, error = %err, "Unable to create symbolic link");
                    Err(LinkFailure::new(planned.clone(), err.to_string()))
                }
            },
        }
    }
}
