//! Existing link discovery under target roots.

use std::path::Path;

use tracing::debug;

use linker_core::Node;

use crate::collector::TreeCollector;

/// Collect every target root and keep only the links found anywhere below.
///
/// Order of the result carries no meaning; callers use it as a set.
pub fn scan_targets<P: AsRef<Path>>(targets: &[P]) -> Vec<Node> {
    let collector = TreeCollector::new();

    targets
        .iter()
        .flat_map(|target| {
            let nodes = collector.collect(target);
            let links = extract_links(&nodes);
            debug!(
                target = %target.as_ref().display(),
                links = links.len(),
                "Scanned target"
            );
            links
        })
        .collect()
}

/// Flatten a forest into the links it contains. Leaves are discarded and
/// branches are replaced by their descendants.
pub fn extract_links(nodes: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .flat_map(|node| {
            if node.is_link() {
                vec![node.clone()]
            } else {
                extract_links(node.children())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_links_flattens_branches() {
        let nodes = vec![
            Node::leaf("/archlinux/file"),
            Node::branch(
                "/archlinux/branch",
                vec![
                    Node::link("/archlinux/branch/a", "/pacman/a"),
                    Node::branch(
                        "/archlinux/branch/nested",
                        vec![Node::link("/archlinux/branch/nested/b", "../b")],
                    ),
                ],
            ),
            Node::link("/archlinux/c", "/pacman/c"),
        ];

        let links = extract_links(&nodes);
        assert_eq!(
            links,
            vec![
                Node::link("/archlinux/branch/a", "/pacman/a"),
                Node::link("/archlinux/branch/nested/b", "../b"),
                Node::link("/archlinux/c", "/pacman/c"),
            ]
        );
    }

    #[test]
    fn test_extract_links_without_links() {
        let nodes = vec![Node::branch("/archlinux/empty", Vec::new()), Node::leaf("/x")];
        assert!(extract_links(&nodes).is_empty());
    }
}
