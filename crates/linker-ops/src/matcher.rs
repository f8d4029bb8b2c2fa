//! Link rule selection.

use std::path::Path;

use tracing::warn;

use linker_core::{LinkMap, Node, PlannedLink};

/// Selects the link rule for a basename.
///
/// Rules are evaluated in declaration order and the first match wins. When
/// several rules match the same basename the others are reported, since
/// such a configuration is almost always a mistake.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatcher<'a> {
    rules: &'a [LinkMap],
}

impl<'a> RuleMatcher<'a> {
    /// Create a matcher over `rules`.
    pub fn new(rules: &'a [LinkMap]) -> Self {
        Self { rules }
    }

    /// Find the rule matching `basename`.
    pub fn find(&self, basename: &str) -> Option<&'a LinkMap> {
        if basename.trim().is_empty() {
            return None;
        }

        let mut matches = self.rules.iter().filter(|rule| rule.is_match(basename));
        let selected = matches.next()?;

        let ignored: Vec<&str> = matches.map(LinkMap::pattern).collect();
        if !ignored.is_empty() {
            warn!(
                basename,
                selected = selected.pattern(),
                ?ignored,
                "Multiple link maps match, using the first declared"
            );
        }

        Some(selected)
    }

    /// Compute the link a rule asks for `node`, if any rule matches.
    pub fn match_node(&self, node: &Node) -> Option<PlannedLink> {
        let basename = node.basename()?;
        let rule = self.find(basename)?;
        Some(plan_link(rule, node.path(), basename))
    }
}

/// Link for `basename` under `rule`: created at `target/basename`, pointing
/// at `prefix/basename` when the rule has a prefix or at `path` otherwise.
pub fn plan_link(rule: &LinkMap, path: &Path, basename: &str) -> PlannedLink {
    let source = match rule.prefix() {
        Some(prefix) => prefix.join(basename),
        None => path.to_path_buf(),
    };
    PlannedLink::new(rule.target().join(basename), source)
}
