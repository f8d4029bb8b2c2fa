//! End-to-end run for one configuration.

use tracing::{debug, info_span};

use linker_core::{Configuration, Node, Report, count_nodes};
use linker_filter::{ExcludeSet, exclude, filter_linked};
use linker_scan::{collect_nodes, scan_targets};

use crate::linker::{LinkMode, Linker};

/// Discovery, filtering and linking for a configuration.
///
/// Each stage consumes the complete output of the previous one:
/// sources are collected and excluded, existing links are gathered from the
/// targets, already linked sources are dropped and the remainder is linked.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    config: &'a Configuration,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline for `config`.
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Collect and exclude the source tree.
    pub fn sources(&self) -> Vec<Node> {
        info_span!("collect_sources", source = %self.config.source.display()).in_scope(|| {
            let nodes = collect_nodes(&self.config.source);
            let excludes = ExcludeSet::new(&self.config.excludes);
            let nodes = exclude(&nodes, &excludes);
            debug!(nodes = count_nodes(&nodes), "Collected sources");
            nodes
        })
    }

    /// Collect the links that already exist under the targets.
    pub fn target_links(&self) -> Vec<Node> {
        info_span!("collect_targets").in_scope(|| {
            let links = scan_targets(&self.config.targets);
            debug!(links = links.len(), "Collected target links");
            links
        })
    }

    /// Run every stage and link the pending sources.
    pub fn run(&self, mode: LinkMode) -> Report {
        let sources = self.sources();
        let target_links = self.target_links();

        let pending = info_span!("filter_linked").in_scope(|| filter_linked(&sources, &target_links));

        let outcome = info_span!("link", %mode)
            .in_scope(|| Linker::new(&self.config.link_maps, mode).link(&pending));

        outcome.into_report(target_links.len())
    }
}
