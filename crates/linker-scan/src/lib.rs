//! Filesystem discovery for linker.
//!
//! This crate walks directories and turns their contents into [`Node`]
//! trees using jwalk for traversal.
//!
//! - [`TreeCollector`] materializes the full tree under a root, without
//!   following symbolic links.
//! - [`scan_targets`] collects the target roots and keeps only the links
//!   found there.
//!
//! # Example
//!
//! ```rust,no_run
//! use linker_scan::{TreeCollector, scan_targets};
//!
//! let sources = TreeCollector::new().collect("/var/cache/pacman/pkg");
//! let links = scan_targets(&["/srv/http/archlinux"]);
//!
//! println!("{} sources, {} existing links", sources.len(), links.len());
//! ```

mod collector;
mod targets;

pub use collector::{TreeCollector, collect_nodes};
pub use targets::{extract_links, scan_targets};

// Re-export core types for convenience
pub use linker_core::Node;
