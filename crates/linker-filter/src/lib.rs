//! Tree filters for linker.
//!
//! Both filters are pure: they take a forest and return a new one, leaving
//! their input untouched.
//!
//! - **Exclusion** - Drop nodes whose basename is configured as excluded
//! - **Equivalence** - Drop source nodes that an existing link already
//!   points at, comparing canonical paths
//!
//! # Exclusion
//!
//! Exclusion only removes name matches. A branch that loses all of its
//! children stays in the tree.
//!
//! ```rust
//! use linker_filter::{ExcludeSet, exclude};
//! use linker_core::Node;
//!
//! let tree = vec![Node::branch("/src/pkg", vec![Node::leaf("/src/pkg/Thumbs.db")])];
//! let filtered = exclude(&tree, &ExcludeSet::new(["thumbs.db"]));
//!
//! assert_eq!(filtered, vec![Node::branch("/src/pkg", Vec::new())]);
//! ```
//!
//! # Equivalence
//!
//! ```rust,ignore
//! use linker_filter::filter_linked;
//! use linker_scan::{collect_nodes, scan_targets};
//!
//! let sources = collect_nodes("/var/cache/pacman/pkg");
//! let links = scan_targets(&["/srv/http/archlinux"]);
//!
//! let pending = filter_linked(&sources, &links);
//! ```

mod equivalence;
mod exclude;

pub use equivalence::{canonical_path, filter_linked, resolve_link_source};
pub use exclude::{ExcludeSet, exclude};

// Re-export core types
pub use linker_core::Node;
