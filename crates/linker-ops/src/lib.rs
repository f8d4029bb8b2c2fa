//! Link operations for linker.
//!
//! This crate turns a filtered source forest into symbolic links under the
//! configured targets:
//!
//! - [`RuleMatcher`] picks the link rule for a basename
//! - [`Linker`] walks the forest parent-first and creates (or, in a dry run,
//!   announces) the links, returning everything left unlinked
//! - [`Pipeline`] wires discovery, filtering and linking for one
//!   configuration
//!
//! Runs are idempotent: sources that an existing link already points at are
//! filtered out before linking, so a second run against an unchanged tree
//! creates nothing.

mod linker;
mod matcher;
mod pipeline;
mod symlink;

pub use linker::{LinkMode, LinkOutcome, Linker};
pub use matcher::{RuleMatcher, plan_link};
pub use pipeline::Pipeline;
pub use symlink::create_symlink;

pub use linker_core::{LinkFailure, PlannedLink, Report};
