//! Core types for linker.
//!
//! This crate provides the data structures shared by every stage of the
//! linking pipeline: the filesystem node model, link rules and their
//! configuration, error types, and the final report.

mod config;
mod error;
mod node;
mod report;

pub use config::{Configuration, ConfigurationBuilder, LinkMap};
pub use error::{ConfigError, LinkError};
pub use node::{Node, count_nodes, sort_by_path};
pub use report::{LinkFailure, PlannedLink, Report};
