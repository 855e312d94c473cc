//! Inheritance resolution for declarative configuration trees.
//!
//! A source file is read into a [`domain::ConfigTree`]; a traversal driver then
//! runs per-node processors over it. The [`domain::InheritProcessor`] links every
//! child declaring `inherit: <sibling>` to that sibling, rejecting malformed,
//! dangling, self-referencing and circular directives.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
