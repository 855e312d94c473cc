//! Domain layer: tree model and resolution passes
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod context;
pub mod error;
pub mod inherit;
pub mod processor;
pub mod tree;
pub mod value;

pub use builder::TreeBuilder;
pub use context::Context;
pub use error::{DomainError, DomainResult};
pub use inherit::{InheritProcessor, ReportPolicy};
pub use processor::Processor;
pub use tree::{ConfigTree, Node, NodeId, INHERIT_KEY};
pub use value::{Mapping, Value};
