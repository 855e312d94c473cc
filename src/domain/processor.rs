//! Processor contract for per-node tree passes.

use crate::domain::context::Context;
use crate::domain::error::DomainResult;
use crate::domain::tree::{ConfigTree, NodeId};

/// A pass invoked by a traversal driver once per tree node.
///
/// Processors are stateless: `execute` takes `&self`, and all working state
/// lives in the call. The only thing a processor may change is the tree it is
/// given, and only below `node`. The traversal order is up to the driver.
pub trait Processor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn execute(
        &self,
        tree: &mut ConfigTree,
        node: NodeId,
        ctx: &mut dyn Context,
    ) -> DomainResult<()>;
}
