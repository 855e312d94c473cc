//! Traversal driver running processors over every tree node.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::application::ApplicationResult;
use crate::domain::{ConfigTree, Context, InheritProcessor, NodeId, Processor, ReportPolicy};

/// Order in which nodes are handed to processors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    /// Parents before children
    #[default]
    Pre,
    /// Children before parents
    Post,
}

/// Context collecting critical diagnostics for one run.
#[derive(Debug, Default)]
pub struct RunContext {
    diagnostics: Vec<String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<String> {
        self.diagnostics
    }

    pub fn has_failed(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl Context for RunContext {
    fn log_critical(&mut self, message: &str) {
        error!("{}", message);
        self.diagnostics.push(message.to_string());
    }
}

/// Ordered set of processors applied to each node of a tree.
pub struct Traversal {
    processors: Vec<Box<dyn Processor>>,
    order: TraversalOrder,
}

impl Default for Traversal {
    fn default() -> Self {
        Self::standard(ReportPolicy::default(), TraversalOrder::default())
    }
}

impl Traversal {
    /// Empty traversal; register processors with [`Traversal::with_processor`].
    pub fn new(order: TraversalOrder) -> Self {
        Self {
            processors: Vec::new(),
            order,
        }
    }

    /// Traversal with the inherit processor registered.
    pub fn standard(policy: ReportPolicy, order: TraversalOrder) -> Self {
        Self::new(order).with_processor(InheritProcessor::with_policy(policy))
    }

    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }

    /// Visits every node and runs each processor on it, halting at the first failure.
    #[instrument(level = "debug", skip_all)]
    pub fn run(&self, tree: &mut ConfigTree, ctx: &mut dyn Context) -> ApplicationResult<()> {
        // Processors only touch base links, so the node set is fixed up front
        let nodes: Vec<NodeId> = match self.order {
            TraversalOrder::Pre => tree.iter().map(|(idx, _)| idx).collect(),
            TraversalOrder::Post => tree.iter_postorder().map(|(idx, _)| idx).collect(),
        };
        debug!(
            "running {} processor(s) over {} node(s)",
            self.processors.len(),
            nodes.len()
        );

        for node in nodes {
            for processor in &self.processors {
                processor.execute(tree, node, ctx).map_err(|e| {
                    debug!("processor '{}' aborted the run", processor.name());
                    e
                })?;
            }
        }
        Ok(())
    }
}
