//! Tree builder turning parsed mappings into a [`ConfigTree`].

use tracing::{debug, instrument};

use crate::domain::error::DomainResult;
use crate::domain::tree::{ConfigTree, NodeId, INHERIT_KEY};
use crate::domain::value::{Mapping, Value};

/// Constructs a node tree from a parsed mapping.
///
/// Mapping-valued entries become child nodes, and so do empty entries
/// (`key:` with no value), which declare a node without attributes.
/// Everything else becomes an attribute. The inherit directive is always kept
/// as an attribute so that a malformed directive reaches the inherit
/// processor intact.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "debug", skip_all)]
    pub fn build(&self, mapping: &Mapping) -> DomainResult<ConfigTree> {
        let mut tree = ConfigTree::new();
        let root = tree.insert_node("", None)?;
        let mut stack: Vec<(NodeId, &Mapping)> = vec![(root, mapping)];

        while let Some((node_idx, entries)) = stack.pop() {
            for (key, value) in entries {
                match value {
                    _ if key == INHERIT_KEY => {
                        if let Some(node) = tree.get_node_mut(node_idx) {
                            node.attributes.insert(key.clone(), value.clone());
                        }
                    }
                    Value::Mapping(children) => {
                        let child_idx = tree.insert_node(key, Some(node_idx))?;
                        stack.push((child_idx, children));
                    }
                    Value::Null => {
                        tree.insert_node(key, Some(node_idx))?;
                    }
                    _ => {
                        if let Some(node) = tree.get_node_mut(node_idx) {
                            node.attributes.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
        }

        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }
}
