//! Inheritance resolution among sibling nodes.
//!
//! For one node, every direct child carrying an `inherit` directive is linked
//! to the sibling it names. Links are only written once the whole level has
//! been validated and ordered, so a failing level is left untouched.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::context::Context;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::processor::Processor;
use crate::domain::tree::{ConfigTree, NodeId, INHERIT_KEY};
use crate::domain::value::Value;

/// How many directive violations are reported before aborting a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPolicy {
    /// Report every invalid directive among the children, then abort
    #[default]
    All,
    /// Abort at the first invalid directive
    First,
}

/// Links each child declaring `inherit: <sibling>` to that sibling.
#[derive(Debug, Clone, Default)]
pub struct InheritProcessor {
    policy: ReportPolicy,
}

impl InheritProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReportPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    /// Validates one directive and returns the named sibling key.
    ///
    /// Checks run in order: type, existence, self reference.
    fn check_directive(
        tree: &ConfigTree,
        node: NodeId,
        path: &str,
        key: &str,
        directive: &Value,
    ) -> DomainResult<String> {
        let parent_key = directive
            .as_str()
            .ok_or_else(|| DomainError::MalformedDirective {
                path: path.to_string(),
                key: key.to_string(),
                found: directive.kind().to_string(),
            })?;

        if !tree.has_child(node, parent_key) {
            return Err(DomainError::UnknownParent {
                path: path.to_string(),
                key: key.to_string(),
                parent: parent_key.to_string(),
            });
        }
        if parent_key == key {
            return Err(DomainError::SelfInheritance {
                path: path.to_string(),
                key: key.to_string(),
            });
        }
        Ok(parent_key.to_string())
    }
}

impl Processor for InheritProcessor {
    fn name(&self) -> &'static str {
        "inherit"
    }

    #[instrument(level = "debug", skip(self, tree, ctx))]
    fn execute(
        &self,
        tree: &mut ConfigTree,
        node: NodeId,
        ctx: &mut dyn Context,
    ) -> DomainResult<()> {
        let current = tree.get_node(node).ok_or(DomainError::NodeNotFound)?;
        let path = current.path_string();

        let mut ids: HashMap<String, NodeId> = HashMap::new();
        let mut roots: Vec<String> = Vec::new();
        // (child, declared parent) in child order
        let mut orphans: Vec<(String, String)> = Vec::new();
        let mut violations: Vec<DomainError> = Vec::new();

        for &child_idx in &current.children {
            let child = tree.get_node(child_idx).ok_or(DomainError::NodeNotFound)?;
            ids.insert(child.key.clone(), child_idx);

            let Some(directive) = child.attribute(INHERIT_KEY) else {
                roots.push(child.key.clone());
                continue;
            };

            match Self::check_directive(tree, node, &path, &child.key, directive) {
                Ok(parent_key) => orphans.push((child.key.clone(), parent_key)),
                Err(e) => {
                    ctx.log_critical(&e.to_string());
                    violations.push(e);
                    if self.policy == ReportPolicy::First {
                        break;
                    }
                }
            }
        }

        if let Some(first) = violations.into_iter().next() {
            return Err(first);
        }
        if orphans.is_empty() {
            return Ok(());
        }

        // Each child names at most one parent, so ordering is a walk outward
        // from the roots; whatever is never reached sits on or behind a cycle.
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for (child_key, parent_key) in &orphans {
            dependents
                .entry(parent_key.as_str())
                .or_default()
                .push(child_key.as_str());
        }

        let mut placed: HashSet<&str> = roots.iter().map(String::as_str).collect();
        let mut queue: VecDeque<&str> = roots.iter().map(String::as_str).collect();
        let mut links: Vec<(&str, &str)> = Vec::new();

        while let Some(parent_key) = queue.pop_front() {
            for &child_key in dependents.get(parent_key).into_iter().flatten() {
                if placed.insert(child_key) {
                    links.push((child_key, parent_key));
                    queue.push_back(child_key);
                }
            }
        }

        if links.len() < orphans.len() {
            let keys: Vec<String> = orphans
                .iter()
                .filter(|(child_key, _)| !placed.contains(child_key.as_str()))
                .map(|(child_key, _)| child_key.clone())
                .collect();
            let e = DomainError::CircularDependency { path, keys };
            ctx.log_critical(&e.to_string());
            return Err(e);
        }

        let resolved: Vec<(NodeId, NodeId)> = links
            .iter()
            .map(|(child_key, parent_key)| (ids[*child_key], ids[*parent_key]))
            .collect();
        for (child_idx, base_idx) in resolved {
            tree.set_base(child_idx, base_idx)?;
        }
        debug!("{}: linked {} inheriting children", path, links.len());

        Ok(())
    }
}
