//! Arena-backed configuration tree.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::value::Value;

/// Reserved attribute naming the sibling a node inherits from.
pub const INHERIT_KEY: &str = "inherit";

/// Handle to a node inside a [`ConfigTree`].
pub type NodeId = Index;

/// One entry in the configuration tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Key, unique among siblings; empty for the root
    pub key: String,
    /// Keys from the root down to this node
    pub path: Vec<String>,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<NodeId>,
    /// Child nodes in insertion order
    pub children: Vec<NodeId>,
    /// Terminal attributes of this node
    pub attributes: BTreeMap<String, Value>,
    /// Resolved inheritance parent, a sibling of this node
    base: Option<NodeId>,
}

impl Node {
    /// Path rendered for diagnostics: keys joined with `.`, `<root>` for the root.
    ///
    /// Keys containing `.` or `"` are double-quoted so the path stays
    /// unambiguous and can be fed back to [`ConfigTree::find`].
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path
                .iter()
                .map(|key| quote_key(key))
                .collect::<Vec<_>>()
                .join(".")
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn base(&self) -> Option<NodeId> {
        self.base
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_string())
    }
}

/// Configuration tree owning every node.
///
/// Base links are stored as [`NodeId`] handles into the same arena, so a
/// node never owns its base and links stay cheap to follow.
#[derive(Debug, Clone)]
pub struct ConfigTree {
    arena: Arena<Node>,
    root: Option<NodeId>,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a node under `parent`, or as the root when `parent` is None.
    ///
    /// Fails if `parent` already has a child with the same key.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, key: &str, parent: Option<NodeId>) -> DomainResult<NodeId> {
        let path = match parent {
            Some(parent_idx) => {
                let parent_node = self.get_node(parent_idx).ok_or(DomainError::NodeNotFound)?;
                if self.child(parent_idx, key).is_some() {
                    return Err(DomainError::DuplicateKey {
                        path: parent_node.path_string(),
                        key: key.to_string(),
                    });
                }
                let mut path = parent_node.path.clone();
                path.push(key.to_string());
                path
            }
            None => Vec::new(),
        };

        let node_idx = self.arena.insert(Node {
            key: key.to_string(),
            path,
            parent,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            base: None,
        });

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None => self.root = Some(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&Node> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Direct child of `parent` with the given key.
    pub fn child(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.get_node(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.get_node(c).is_some_and(|n| n.key == key))
    }

    pub fn has_child(&self, parent: NodeId, key: &str) -> bool {
        self.child(parent, key).is_some()
    }

    /// Resolves a dotted path (`a.b.c`) from the root. An empty path is the root.
    ///
    /// A segment in double quotes may contain dots: `a."b.c"`.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root?;
        for key in split_path(path)? {
            current = self.child(current, &key)?;
        }
        Some(current)
    }

    pub(crate) fn set_base(&mut self, node: NodeId, base: NodeId) -> DomainResult<()> {
        if !self.arena.contains(base) {
            return Err(DomainError::NodeNotFound);
        }
        let node = self.get_node_mut(node).ok_or(DomainError::NodeNotFound)?;
        node.base = Some(base);
        Ok(())
    }

    /// Base links followed outward from `idx`, nearest first. Stops on a revisit.
    #[instrument(level = "trace", skip(self))]
    pub fn base_chain(&self, idx: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([idx]);
        let mut current = self.get_node(idx).and_then(Node::base);

        while let Some(base_idx) = current {
            if !visited.insert(base_idx) {
                break;
            }
            chain.push(base_idx);
            current = self.get_node(base_idx).and_then(Node::base);
        }
        chain
    }

    /// Attribute lookup falling back along the base chain.
    pub fn lookup(&self, idx: NodeId, name: &str) -> Option<&Value> {
        std::iter::once(idx)
            .chain(self.base_chain(idx))
            .filter_map(|i| self.get_node(i))
            .find_map(|node| node.attribute(name))
    }

    /// Own attributes merged over inherited ones, with the node that defines each value.
    ///
    /// The inherit directive itself is not part of the result.
    pub fn effective_attributes(&self, idx: NodeId) -> BTreeMap<&str, (&Value, NodeId)> {
        let mut chain = vec![idx];
        chain.extend(self.base_chain(idx));

        let mut result = BTreeMap::new();
        for node_idx in chain.into_iter().rev() {
            if let Some(node) = self.get_node(node_idx) {
                for (name, value) in &node.attributes {
                    if name != INHERIT_KEY {
                        result.insert(name.as_str(), (value, node_idx));
                    }
                }
            }
        }
        result
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        match self.root {
            Some(root) => self.calculate_depth(root),
            None => 0,
        }
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        match self.get_node(node_idx) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }
}

fn quote_key(key: &str) -> String {
    if key.contains(['.', '"']) {
        format!("\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        key.to_string()
    }
}

/// Splits a dotted path into keys, honouring double-quoted segments.
/// Returns None for an unterminated quote.
fn split_path(path: &str) -> Option<Vec<String>> {
    let mut keys = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' if current.is_empty() && !quoted => {
                // opening quote, closed by the next unescaped quote
                loop {
                    match chars.next()? {
                        '\\' => current.push(chars.next()?),
                        '"' => break,
                        other => current.push(other),
                    }
                }
                quoted = true;
            }
            '.' => {
                if quoted || !current.is_empty() {
                    keys.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            other => current.push(other),
        }
    }
    if quoted || !current.is_empty() {
        keys.push(current);
    }
    Some(keys)
}

/// Pre-order iterator: parents before children, siblings in insertion order.
pub struct TreeIterator<'a> {
    tree: &'a ConfigTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ConfigTree) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order iterator: children before parents.
pub struct PostOrderIterator<'a> {
    tree: &'a ConfigTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ConfigTree) -> Self {
        Self {
            tree,
            stack: tree.root().map(|r| (r, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_key_with_dot_when_rendering_path_then_quoted_and_findable() {
        let mut tree = ConfigTree::new();
        let root = tree.insert_node("", None).unwrap();
        let dotted = tree.insert_node("a.b", Some(root)).unwrap();
        let leaf = tree.insert_node("c", Some(dotted)).unwrap();
        tree.insert_node("a", Some(root)).unwrap();

        let path = tree.get_node(leaf).unwrap().path_string();

        assert_eq!(path, "\"a.b\".c");
        assert_eq!(tree.find(&path), Some(leaf));
        assert_eq!(tree.find("\"a.b\""), Some(dotted));
        assert_eq!(tree.find("a.b"), None);
        assert_eq!(tree.find("\"a.b"), None);
    }

    #[test]
    fn given_key_with_quote_when_rendering_path_then_escaped() {
        let mut tree = ConfigTree::new();
        let root = tree.insert_node("", None).unwrap();
        let odd = tree.insert_node("say \"hi\"", Some(root)).unwrap();

        let path = tree.get_node(odd).unwrap().path_string();

        assert_eq!(path, "\"say \\\"hi\\\"\"");
        assert_eq!(tree.find(&path), Some(odd));
    }

    //      <root>
    //      /    \
    //     a      b
    //     |
    //     c
    fn sample() -> (ConfigTree, [NodeId; 4]) {
        let mut tree = ConfigTree::new();
        let root = tree.insert_node("", None).unwrap();
        let a = tree.insert_node("a", Some(root)).unwrap();
        let c = tree.insert_node("c", Some(a)).unwrap();
        let b = tree.insert_node("b", Some(root)).unwrap();
        (tree, [root, a, b, c])
    }

    #[test]
    fn given_tree_when_iterating_then_preorder_and_postorder_differ() {
        let (tree, [root, a, b, c]) = sample();

        let pre: Vec<_> = tree.iter().map(|(i, _)| i).collect();
        let post: Vec<_> = tree.iter_postorder().map(|(i, _)| i).collect();

        assert_eq!(pre, vec![root, a, c, b]);
        assert_eq!(post, vec![c, a, b, root]);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_nested_node_when_rendering_path_then_joins_keys() {
        let (tree, [root, _, _, c]) = sample();

        assert_eq!(tree.get_node(root).unwrap().path_string(), "<root>");
        assert_eq!(tree.get_node(c).unwrap().path_string(), "a.c");
        assert_eq!(tree.find("a.c"), Some(c));
        assert_eq!(tree.find(""), Some(root));
        assert_eq!(tree.find("a.x"), None);
    }

    #[test]
    fn given_duplicate_sibling_key_when_inserting_then_errors() {
        let (mut tree, [root, ..]) = sample();

        let err = tree.insert_node("a", Some(root)).unwrap_err();

        assert_eq!(
            err,
            DomainError::DuplicateKey {
                path: "<root>".into(),
                key: "a".into()
            }
        );
    }

    #[test]
    fn given_base_links_when_looking_up_then_falls_back_along_chain() {
        let mut tree = ConfigTree::new();
        let root = tree.insert_node("", None).unwrap();
        let a = tree.insert_node("a", Some(root)).unwrap();
        let b = tree.insert_node("b", Some(root)).unwrap();
        let c = tree.insert_node("c", Some(root)).unwrap();
        tree.get_node_mut(a).unwrap().attributes.insert("x".into(), Value::Integer(1));
        tree.get_node_mut(a).unwrap().attributes.insert("y".into(), Value::Integer(1));
        tree.get_node_mut(b).unwrap().attributes.insert("y".into(), Value::Integer(2));
        tree.set_base(b, a).unwrap();
        tree.set_base(c, b).unwrap();

        assert_eq!(tree.base_chain(c), vec![b, a]);
        assert_eq!(tree.lookup(c, "x"), Some(&Value::Integer(1)));
        assert_eq!(tree.lookup(c, "y"), Some(&Value::Integer(2)));
        assert_eq!(tree.lookup(c, "z"), None);

        let effective = tree.effective_attributes(c);
        assert_eq!(effective.get("x"), Some(&(&Value::Integer(1), a)));
        assert_eq!(effective.get("y"), Some(&(&Value::Integer(2), b)));
    }

    #[test]
    fn given_cyclic_links_when_walking_chain_then_terminates() {
        let (mut tree, [_, a, b, _]) = sample();
        tree.set_base(a, b).unwrap();
        tree.set_base(b, a).unwrap();

        assert_eq!(tree.base_chain(a), vec![b]);
    }
}
