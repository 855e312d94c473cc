//! Conversion of resolved trees into printable `termtree` trees.

use termtree::Tree;

use crate::domain::{ConfigTree, NodeId, INHERIT_KEY};

pub trait TreeNodeConvert {
    fn to_tree_string(&self, show_attributes: bool) -> Tree<String>;
}

impl ConfigTree {
    /// Display label of a node: its key, followed by `<- base` once resolved.
    pub fn label(&self, idx: NodeId) -> String {
        let Some(node) = self.get_node(idx) else {
            return String::new();
        };
        let key = if node.path.is_empty() {
            node.path_string()
        } else {
            node.key.clone()
        };
        match node.base().and_then(|b| self.get_node(b)) {
            Some(base) => format!("{} <- {}", key, base.key),
            None => key,
        }
    }
}

impl TreeNodeConvert for ConfigTree {
    fn to_tree_string(&self, show_attributes: bool) -> Tree<String> {
        let Some(root_idx) = self.root() else {
            return Tree::new("Empty tree".to_string());
        };

        fn build_tree(
            tree: &ConfigTree,
            node_idx: NodeId,
            show_attributes: bool,
            parent_tree: &mut Tree<String>,
        ) {
            let Some(node) = tree.get_node(node_idx) else {
                return;
            };
            if show_attributes {
                for (name, value) in &node.attributes {
                    // the link is already shown in the label
                    if name == INHERIT_KEY && node.base().is_some() {
                        continue;
                    }
                    parent_tree.push(Tree::new(format!("{}: {}", name, value)));
                }
            }
            for &child_idx in &node.children {
                let mut child_tree = Tree::new(tree.label(child_idx));
                build_tree(tree, child_idx, show_attributes, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        let mut tree = Tree::new(self.label(root_idx));
        build_tree(self, root_idx, show_attributes, &mut tree);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Context, InheritProcessor, Processor, TreeBuilder, Value};

    struct Silent;

    impl Context for Silent {
        fn log_critical(&mut self, _message: &str) {}
    }

    #[test]
    fn given_resolved_tree_when_rendering_then_shows_links() {
        let input = vec![
            (
                "a".to_string(),
                Value::Mapping(vec![("x".to_string(), Value::Integer(1))]),
            ),
            (
                "b".to_string(),
                Value::Mapping(vec![(INHERIT_KEY.to_string(), Value::from("a"))]),
            ),
        ];
        let mut tree = TreeBuilder::new().build(&input).unwrap();
        let root = tree.root().unwrap();
        InheritProcessor::new()
            .execute(&mut tree, root, &mut Silent)
            .unwrap();

        let rendered = tree.to_tree_string(true).to_string();

        assert!(rendered.starts_with("<root>\n"));
        assert!(rendered.contains("b <- a"));
        assert!(rendered.contains("x: 1"));
        assert!(!rendered.contains("inherit: a"));
        assert!(!tree.to_tree_string(false).to_string().contains("x: 1"));
    }
}
