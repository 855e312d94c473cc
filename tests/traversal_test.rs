//! Tests for the Traversal driver and RunContext

use std::path::Path;
use std::sync::{Arc, Mutex};

use rstest::rstest;

use cfgtree::application::{
    ApplicationError, Reader, RunContext, Traversal, TraversalOrder, YamlReader,
};
use cfgtree::domain::{
    ConfigTree, Context, DomainError, DomainResult, NodeId, Processor, ReportPolicy, TreeBuilder,
};

fn build(yaml: &str) -> ConfigTree {
    let mapping = YamlReader.parse(Path::new("test.yml"), yaml).unwrap();
    TreeBuilder::new().build(&mapping).unwrap()
}

/// Records the path of every node it is called on into a shared log.
#[derive(Clone, Default)]
struct PathRecorder {
    seen: Arc<Mutex<Vec<String>>>,
}

impl PathRecorder {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl Processor for PathRecorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn execute(
        &self,
        tree: &mut ConfigTree,
        node: NodeId,
        _ctx: &mut dyn Context,
    ) -> DomainResult<()> {
        let path = tree.get_node(node).ok_or(DomainError::NodeNotFound)?.path_string();
        self.seen.lock().unwrap().push(path);
        Ok(())
    }
}

const SAMPLE: &str = r#"
a:
  x: {}
  y: {inherit: x}
b: {}
"#;

#[rstest]
#[case::pre(TraversalOrder::Pre, vec!["<root>", "a", "a.x", "a.y", "b"])]
#[case::post(TraversalOrder::Post, vec!["a.x", "a.y", "a", "b", "<root>"])]
fn given_order_when_running_then_nodes_visited_in_that_order(
    #[case] order: TraversalOrder,
    #[case] expected: Vec<&str>,
) {
    // Arrange
    let recorder = PathRecorder::default();
    let traversal = Traversal::new(order).with_processor(recorder.clone());
    let mut tree = build(SAMPLE);
    let mut ctx = RunContext::new();

    // Act
    traversal.run(&mut tree, &mut ctx).unwrap();

    // Assert
    assert_eq!(recorder.seen(), expected);
}

#[rstest]
#[case::pre(TraversalOrder::Pre)]
#[case::post(TraversalOrder::Post)]
fn given_any_order_when_running_standard_then_links_are_identical(#[case] order: TraversalOrder) {
    // Arrange
    let traversal = Traversal::standard(ReportPolicy::All, order);
    let mut tree = build(SAMPLE);
    let mut ctx = RunContext::new();

    // Act
    traversal.run(&mut tree, &mut ctx).unwrap();

    // Assert
    let y = tree.find("a.y").unwrap();
    assert_eq!(tree.get_node(y).unwrap().base(), tree.find("a.x"));
    assert!(!ctx.has_failed());
}

#[test]
fn given_failing_level_when_running_then_halts_before_later_nodes() {
    // Arrange: root level fails, so the valid nested level is never linked
    let traversal = Traversal::default();
    let mut tree = build("a:\n  x: {}\n  y: {inherit: x}\nb: {inherit: missing}\n");
    let mut ctx = RunContext::new();

    // Act
    let result = traversal.run(&mut tree, &mut ctx);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnknownParent { .. }))
    ));
    assert_eq!(ctx.diagnostics().len(), 1);
    let y = tree.find("a.y").unwrap();
    assert_eq!(tree.get_node(y).unwrap().base(), None);
}

#[test]
fn given_processors_in_sequence_when_running_then_each_sees_every_node() {
    // Arrange
    let first = PathRecorder::default();
    let second = PathRecorder::default();
    let traversal = Traversal::new(TraversalOrder::Pre)
        .with_processor(first.clone())
        .with_processor(second.clone());
    let mut tree = build(SAMPLE);

    // Act
    traversal.run(&mut tree, &mut RunContext::new()).unwrap();

    // Assert
    assert_eq!(first.seen().len(), tree.len());
    assert_eq!(first.seen(), second.seen());
}
