//! Execution context handed to processors.

/// Reporting handle passed through every processor call.
///
/// A critical report is fatal for the run: the processor that issues it also
/// returns an error, and the traversal driver stops walking the tree.
pub trait Context {
    fn log_critical(&mut self, message: &str);
}
