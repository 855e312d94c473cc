//! Path context for I/O failures while loading configuration sources.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Turns a bare `io::Error` into an [`ApplicationError`] naming the file involved.
pub trait IoResultExt<T> {
    /// Wrap the error as `OperationFailed` with context `"<action>: <path>"`.
    ///
    /// ```ignore
    /// let content = fs.read_to_string(source).with_path_context("read source", source)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
