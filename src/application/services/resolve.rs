//! Resolution service
//!
//! Loads a configuration source into a tree and runs the processors over it.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::reader::reader_for;
use crate::application::traversal::{RunContext, Traversal};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{ConfigTree, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Service turning configuration files into resolved trees.
pub struct ResolveService {
    fs: Arc<dyn FileSystem>,
}

impl ResolveService {
    /// Create a new resolve service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read, parse and build the tree without running any processor.
    pub fn load(&self, source: &Path) -> ApplicationResult<ConfigTree> {
        debug!("load: source={}", source.display());
        let reader = reader_for(source)?;
        let content = self
            .fs
            .read_to_string(source)
            .with_path_context("read source", source)?;
        let mapping = reader.parse(source, &content)?;
        Ok(TreeBuilder::new().build(&mapping)?)
    }

    /// Load the tree and resolve it with `traversal`.
    ///
    /// On failure the error carries every critical diagnostic of the run.
    pub fn resolve(&self, source: &Path, traversal: &Traversal) -> ApplicationResult<ConfigTree> {
        let mut tree = self.load(source)?;
        let mut ctx = RunContext::new();

        match traversal.run(&mut tree, &mut ctx) {
            Ok(()) => {
                info!("resolved {} ({} nodes)", source.display(), tree.len());
                Ok(tree)
            }
            Err(ApplicationError::Domain(e)) => {
                let mut diagnostics = ctx.into_diagnostics();
                if diagnostics.is_empty() {
                    diagnostics.push(e.to_string());
                }
                Err(ApplicationError::Resolution {
                    path: source.to_path_buf(),
                    diagnostics,
                })
            }
            Err(e) => Err(e),
        }
    }
}
