//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::ResolveService;
use crate::application::Traversal;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub resolve_service: ResolveService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let resolve_service = ResolveService::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            resolve_service,
        }
    }

    /// Traversal configured from the resolution settings.
    pub fn traversal(&self) -> Traversal {
        Traversal::standard(
            self.settings.resolution.report,
            self.settings.resolution.order,
        )
    }
}
