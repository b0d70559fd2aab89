//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    BigtableService, DatabaseService, DepsService, DockerService, GitService, KubeService,
    KubeconfigService, SshkeyService,
};
use crate::application::ToolInvoker;
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, RealCommandRunner, RealFileSystem, Selector, SkimSelector,
};

/// Container holding shared dependencies; services are constructed on
/// demand (they are cheap handle bundles).
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Interactive selector abstraction
    pub selector: Arc<dyn Selector>,

    invoker: ToolInvoker,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, dry_run: bool) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(SkimSelector),
            dry_run,
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        selector: Arc<dyn Selector>,
        dry_run: bool,
    ) -> Self {
        let settings = Arc::new(settings);
        let invoker = ToolInvoker::new(cmd.clone(), dry_run);

        Self {
            settings,
            fs,
            cmd,
            selector,
            invoker,
        }
    }

    pub fn invoker(&self) -> ToolInvoker {
        self.invoker.clone()
    }

    pub fn deps(&self) -> DepsService {
        DepsService::new(self.fs.clone(), self.invoker())
    }

    pub fn git(&self) -> GitService {
        GitService::new(self.invoker(), self.settings.clone())
    }

    pub fn kube(&self) -> KubeService {
        KubeService::new(self.fs.clone(), self.invoker())
    }

    pub fn kubeconfig(&self) -> KubeconfigService {
        KubeconfigService::new(
            self.fs.clone(),
            self.invoker(),
            self.selector.clone(),
            self.settings.clone(),
        )
    }

    pub fn bigtable(&self) -> BigtableService {
        BigtableService::new(self.invoker())
    }

    pub fn docker(&self) -> DockerService {
        DockerService::new(self.invoker(), self.settings.clone())
    }

    pub fn database(&self) -> DatabaseService {
        DatabaseService::new(self.fs.clone(), self.invoker(), self.settings.clone())
    }

    pub fn sshkey(&self) -> SshkeyService {
        SshkeyService::new(self.fs.clone(), self.invoker())
    }
}
