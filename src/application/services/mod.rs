//! Application services: one per wrapped tool family

pub mod bigtable;
pub mod database;
pub mod deps;
pub mod docker;
pub mod git;
pub mod kube;
pub mod kubeconfig;
pub mod sshkey;

pub use bigtable::{BigtableService, InstanceSpec};
pub use database::{BackupReport, ConnectionOpts, DatabaseService};
pub use deps::{DepsService, UpdateReport};
pub use docker::{DockerService, PruneReport};
pub use git::GitService;
pub use kube::KubeService;
pub use kubeconfig::{ExportReport, KubeconfigService};
pub use sshkey::{KeygenReport, SshkeyService};
