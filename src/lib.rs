//! opskit: a consolidated DevOps toolbelt
//!
//! One dispatcher over the routine wrappers: dependency updates (npm,
//! pip), git workflow helpers, ordered Kubernetes manifest application,
//! kubeconfig export/merge/validation, GCP Bigtable management, Docker
//! cleanup, and Postgres backup/restore. The wrapped tools do the hard
//! work; opskit supplies the preconditions, ordering, and reporting.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
