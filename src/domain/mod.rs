//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod kubeconfig;

pub use entities::{ApplyPlan, ManifestFile, PruneTarget, ResourceKind};
pub use error::{DomainError, DomainResult};
pub use kubeconfig::{Kubeconfig, MergeOutcome, NamedEntry};
