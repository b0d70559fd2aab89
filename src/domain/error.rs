//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent violations of the data rules for manifests
/// and kubeconfig documents. These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid kubeconfig {path}: {message}")]
    InvalidKubeconfig { path: PathBuf, message: String },

    #[error("duplicate {section} entry: {name}")]
    DuplicateName { section: String, name: String },

    #[error("conflicting {section} entry '{name}' (same name, different definition; use --force to overwrite)")]
    ConflictingEntry { section: String, name: String },

    #[error("{kind} '{referrer}' references undefined {section}: {name}")]
    DanglingReference {
        kind: String,
        referrer: String,
        section: String,
        name: String,
    },

    #[error("invalid entry name in {section}: {name:?}")]
    InvalidName { section: String, name: String },

    #[error("invalid manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },
}

/// Result type for domain layer operations.
pub type DomainResult<T> = Result<T, DomainError>;
