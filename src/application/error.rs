//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add tool/precondition context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("required tool not installed: {0}")]
    ToolNotFound(String),

    #[error("{tool} failed ({context}): {detail}")]
    ToolFailed {
        tool: String,
        context: String,
        detail: String,
    },

    #[error("file not found: {0}")]
    MissingFile(PathBuf),

    #[error("not a git repository: {0}")]
    NotAGitRepo(PathBuf),

    #[error("refusing to overwrite existing file: {0} (use --force)")]
    AlreadyExists(PathBuf),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("aborted")]
    Aborted,

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
