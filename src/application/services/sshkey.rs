//! SSH key generation (ssh-keygen wrapper)

use std::path::PathBuf;
use std::sync::Arc;

use directories::UserDirs;
use tracing::debug;

use crate::application::exec::ToolInvoker;
use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::FileSystem;

/// Result of a key generation run.
#[derive(Debug, Clone)]
pub struct KeygenReport {
    pub path: PathBuf,
    /// false under dry-run
    pub ran: bool,
}

pub struct SshkeyService {
    fs: Arc<dyn FileSystem>,
    invoker: ToolInvoker,
}

impl SshkeyService {
    pub fn new(fs: Arc<dyn FileSystem>, invoker: ToolInvoker) -> Self {
        Self { fs, invoker }
    }

    /// Generate a key pair with ssh-keygen.
    ///
    /// Refuses to touch an existing key file unless `force` is set (the
    /// passphrase and overwrite prompts stream through to the user).
    pub fn generate(
        &self,
        file: Option<PathBuf>,
        key_type: &str,
        comment: Option<&str>,
        force: bool,
    ) -> ApplicationResult<KeygenReport> {
        self.invoker.require("ssh-keygen")?;

        let path = file.unwrap_or_else(|| default_key_path(key_type));
        debug!("generate: type={}, path={}", key_type, path.display());

        if self.fs.exists(&path) && !force {
            return Err(ApplicationError::AlreadyExists(path));
        }

        if !self.invoker.is_dry_run() {
            self.fs
                .ensure_parent(&path)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("create key directory for {}", path.display()),
                    source: Box::new(e),
                })?;
        }

        let comment = comment
            .map(str::to_string)
            .unwrap_or_else(default_comment);
        let path_str = path.to_string_lossy().into_owned();
        let args = ["-t", key_type, "-C", comment.as_str(), "-f", path_str.as_str()];

        let ran = self.invoker.run_streamed("ssh-keygen", &args)?;
        Ok(KeygenReport { path, ran })
    }
}

fn default_key_path(key_type: &str) -> PathBuf {
    match UserDirs::new() {
        Some(dirs) => dirs.home_dir().join(".ssh").join(format!("id_{key_type}")),
        None => PathBuf::from(format!("id_{key_type}")),
    }
}

fn default_comment() -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| "user".to_string());
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string());
    format!("{user}@{host}")
}
