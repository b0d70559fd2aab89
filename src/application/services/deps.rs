//! Dependency update service (npm, pip)

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::exec::ToolInvoker;
use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::FileSystem;

/// What a dependency update run found and did.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// Raw outdated-packages listing from the wrapped tool (may be empty)
    pub outdated: String,
    /// Whether the update step actually ran (false under check-only or dry-run)
    pub updated: bool,
}

/// Wraps `npm outdated`/`npm update` and `pip list --outdated`/`pip install -U`.
pub struct DepsService {
    fs: Arc<dyn FileSystem>,
    invoker: ToolInvoker,
}

impl DepsService {
    pub fn new(fs: Arc<dyn FileSystem>, invoker: ToolInvoker) -> Self {
        Self { fs, invoker }
    }

    /// Update npm dependencies of the package in `dir`.
    ///
    /// Precondition: `dir/package.json` exists and npm is installed.
    /// `npm outdated` exits 1 when packages are outdated, so its status
    /// is deliberately ignored.
    pub fn npm_update(&self, dir: &Path, check_only: bool) -> ApplicationResult<UpdateReport> {
        debug!("npm_update: dir={}, check_only={}", dir.display(), check_only);

        let manifest = dir.join("package.json");
        if !self.fs.is_file(&manifest) {
            return Err(ApplicationError::MissingFile(manifest));
        }
        self.invoker.require("npm")?;

        let prefix = dir.to_string_lossy();
        let out = self.invoker.probe("npm", &["--prefix", &prefix, "outdated"])?;
        let outdated = String::from_utf8_lossy(&out.stdout).trim_end().to_string();

        let updated = if check_only {
            false
        } else {
            self.invoker.run_streamed("npm", &["--prefix", &prefix, "update"])?
        };

        Ok(UpdateReport { outdated, updated })
    }

    /// Upgrade pip packages pinned in a requirements file.
    pub fn pip_update(
        &self,
        requirements: &Path,
        check_only: bool,
    ) -> ApplicationResult<UpdateReport> {
        debug!(
            "pip_update: requirements={}, check_only={}",
            requirements.display(),
            check_only
        );

        if !self.fs.is_file(requirements) {
            return Err(ApplicationError::MissingFile(requirements.to_path_buf()));
        }
        self.invoker.require("pip")?;

        let out = self.invoker.probe("pip", &["list", "--outdated"])?;
        let outdated = String::from_utf8_lossy(&out.stdout).trim_end().to_string();

        let req = requirements.to_string_lossy();
        let updated = if check_only {
            false
        } else {
            self.invoker
                .run_streamed("pip", &["install", "--upgrade", "-r", &req])?
        };

        Ok(UpdateReport { outdated, updated })
    }
}
