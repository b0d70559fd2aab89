//! Kubeconfig export, merge, and validation service
//!
//! The pure merge/validate logic lives in `domain::kubeconfig`; this
//! service adds file I/O and the `kubectl config` plumbing around it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::exec::ToolInvoker;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{DomainError, Kubeconfig, MergeOutcome};
use crate::infrastructure::error::InfraError;
use crate::infrastructure::traits::{FileSystem, Selector};

/// Result of exporting one context.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub context: String,
    pub path: PathBuf,
    /// false under dry-run (nothing written)
    pub written: bool,
}

pub struct KubeconfigService {
    fs: Arc<dyn FileSystem>,
    invoker: ToolInvoker,
    selector: Arc<dyn Selector>,
    settings: Arc<Settings>,
}

impl KubeconfigService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        invoker: ToolInvoker,
        selector: Arc<dyn Selector>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            fs,
            invoker,
            selector,
            settings,
        }
    }

    /// Context names known to the active kubeconfig.
    pub fn list_contexts(&self) -> ApplicationResult<Vec<String>> {
        self.invoker.require("kubectl")?;
        let stdout = self
            .invoker
            .capture("kubectl", &["config", "get-contexts", "-o", "name"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// Pick a context interactively (skim).
    pub fn select_context(&self) -> ApplicationResult<String> {
        let contexts = self.list_contexts()?;
        if contexts.is_empty() {
            return Err(ApplicationError::Config {
                message: "no contexts in active kubeconfig".to_string(),
            });
        }

        let chosen = self
            .selector
            .select_one(&contexts, "context> ")
            .map_err(|message| ApplicationError::OperationFailed {
                context: "context selection".to_string(),
                source: Box::new(InfraError::Selector { message }),
            })?;

        chosen.ok_or(ApplicationError::Aborted)
    }

    /// Export one context as a self-contained kubeconfig file.
    ///
    /// With `context: None` the user picks one interactively. The output
    /// defaults to `<kubeconfig_dir>/<context>.yaml`.
    pub fn export(
        &self,
        context: Option<&str>,
        output: Option<&Path>,
    ) -> ApplicationResult<ExportReport> {
        self.invoker.require("kubectl")?;

        let context = match context {
            Some(ctx) => ctx.to_string(),
            None => self.select_context()?,
        };
        debug!("export: context={}", context);

        let yaml = self.invoker.capture(
            "kubectl",
            &[
                "config", "view", "--minify", "--flatten", "-o", "yaml", "--context", &context,
            ],
        )?;

        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.kubeconfig_dir.join(format!("{context}.yaml")));

        if self.invoker.is_dry_run() {
            return Ok(ExportReport {
                context,
                path,
                written: false,
            });
        }

        self.write_file(&path, &yaml)?;
        Ok(ExportReport {
            context,
            path,
            written: true,
        })
    }

    /// Parse a kubeconfig file.
    pub fn load(&self, path: &Path) -> ApplicationResult<Kubeconfig> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::MissingFile(path.to_path_buf()));
        }
        let content =
            self.fs
                .read_to_string(path)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("read kubeconfig {}", path.display()),
                    source: Box::new(e),
                })?;

        let doc: Kubeconfig =
            serde_yaml::from_str(&content).map_err(|e| DomainError::InvalidKubeconfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(doc)
    }

    /// Merge kubeconfig files into one validated document.
    pub fn merge_files(
        &self,
        files: &[PathBuf],
        force: bool,
    ) -> ApplicationResult<(Kubeconfig, MergeOutcome)> {
        let mut merged = Kubeconfig::default();
        let mut outcome = MergeOutcome::default();

        for file in files {
            debug!("merge_files: {}", file.display());
            let doc = self.load(file)?;
            outcome.absorb(merged.merge_from(&doc, force)?);
        }

        merged.validate()?;
        Ok((merged, outcome))
    }

    /// Serialize a document to YAML.
    pub fn render(&self, doc: &Kubeconfig) -> ApplicationResult<String> {
        serde_yaml::to_string(doc).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize kubeconfig".to_string(),
            source: Box::new(e),
        })
    }

    /// Serialize a document to `path`. Returns false under dry-run.
    pub fn write_document(&self, doc: &Kubeconfig, path: &Path) -> ApplicationResult<bool> {
        let yaml = self.render(doc)?;

        if self.invoker.is_dry_run() {
            return Ok(false);
        }

        self.write_file(path, &yaml)?;
        Ok(true)
    }

    /// Parse and structurally validate a kubeconfig file.
    pub fn validate_file(&self, path: &Path) -> ApplicationResult<Kubeconfig> {
        let doc = self.load(path)?;
        doc.validate()?;
        Ok(doc)
    }

    fn write_file(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .and_then(|()| self.fs.write(path, content))
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("write {}", path.display()),
                source: Box::new(e),
            })
    }
}
