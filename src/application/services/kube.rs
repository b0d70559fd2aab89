//! Ordered Kubernetes manifest application
//!
//! Walks the `k8s/<resource-type>/` layout, resolves each manifest's
//! resource kind, and applies them in dependency order (namespaces
//! before anything, ingresses after workloads, unknown kinds last).

use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::application::exec::ToolInvoker;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ApplyPlan, DomainError, ManifestFile, ResourceKind};
use crate::infrastructure::traits::FileSystem;

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

pub struct KubeService {
    fs: Arc<dyn FileSystem>,
    invoker: ToolInvoker,
}

impl KubeService {
    pub fn new(fs: Arc<dyn FileSystem>, invoker: ToolInvoker) -> Self {
        Self { fs, invoker }
    }

    /// Build the ordered apply plan for a manifest directory.
    ///
    /// Files in a `<resource-type>/` subdirectory take their kind from
    /// the directory name; files directly under `dir` are ranked by
    /// sniffing their YAML `kind:` field. Non-manifest extensions are
    /// ignored.
    pub fn build_plan(&self, dir: &Path) -> ApplicationResult<ApplyPlan> {
        debug!("build_plan: dir={}", dir.display());

        if !self.fs.is_dir(dir) {
            return Err(ApplicationError::MissingFile(dir.to_path_buf()));
        }

        let mut manifests = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if !is_manifest_file(path) {
                continue;
            }

            let rel = path.strip_prefix(dir).unwrap_or(path);
            let kind = match rel.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(sub) => {
                    // first path component below dir names the kind
                    let first = sub
                        .components()
                        .next()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .unwrap_or_default();
                    ResourceKind::from_dir_name(&first)
                }
                None => self.sniff_kind(path)?,
            };

            manifests.push(ManifestFile {
                kind,
                path: path.to_path_buf(),
            });
        }

        debug!("build_plan: {} manifest(s)", manifests.len());
        Ok(ApplyPlan::new(manifests))
    }

    /// Apply every manifest in plan order, stopping at the first failure.
    /// Returns the number of manifests actually applied.
    pub fn apply(&self, plan: &ApplyPlan, context: Option<&str>) -> ApplicationResult<usize> {
        self.invoker.require("kubectl")?;

        let mut applied = 0;
        for manifest in plan.manifests() {
            let path = manifest.path.to_string_lossy();
            let mut args: Vec<&str> = Vec::new();
            if let Some(ctx) = context {
                args.extend(["--context", ctx]);
            }
            args.extend(["apply", "-f", path.as_ref()]);

            if self.invoker.run_streamed("kubectl", &args)? {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Resolve a loose manifest's kind from its `kind:` field.
    fn sniff_kind(&self, path: &Path) -> ApplicationResult<ResourceKind> {
        let content =
            self.fs
                .read_to_string(path)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("read manifest {}", path.display()),
                    source: Box::new(e),
                })?;

        let doc: Value =
            serde_yaml::from_str(&content).map_err(|e| DomainError::InvalidManifest {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        doc.get("kind")
            .and_then(Value::as_str)
            .map(ResourceKind::from_kind_name)
            .ok_or_else(|| {
                DomainError::InvalidManifest {
                    path: path.to_path_buf(),
                    message: "missing 'kind' field".to_string(),
                }
                .into()
            })
    }
}

fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MANIFEST_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
