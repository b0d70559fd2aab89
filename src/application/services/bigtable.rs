//! GCP Bigtable instance management (gcloud wrapper)

use tracing::debug;

use crate::application::exec::ToolInvoker;
use crate::application::ApplicationResult;

/// Arguments for `bigtable create`.
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    pub instance: String,
    pub cluster: String,
    pub zone: String,
    pub nodes: u32,
    pub display_name: Option<String>,
    pub project: Option<String>,
}

pub struct BigtableService {
    invoker: ToolInvoker,
}

impl BigtableService {
    pub fn new(invoker: ToolInvoker) -> Self {
        Self { invoker }
    }

    /// `gcloud bigtable instances list`, raw table output.
    pub fn list(&self, project: Option<&str>) -> ApplicationResult<String> {
        self.invoker.require("gcloud")?;
        let mut args = vec!["bigtable", "instances", "list"];
        if let Some(project) = project {
            args.extend(["--project", project]);
        }
        self.invoker.capture("gcloud", &args)
    }

    /// Create an instance with a single cluster. Returns false under dry-run.
    pub fn create(&self, spec: &InstanceSpec) -> ApplicationResult<bool> {
        debug!("create: instance={}", spec.instance);
        self.invoker.require("gcloud")?;

        let display_name = spec
            .display_name
            .clone()
            .unwrap_or_else(|| spec.instance.clone());
        let cluster_config = format!(
            "id={},zone={},nodes={}",
            spec.cluster, spec.zone, spec.nodes
        );

        let mut args = vec![
            "bigtable",
            "instances",
            "create",
            spec.instance.as_str(),
            "--display-name",
            display_name.as_str(),
            "--cluster-config",
            cluster_config.as_str(),
        ];
        if let Some(project) = &spec.project {
            args.extend(["--project", project]);
        }

        self.invoker.run_streamed("gcloud", &args)
    }

    /// Delete an instance (`--quiet` suppresses gcloud's own prompt; the
    /// CLI layer asks first). Returns false under dry-run.
    pub fn delete(&self, instance: &str, project: Option<&str>) -> ApplicationResult<bool> {
        debug!("delete: instance={}", instance);
        self.invoker.require("gcloud")?;

        let mut args = vec!["bigtable", "instances", "delete", instance, "--quiet"];
        if let Some(project) = project {
            args.extend(["--project", project]);
        }

        self.invoker.run_streamed("gcloud", &args)
    }
}
