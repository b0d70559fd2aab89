//! Docker cleanup service (container/image/network/volume pruning)

use std::sync::Arc;

use tracing::debug;

use crate::application::exec::ToolInvoker;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::PruneTarget;

/// What one prune invocation reported.
#[derive(Debug, Clone)]
pub struct PruneReport {
    pub target: PruneTarget,
    /// The "Total reclaimed space" line, when docker printed one
    pub reclaimed: Option<String>,
    /// false under dry-run
    pub ran: bool,
}

pub struct DockerService {
    invoker: ToolInvoker,
    settings: Arc<Settings>,
}

impl DockerService {
    pub fn new(invoker: ToolInvoker, settings: Arc<Settings>) -> Self {
        Self { invoker, settings }
    }

    /// Prune stopped containers, unused images and networks, and
    /// (optionally) volumes.
    ///
    /// `all` prunes all unused images instead of dangling only.
    /// `until_hours` overrides the configured age filter; the filter is
    /// skipped where docker rejects it (volume prune) and disabled
    /// entirely when resolved to 0.
    pub fn cleanup(
        &self,
        all: bool,
        volumes: bool,
        until_hours: Option<u64>,
    ) -> ApplicationResult<Vec<PruneReport>> {
        self.invoker.require("docker")?;

        let until = until_hours
            .unwrap_or(self.settings.docker.prune_until_hours);
        debug!("cleanup: all={}, volumes={}, until={}h", all, volumes, until);

        let mut targets = vec![
            PruneTarget::Containers,
            PruneTarget::Images,
            PruneTarget::Networks,
        ];
        if volumes {
            targets.push(PruneTarget::Volumes);
        }

        let mut reports = Vec::new();
        for target in targets {
            let mut args: Vec<String> =
                vec![target.object().to_string(), "prune".to_string(), "-f".to_string()];
            if target == PruneTarget::Images && all {
                args.push("-a".to_string());
            }
            if until > 0 && target.supports_until_filter() {
                args.push("--filter".to_string());
                args.push(format!("until={until}h"));
            }

            let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
            let report = match self.invoker.run("docker", &arg_refs)? {
                Some(output) => {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let reclaimed = stdout
                        .lines()
                        .find(|l| l.starts_with("Total reclaimed space"))
                        .map(str::to_string);
                    PruneReport {
                        target,
                        reclaimed,
                        ran: true,
                    }
                }
                None => PruneReport {
                    target,
                    reclaimed: None,
                    ran: false,
                },
            };
            reports.push(report);
        }

        Ok(reports)
    }
}
