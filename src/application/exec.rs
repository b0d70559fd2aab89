//! Dry-run-aware external tool invocation
//!
//! Every wrapped binary (git, npm, kubectl, ...) is reached through
//! `ToolInvoker`. Read-only probes always run; mutating invocations are
//! echoed and skipped under `--dry-run`.

use std::process::Output;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::cli::output;
use crate::infrastructure::traits::CommandRunner;

/// Wraps a `CommandRunner` with tool-not-found detection, exit status
/// checking, and the global dry-run switch.
#[derive(Clone)]
pub struct ToolInvoker {
    cmd: Arc<dyn CommandRunner>,
    dry_run: bool,
}

fn render(tool: &str, args: &[&str]) -> String {
    if args.is_empty() {
        tool.to_string()
    } else {
        format!("{} {}", tool, args.join(" "))
    }
}

impl ToolInvoker {
    pub fn new(cmd: Arc<dyn CommandRunner>, dry_run: bool) -> Self {
        Self { cmd, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Check that a tool is installed by spawning it with a benign flag.
    ///
    /// Only a spawn failure (binary not on PATH) is an error; a nonzero
    /// exit is fine (ssh-keygen has no `--version` and exits 1).
    pub fn require(&self, tool: &str) -> ApplicationResult<()> {
        match self.cmd.run(tool, &["--version"]) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ApplicationError::ToolNotFound(tool.to_string()))
            }
            Err(e) => Err(ApplicationError::OperationFailed {
                context: format!("probe {tool}"),
                source: Box::new(e),
            }),
        }
    }

    /// Run a read-only command and capture its output, regardless of
    /// dry-run. The exit status is returned to the caller unchecked
    /// (`npm outdated` exits 1 when packages are outdated).
    pub fn probe(&self, tool: &str, args: &[&str]) -> ApplicationResult<Output> {
        debug!("probe: {}", render(tool, args));
        self.cmd.run(tool, args).map_err(|e| self.spawn_error(tool, args, e))
    }

    /// Run a read-only command, capture stdout, and fail on nonzero exit.
    pub fn capture(&self, tool: &str, args: &[&str]) -> ApplicationResult<String> {
        let output = self.probe(tool, args)?;
        if !output.status.success() {
            return Err(self.failure(tool, args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a mutating command with captured output.
    ///
    /// Under dry-run the rendered command is echoed and `None` returned.
    pub fn run(&self, tool: &str, args: &[&str]) -> ApplicationResult<Option<Output>> {
        let rendered = render(tool, args);
        if self.dry_run {
            output::dry_run(&rendered);
            return Ok(None);
        }
        debug!("run: {}", rendered);
        let output = self.cmd.run(tool, args).map_err(|e| self.spawn_error(tool, args, e))?;
        if !output.status.success() {
            return Err(self.failure(tool, args, &output));
        }
        Ok(Some(output))
    }

    /// Run a mutating command with inherited stdio so the wrapped tool's
    /// own output and prompts reach the terminal.
    ///
    /// Under dry-run the rendered command is echoed and `false` returned.
    pub fn run_streamed(&self, tool: &str, args: &[&str]) -> ApplicationResult<bool> {
        let rendered = render(tool, args);
        if self.dry_run {
            output::dry_run(&rendered);
            return Ok(false);
        }
        debug!("run_streamed: {}", rendered);
        let status = self
            .cmd
            .status(tool, args)
            .map_err(|e| self.spawn_error(tool, args, e))?;
        if !status.success() {
            return Err(ApplicationError::ToolFailed {
                tool: tool.to_string(),
                context: rendered,
                detail: match status.code() {
                    Some(code) => format!("exit code {code}"),
                    None => "terminated by signal".to_string(),
                },
            });
        }
        Ok(true)
    }

    fn spawn_error(&self, tool: &str, args: &[&str], e: std::io::Error) -> ApplicationError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApplicationError::ToolNotFound(tool.to_string())
        } else {
            ApplicationError::OperationFailed {
                context: render(tool, args),
                source: Box::new(e),
            }
        }
    }

    fn failure(&self, tool: &str, args: &[&str], output: &Output) -> ApplicationError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            match output.status.code() {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            }
        } else {
            stderr.trim().to_string()
        };
        ApplicationError::ToolFailed {
            tool: tool.to_string(),
            context: render(tool, args),
            detail,
        }
    }
}
