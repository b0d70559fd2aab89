//! Test support: logging setup and mock I/O implementations
//!
//! The mocks live here (not under `#[cfg(test)]`) so integration tests
//! can drive services without the wrapped binaries installed.

use std::collections::HashSet;
use std::io;
use std::process::{ExitStatus, Output};
use std::sync::{Mutex, Once};

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::infrastructure::traits::{CommandRunner, Selector};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: failed to set up logging: {e}");
        });
    }
}

/// A canned response for one mocked invocation.
#[derive(Debug, Clone)]
pub struct CannedOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Default for CannedOutput {
    fn default() -> Self {
        Self {
            code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Recording command runner.
///
/// Every invocation is rendered as `"tool arg1 arg2 ..."` and recorded.
/// Responses are looked up by prefix match (first match wins); anything
/// unmatched succeeds with empty output. Tools registered as missing
/// fail to spawn with `ErrorKind::NotFound`, like an absent binary.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    canned: Mutex<Vec<(String, CannedOutput)>>,
    missing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned stdout (exit 0) for invocations starting with `prefix`.
    pub fn with_stdout(self, prefix: &str, stdout: &str) -> Self {
        self.with_result(
            prefix,
            CannedOutput {
                stdout: stdout.to_string(),
                ..CannedOutput::default()
            },
        )
    }

    /// Full canned response for invocations starting with `prefix`.
    pub fn with_result(self, prefix: &str, response: CannedOutput) -> Self {
        self.canned
            .lock()
            .unwrap()
            .push((prefix.to_string(), response));
        self
    }

    /// Make a tool appear uninstalled.
    pub fn missing_tool(self, tool: &str) -> Self {
        self.missing.lock().unwrap().insert(tool.to_string());
        self
    }

    /// Rendered invocations, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, tool: &str, args: &[&str]) -> io::Result<CannedOutput> {
        let rendered = if args.is_empty() {
            tool.to_string()
        } else {
            format!("{} {}", tool, args.join(" "))
        };
        self.calls.lock().unwrap().push(rendered.clone());

        if self.missing.lock().unwrap().contains(tool) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("No such file or directory: {tool}"),
            ));
        }

        Ok(self
            .canned
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_default())
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        let response = self.respond(cmd, args)?;
        Ok(Output {
            status: exit_status(response.code),
            stdout: response.stdout.into_bytes(),
            stderr: response.stderr.into_bytes(),
        })
    }

    fn status(&self, cmd: &str, args: &[&str]) -> io::Result<ExitStatus> {
        let response = self.respond(cmd, args)?;
        Ok(exit_status(response.code))
    }
}

/// Selector that always returns a fixed choice (or None, simulating Esc).
#[derive(Debug, Default)]
pub struct StaticSelector {
    pub choice: Option<String>,
}

impl StaticSelector {
    pub fn choosing(choice: &str) -> Self {
        Self {
            choice: Some(choice.to_string()),
        }
    }

    pub fn cancelling() -> Self {
        Self { choice: None }
    }
}

impl Selector for StaticSelector {
    fn select_one(&self, items: &[String], _prompt: &str) -> Result<Option<String>, String> {
        Ok(self
            .choice
            .as_ref()
            .filter(|c| items.contains(*c))
            .cloned())
    }
}
