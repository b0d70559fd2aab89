//! Git workflow helpers (sync, merged-branch pruning)

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::exec::ToolInvoker;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;

pub struct GitService {
    invoker: ToolInvoker,
    settings: Arc<Settings>,
}

impl GitService {
    pub fn new(invoker: ToolInvoker, settings: Arc<Settings>) -> Self {
        Self { invoker, settings }
    }

    /// Precondition check: the current directory is inside a git work tree.
    pub fn ensure_repo(&self) -> ApplicationResult<()> {
        let out = self
            .invoker
            .probe("git", &["rev-parse", "--is-inside-work-tree"])?;
        if out.status.success() {
            Ok(())
        } else {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Err(ApplicationError::NotAGitRepo(cwd))
        }
    }

    /// `git fetch --all --prune` followed by `git pull --rebase --autostash`.
    pub fn sync(&self) -> ApplicationResult<()> {
        self.ensure_repo()?;
        self.invoker
            .run_streamed("git", &["fetch", "--all", "--prune"])?;
        self.invoker
            .run_streamed("git", &["pull", "--rebase", "--autostash"])?;
        Ok(())
    }

    /// Name of the currently checked-out branch.
    pub fn current_branch(&self) -> ApplicationResult<String> {
        let out = self
            .invoker
            .capture("git", &["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(out.trim().to_string())
    }

    /// Local branches merged into `base` (default: current branch) that
    /// are safe to delete.
    ///
    /// The current branch (marked `*`), worktree checkouts (marked `+`),
    /// the base itself, and configured protected branches are excluded.
    pub fn merged_branches(&self, base: Option<&str>) -> ApplicationResult<Vec<String>> {
        self.ensure_repo()?;

        let mut args = vec!["branch", "--merged"];
        if let Some(base) = base {
            args.push(base);
        }
        let stdout = self.invoker.capture("git", &args)?;

        let candidates: Vec<String> = stdout
            .lines()
            .filter(|line| !line.starts_with('*') && !line.starts_with('+'))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .filter(|name| base != Some(*name))
            .filter(|name| !self.settings.protected_branches.iter().any(|p| p == name))
            .map(String::from)
            .collect();

        debug!("merged_branches: {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    /// Delete branches with `git branch -d` (merged-only delete; git
    /// itself refuses unmerged branches). Returns the branches deleted.
    pub fn delete_branches(&self, branches: &[String]) -> ApplicationResult<Vec<String>> {
        let mut deleted = Vec::new();
        for branch in branches {
            if self.invoker.run_streamed("git", &["branch", "-d", branch])? {
                deleted.push(branch.clone());
            }
        }
        Ok(deleted)
    }
}
