//! Postgres backup/restore service (pg_dump / pg_restore wrapper)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::exec::ToolInvoker;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::infrastructure::traits::FileSystem;

/// Connection options passed straight through to the postgres tools.
/// Unset fields fall back to the tools' own defaults (PG* env vars).
#[derive(Debug, Clone, Default)]
pub struct ConnectionOpts {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
}

impl ConnectionOpts {
    fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(host) = &self.host {
            args.push("--host".to_string());
            args.push(host.clone());
        }
        if let Some(port) = self.port {
            args.push("--port".to_string());
            args.push(port.to_string());
        }
        if let Some(user) = &self.user {
            args.push("--username".to_string());
            args.push(user.clone());
        }
        args
    }
}

/// Result of a backup run.
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub path: PathBuf,
    /// false under dry-run
    pub ran: bool,
}

pub struct DatabaseService {
    fs: Arc<dyn FileSystem>,
    invoker: ToolInvoker,
    settings: Arc<Settings>,
}

impl DatabaseService {
    pub fn new(fs: Arc<dyn FileSystem>, invoker: ToolInvoker, settings: Arc<Settings>) -> Self {
        Self {
            fs,
            invoker,
            settings,
        }
    }

    /// Default dump path: `<backup_dir>/<db>_<hostname>_<timestamp>.dump`.
    pub fn default_backup_path(&self, database: &str) -> PathBuf {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string());
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.settings
            .backup_dir
            .join(format!("{database}_{host}_{stamp}.dump"))
    }

    /// Custom-format dump via `pg_dump -Fc`.
    pub fn backup(
        &self,
        database: &str,
        output: Option<PathBuf>,
        opts: &ConnectionOpts,
    ) -> ApplicationResult<BackupReport> {
        self.invoker.require("pg_dump")?;

        let path = output.unwrap_or_else(|| self.default_backup_path(database));
        debug!("backup: database={}, path={}", database, path.display());

        if !self.invoker.is_dry_run() {
            self.fs
                .ensure_parent(&path)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("create backup directory for {}", path.display()),
                    source: Box::new(e),
                })?;
        }

        let path_str = path.to_string_lossy().into_owned();
        let mut args = opts.to_args();
        args.extend(["-Fc".to_string(), "-f".to_string(), path_str, database.to_string()]);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        let ran = self.invoker.run_streamed("pg_dump", &arg_refs)?;
        Ok(BackupReport { path, ran })
    }

    /// Restore a dump via `pg_restore --clean --if-exists`.
    /// Returns false under dry-run.
    pub fn restore(
        &self,
        database: &str,
        file: &Path,
        opts: &ConnectionOpts,
    ) -> ApplicationResult<bool> {
        if !self.fs.is_file(file) {
            return Err(ApplicationError::MissingFile(file.to_path_buf()));
        }
        self.invoker.require("pg_restore")?;
        debug!("restore: database={}, file={}", database, file.display());

        let mut args = vec!["--clean".to_string(), "--if-exists".to_string()];
        args.extend(opts.to_args());
        args.push("-d".to_string());
        args.push(database.to_string());
        args.push(file.to_string_lossy().into_owned());
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        self.invoker.run_streamed("pg_restore", &arg_refs)
    }
}
