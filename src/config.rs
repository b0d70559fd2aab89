//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/opskit/opskit.toml`
//! 3. Local config: `.opskit.toml` (current directory)
//! 4. Environment variables: `OPSKIT_*` prefix (`__` separates nesting)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};

/// Docker cleanup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DockerConfig {
    /// Default age filter for pruning, in hours (0 disables the filter)
    pub prune_until_hours: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            prune_until_hours: 24,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the `k8s/<resource-type>/` manifest layout
    pub manifest_dir: PathBuf,
    /// Where `kube export` writes per-context kubeconfig files
    pub kubeconfig_dir: PathBuf,
    /// Where `db backup` writes dump files
    pub backup_dir: PathBuf,
    /// Branches `git prune` never deletes
    pub protected_branches: Vec<String>,
    #[serde(default)]
    pub docker: DockerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_dir: PathBuf::from("k8s"),
            kubeconfig_dir: PathBuf::from("~/.kube/exports"),
            backup_dir: PathBuf::from("~/backups"),
            protected_branches: vec!["main".into(), "master".into(), "develop".into()],
            docker: DockerConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with full layering and `~` expansion.
    pub fn load() -> ApplicationResult<Self> {
        Self::load_from(Path::new(".opskit.toml"))
    }

    /// Load settings with an explicit local config path (for tests).
    pub fn load_from(local: &Path) -> ApplicationResult<Self> {
        let mut builder = Config::builder();

        if let Some(global) = Self::global_config_path() {
            debug!("config: global candidate {}", global.display());
            builder = builder.add_source(File::from(global).required(false));
        }
        builder = builder.add_source(File::from(local.to_path_buf()).required(false));
        builder = builder.add_source(Environment::with_prefix("OPSKIT")
                .prefix_separator("_")
                .separator("__"));

        let raw: RawSettings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ApplicationError::Config {
                message: e.to_string(),
            })?;

        Ok(Settings::default().merged(raw).expanded())
    }

    /// Overlay raw (partial) settings onto self.
    fn merged(&self, raw: RawSettings) -> Self {
        Self {
            manifest_dir: raw.manifest_dir.unwrap_or_else(|| self.manifest_dir.clone()),
            kubeconfig_dir: raw
                .kubeconfig_dir
                .unwrap_or_else(|| self.kubeconfig_dir.clone()),
            backup_dir: raw.backup_dir.unwrap_or_else(|| self.backup_dir.clone()),
            protected_branches: raw
                .protected_branches
                .unwrap_or_else(|| self.protected_branches.clone()),
            docker: DockerConfig {
                prune_until_hours: raw
                    .docker
                    .prune_until_hours
                    .unwrap_or(self.docker.prune_until_hours),
            },
        }
    }

    /// Expand `~` in path-like settings.
    fn expanded(mut self) -> Self {
        self.kubeconfig_dir = expand_path(&self.kubeconfig_dir);
        self.backup_dir = expand_path(&self.backup_dir);
        self.manifest_dir = expand_path(&self.manifest_dir);
        self
    }

    /// Path of the global config file, if a home directory exists.
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "opskit").map(|dirs| dirs.config_dir().join("opskit.toml"))
    }

    /// Path of the local config file.
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".opskit.toml")
    }

    /// Render the settings as a TOML document (for `config show` and
    /// `config init`).
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("cannot serialize settings: {e}"),
        })
    }
}

/// Raw settings for intermediate parsing (all fields optional so a
/// partial config file only overrides what it names).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    manifest_dir: Option<PathBuf>,
    kubeconfig_dir: Option<PathBuf>,
    backup_dir: Option<PathBuf>,
    protected_branches: Option<Vec<String>>,
    docker: RawDockerConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDockerConfig {
    prune_until_hours: Option<u64>,
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
}
