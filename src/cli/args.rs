//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// DevOps toolbelt: dependency updates, git helpers, ordered Kubernetes
/// apply, kubeconfig merge, Docker cleanup, and Postgres backups
#[derive(Parser, Debug)]
#[command(name = "opskit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print external commands instead of running anything that mutates state
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Append status output (uncolored) to a log file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update project dependencies
    Deps {
        #[command(subcommand)]
        command: DepsCommands,
    },

    /// Git workflow helpers
    Git {
        #[command(subcommand)]
        command: GitCommands,
    },

    /// Kubernetes manifests and kubeconfig management
    Kube {
        #[command(subcommand)]
        command: KubeCommands,
    },

    /// GCP Bigtable instance management
    Bigtable {
        #[command(subcommand)]
        command: BigtableCommands,
    },

    /// Docker housekeeping
    Docker {
        #[command(subcommand)]
        command: DockerCommands,
    },

    /// Postgres backup and restore
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// SSH key management
    Sshkey {
        #[command(subcommand)]
        command: SshkeyCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version and which wrapped tools are installed
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum DepsCommands {
    /// Update npm dependencies (package.json)
    Npm {
        /// Project directory (default: cwd)
        #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        /// Report outdated packages without updating
        #[arg(long)]
        check_only: bool,
    },

    /// Upgrade pip packages from a requirements file
    Pip {
        /// Requirements file
        #[arg(short, long, default_value = "requirements.txt", value_hint = ValueHint::FilePath)]
        requirements: PathBuf,
        /// Report outdated packages without upgrading
        #[arg(long)]
        check_only: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GitCommands {
    /// Fetch with prune, then pull --rebase --autostash
    Sync,

    /// Delete local branches already merged into a base branch
    Prune {
        /// Base branch (default: current branch)
        #[arg(short, long)]
        base: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum KubeCommands {
    /// Apply manifests from the k8s/<resource-type>/ layout in dependency order
    Apply {
        /// Manifest directory (default from config: k8s)
        #[arg(long, value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
        /// kubectl context to apply against
        #[arg(long)]
        context: Option<String>,
    },

    /// Export one context as a self-contained kubeconfig file
    Export {
        /// Context name (interactive selection if omitted)
        #[arg(long)]
        context: Option<String>,
        /// Output file (default: <kubeconfig_dir>/<context>.yaml)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Merge kubeconfig files into one deduplicated document
    Merge {
        /// Kubeconfig files to merge, in precedence order
        #[arg(num_args = 1.., value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// On name conflicts, let the later file win instead of failing
        #[arg(long)]
        force: bool,
    },

    /// Validate a kubeconfig file's structure and references
    Validate {
        /// Kubeconfig file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum BigtableCommands {
    /// List Bigtable instances
    List {
        /// GCP project (default: gcloud's active project)
        #[arg(long)]
        project: Option<String>,
    },

    /// Create an instance with a single cluster
    Create {
        /// Instance ID
        instance: String,
        /// Cluster ID
        #[arg(long)]
        cluster: String,
        /// Cluster zone (e.g. europe-west3-a)
        #[arg(long)]
        zone: String,
        /// Number of nodes
        #[arg(long, default_value_t = 1)]
        nodes: u32,
        /// Display name (default: instance ID)
        #[arg(long)]
        display_name: Option<String>,
        /// GCP project
        #[arg(long)]
        project: Option<String>,
    },

    /// Delete an instance
    Delete {
        /// Instance ID
        instance: String,
        /// GCP project
        #[arg(long)]
        project: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DockerCommands {
    /// Prune stopped containers, unused images and networks
    Cleanup {
        /// Prune all unused images, not only dangling ones
        #[arg(long)]
        all: bool,
        /// Also prune unused volumes
        #[arg(long)]
        volumes: bool,
        /// Only prune objects older than this many hours (0 = no age filter)
        #[arg(long)]
        until: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Dump a database with pg_dump (custom format)
    Backup {
        /// Database name
        database: String,
        /// Output file (default: <backup_dir>/<db>_<host>_<timestamp>.dump)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Database server host
        #[arg(long)]
        host: Option<String>,
        /// Database server port
        #[arg(long)]
        port: Option<u16>,
        /// Database user
        #[arg(long)]
        user: Option<String>,
    },

    /// Restore a dump with pg_restore --clean --if-exists
    Restore {
        /// Database name
        database: String,
        /// Dump file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Database server host
        #[arg(long)]
        host: Option<String>,
        /// Database server port
        #[arg(long)]
        port: Option<u16>,
        /// Database user
        #[arg(long)]
        user: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SshkeyCommands {
    /// Generate a key pair
    Generate {
        /// Key file (default: ~/.ssh/id_<type>)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Key type
        #[arg(short = 't', long, default_value = "ed25519")]
        key_type: String,
        /// Key comment (default: user@host)
        #[arg(short = 'C', long)]
        comment: Option<String>,
        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
