use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::instrument;

use crate::application::services::{ConnectionOpts, InstanceSpec};
use crate::application::ApplicationError;
use crate::cli::args::{
    BigtableCommands, Cli, Commands, ConfigCommands, DbCommands, DepsCommands, DockerCommands,
    GitCommands, KubeCommands, SshkeyCommands,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings, cli.dry_run);

    match command {
        Commands::Deps { command } => match command {
            DepsCommands::Npm { dir, check_only } => _deps_npm(&container, dir, *check_only),
            DepsCommands::Pip {
                requirements,
                check_only,
            } => _deps_pip(&container, requirements, *check_only),
        },
        Commands::Git { command } => match command {
            GitCommands::Sync => _git_sync(&container),
            GitCommands::Prune { base, yes } => _git_prune(&container, base.as_deref(), *yes),
        },
        Commands::Kube { command } => match command {
            KubeCommands::Apply { dir, context } => {
                _kube_apply(&container, dir.as_deref(), context.as_deref())
            }
            KubeCommands::Export { context, output } => {
                _kube_export(&container, context.as_deref(), output.as_deref())
            }
            KubeCommands::Merge {
                files,
                output,
                force,
            } => _kube_merge(&container, files, output.as_deref(), *force),
            KubeCommands::Validate { file } => _kube_validate(&container, file),
        },
        Commands::Bigtable { command } => match command {
            BigtableCommands::List { project } => _bigtable_list(&container, project.as_deref()),
            BigtableCommands::Create {
                instance,
                cluster,
                zone,
                nodes,
                display_name,
                project,
            } => _bigtable_create(
                &container,
                InstanceSpec {
                    instance: instance.clone(),
                    cluster: cluster.clone(),
                    zone: zone.clone(),
                    nodes: *nodes,
                    display_name: display_name.clone(),
                    project: project.clone(),
                },
            ),
            BigtableCommands::Delete {
                instance,
                project,
                yes,
            } => _bigtable_delete(&container, instance, project.as_deref(), *yes),
        },
        Commands::Docker { command } => match command {
            DockerCommands::Cleanup {
                all,
                volumes,
                until,
            } => _docker_cleanup(&container, *all, *volumes, *until),
        },
        Commands::Db { command } => match command {
            DbCommands::Backup {
                database,
                output,
                host,
                port,
                user,
            } => _db_backup(
                &container,
                database,
                output.clone(),
                ConnectionOpts {
                    host: host.clone(),
                    port: *port,
                    user: user.clone(),
                },
            ),
            DbCommands::Restore {
                database,
                file,
                host,
                port,
                user,
                yes,
            } => _db_restore(
                &container,
                database,
                file,
                ConnectionOpts {
                    host: host.clone(),
                    port: *port,
                    user: user.clone(),
                },
                *yes,
            ),
        },
        Commands::Sshkey { command } => match command {
            SshkeyCommands::Generate {
                file,
                key_type,
                comment,
                force,
            } => _sshkey_generate(&container, file.clone(), key_type, comment.as_deref(), *force),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => _config_show(&container),
            ConfigCommands::Init { global } => _config_init(&container, *global),
            ConfigCommands::Path => _config_path(),
        },
        Commands::Info => _info(&container),
        Commands::Completion { .. } => unreachable!("handled above"),
    }
}

#[instrument(skip(container))]
fn _deps_npm(container: &ServiceContainer, dir: &Path, check_only: bool) -> CliResult<()> {
    let report = container.deps().npm_update(dir, check_only)?;

    if report.outdated.is_empty() {
        output::success("all npm packages up to date");
    } else {
        output::header("Outdated packages:");
        output::info(&report.outdated);
    }
    if report.updated {
        output::success("npm update complete");
    }
    Ok(())
}

#[instrument(skip(container))]
fn _deps_pip(container: &ServiceContainer, requirements: &Path, check_only: bool) -> CliResult<()> {
    let report = container.deps().pip_update(requirements, check_only)?;

    if report.outdated.is_empty() {
        output::success("all pip packages up to date");
    } else {
        output::header("Outdated packages:");
        output::info(&report.outdated);
    }
    if report.updated {
        output::success("pip upgrade complete");
    }
    Ok(())
}

#[instrument(skip(container))]
fn _git_sync(container: &ServiceContainer) -> CliResult<()> {
    container.git().sync()?;
    output::success("repository synced");
    Ok(())
}

#[instrument(skip(container))]
fn _git_prune(container: &ServiceContainer, base: Option<&str>, yes: bool) -> CliResult<()> {
    let git = container.git();
    let branches = git.merged_branches(base)?;

    if branches.is_empty() {
        output::success("no merged branches to delete");
        return Ok(());
    }

    output::header("Merged branches:");
    for branch in &branches {
        output::detail(branch);
    }

    if !yes && !container.invoker().is_dry_run() && !ask("Delete these branches?")? {
        output::warning("aborted, nothing deleted");
        return Ok(());
    }

    let deleted = git.delete_branches(&branches)?;
    if !deleted.is_empty() {
        output::action("Deleted", &format!("{} branch(es)", deleted.len()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _kube_apply(
    container: &ServiceContainer,
    dir: Option<&Path>,
    context: Option<&str>,
) -> CliResult<()> {
    let dir = dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.manifest_dir.clone());

    let kube = container.kube();
    let plan = kube.build_plan(&dir)?;

    if plan.is_empty() {
        output::warning(&format!("no manifests found in {}", dir.display()));
        return Ok(());
    }

    output::header(&format!("Apply plan ({} manifests):", plan.len()));
    for manifest in plan.manifests() {
        output::detail(&format!(
            "{:<22} {}",
            manifest.kind,
            manifest.path.display()
        ));
    }

    let applied = kube.apply(&plan, context)?;
    if applied > 0 {
        output::success(&format!("applied {applied} manifest(s)"));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _kube_export(
    container: &ServiceContainer,
    context: Option<&str>,
    out: Option<&Path>,
) -> CliResult<()> {
    let report = container.kubeconfig().export(context, out)?;

    if report.written {
        output::success(&format!(
            "exported context '{}' to {}",
            report.context,
            report.path.display()
        ));
    } else {
        output::dry_run(&format!("write {}", report.path.display()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _kube_merge(
    container: &ServiceContainer,
    files: &[PathBuf],
    out: Option<&Path>,
    force: bool,
) -> CliResult<()> {
    let svc = container.kubeconfig();
    let (doc, outcome) = svc.merge_files(files, force)?;

    output::action(
        "Merged",
        &format!(
            "{} file(s): {} added, {} skipped, {} replaced",
            files.len(),
            outcome.added,
            outcome.skipped,
            outcome.replaced
        ),
    );

    match out {
        Some(path) => {
            if svc.write_document(&doc, path)? {
                output::success(&format!("wrote {}", path.display()));
            } else {
                output::dry_run(&format!("write {}", path.display()));
            }
        }
        None => output::info(&svc.render(&doc)?),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _kube_validate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let doc = container.kubeconfig().validate_file(file)?;
    output::success(&format!(
        "{}: {} cluster(s), {} context(s), {} user(s)",
        file.display(),
        doc.clusters.len(),
        doc.contexts.len(),
        doc.users.len()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn _bigtable_list(container: &ServiceContainer, project: Option<&str>) -> CliResult<()> {
    let listing = container.bigtable().list(project)?;
    output::info(listing.trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn _bigtable_create(container: &ServiceContainer, spec: InstanceSpec) -> CliResult<()> {
    if container.bigtable().create(&spec)? {
        output::success(&format!("instance '{}' created", spec.instance));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _bigtable_delete(
    container: &ServiceContainer,
    instance: &str,
    project: Option<&str>,
    yes: bool,
) -> CliResult<()> {
    if !yes
        && !container.invoker().is_dry_run()
        && !ask(&format!("Delete Bigtable instance '{instance}'?"))?
    {
        output::warning("aborted, nothing deleted");
        return Ok(());
    }

    if container.bigtable().delete(instance, project)? {
        output::success(&format!("instance '{instance}' deleted"));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _docker_cleanup(
    container: &ServiceContainer,
    all: bool,
    volumes: bool,
    until: Option<u64>,
) -> CliResult<()> {
    let reports = container.docker().cleanup(all, volumes, until)?;

    for report in &reports {
        if !report.ran {
            continue;
        }
        match &report.reclaimed {
            Some(line) => output::success(&format!("{}: {}", report.target, line)),
            None => output::success(&format!("{} pruned", report.target)),
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _db_backup(
    container: &ServiceContainer,
    database: &str,
    out: Option<PathBuf>,
    opts: ConnectionOpts,
) -> CliResult<()> {
    let report = container.database().backup(database, out, &opts)?;
    if report.ran {
        output::success(&format!("backup written to {}", report.path.display()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _db_restore(
    container: &ServiceContainer,
    database: &str,
    file: &Path,
    opts: ConnectionOpts,
    yes: bool,
) -> CliResult<()> {
    if !yes
        && !container.invoker().is_dry_run()
        && !ask(&format!(
            "Restore {} into database '{database}'? Existing objects will be dropped.",
            file.display()
        ))?
    {
        output::warning("aborted, nothing restored");
        return Ok(());
    }

    if container.database().restore(database, file, &opts)? {
        output::success(&format!("database '{database}' restored"));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _sshkey_generate(
    container: &ServiceContainer,
    file: Option<PathBuf>,
    key_type: &str,
    comment: Option<&str>,
    force: bool,
) -> CliResult<()> {
    let report = container.sshkey().generate(file, key_type, comment, force)?;
    if report.ran {
        output::success(&format!("key pair written to {}", report.path.display()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

#[instrument(skip(container))]
fn _config_init(container: &ServiceContainer, global: bool) -> CliResult<()> {
    let path = if global {
        Settings::global_config_path()
            .ok_or_else(|| CliError::Config("cannot determine config directory".to_string()))?
    } else {
        Settings::local_config_path()
    };

    if container.fs.exists(&path) {
        output::warning(&format!("config already exists: {}", path.display()));
        return Ok(());
    }

    if container.invoker().is_dry_run() {
        output::dry_run(&format!("write {}", path.display()));
        return Ok(());
    }

    let template = Settings::default().to_toml()?;
    container
        .fs
        .ensure_parent(&path)
        .and_then(|()| container.fs.write(&path, &template))
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;

    output::action("Created", &path.display());
    Ok(())
}

#[instrument]
fn _config_path() -> CliResult<()> {
    output::header("Config paths:");
    match Settings::global_config_path() {
        Some(path) => output::detail(&format!("global: {}", path.display())),
        None => output::detail("global: (no home directory)"),
    }
    output::detail(&format!(
        "local:  {}",
        Settings::local_config_path().display()
    ));
    Ok(())
}

const PROBED_TOOLS: &[&str] = &[
    "git",
    "npm",
    "pip",
    "docker",
    "kubectl",
    "gcloud",
    "pg_dump",
    "pg_restore",
    "ssh-keygen",
];

#[instrument(skip(container))]
fn _info(container: &ServiceContainer) -> CliResult<()> {
    output::header(&format!("opskit {}", env!("CARGO_PKG_VERSION")));

    let invoker = container.invoker();
    for tool in PROBED_TOOLS {
        match invoker.require(tool) {
            Ok(()) => output::success_detail(tool),
            Err(ApplicationError::ToolNotFound(_)) => {
                output::failure(&format!("{tool} (not installed)"))
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn ask(question: &str) -> CliResult<bool> {
    output::confirm(question).map_err(|e| InfraError::io("read confirmation", e).into())
}
