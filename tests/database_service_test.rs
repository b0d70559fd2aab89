//! Tests for DatabaseService (pg_dump/pg_restore wrapping)

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use opskit::application::services::{ConnectionOpts, DatabaseService};
use opskit::application::{ApplicationError, ToolInvoker};
use opskit::config::Settings;
use opskit::infrastructure::traits::RealFileSystem;
use opskit::util::testing::MockCommandRunner;

#[ctor::ctor]
fn init() {
    opskit::util::testing::init_test_setup();
}

fn service(mock: Arc<MockCommandRunner>, backup_dir: PathBuf, dry_run: bool) -> DatabaseService {
    let settings = Settings {
        backup_dir,
        ..Settings::default()
    };
    DatabaseService::new(
        Arc::new(RealFileSystem),
        ToolInvoker::new(mock, dry_run),
        Arc::new(settings),
    )
}

#[test]
fn given_no_output_when_backed_up_then_default_path_is_timestamped() {
    let temp = TempDir::new().unwrap();
    let service = service(
        Arc::new(MockCommandRunner::new()),
        temp.path().to_path_buf(),
        false,
    );

    let path = service.default_backup_path("appdb");

    assert_eq!(path.parent(), Some(temp.path()));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("appdb_"));
    assert!(name.ends_with(".dump"));
}

#[test]
fn given_connection_opts_when_backed_up_then_they_pass_through() {
    let temp = TempDir::new().unwrap();
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), temp.path().to_path_buf(), false);
    let opts = ConnectionOpts {
        host: Some("db.internal".to_string()),
        port: Some(5433),
        user: Some("deploy".to_string()),
    };

    let report = service.backup("appdb", None, &opts).unwrap();

    assert!(report.ran);
    let call = mock
        .calls()
        .into_iter()
        .find(|c| c.starts_with("pg_dump ") && c.contains("-Fc"))
        .expect("pg_dump must run");
    assert!(call.contains("--host db.internal"));
    assert!(call.contains("--port 5433"));
    assert!(call.contains("--username deploy"));
    assert!(call.contains("-Fc -f"));
    assert!(call.ends_with("appdb"));
}

#[test]
fn given_backup_when_run_then_backup_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let backup_dir = temp.path().join("nested").join("backups");
    let service = service(
        Arc::new(MockCommandRunner::new()),
        backup_dir.clone(),
        false,
    );

    service
        .backup("appdb", None, &ConnectionOpts::default())
        .unwrap();

    assert!(backup_dir.is_dir());
}

#[test]
fn given_dry_run_when_backed_up_then_nothing_runs_and_no_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let backup_dir = temp.path().join("backups");
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), backup_dir.clone(), true);

    let report = service
        .backup("appdb", None, &ConnectionOpts::default())
        .unwrap();

    assert!(!report.ran);
    assert!(!backup_dir.exists());
    assert!(!mock.calls().iter().any(|c| c.contains("-Fc")));
}

#[test]
fn given_pg_dump_missing_when_backed_up_then_tool_not_found() {
    let temp = TempDir::new().unwrap();
    let mock = Arc::new(MockCommandRunner::new().missing_tool("pg_dump"));
    let service = service(mock, temp.path().to_path_buf(), false);

    let err = service
        .backup("appdb", None, &ConnectionOpts::default())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::ToolNotFound(_)));
}

#[test]
fn given_missing_dump_file_when_restored_then_missing_file() {
    let temp = TempDir::new().unwrap();
    let service = service(
        Arc::new(MockCommandRunner::new()),
        temp.path().to_path_buf(),
        false,
    );

    let err = service
        .restore(
            "appdb",
            &temp.path().join("nope.dump"),
            &ConnectionOpts::default(),
        )
        .unwrap_err();

    assert!(matches!(err, ApplicationError::MissingFile(_)));
}

#[test]
fn given_dump_file_when_restored_then_clean_if_exists_flags_are_used() {
    let temp = TempDir::new().unwrap();
    let dump = temp.path().join("appdb.dump");
    fs::write(&dump, "PGDMP").unwrap();
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), temp.path().to_path_buf(), false);

    let ran = service
        .restore("appdb", &dump, &ConnectionOpts::default())
        .unwrap();

    assert!(ran);
    let call = mock
        .calls()
        .into_iter()
        .find(|c| c.starts_with("pg_restore --clean"))
        .expect("pg_restore must run");
    assert!(call.starts_with("pg_restore --clean --if-exists"));
    assert!(call.contains("-d appdb"));
}
