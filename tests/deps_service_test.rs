//! Tests for DepsService (npm/pip update preconditions and invocations)

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use opskit::application::services::DepsService;
use opskit::application::{ApplicationError, ToolInvoker};
use opskit::infrastructure::traits::RealFileSystem;
use opskit::util::testing::MockCommandRunner;

#[ctor::ctor]
fn init() {
    opskit::util::testing::init_test_setup();
}

fn service(mock: Arc<MockCommandRunner>, dry_run: bool) -> DepsService {
    DepsService::new(Arc::new(RealFileSystem), ToolInvoker::new(mock, dry_run))
}

#[test]
fn given_no_package_json_when_npm_update_then_missing_file() {
    let temp = TempDir::new().unwrap();
    let service = service(Arc::new(MockCommandRunner::new()), false);

    let err = service.npm_update(temp.path(), false).unwrap_err();

    match err {
        ApplicationError::MissingFile(path) => {
            assert!(path.ends_with("package.json"));
        }
        other => panic!("expected MissingFile, got {other:?}"),
    }
}

#[test]
fn given_npm_missing_when_npm_update_then_tool_not_found() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("package.json"), "{}").unwrap();
    let mock = Arc::new(MockCommandRunner::new().missing_tool("npm"));
    let service = service(mock, false);

    let err = service.npm_update(temp.path(), false).unwrap_err();

    assert!(matches!(err, ApplicationError::ToolNotFound(_)));
}

#[test]
fn given_outdated_packages_when_npm_update_then_report_and_update() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("package.json"), "{}").unwrap();
    let mock = Arc::new(
        MockCommandRunner::new().with_stdout("npm --prefix", "Package  Current  Wanted\nleft-pad 1.0.0   1.3.0\n"),
    );
    let service = service(mock.clone(), false);

    let report = service.npm_update(temp.path(), false).unwrap();

    assert!(report.outdated.contains("left-pad"));
    assert!(report.updated);
    assert!(mock.calls().iter().any(|c| c.ends_with("update")));
}

#[test]
fn given_check_only_when_npm_update_then_no_update_invoked() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("package.json"), "{}").unwrap();
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), false);

    let report = service.npm_update(temp.path(), true).unwrap();

    assert!(!report.updated);
    assert!(!mock.calls().iter().any(|c| c.ends_with("update")));
}

#[test]
fn given_missing_requirements_when_pip_update_then_missing_file() {
    let temp = TempDir::new().unwrap();
    let service = service(Arc::new(MockCommandRunner::new()), false);

    let err = service
        .pip_update(&temp.path().join("requirements.txt"), false)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::MissingFile(_)));
}

#[test]
fn given_requirements_when_pip_update_then_upgrade_invoked_with_file() {
    let temp = TempDir::new().unwrap();
    let requirements = temp.path().join("requirements.txt");
    fs::write(&requirements, "requests==2.31.0\n").unwrap();
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), false);

    let report = service.pip_update(&requirements, false).unwrap();

    assert!(report.updated);
    assert!(mock
        .calls()
        .iter()
        .any(|c| c.starts_with("pip install --upgrade -r") && c.contains("requirements.txt")));
}

#[test]
fn given_dry_run_when_pip_update_then_upgrade_is_skipped() {
    let temp = TempDir::new().unwrap();
    let requirements = temp.path().join("requirements.txt");
    fs::write(&requirements, "requests==2.31.0\n").unwrap();
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), true);

    let report = service.pip_update(&requirements, false).unwrap();

    assert!(!report.updated);
    assert!(!mock.calls().iter().any(|c| c.contains("install")));
}
