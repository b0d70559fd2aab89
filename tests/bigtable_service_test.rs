//! Tests for BigtableService (gcloud argument rendering)

use std::sync::Arc;

use opskit::application::services::{BigtableService, InstanceSpec};
use opskit::application::{ApplicationError, ToolInvoker};
use opskit::util::testing::MockCommandRunner;

#[ctor::ctor]
fn init() {
    opskit::util::testing::init_test_setup();
}

fn service(mock: Arc<MockCommandRunner>, dry_run: bool) -> BigtableService {
    BigtableService::new(ToolInvoker::new(mock, dry_run))
}

fn spec() -> InstanceSpec {
    InstanceSpec {
        instance: "metrics".to_string(),
        cluster: "metrics-c1".to_string(),
        zone: "europe-west3-a".to_string(),
        nodes: 3,
        display_name: None,
        project: None,
    }
}

#[test]
fn given_no_project_when_listed_then_plain_list_invocation() {
    let mock = Arc::new(MockCommandRunner::new().with_stdout(
        "gcloud bigtable instances list",
        "NAME     DISPLAY_NAME  STATE\nmetrics  metrics       READY\n",
    ));
    let service = service(mock.clone(), false);

    let listing = service.list(None).unwrap();

    assert!(listing.contains("metrics"));
    assert!(mock
        .calls()
        .contains(&"gcloud bigtable instances list".to_string()));
}

#[test]
fn given_project_when_listed_then_project_flag_is_passed() {
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), false);

    service.list(Some("acme-prod")).unwrap();

    assert!(mock
        .calls()
        .contains(&"gcloud bigtable instances list --project acme-prod".to_string()));
}

#[test]
fn given_spec_when_created_then_cluster_config_is_rendered() {
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), false);

    assert!(service.create(&spec()).unwrap());

    let call = mock
        .calls()
        .into_iter()
        .find(|c| c.starts_with("gcloud bigtable instances create"))
        .expect("create must run");
    assert!(call.contains("create metrics"));
    assert!(call.contains("--cluster-config id=metrics-c1,zone=europe-west3-a,nodes=3"));
}

#[test]
fn given_no_display_name_when_created_then_instance_id_is_used() {
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), false);

    service.create(&spec()).unwrap();

    assert!(mock
        .calls()
        .iter()
        .any(|c| c.contains("--display-name metrics ")));
}

#[test]
fn given_project_when_created_then_project_flag_is_appended() {
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), false);
    let spec = InstanceSpec {
        project: Some("acme-prod".to_string()),
        display_name: Some("Metrics Store".to_string()),
        ..spec()
    };

    service.create(&spec).unwrap();

    let call = mock
        .calls()
        .into_iter()
        .find(|c| c.starts_with("gcloud bigtable instances create"))
        .unwrap();
    assert!(call.contains("--display-name Metrics Store"));
    assert!(call.ends_with("--project acme-prod"));
}

#[test]
fn given_instance_when_deleted_then_quiet_flag_suppresses_gcloud_prompt() {
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), false);

    assert!(service.delete("metrics", Some("acme-prod")).unwrap());

    assert!(mock
        .calls()
        .contains(&"gcloud bigtable instances delete metrics --quiet --project acme-prod".to_string()));
}

#[test]
fn given_dry_run_when_created_then_gcloud_is_not_invoked() {
    let mock = Arc::new(MockCommandRunner::new());
    let service = service(mock.clone(), true);

    assert!(!service.create(&spec()).unwrap());
    assert!(!service.delete("metrics", None).unwrap());

    assert!(!mock.calls().iter().any(|c| c.contains("create")));
    assert!(!mock.calls().iter().any(|c| c.contains("delete")));
}

#[test]
fn given_gcloud_missing_when_listed_then_tool_not_found() {
    let mock = Arc::new(MockCommandRunner::new().missing_tool("gcloud"));
    let service = service(mock, false);

    let err = service.list(None).unwrap_err();

    assert!(matches!(err, ApplicationError::ToolNotFound(_)));
}
