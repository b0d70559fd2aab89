//! Tests for the manifest apply ordering (domain layer)

use std::path::PathBuf;

use rstest::rstest;

use opskit::domain::{ApplyPlan, ManifestFile, ResourceKind};

#[ctor::ctor]
fn init() {
    opskit::util::testing::init_test_setup();
}

fn manifest(kind: ResourceKind, path: &str) -> ManifestFile {
    ManifestFile {
        kind,
        path: PathBuf::from(path),
    }
}

#[test]
fn given_mixed_kinds_when_planned_then_namespaces_come_first() {
    // Arrange: deliberately shuffled input
    let manifests = vec![
        manifest(ResourceKind::Ingress, "k8s/ingress/web.yaml"),
        manifest(ResourceKind::Deployment, "k8s/deployment/app.yaml"),
        manifest(ResourceKind::Namespace, "k8s/namespace/prod.yaml"),
        manifest(ResourceKind::Service, "k8s/service/app.yaml"),
        manifest(ResourceKind::ConfigMap, "k8s/configmap/app.yaml"),
    ];

    // Act
    let plan = ApplyPlan::new(manifests);

    // Assert
    let kinds: Vec<&ResourceKind> = plan.manifests().iter().map(|m| &m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &ResourceKind::Namespace,
            &ResourceKind::ConfigMap,
            &ResourceKind::Service,
            &ResourceKind::Deployment,
            &ResourceKind::Ingress,
        ]
    );
}

#[test]
fn given_unknown_kinds_when_planned_then_they_sort_last_alphabetically() {
    let manifests = vec![
        manifest(ResourceKind::Other("zoo".into()), "k8s/zoo/a.yaml"),
        manifest(ResourceKind::Ingress, "k8s/ingress/web.yaml"),
        manifest(ResourceKind::Other("autoscaler".into()), "k8s/autoscaler/a.yaml"),
    ];

    let plan = ApplyPlan::new(manifests);

    let kinds: Vec<&ResourceKind> = plan.manifests().iter().map(|m| &m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &ResourceKind::Ingress,
            &ResourceKind::Other("autoscaler".into()),
            &ResourceKind::Other("zoo".into()),
        ]
    );
}

#[test]
fn given_same_kind_when_planned_then_files_sort_by_path() {
    let manifests = vec![
        manifest(ResourceKind::Deployment, "k8s/deployment/worker.yaml"),
        manifest(ResourceKind::Deployment, "k8s/deployment/api.yaml"),
        manifest(ResourceKind::Deployment, "k8s/deployment/cache.yaml"),
    ];

    let plan = ApplyPlan::new(manifests);

    let paths: Vec<String> = plan
        .manifests()
        .iter()
        .map(|m| m.path.display().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "k8s/deployment/api.yaml",
            "k8s/deployment/cache.yaml",
            "k8s/deployment/worker.yaml"
        ]
    );
}

#[test]
fn given_empty_input_when_planned_then_plan_is_empty() {
    let plan = ApplyPlan::new(Vec::new());
    assert!(plan.is_empty());
    assert_eq!(plan.len(), 0);
}

#[rstest]
#[case("namespace", ResourceKind::Namespace)]
#[case("namespaces", ResourceKind::Namespace)]
#[case("ns", ResourceKind::Namespace)]
#[case("ConfigMaps", ResourceKind::ConfigMap)]
#[case("secrets", ResourceKind::Secret)]
#[case("pvc", ResourceKind::PersistentVolumeClaim)]
#[case("serviceaccounts", ResourceKind::ServiceAccount)]
#[case("rolebindings", ResourceKind::RoleBinding)]
#[case("svc", ResourceKind::Service)]
#[case("deploy", ResourceKind::Deployment)]
#[case("statefulsets", ResourceKind::StatefulSet)]
#[case("cronjobs", ResourceKind::CronJob)]
#[case("ingresses", ResourceKind::Ingress)]
#[case("crds", ResourceKind::Other("crds".into()))]
fn given_directory_name_when_parsed_then_kind_matches(
    #[case] dir: &str,
    #[case] expected: ResourceKind,
) {
    assert_eq!(ResourceKind::from_dir_name(dir), expected);
}

#[rstest]
#[case("Namespace", ResourceKind::Namespace)]
#[case("Deployment", ResourceKind::Deployment)]
#[case("PersistentVolumeClaim", ResourceKind::PersistentVolumeClaim)]
#[case("HorizontalPodAutoscaler", ResourceKind::Other("horizontalpodautoscaler".into()))]
fn given_yaml_kind_when_parsed_then_kind_matches(
    #[case] kind: &str,
    #[case] expected: ResourceKind,
) {
    assert_eq!(ResourceKind::from_kind_name(kind), expected);
}
