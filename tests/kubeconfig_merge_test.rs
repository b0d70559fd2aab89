//! Tests for kubeconfig merge/dedup/validate (domain layer)

use opskit::domain::{DomainError, Kubeconfig};

#[ctor::ctor]
fn init() {
    opskit::util::testing::init_test_setup();
}

fn parse(yaml: &str) -> Kubeconfig {
    serde_yaml::from_str(yaml).expect("test kubeconfig must parse")
}

fn dev_config() -> Kubeconfig {
    parse(
        r#"
apiVersion: v1
kind: Config
clusters:
  - name: dev
    cluster:
      server: https://dev.example.com:6443
contexts:
  - name: dev
    context:
      cluster: dev
      user: dev-admin
users:
  - name: dev-admin
    user:
      token: dev-token
current-context: dev
"#,
    )
}

fn prod_config() -> Kubeconfig {
    parse(
        r#"
apiVersion: v1
kind: Config
clusters:
  - name: prod
    cluster:
      server: https://prod.example.com:6443
contexts:
  - name: prod
    context:
      cluster: prod
      user: prod-admin
users:
  - name: prod-admin
    user:
      token: prod-token
current-context: prod
"#,
    )
}

#[test]
fn given_disjoint_configs_when_merged_then_all_entries_added() {
    let mut merged = Kubeconfig::default();

    let first = merged.merge_from(&dev_config(), false).unwrap();
    let second = merged.merge_from(&prod_config(), false).unwrap();

    assert_eq!(first.added, 3);
    assert_eq!(second.added, 3);
    assert_eq!(merged.clusters.len(), 2);
    assert_eq!(merged.contexts.len(), 2);
    assert_eq!(merged.users.len(), 2);
    merged.validate().unwrap();
}

#[test]
fn given_identical_config_when_merged_twice_then_second_merge_is_noop() {
    let mut merged = Kubeconfig::default();
    merged.merge_from(&dev_config(), false).unwrap();
    let before = merged.clone();

    // Act: idempotence
    let outcome = merged.merge_from(&dev_config(), false).unwrap();

    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.replaced, 0);
    assert_eq!(outcome.skipped, 3);
    assert_eq!(merged, before);
}

#[test]
fn given_same_name_different_body_when_merged_then_conflict_error() {
    let mut merged = dev_config();
    let mut other = dev_config();
    other.clusters[0].body.insert(
        "cluster".to_string(),
        serde_yaml::from_str("server: https://elsewhere:6443").unwrap(),
    );

    let err = merged.merge_from(&other, false).unwrap_err();

    match err {
        DomainError::ConflictingEntry { section, name } => {
            assert_eq!(section, "clusters");
            assert_eq!(name, "dev");
        }
        other => panic!("expected ConflictingEntry, got {other:?}"),
    }
}

#[test]
fn given_conflict_when_merged_with_force_then_later_entry_wins() {
    let mut merged = dev_config();
    let mut other = dev_config();
    let new_body: serde_yaml::Value =
        serde_yaml::from_str("server: https://elsewhere:6443").unwrap();
    other.clusters[0]
        .body
        .insert("cluster".to_string(), new_body.clone());

    let outcome = merged.merge_from(&other, true).unwrap();

    assert_eq!(outcome.replaced, 1);
    assert_eq!(merged.clusters[0].body.get("cluster"), Some(&new_body));
}

#[test]
fn given_two_configs_when_merged_then_first_current_context_is_kept() {
    let mut merged = Kubeconfig::default();
    merged.merge_from(&dev_config(), false).unwrap();
    merged.merge_from(&prod_config(), false).unwrap();

    assert_eq!(merged.current_context.as_deref(), Some("dev"));
}

#[test]
fn given_context_with_unknown_cluster_when_validated_then_dangling_reference() {
    let doc = parse(
        r#"
clusters:
  - name: dev
    cluster:
      server: https://dev.example.com:6443
contexts:
  - name: dev
    context:
      cluster: missing
      user: dev-admin
users:
  - name: dev-admin
    user: {}
"#,
    );

    let err = doc.validate().unwrap_err();

    match err {
        DomainError::DanglingReference { section, name, .. } => {
            assert_eq!(section, "clusters");
            assert_eq!(name, "missing");
        }
        other => panic!("expected DanglingReference, got {other:?}"),
    }
}

#[test]
fn given_unknown_current_context_when_validated_then_dangling_reference() {
    let mut doc = dev_config();
    doc.current_context = Some("gone".to_string());

    assert!(matches!(
        doc.validate(),
        Err(DomainError::DanglingReference { .. })
    ));
}

#[test]
fn given_duplicate_names_when_validated_then_duplicate_error() {
    let doc = parse(
        r#"
clusters:
  - name: dev
    cluster: {}
  - name: dev
    cluster: {}
"#,
    );

    assert!(matches!(
        doc.validate(),
        Err(DomainError::DuplicateName { .. })
    ));
}

#[test]
fn given_whitespace_in_name_when_validated_then_invalid_name() {
    let doc = parse(
        r#"
clusters:
  - name: "bad name"
    cluster: {}
"#,
    );

    assert!(matches!(doc.validate(), Err(DomainError::InvalidName { .. })));
}

#[test]
fn given_valid_config_when_round_tripped_then_extra_fields_survive() {
    let doc = parse(
        r#"
apiVersion: v1
kind: Config
preferences:
  colors: true
clusters: []
contexts: []
users: []
"#,
    );

    let yaml = serde_yaml::to_string(&doc).unwrap();
    let reparsed: Kubeconfig = serde_yaml::from_str(&yaml).unwrap();

    assert!(reparsed.extra.contains_key("preferences"));
    assert_eq!(doc, reparsed);
}
