//! Tests for the --log tee sink

use std::fs;

use tempfile::TempDir;

use opskit::cli::output;

#[ctor::ctor]
fn init() {
    opskit::util::testing::init_test_setup();
}

#[test]
fn given_log_file_when_status_is_printed_then_plain_text_is_appended() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("session.log");

    output::init_log_file(&log).unwrap();
    output::success("backup written");
    output::warning("aborted, nothing deleted");
    output::detail("k8s/namespace/prod.yaml");
    output::dry_run("kubectl apply -f k8s/namespace/prod.yaml");

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("✓ backup written"));
    assert!(content.contains("Warning: aborted, nothing deleted"));
    assert!(content.contains("  k8s/namespace/prod.yaml"));
    assert!(content.contains("dry-run: kubectl apply"));
    // color escapes never reach the file
    assert!(!content.contains('\u{1b}'));

    // the sink is process-wide; a second init keeps the first file
    let other = temp.path().join("other.log");
    output::init_log_file(&other).unwrap();
    output::success("still teeing");

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("✓ still teeing"));
    assert!(fs::read_to_string(&other).unwrap_or_default().is_empty());
}
