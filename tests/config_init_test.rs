//! Tests for `config init` side effects

use std::env;
use std::fs;

use clap::Parser;
use tempfile::TempDir;

use opskit::cli::args::Cli;
use opskit::cli::commands::execute_command;

#[ctor::ctor]
fn init() {
    opskit::util::testing::init_test_setup();
}

#[test]
fn given_dry_run_when_config_init_then_no_file_is_written() {
    let temp = TempDir::new().unwrap();
    env::set_current_dir(temp.path()).unwrap();

    let cli = Cli::parse_from(["opskit", "--dry-run", "config", "init"]);
    execute_command(&cli).unwrap();

    assert!(!temp.path().join(".opskit.toml").exists());

    // without the flag the template lands on disk
    let cli = Cli::parse_from(["opskit", "config", "init"]);
    execute_command(&cli).unwrap();

    let written = fs::read_to_string(temp.path().join(".opskit.toml")).unwrap();
    assert!(written.contains("manifest_dir"));
}
