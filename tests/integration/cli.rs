use assert_cmd::Command;
use pathable_harness::test_utils::TestEnvironment;
use pathable_harness::test_utils::environment::{
    ADAPTERS_JAR, API_JAR, LOG4J_LOGGER, LOG4J_LOGGER_ENTRY,
};
use predicates::prelude::*;
use std::path::Path;

fn pathable(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pathable").unwrap();
    cmd.arg("--config").arg(config).arg("--quiet").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_libs_lists_catalog_and_levels() {
    let env = TestEnvironment::new().unwrap();
    pathable(&env.write_config().unwrap())
        .arg("libs")
        .assert()
        .success()
        .stdout(predicate::str::contains("commons-logging-adapters"))
        .stdout(predicate::str::contains("testclasses"))
        .stdout(predicate::str::contains("parent-first"))
        .stdout(predicate::str::contains("system: junit."));
}

#[test]
fn test_find_class_reports_defining_level() {
    let env = TestEnvironment::new().unwrap();
    pathable(&env.write_config().unwrap())
        .args(["find-class", LOG4J_LOGGER, "--level", "child"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defined by"))
        .stdout(predicate::str::contains("parent"))
        .stdout(predicate::str::contains(API_JAR));
}

#[test]
fn test_find_class_json() {
    let env = TestEnvironment::new().unwrap();
    let output = pathable(&env.write_config().unwrap())
        .args(["find-class", "junit.framework.Test", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["requested_from"], "child");
    assert_eq!(value["class"]["origin"]["tier"], "system");
    assert_eq!(value["class"]["defined_by"], "system");
}

#[test]
fn test_find_all_lists_ancestor_first() {
    let env = TestEnvironment::new().unwrap();
    let output = pathable(&env.write_config().unwrap())
        .args(["find-all", LOG4J_LOGGER_ENTRY, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let copies = value.as_array().unwrap();
    assert_eq!(copies.len(), 2);
    assert!(copies[0]["locator"].as_str().unwrap().contains(API_JAR));
    assert!(copies[1]["locator"].as_str().unwrap().contains(ADAPTERS_JAR));
    assert_eq!(copies[0]["kind"], "archive");
}

#[test]
fn test_missing_resource_is_not_an_error() {
    let env = TestEnvironment::new().unwrap();
    pathable(&env.write_config().unwrap())
        .args(["find-resource", "nosuchfile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not visible"));
}

#[test]
fn test_cat_prints_first_copy() {
    let env = TestEnvironment::new().unwrap();
    pathable(&env.write_config().unwrap())
        .args(["cat", LOG4J_LOGGER_ENTRY])
        .assert()
        .success()
        .stdout(API_JAR);
}

#[test]
fn test_missing_class_fails() {
    let env = TestEnvironment::new().unwrap();
    pathable(&env.write_config().unwrap())
        .args(["find-class", "org.apache.commons.logging.NoSuchClass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found via resolver 'child'"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_unknown_level_fails() {
    let env = TestEnvironment::new().unwrap();
    pathable(&env.write_config().unwrap())
        .args(["find-resource", "nosuchfile", "--level", "grandparent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("grandparent"));
}

#[test]
fn test_config_from_environment_variable() {
    let env = TestEnvironment::new().unwrap();
    let config = env.write_config().unwrap();
    let work = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("pathable")
        .unwrap()
        .current_dir(work.path())
        .env("PATHABLE_CONFIG", &config)
        .args(["--quiet", "libs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("commons-logging"));
}

#[test]
fn test_no_config_anywhere_fails() {
    let work = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("pathable")
        .unwrap()
        .current_dir(work.path())
        .env_remove("PATHABLE_CONFIG")
        .env("HOME", work.path())
        .args(["--quiet", "libs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no configuration file found"));
}
