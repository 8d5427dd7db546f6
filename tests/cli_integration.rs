//! End-to-end tests for the `tugport` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tugport(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tugport"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tugport")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn module_fixture(dir: &Path) {
    let src = dir.join("module/src/Shop");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("MyShop.php"),
        "<?php\nnamespace App;\n\nfinal class MyShop\n{\n    public function _getParent() {}\n}\n",
    )
    .unwrap();
    fs::write(
        dir.join("renames.csv"),
        "App\\MyShop,_getParent,getParent\nApp\\MyShop,_missing,x\n",
    )
    .unwrap();
}

#[test]
fn renames_prints_retained_entries() {
    let dir = TempDir::new().unwrap();
    module_fixture(dir.path());

    let output = tugport(
        dir.path(),
        &["renames", "--records", "renames.csv", "--module", "module"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["schema_version"], "1");
    let renames = json["renames"].as_array().unwrap();
    assert_eq!(renames.len(), 1);
    assert_eq!(renames[0]["declaring_type"], "App\\MyShop");
    assert_eq!(renames[0]["old_member"], "_getParent");
    assert_eq!(renames[0]["new_member"], "getParent");

    assert!(!dir.path().join("merged-module-contents.tmp").exists());
}

#[test]
fn renames_reads_paths_from_config() {
    let dir = TempDir::new().unwrap();
    module_fixture(dir.path());
    fs::write(
        dir.path().join("tugport.toml"),
        "[tugport.renames]\nrecords = \"renames.csv\"\nmodule = \"module\"\n",
    )
    .unwrap();

    let output = tugport(dir.path(), &["renames"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["renames"].as_array().unwrap().len(), 1);
}

#[test]
fn unresolvable_type_exits_with_resolution_error() {
    let dir = TempDir::new().unwrap();
    module_fixture(dir.path());
    fs::write(dir.path().join("renames.csv"), "App\\Gone,_a,a\n").unwrap();

    let output = tugport(
        dir.path(),
        &["renames", "--records", "renames.csv", "--module", "module"],
    );
    assert_eq!(output.status.code(), Some(3));
    let json = stdout_json(&output);
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 3);
    assert_eq!(json["error"]["details"]["type"], "App\\Gone");
    assert!(!dir.path().join("merged-module-contents.tmp").exists());
}

#[test]
fn malformed_record_exits_with_invalid_arguments() {
    let dir = TempDir::new().unwrap();
    module_fixture(dir.path());
    fs::write(dir.path().join("renames.csv"), "App\\MyShop,_getParent\n").unwrap();

    let output = tugport(
        dir.path(),
        &["renames", "--records", "renames.csv", "--module", "module"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["error"]["details"]["line"], 1);
}

#[test]
fn rules_lists_catalog_with_enabled_flags() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tugport.toml"),
        "[tugport]\nphp_version = \"7.4\"\nrules = [\"downgrade_match_to_switch\"]\n",
    )
    .unwrap();

    let output = tugport(dir.path(), &["rules"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["php_version"], "7.4");
    let rules = json["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 4);
    let enabled: Vec<&str> = rules
        .iter()
        .filter(|rule| rule["enabled"] == true)
        .map(|rule| rule["name"].as_str().unwrap())
        .collect();
    assert_eq!(enabled, vec!["downgrade_match_to_switch"]);
    assert_eq!(rules[0]["node_kinds"][0], "expression");
}

#[test]
fn missing_explicit_config_exits_with_resolution_error() {
    let dir = TempDir::new().unwrap();
    let output = tugport(dir.path(), &["rules", "--config", "absent.toml"]);
    assert_eq!(output.status.code(), Some(3));
}
