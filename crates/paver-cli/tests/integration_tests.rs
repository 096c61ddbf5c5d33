//! Integration tests for the `paver` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DEFINITION: &str = r#"
tables:
  - table-name: invoice
    table-type: jsonb
    parent-tables: ""
    columns:
      - name: id
        type: string
        mapped-name: id
  - table-name: lines
    table-type: list
    parent-tables: invoice
    columns:
      - name: amount
        type: number
        mapped-name: amount
info:
  id: datamgr
  name: billing
  organization: acme
  version: 1.0.0
project:
  kubernetes:
    namespace: payments
  endpoints:
    - name: invoices
      methods:
        - method: get
        - method: post
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Cache holding the Gorilla fragments and one blueprint.
fn seeded_cache() -> TempDir {
    let cache = TempDir::new().unwrap();
    let root = cache.path();
    for file in [
        "keyed_route.tpl",
        "list_route.tpl",
        "non_keyed_route.tpl",
        "options_route.tpl",
        "keyed_method.tpl",
        "list_method.tpl",
        "non_keyed_method.tpl",
        "post_method.tpl",
        "method-keyed-hooks.tpl",
        "method-hooks.tpl",
        "method-list-hooks.tpl",
    ] {
        write(
            root,
            &format!("blocks/go/gorilla/{file}"),
            "// {{ trigger }} /{{ endpoint }}\n",
        );
    }
    write(
        root,
        "blueprints/microservices/ga/datamgr/templateApp.go",
        "package main\n\nimport (\n{{ imports }})\n\n{{ endpoint_routes }}",
    );
    write(
        root,
        "blueprints/microservices/ga/datamgr/templateHooks.go",
        "{{ endpoint_hooks }}",
    );
    cache
}

fn definition_in(dir: &Path, yaml: &str) -> std::path::PathBuf {
    let path = dir.join("billing.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

/// `paver` with an isolated config location and environment.
fn paver(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("paver").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("PAVER_CACHE_DIR")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    paver(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("service definition"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    paver(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_validate_reports_hierarchy() {
    let home = TempDir::new().unwrap();
    let def = definition_in(home.path(), DEFINITION);

    paver(home.path())
        .args(["validate", def.to_str().unwrap(), "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("invoice"))
        .stdout(predicate::str::contains("lines[]"))
        .stdout(predicate::str::contains("is valid (2 table(s))"));
}

#[test]
fn test_validate_json_output() {
    let home = TempDir::new().unwrap();
    let def = definition_in(home.path(), DEFINITION);

    let out = paver(home.path())
        .args(["validate", def.to_str().unwrap(), "--output-format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["error_count"], 0);
    assert_eq!(json["tables"], serde_json::json!(["invoice", "lines"]));
}

#[test]
fn test_validate_rejects_bad_table_type() {
    let home = TempDir::new().unwrap();
    let def = definition_in(
        home.path(),
        &DEFINITION.replace("table-type: jsonb", "table-type: table"),
    );

    paver(home.path())
        .args(["validate", def.to_str().unwrap(), "--output-format", "plain"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("INVALID_TABLE_TYPE"))
        .stderr(predicate::str::contains("1 error(s)"));
}

#[test]
fn test_generate_end_to_end() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();
    let def = definition_in(home.path(), DEFINITION);
    let out = home.path().join("svc");

    paver(home.path())
        .args(["generate", def.to_str().unwrap(), "--seed", "3", "-o"])
        .arg(&out)
        .arg("--cache-dir")
        .arg(cache.path())
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created   billingApp.go"))
        .stdout(predicate::str::contains("Generated"));

    let app = fs::read_to_string(out.join("billingApp.go")).unwrap();
    assert!(app.contains("\t\"github.com/gorilla/mux\"\n"));
    assert!(app.contains("// GET /invoices"));
    assert!(out.join("billingHooks.go").is_file());
    assert!(out.join("dev/billing-post.json").is_file());
}

#[test]
fn test_generate_keeps_hooks_on_rerun() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();
    let def = definition_in(home.path(), DEFINITION);
    let out = home.path().join("svc");

    let run = || {
        paver(home.path())
            .args(["generate", def.to_str().unwrap(), "-o"])
            .arg(&out)
            .arg("--cache-dir")
            .arg(cache.path())
            .args(["--output-format", "plain"])
            .assert()
            .success()
    };

    run();
    fs::write(out.join("billingHooks.go"), "// mine\n").unwrap();
    run().stdout(predicate::str::contains("kept      billingHooks.go"));
    assert_eq!(
        fs::read_to_string(out.join("billingHooks.go")).unwrap(),
        "// mine\n"
    );
}

#[test]
fn test_generate_json_summary() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();
    let def = definition_in(home.path(), DEFINITION);
    let out = home.path().join("svc");

    let output = paver(home.path())
        .args(["generate", def.to_str().unwrap(), "-o"])
        .arg(&out)
        .arg("--cache-dir")
        .arg(cache.path())
        .args(["--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["written"].as_array().unwrap().len(), 4);
    assert!(
        json["imports"]
            .as_array()
            .unwrap()
            .iter()
            .any(|i| i == "github.com/gorilla/mux")
    );
}

#[test]
fn test_generate_uses_cache_from_environment() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();
    let def = definition_in(home.path(), DEFINITION);
    let out = home.path().join("svc");

    paver(home.path())
        .env("PAVER_CACHE_DIR", cache.path())
        .args(["generate", def.to_str().unwrap(), "-o"])
        .arg(&out)
        .assert()
        .success();
    assert!(out.join("billingApp.go").is_file());
}

#[test]
fn test_generate_with_missing_cache() {
    let home = TempDir::new().unwrap();
    let def = definition_in(home.path(), DEFINITION);

    paver(home.path())
        .args(["generate", def.to_str().unwrap(), "--cache-dir"])
        .arg(home.path().join("no-such-cache"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Block cache not found"))
        .stderr(predicate::str::contains("--cache-dir"));
}

#[test]
fn test_list_blueprints_and_blocks() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();

    paver(home.path())
        .args(["list", "--blocks", "--output-format", "plain", "--cache-dir"])
        .arg(cache.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("microservices/ga/datamgr"))
        .stdout(predicate::str::contains("io.pavedroad.http.routers.gorilla"))
        .stdout(predicate::str::contains("io.pavedroad.core.loggers.application"));
}

#[test]
fn test_block_describes_builtin() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();

    paver(home.path())
        .args([
            "block",
            "io.pavedroad.http.methods.gorilla",
            "--output-format",
            "plain",
            "--cache-dir",
        ])
        .arg(cache.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("io.pavedroad.http.methods.gorilla"))
        .stdout(predicate::str::contains("post_method.tpl"));
}

#[test]
fn test_block_unknown_cache_block() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();

    paver(home.path())
        .args(["block", "cache://blocks.local/go/missing", "--cache-dir"])
        .arg(cache.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_init_writes_config() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("conf/paver.toml");

    paver(home.path())
        .arg("--config")
        .arg(&config)
        .args(["init", "--cache-dir", "/srv/blocks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));

    let text = fs::read_to_string(&config).unwrap();
    assert!(text.contains("/srv/blocks"));
    assert!(text.contains("[generation]"));

    // A second run without --force leaves the file alone.
    fs::write(&config, "[cache]\n").unwrap();
    paver(home.path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(&config).unwrap(), "[cache]\n");
}

#[test]
fn test_config_file_supplies_cache_dir() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();
    let config = home.path().join("paver.toml");
    fs::write(
        &config,
        format!("[cache]\ndir = {:?}\n", cache.path().to_str().unwrap()),
    )
    .unwrap();

    paver(home.path())
        .arg("--config")
        .arg(&config)
        .args(["list", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("microservices/ga/datamgr"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    paver(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("paver"));
}

#[test]
fn test_generate_then_validate_with_colour_enabled() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();
    let def = definition_in(home.path(), DEFINITION);
    let out = home.path().join("svc");

    paver(home.path())
        .env_remove("NO_COLOR")
        .args(["generate", def.to_str().unwrap(), "-o"])
        .arg(&out)
        .arg("--cache-dir")
        .arg(cache.path())
        .assert()
        .success();
    assert!(out.join("billingApp.go").is_file());

    paver(home.path())
        .env_remove("NO_COLOR")
        .args(["validate", def.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (2 table(s))"));
}

#[test]
fn test_no_color_environment_values() {
    let home = TempDir::new().unwrap();
    let def = definition_in(home.path(), DEFINITION);

    for value in ["1", "true", "yes", "0", ""] {
        paver(home.path())
            .env("NO_COLOR", value)
            .args(["validate", def.to_str().unwrap(), "--output-format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("is valid"));
    }
}

#[test]
fn test_validate_rejects_duplicate_table_names() {
    let home = TempDir::new().unwrap();
    let def = definition_in(
        home.path(),
        &DEFINITION.replace(
            "info:\n",
            "  - table-name: Lines\n    table-type: list\n    parent-tables: invoice\n    columns:\n      - name: qty\n        type: number\n        mapped-name: qty\ninfo:\n",
        ),
    );

    paver(home.path())
        .args(["validate", def.to_str().unwrap(), "--output-format", "plain"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("DUPLICATE_TABLE_NAME"))
        .stderr(predicate::str::contains("1 error(s)"));
}

#[test]
fn test_generate_leaves_markup_unescaped() {
    let home = TempDir::new().unwrap();
    let cache = seeded_cache();
    write(
        cache.path(),
        "blueprints/microservices/ga/datamgr/pom.xml",
        "<groupId>{{ \"R&D\" }}.{{ organization }}</groupId>\n",
    );
    let def = definition_in(home.path(), DEFINITION);
    let out = home.path().join("svc");

    paver(home.path())
        .args(["generate", def.to_str().unwrap(), "-o"])
        .arg(&out)
        .arg("--cache-dir")
        .arg(cache.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.join("pom.xml")).unwrap(),
        "<groupId>R&D.acme</groupId>\n"
    );
}
