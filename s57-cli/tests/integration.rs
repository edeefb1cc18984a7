mod support;

use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// An `s57` command running in `work_dir` with color disabled.
fn s57_cmd(work_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("s57");
    cmd.current_dir(work_dir.path());
    cmd.env("NO_COLOR", "1");
    cmd
}

fn package_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    support::write_package(tmp.path());
    tmp
}

// ============================================================================
// Global flags
// ============================================================================

#[test]
fn version_flag() {
    cargo_bin_cmd!("s57")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("s57"));
}

#[test]
fn help_flag() {
    cargo_bin_cmd!("s57")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("S-57 electronic chart inspector"))
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("select"));
}

#[test]
fn verbose_quiet_conflict() {
    cargo_bin_cmd!("s57")
        .args(["--verbose", "--quiet", "info", "cell.000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// ============================================================================
// Cells
// ============================================================================

#[test]
fn info_table() {
    let tmp = TempDir::new().unwrap();
    support::write_cell(&tmp.path().join("cell.000"), 100, 2.2, 41.3, 12_000);

    s57_cmd(&tmp)
        .args(["info", "cell.000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vectors:"))
        .stdout(predicate::str::contains("1:12000"))
        .stdout(predicate::str::contains("Object class"))
        .stdout(predicate::str::contains("0 pointer(s)"));
}

#[test]
fn info_json() {
    let tmp = TempDir::new().unwrap();
    support::write_cell(&tmp.path().join("cell.000"), 100, 2.2, 41.3, 12_000);

    let output = s57_cmd(&tmp)
        .args(["info", "cell.000", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["vectors"], 2);
    assert_eq!(report["features"], 2);
    assert_eq!(report["parameters"]["compilation_scale"], 12_000);
    let codes: Vec<u64> = report["feature_classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_u64().unwrap())
        .collect();
    assert_eq!(codes, vec![17, 42]);
}

#[test]
fn dump_with_limit() {
    let tmp = TempDir::new().unwrap();
    support::write_cell(&tmp.path().join("cell.000"), 100, 2.2, 41.3, 12_000);

    let output = s57_cmd(&tmp)
        .args(["dump", "cell.000", "--limit", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("FSPT"));
    let items: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["key_field"], "DSID");
}

#[test]
fn missing_cell_fails() {
    let tmp = TempDir::new().unwrap();
    s57_cmd(&tmp)
        .args(["info", "nope.000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn truncated_cell_fails() {
    let tmp = TempDir::new().unwrap();
    let mut bytes = support::cell_bytes(100, 2.2, 41.3, 12_000);
    bytes.truncate(bytes.len() - 3);
    std::fs::write(tmp.path().join("cell.000"), bytes).unwrap();

    s57_cmd(&tmp)
        .args(["info", "cell.000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ============================================================================
// Packages
// ============================================================================

#[test]
fn catalog_lists_entries() {
    let tmp = package_dir();
    s57_cmd(&tmp)
        .args(["catalog", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("OV000001.000"))
        .stdout(predicate::str::contains("README.TXT"))
        .stdout(predicate::str::contains("Indexed:"));
}

#[test]
fn select_harbour_region() {
    let tmp = package_dir();
    s57_cmd(&tmp)
        .args([
            "select", ".", "--south", "41.25", "--north", "41.35", "--west", "2.15", "--east",
            "2.25",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("HB000002.000 (base)"))
        .stdout(predicate::str::contains("OV000001.000").not())
        .stdout(predicate::str::contains("550:200:1"))
        .stdout(predicate::str::contains("550:201:1"));
}

#[test]
fn select_overview_with_negative_longitude() {
    let tmp = package_dir();
    let output = s57_cmd(&tmp)
        .args([
            "select", ".", "--south", "37.95", "--north", "38.05", "--west", "-2.05", "--east",
            "-1.95", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cells: Vec<u64> = report["cells"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(cells, vec![1, 2]);
    assert_eq!(report["loaded_features"], 4);
    assert_eq!(report["compilation_scale"], 12_000);
    let cell_of_hits: Vec<u64> = report["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["cell"].as_u64().unwrap())
        .collect();
    assert_eq!(cell_of_hits, vec![1, 1]);
}

#[test]
fn select_empty_region_is_usage_error() {
    let tmp = package_dir();
    s57_cmd(&tmp)
        .args([
            "select", ".", "--south", "42", "--north", "41", "--west", "2", "--east", "3",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("empty region"));
}

#[test]
fn catalog_file_from_config() {
    let tmp = package_dir();
    std::fs::rename(tmp.path().join("CATALOG.031"), tmp.path().join("INDEX.031")).unwrap();
    std::fs::write(tmp.path().join("s57.toml"), "catalog_file = \"INDEX.031\"\n").unwrap();

    s57_cmd(&tmp)
        .args(["catalog", "."])
        .assert()
        .failure();
    s57_cmd(&tmp)
        .args(["--config", "s57.toml", "catalog", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("HB000002.000"));
}

#[test]
fn invalid_config_reports_help() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("s57.toml"), "base_suffix = 5\n").unwrap();
    s57_cmd(&tmp)
        .args(["--config", "s57.toml", "catalog", "."])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid config"));
}
