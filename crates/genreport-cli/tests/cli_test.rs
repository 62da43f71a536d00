use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn init_project(dir: &std::path::Path) {
    cargo_bin_cmd!("genreport")
        .args(["init", dir.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_init_and_run_once() {
    let dir = tempfile::tempdir().unwrap();

    init_project(dir.path());

    // Verify generated files exist
    assert!(dir.path().join("genreport.yaml").exists());
    assert!(dir.path().join("data/ReferenceData.xml").exists());
    assert!(dir.path().join("data/input/01-Basic.xml").exists());
    assert!(dir.path().join("data/output").is_dir());

    cargo_bin_cmd!("genreport")
        .args(["--config", dir.path().to_str().unwrap(), "run", "--once"])
        .assert()
        .success();

    let output_path = dir.path().join("data/output/01-Basic-Result.xml");
    assert!(output_path.exists(), "01-Basic-Result.xml should exist");

    let output = std::fs::read_to_string(&output_path).unwrap();
    assert!(output.starts_with("<?xml"));
    assert!(output.ends_with('\n'));

    // Wind first, then gas, then coal
    let wind = output.find("<Name>Wind[Offshore]</Name>").unwrap();
    let gas = output.find("<Name>Gas[1]</Name>").unwrap();
    let coal = output.find("<Name>Coal[1]</Name>").unwrap();
    assert!(wind < gas && gas < coal);

    assert!(output.contains("<Total>535.886832960</Total>"));
    assert!(output.contains("<Total>2857.431267720</Total>"));
    assert!(output.contains("<Total>2475.004606992</Total>"));
    assert!(output.contains("<Emission>137.175004008</Emission>"));
    assert!(output.contains("<HeatRate>1</HeatRate>"));
}

#[test]
fn test_init_refuses_existing_project() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path());

    cargo_bin_cmd!("genreport")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contains a genreport.yaml"));
}

#[test]
fn test_validate() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path());

    cargo_bin_cmd!("genreport")
        .args(["--config", dir.path().to_str().unwrap(), "validate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_run_once_fails_on_missing_input_dir() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path());
    std::fs::remove_dir_all(dir.path().join("data/input")).unwrap();

    cargo_bin_cmd!("genreport")
        .args(["--config", dir.path().to_str().unwrap(), "run", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input directory does not exist"));
}

#[test]
fn test_process_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path());

    let reference = dir.path().join("data/ReferenceData.xml");
    let input = dir.path().join("data/input/01-Basic.xml");

    cargo_bin_cmd!("genreport")
        .args([
            "--reference-data",
            reference.to_str().unwrap(),
            "process",
            input.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains("<GenerationOutput"))
        .stdout(predicate::str::contains("<Total>535.886832960</Total>"));
}

#[test]
fn test_process_to_file_with_json_report() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path());

    let input = dir.path().join("data/input/01-Basic.xml");
    let output_path = dir.path().join("result.xml");

    let assert = cargo_bin_cmd!("genreport")
        .args([
            "--config",
            dir.path().to_str().unwrap(),
            "process",
            input.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["totals"].as_array().unwrap().len(), 3);
    assert_eq!(report["totals"][0]["name"], "Wind[Offshore]");
    assert_eq!(report["max_emissions"][0]["name"], "Coal[1]");
    assert_eq!(report["heat_rates"][0]["heat_rate"], 1.0);
    assert!(report["skipped"].as_array().unwrap().is_empty());

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert!(written.contains("<Name>Coal[1]</Name>"));
}

#[test]
fn test_process_rejects_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path());

    let input = dir.path().join("broken.xml");
    std::fs::write(&input, "<GenerationReport><Wind>").unwrap();

    cargo_bin_cmd!("genreport")
        .args([
            "--config",
            dir.path().to_str().unwrap(),
            "process",
            input.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to transform"));
}
