use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const HEADER: &str =
    "sex,age_group,diet_group,n_participants,mean_ghgs,mean_land,mean_watuse,mean_bio\n";

#[test]
fn test_init_and_run() {
    let dir = tempfile::tempdir().unwrap();

    // Init project
    cargo_bin_cmd!("dietflow")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .success();

    // Verify generated files exist
    assert!(dir.path().join("dietflow.yaml").exists());
    assert!(dir.path().join("data/sample.csv").exists());

    // Run with the generated config
    let config = dir.path().join("dietflow.yaml");
    cargo_bin_cmd!("dietflow")
        .args(["--config", config.to_str().unwrap(), "run"])
        .assert()
        .success();

    let output_path = dir.path().join("sankey.html");
    assert!(output_path.exists(), "sankey.html should exist");
    let page = std::fs::read_to_string(&output_path).unwrap();
    assert!(page.contains("Plotly.newPlot"));
    assert!(page.contains("\"type\":\"sankey\""));
    assert!(page.contains("Medium Meat (50–99g)"));
}

#[test]
fn test_init_refuses_existing_project() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dietflow.yaml"), "name: existing\n").unwrap();

    cargo_bin_cmd!("dietflow")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contains"));
}

#[test]
fn test_default_command_runs_pipeline_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("dietflow")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .success();

    cargo_bin_cmd!("dietflow")
        .current_dir(dir.path())
        .env_remove("DIETFLOW_CONFIG")
        .assert()
        .success();

    assert!(dir.path().join("sankey.html").exists());
}

#[test]
fn test_run_json_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("results.csv"),
        format!(
            "{}female,20-29,vegan,100,10,5,3,1\nmale,30-39,meat100,200,50,25,15,5\n",
            HEADER
        ),
    )
    .unwrap();

    cargo_bin_cmd!("dietflow")
        .current_dir(dir.path())
        .env_remove("DIETFLOW_CONFIG")
        .args([
            "run",
            "--input",
            "results.csv",
            "--output",
            "out/flows.json",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(dir.path().join("out/flows.json")).unwrap();
    let figure: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let trace = &figure["data"][0];
    assert_eq!(trace["node"]["label"].as_array().unwrap().len(), 14);
    assert_eq!(trace["link"]["source"].as_array().unwrap().len(), 12);
    assert_eq!(figure["layout"]["width"], 1300);
}

#[test]
fn test_unclassifiable_dataset_fails_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("results.csv"),
        format!("{}female,20-29,keto,100,10,5,3,1\n", HEADER),
    )
    .unwrap();

    cargo_bin_cmd!("dietflow")
        .current_dir(dir.path())
        .env_remove("DIETFLOW_CONFIG")
        .args(["run", "--input", "results.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no records left after diet classification"));

    assert!(!dir.path().join("sankey.html").exists());
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("dietflow")
        .current_dir(dir.path())
        .args(["--config", "nope.yaml", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn test_validate_json_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("results.csv"),
        format!(
            "{}female,20-29,vegan,100,10,5,3,1\n,30-39,fish,50,1,1,1,1\nmale,30-39,meat100,200,50,25,15,5\n",
            HEADER
        ),
    )
    .unwrap();

    let assert = cargo_bin_cmd!("dietflow")
        .current_dir(dir.path())
        .env_remove("DIETFLOW_CONFIG")
        .args(["validate", "--input", "results.csv", "--json"])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["rows_read"], 3);
    assert_eq!(report["dropped_missing"], 1);
    assert_eq!(report["retained"], 2);
    assert_eq!(report["links"], 12);
    assert_eq!(report["stats"]["participants"]["max"], 200.0);

    // validate never writes the artifact
    assert!(!dir.path().join("sankey.html").exists());
}
