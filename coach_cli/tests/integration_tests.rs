//! Integration tests for the coach binary.
//!
//! These tests verify end-to-end behavior including:
//! - Program generation from TOML and JSON profiles
//! - CSV export
//! - Pain session replay
//! - Autoregulation feedback
//! - Config overrides

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary with an isolated config home
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("coach"));
    cmd.env("XDG_CONFIG_HOME", dir.path().join("config"));
    cmd
}

fn write_profile(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write profile");
    path
}

const GYM_PROFILE: &str = r#"
goal = "hypertrophy"
level = "beginner"
location = "gym"
frequency = 3

[[assessments]]
pattern = "squat"
one_rep_max = 100.0
"#;

#[test]
fn test_cli_help() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adaptive training program coach"));
}

#[test]
fn test_generate_from_toml() {
    let dir = setup_test_dir();
    let profile = write_profile(&dir, "profile.toml", GYM_PROFILE);

    cli(&dir)
        .arg("generate")
        .arg("--input")
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("Muscle Gain - FULL_BODY"))
        .stdout(predicate::str::contains("Full Body Day 1"))
        .stdout(predicate::str::contains("Barbell Back Squat: 4 x 12-25 @ 70 kg"));
}

#[test]
fn test_generate_json_output_is_deterministic() {
    let dir = setup_test_dir();
    let profile = write_profile(
        &dir,
        "profile.json",
        r#"{
            "goal": "strength",
            "level": "intermediate",
            "location": "home",
            "frequency": 4,
            "pain_areas": ["knee"],
            "assessments": [
                {"pattern": "horizontal_push", "variant": "Push-up", "max_reps": 12}
            ]
        }"#,
    );

    let run = || {
        let output = cli(&dir)
            .arg("generate")
            .arg("--input")
            .arg(&profile)
            .arg("--json")
            .output()
            .expect("Failed to run coach");
        assert!(output.status.success());
        output.stdout
    };

    let first = run();
    assert_eq!(first, run());

    let program: serde_json::Value = serde_json::from_slice(&first).expect("Invalid JSON");
    assert_eq!(program["split"], "upper_lower");
    assert_eq!(program["days_per_week"], 4);
    assert_eq!(program["weekly_schedule"].as_array().unwrap().len(), 4);
}

#[test]
fn test_generate_csv_export() {
    let dir = setup_test_dir();
    let profile = write_profile(&dir, "profile.toml", GYM_PROFILE);
    let csv_path = dir.path().join("program.csv");

    cli(&dir)
        .arg("generate")
        .arg("--input")
        .arg(&profile)
        .arg("--csv")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let contents = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("day,exercise,sets,reps,rest,weight,notes")
    );
    assert!(contents.contains("Full Body Day 1,Barbell Back Squat,4,12-25,105,70,Muscle Gain - compound"));
    assert!(lines.count() >= 12);
}

#[test]
fn test_generate_logs_export_when_asked() {
    let dir = setup_test_dir();
    let profile = write_profile(&dir, "profile.toml", GYM_PROFILE);
    let csv_path = dir.path().join("program.csv");

    cli(&dir)
        .env("RUST_LOG", "info")
        .arg("generate")
        .arg("--input")
        .arg(&profile)
        .arg("--json")
        .arg("--csv")
        .arg(&csv_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated 'Muscle Gain - FULL_BODY'"))
        .stderr(predicate::str::contains("Exported"));

    assert!(csv_path.exists());
}

#[test]
fn test_generate_rejects_bad_frequency() {
    let dir = setup_test_dir();
    let profile = write_profile(
        &dir,
        "profile.toml",
        "goal = \"toning\"\nlevel = \"beginner\"\nlocation = \"gym\"\nfrequency = 9\n",
    );

    cli(&dir)
        .arg("generate")
        .arg("--input")
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 7"));
}

#[test]
fn test_generate_missing_input_fails() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("generate")
        .arg("--input")
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure();
}

#[test]
fn test_pain_replay_walks_the_ladder() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("pain")
        .arg("--exercise")
        .arg("Goblet Squat")
        .arg("--levels")
        .arg("6,6,6,6,9")
        .assert()
        .success()
        .stdout(predicate::str::contains("ReduceLoad"))
        .stdout(predicate::str::contains("Reducing load by 20%"))
        .stdout(predicate::str::contains("ReduceReps"))
        .stdout(predicate::str::contains("Suspend"))
        .stdout(predicate::str::contains("Screening"))
        .stdout(predicate::str::contains("pain 9/10 [Blocked] Blocked"));
}

#[test]
fn test_pain_block_offers_no_continue() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("pain")
        .arg("--exercise")
        .arg("Push-up")
        .arg("--levels")
        .arg("8")
        .assert()
        .success()
        .stdout(predicate::str::contains("options: skip exercise, end session"));
}

#[test]
fn test_config_override_changes_thresholds() {
    let dir = setup_test_dir();
    let config_path = dir.path().join("coach.toml");
    fs::write(&config_path, "[pain]\nload_reduction_percent = 15\n").unwrap();

    cli(&dir)
        .arg("--config")
        .arg(&config_path)
        .arg("pain")
        .arg("--exercise")
        .arg("Squat")
        .arg("--levels")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reducing load by 15%"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = setup_test_dir();
    let config_path = dir.path().join("coach.toml");
    fs::write(
        &config_path,
        "[pain]\nstrong_warning_threshold = 9\nhard_block_threshold = 8\n",
    )
    .unwrap();

    cli(&dir)
        .arg("--config")
        .arg(&config_path)
        .arg("pain")
        .arg("--exercise")
        .arg("Squat")
        .arg("--levels")
        .arg("5")
        .assert()
        .failure();
}

#[test]
fn test_feedback_easy_set_increases_tempo() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("feedback")
        .arg("--goal")
        .arg("strength")
        .arg("--set")
        .arg("1")
        .arg("--total-sets")
        .arg("3")
        .arg("--rpe")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Increase (NextSet)"))
        .stdout(predicate::str::contains("4-0-1-0"));
}

#[test]
fn test_feedback_failed_set_moves_down() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("feedback")
        .arg("--goal")
        .arg("strength")
        .arg("--set")
        .arg("3")
        .arg("--total-sets")
        .arg("3")
        .arg("--failed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Decrease (NextSession)"))
        .stdout(predicate::str::contains("move down to Incline Push-up"));
}

#[test]
fn test_feedback_rejects_unknown_goal() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("feedback")
        .arg("--goal")
        .arg("bulking")
        .arg("--set")
        .arg("1")
        .arg("--total-sets")
        .arg("3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown goal"));
}
