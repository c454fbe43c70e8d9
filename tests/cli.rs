use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn studymate(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("studymate").unwrap();
    cmd.arg("--db")
        .arg(dir.join("study.db"))
        .arg("--config")
        .arg(dir.join("config.json"));
    cmd
}

#[test]
fn target_set_then_show_prints_effective_target() {
    let dir = tempfile::tempdir().unwrap();

    studymate(dir.path())
        .args(["target", "set", "--hours", "1", "--minutes", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Target 1h 30m effective from"));

    studymate(dir.path())
        .args(["target", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1h 30m"));

    studymate(dir.path())
        .args(["target", "show", "--date", "2000-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2000-01-01: no target"));
}

#[test]
fn stats_rejects_range_over_31_days() {
    let dir = tempfile::tempdir().unwrap();
    studymate(dir.path())
        .args(["stats", "--from", "2024-01-01", "--to", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("31 days"));
}

#[test]
fn stats_needs_both_bounds() {
    let dir = tempfile::tempdir().unwrap();
    studymate(dir.path())
        .args(["stats", "--from", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}

#[test]
fn duplicate_topic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    studymate(dir.path())
        .args(["topic", "add", "Math"])
        .assert()
        .success();
    studymate(dir.path())
        .args(["topic", "add", "Math"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    studymate(dir.path())
        .args(["topic", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Math").and(predicate::str::contains("active")));
}

#[test]
fn clearing_needs_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    studymate(dir.path())
        .args(["log", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    studymate(dir.path())
        .args(["log", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Study log cleared."));
    studymate(dir.path())
        .args(["target", "clear"])
        .assert()
        .failure();
}

#[test]
fn empty_csv_export_still_has_header() {
    let dir = tempfile::tempdir().unwrap();
    studymate(dir.path())
        .args(["export", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,startedAt"));
}
