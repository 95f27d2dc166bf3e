use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_both_stages() {
    Command::cargo_bin("adscribe")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("segment").and(predicate::str::contains("merge")));
}

#[test]
fn segment_rejects_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("adscribe")
        .unwrap()
        .args(["segment", "no-such-vad.csv", "no-such-video.mp4"])
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn segment_rejects_non_positive_step() {
    let dir = tempfile::tempdir().unwrap();
    let vad = dir.path().join("vad.csv");
    let video = dir.path().join("movie.mp4");
    std::fs::write(&vad, "0.0,5.0\n").unwrap();
    std::fs::write(&video, b"not really a video").unwrap();

    Command::cargo_bin("adscribe")
        .unwrap()
        .arg("segment")
        .arg(&vad)
        .arg(&video)
        .arg(dir.path().join("out"))
        .args(["--step", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn merge_fails_loudly_with_nothing_to_merge() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("adscribe")
        .unwrap()
        .arg("merge")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to merge"));
}

#[test]
fn merge_rejects_a_missing_directory() {
    Command::cargo_bin("adscribe")
        .unwrap()
        .args(["merge", "no-such-dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}
