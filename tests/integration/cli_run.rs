//! End-to-end tests against the compiled `uniqseq` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("uniqseq").unwrap()
}

#[test]
fn dedups_repeated_block_from_stdin() {
    cmd()
        .arg("--window-size")
        .arg("3")
        .write_stdin("A\nB\nC\nA\nB\nC\nD\n")
        .assert()
        .success()
        .stdout("A\nB\nC\nD\n");
}

#[test]
fn rejects_window_size_below_two() {
    cmd()
        .arg("--window-size")
        .arg("1")
        .write_stdin("A\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn inverse_flag_emits_only_the_skipped_range() {
    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--inverse")
        .write_stdin("A\nB\nC\nA\nB\nC\n")
        .assert()
        .success()
        .stdout("A\nB\nC\n");
}

#[test]
fn annotate_interleaves_a_summary_line_at_the_skip() {
    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--annotate")
        .write_stdin("A\nB\nC\nA\nB\nC\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[dedup] skipped records"));
}

#[test]
fn bypass_pattern_passes_comment_lines_through_untouched() {
    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--bypass")
        .arg("^#")
        .write_stdin("A\nB\nC\n# a comment\nA\nB\nC\n")
        .assert()
        .success()
        .stdout("A\nB\nC\n# a comment\n");
}

#[test]
fn track_pattern_limits_dedup_to_matching_lines() {
    // Only lines starting with "d:" are tracked; everything else bypasses
    // untouched regardless of content repetition.
    cmd()
        .arg("--window-size")
        .arg("2")
        .arg("--track")
        .arg("^d:")
        .write_stdin("noise\nd:A\nd:B\nnoise\nd:A\nd:B\n")
        .assert()
        .success()
        .stdout("noise\nd:A\nd:B\nnoise\n");
}

#[test]
fn stats_flag_prints_summary_to_stderr() {
    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--stats")
        .write_stdin("A\nB\nC\nA\nB\nC\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("tracked"));
}

#[test]
fn library_save_then_load_recognizes_pattern_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let library_path = dir.path().join("seqs.json");

    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--library-save")
        .arg(&library_path)
        .write_stdin("A\nB\nC\nA\nB\nC\n")
        .assert()
        .success()
        .stdout("A\nB\nC\n");

    assert!(library_path.exists());

    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--library-load")
        .arg(&library_path)
        .write_stdin("A\nB\nC\n")
        .assert()
        .success()
        .stdout("");
}

#[cfg(unix)]
#[test]
fn transform_runs_each_tracked_line_through_an_external_command() {
    // "tr a-z A-Z" uppercases before hashing, so "a b c" and "A B C" are
    // recognized as the same sequence even though only one case appears
    // on either side of the duplicate.
    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--transform")
        .arg("tr a-z A-Z")
        .write_stdin("a\nb\nc\na\nb\nc\n")
        .assert()
        .success()
        .stdout("a\nb\nc\n");
}

#[test]
fn input_file_flag_reads_from_a_seekable_file_instead_of_stdin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "A\nB\nC\nA\nB\nC\nD").unwrap();

    cmd()
        .arg("--window-size")
        .arg("3")
        .arg("--input")
        .arg(file.path())
        .assert()
        .success()
        .stdout("A\nB\nC\nD\n");
}
