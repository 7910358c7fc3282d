//! End-to-end runs of the grade-comments binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn grade_comments(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("grade-comments").unwrap();
    cmd.current_dir(dir)
        .arg("--no-color")
        .env_remove("GRADE_COMMENTS_CONFIG");
    cmd
}

/// Instructor 1, post author 2 (post 1), readers 3 and 4
fn classroom() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    grade_comments(dir).arg("init").assert().success();
    grade_comments(dir)
        .args(["user", "add", "1", "prof", "--cap", "manage_options"])
        .assert()
        .success()
        .stdout(predicate::str::contains("instructor"));
    for (id, login) in [("2", "alice"), ("3", "bob"), ("4", "carol")] {
        grade_comments(dir)
            .args(["user", "add", id, login])
            .assert()
            .success();
    }
    grade_comments(dir)
        .args(["post", "add", "--author", "2", "Essay 1"])
        .assert()
        .success();

    temp
}

#[test]
fn test_private_grade_flow() {
    let temp = classroom();
    let dir = temp.path();

    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "1", "--private", "--grade", "B+", "See me"])
        .assert()
        .success()
        .stdout(predicate::str::contains("private, grade B+"));

    // The post author sees the grade and the private marker
    grade_comments(dir)
        .args(["comment", "list", "--post", "1", "--as", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(Private)"))
        .stdout(predicate::str::contains("B+"));

    // Another reader sees nothing
    grade_comments(dir)
        .args(["comment", "list", "--post", "1", "--as", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No comments."));

    grade_comments(dir)
        .args(["comment", "count", "--post", "1", "--as", "3"])
        .assert()
        .success()
        .stdout("0\n");
    grade_comments(dir)
        .args(["comment", "count", "--post", "1", "--as", "2"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_reader_cannot_grade() {
    let temp = classroom();
    let dir = temp.path();

    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "3", "--private", "--grade", "A", "Nice"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Not an instructor"))
        .stdout(predicate::str::contains("Added comment 1\n"));

    grade_comments(dir)
        .args(["comment", "list", "--post", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nice"));
}

#[test]
fn test_forged_token_records_no_grade() {
    let temp = classroom();
    let dir = temp.path();

    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "1", "--grade", "A", "--nonce", "forged", "Good"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added comment 1\n"));
}

#[test]
fn test_reply_to_private_is_private() {
    let temp = classroom();
    let dir = temp.path();

    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "1", "--private", "See me"])
        .assert()
        .success();
    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "2", "--reply-to", "1", "Will do"])
        .assert()
        .success()
        .stdout(predicate::str::contains("private"));

    grade_comments(dir)
        .args(["comment", "show", "2", "--as", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not visible"));
}

#[test]
fn test_can_edit() {
    let temp = classroom();
    let dir = temp.path();

    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "1", "--private", "See me"])
        .assert()
        .success();

    grade_comments(dir)
        .args(["comment", "can-edit", "1", "--as", "2"])
        .assert()
        .success()
        .stdout("no\n");
    grade_comments(dir)
        .args(["comment", "can-edit", "1", "--as", "1"])
        .assert()
        .success()
        .stdout("yes\n");
}

#[test]
fn test_feed_hides_private_from_anonymous() {
    let temp = classroom();
    let dir = temp.path();

    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "3", "Public remark"])
        .assert()
        .success();
    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "1", "--private", "Secret remark"])
        .assert()
        .success();

    grade_comments(dir)
        .arg("feed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Public remark"))
        .stdout(predicate::str::contains("Secret remark").not());
}

#[test]
fn test_unknown_user_fails() {
    let temp = classroom();

    grade_comments(temp.path())
        .args(["comment", "list", "--as", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not found: 42"));
}

#[test]
fn test_config_validate() {
    let temp = classroom();

    grade_comments(temp.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manage_options"));
}

#[test]
fn test_pending_comment_hidden_from_readers() {
    let temp = classroom();
    let dir = temp.path();

    grade_comments(dir)
        .args(["comment", "add", "--post", "1", "--as", "3", "--status", "pending", "Draft thought"])
        .assert()
        .success();

    grade_comments(dir)
        .args(["comment", "show", "1", "--as", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not visible"));
    grade_comments(dir)
        .args(["comment", "show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not visible"));

    // Its author and the instructor still see it
    grade_comments(dir)
        .args(["comment", "show", "1", "--as", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft thought"));
    grade_comments(dir)
        .args(["comment", "show", "1", "--as", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft thought"));
}

#[test]
fn test_requires_init() {
    let temp = TempDir::new().unwrap();

    grade_comments(temp.path())
        .args(["post", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("grade-comments init"));
}
