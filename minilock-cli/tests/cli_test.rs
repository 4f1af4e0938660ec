use std::io::Write;

use tempfile::NamedTempFile;

mod common;

fn script(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_cli_help() {
    let output = common::run_cli().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("shell"));
    assert!(stdout.contains("execute"));
    assert!(stdout.contains("--log-level"));
}

#[test]
fn test_execute_script() {
    let file = script("# demo 2, with c2 resubmitted\nr1(y)w2(u)r2(x)r3(u)w2(y)r3(v)c2c3w1(v)c1\nc2\n");
    let output = common::run_cli()
        .arg("execute")
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("c2: not committed: 28 certify locks pending\n"));
    assert!(stdout.contains("c3: committed"));
    assert!(stdout.ends_with("schedule: r1(y)w2(u)r2(x)r3(u)w2(y)r3(v)c3w1(v)c1c2\n"));
}

#[test]
fn test_execute_unknown_table_fails() {
    let file = script("w1(x)\nw1(nope)\n");
    let output = common::run_cli()
        .arg("execute")
        .arg(file.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("table nope not found"));
}

#[test]
fn test_execute_missing_file_fails() {
    let output = common::run_cli()
        .args(["execute", "/nonexistent/minilock/script"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read script"));
}

#[test]
fn test_execute_custom_layout() {
    let file = script("w1(x)\n");
    let output = common::run_cli()
        .args(["execute", "--pages", "1", "--rows", "1"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(common::stdout(&output), "w1(x): scheduled\nschedule: w1(x)\n");
}
