mod common;

#[test]
fn test_shell_command_help() {
    let output = common::run_shell(":help\n");
    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("Usage hints:"));
    assert!(stdout.contains(":locks"));
    assert!(stdout.contains(":demo"));
}

#[test]
fn test_shell_schedule_and_graph() {
    let output = common::run_shell(":mode markdown\nw1(x) w2(x)\n:graph\n:quit\nr3(x)\n");
    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("w2(x): deferred"));
    assert!(stdout.contains("| waiter | waits for |"));
    assert!(stdout.contains("| 2      | 1         |"));
    assert!(!stdout.contains("r3(x)"));
}

#[test]
fn test_shell_demo_resets_session() {
    let output = common::run_shell("w1(x)\n:demo 2\n:txns\n");
    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("c2: not committed: 28 certify locks pending"));
    assert!(stdout.contains("c1: committed"));
}

#[test]
fn test_shell_recovers_from_errors() {
    let output = common::run_shell("w1(x)\n:nope\nr1(nope)\nc1\n");
    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("unknown command"));
    assert!(stdout.contains("table nope not found"));
    assert!(stdout.contains("c1: committed"));
}
