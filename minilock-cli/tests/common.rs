use std::io::Write;
use std::process::{Command, Output, Stdio};

pub fn run_cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_minilock"))
}

/// Runs the shell with `input` on stdin and returns its output.
pub fn run_shell(input: &str) -> Output {
    let mut child = run_cli()
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
