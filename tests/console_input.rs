// tests/console_input.rs

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Runs the demo binary with `stdin` piped in and a config dir that holds no config file.
fn run_demo(args: &[&str], stdin: &str, envs: &[(&str, &str)]) -> Output {
    let home = tempfile::tempdir().unwrap();
    let mut command = Command::new(env!("CARGO_BIN_EXE_argprompt"));
    command
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("ARGPARSE_PROMPT_AUTO")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        command.env(key, value);
    }

    let mut child = command.spawn().unwrap();
    if let Some(mut pipe) = child.stdin.take() {
        pipe.write_all(stdin.as_bytes()).unwrap();
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_piped_answer_is_read() {
    let output = run_demo(&["--age", "1", "--color", "red", "--token", "x"], "Ada\n", &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Hello Ada, age 1. Favourite colour: red."));
    assert!(stderr(&output).contains("name: Who to greet\n> "));
}

#[test]
fn test_piped_answers_follow_declaration_order() {
    let output = run_demo(&["--token", "x"], "Grace\r\n42\ngreen\n", &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Hello Grace, age 42. Favourite colour: green."));
}

#[test]
fn test_end_of_input_takes_defaults() {
    let output = run_demo(&["--name", "Ada"], "", &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Hello Ada, age 30. Favourite colour: blue."));
    assert!(!stdout(&output).contains("token"));
}

#[test]
fn test_secure_answer_is_read_from_pipe() {
    let output = run_demo(&["--name", "Ada", "--age", "1", "-c", "red"], "s3cret\n", &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("A token of 6 characters was received."));
    assert!(!stderr(&output).contains("s3cret"));
}

#[test]
fn test_invalid_answer_exits_with_status_one() {
    let output = run_demo(&["--name", "Ada", "-c", "red", "--token", "x"], "abc\n", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: argument 'age': invalid value 'abc'"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_auto_mode_never_reads_stdin() {
    let output = run_demo(&["--name", "Ada"], "ignored\n", &[("ARGPARSE_PROMPT_AUTO", "1")]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Hello Ada, age 30. Favourite colour: blue."));
    assert!(!stderr(&output).contains("Who to greet"));
}
