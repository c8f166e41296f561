/// Command-line tests for the `imp` binary
/// Runs the built executable on temporary source files and checks exit codes and output
use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

fn imp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imp"))
        .args(args)
        .output()
        .unwrap()
}

fn run_source(source: &str, flags: &[&str]) -> Output {
    let file = source_file(source);
    let path = file.path().to_str().unwrap();
    let mut args = flags.to_vec();
    args.push(path);
    imp(&args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// ============================================================================
// Arguments
// ============================================================================

#[test]
fn test_cli_requires_a_file_argument() {
    let output = imp(&[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_rejects_extra_arguments() {
    let file = source_file("x := 1");
    let path = file.path().to_str().unwrap();
    let output = imp(&[path, path]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_missing_file() {
    let output = imp(&["/nonexistent/dir/program.imp"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error: failed to read"));
    assert!(output.stdout.is_empty());
}

// ============================================================================
// Errors exit with status 1
// ============================================================================

#[test]
fn test_cli_lex_error() {
    let output = run_source("x := 1 @ 2", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Illegal character '@'"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_parse_error() {
    let output = run_source("x := ; y := 2", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error:"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_runtime_error() {
    let output = run_source("x := 1 ; y := x / 0", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Division by zero"));
    // Nothing is printed for a program that did not finish.
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_max_iterations() {
    let output = run_source("while 1 = 1 do x := x + 1 end", &["--max-iterations", "5"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Too many iterations (limit: 5)"));

    let output = run_source(
        "i := 0 ; while i < 5 do i := i + 1 end",
        &["--max-iterations", "5"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "i: 5\n");
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_cli_prints_variables_sorted_by_name() {
    let source = r#"
        n := 5 ;
        p := 1 ;
        while n > 0 do
            p := p * n ;
            n := n - 1
        end ;
        a := (0 - 7) / 2
    "#;
    let output = run_source(source, &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "a: -4\nn: 0\np: 120\n");
}

#[test]
fn test_cli_empty_environment_prints_nothing() {
    let output = run_source("if 1 > 2 then x := 1 end", &[]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_json_output() {
    let output = run_source("y := 2 ; x := y * 21", &["--json"]);
    assert!(output.status.success());

    let env: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(env, serde_json::json!({ "x": 42, "y": 2 }));
}

#[test]
fn test_cli_ast_output_does_not_evaluate() {
    let output = run_source("x := 1 / 0", &["--ast"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let ast: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(ast["Assign"]["name"], "x");
    assert_eq!(ast["Assign"]["value"]["BinOp"]["op"], "Div");
}
