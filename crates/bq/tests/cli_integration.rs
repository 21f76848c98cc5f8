//! End-to-end tests for the `bq` binary.
//!
//! Each test runs the real binary against temporary input and config files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

const PEOPLE: &str = r#"{"name": "John", "age": 25, "address": {"city": "Oslo"}}
{"name": "Jane", "age": 19, "address": {"city": "Bergen"}}
{"name": "Jack", "age": 40, "address": {"city": "Oslo"}}
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Runs bq with an isolated config file and optional stdin.
    fn run(&self, args: &[&str], stdin: Option<&str>) -> Output {
        let mut child = Command::new(env!("CARGO_BIN_EXE_bq"))
            .args(args)
            .env("BQ_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn bq");

        {
            let mut pipe = child.stdin.take().expect("stdin not captured");
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes()).expect("failed to write stdin");
            }
        }

        child.wait_with_output().expect("failed to wait for bq")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| {
            let record: Value = serde_json::from_str(line).expect("output is not JSON");
            record["name"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("non UTF-8 temp path")
}

// ============================================================================
// filter
// ============================================================================

#[test]
fn test_filter_from_file() {
    let ws = Workspace::new();
    let input = ws.write("people.jsonl", PEOPLE);

    let output = ws.run(&["filter", "age gt 20", path_arg(&input)], None);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(names(&stdout(&output)), vec!["John", "Jack"]);
}

#[test]
fn test_filter_from_stdin_with_field_pointer() {
    let ws = Workspace::new();
    let output = ws.run(
        &["filter", "city Oslo and age lt 30", "--field", "city=/address/city", "--field", "age=/age"],
        Some(PEOPLE),
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(names(&stdout(&output)), vec!["John"]);
}

#[test]
fn test_filter_uses_config_fields() {
    let ws = Workspace::new();
    fs::write(
        ws.config_path(),
        "version = 1\n[fields]\ncity = \"/address/city\"\nname = \"/name\"\n",
    )
    .unwrap();

    let output = ws.run(&["filter", "city Bergen or name Jack"], Some(PEOPLE));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(names(&stdout(&output)), vec!["Jane", "Jack"]);
}

#[test]
fn test_filter_count_and_invert() {
    let ws = Workspace::new();
    let output = ws.run(&["filter", "--count", "--invert", "name John"], Some(PEOPLE));
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "2");

    let output = ws.run(&["--json", "filter", "--count", "name John"], Some(PEOPLE));
    let summary: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(summary["records"], 3);
    assert_eq!(summary["selected"], 1);
}

#[test]
fn test_filter_unknown_field_exits_1() {
    let ws = Workspace::new();
    let output = ws.run(
        &["filter", "age gt 100 or nmae John", "--field", "age=/age"],
        Some(PEOPLE),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line 1: Unknown field"));
}

#[test]
fn test_filter_malformed_line_reports_position() {
    let ws = Workspace::new();
    let output = ws.run(&["filter", "age 1"], Some("{\"age\": 1}\nnot json\n"));
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("line 2"));
}

#[test]
fn test_filter_bad_expression_json_error() {
    let ws = Workspace::new();
    let output = ws.run(&["--json", "filter", "(age 1"], Some(PEOPLE));
    assert_eq!(output.status.code(), Some(2));

    let error: Value = serde_json::from_str(&stderr(&output)).expect("stderr is not JSON");
    assert_eq!(error["error"]["code"], "EXPRESSION_ERROR");
    assert_eq!(
        error["error"]["message"],
        "expression error: unclosed parenthesis"
    );
}

// ============================================================================
// check / config
// ============================================================================

#[test]
fn test_check_prints_canonical_form() {
    let ws = Workspace::new();
    let output = ws.run(&["check", "age gt 20 && (name John || name Jane)"], None);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("ok age > 20 and (name == John or name == Jane)"));
    assert!(out.contains("Fields: age, name"));
}

#[test]
fn test_check_suggests_configured_field() {
    let ws = Workspace::new();
    fs::write(ws.config_path(), "[fields]\nname = \"/name\"\n").unwrap();

    let output = ws.run(&["check", "nmae John"], None);
    assert!(output.status.success());
    assert!(stderr(&output).contains("did you mean 'name'?"));
}

#[test]
fn test_config_init_and_path() {
    let ws = Workspace::new();
    let output = ws.run(&["config", "init"], None);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(ws.config_path().exists());

    let output = ws.run(&["config", "init"], None);
    assert_eq!(output.status.code(), Some(5));

    let output = ws.run(&["config", "path"], None);
    assert_eq!(stdout(&output).trim(), path_arg(&ws.config_path()));
}

#[test]
fn test_completions() {
    let ws = Workspace::new();
    let output = ws.run(&["completions", "bash"], None);
    assert!(output.status.success());
    assert!(stdout(&output).contains("bq"));
}
