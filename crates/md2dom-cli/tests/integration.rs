//! Integration tests for the md2dom binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};

fn md2dom(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_md2dom"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to run md2dom")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "md2dom failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Output is not JSON")
}

fn text(s: &str) -> Value {
    json!({"nodeType": "text", "text": s})
}

fn element(tag: &str, attributes: Value, children: Vec<Value>) -> Value {
    json!({
        "nodeType": "element",
        "tagName": tag,
        "attributes": attributes,
        "children": children,
    })
}

#[test]
fn test_single_file_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hello.md"), "Hello World").unwrap();

    let output = md2dom(&["hello.md"], dir.path());
    let tree = stdout_json(&output);

    assert_eq!(
        tree,
        element(
            "div",
            json!([]),
            vec![element("p", json!([]), vec![text("Hello World")])]
        )
    );
}

#[test]
fn test_single_file_to_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("title.md"), "# Title").unwrap();

    let output = md2dom(&["title.md", "-o", "out/title.json", "--compact"], dir.path());
    assert!(output.status.success());

    let written = fs::read_to_string(dir.path().join("out/title.json")).unwrap();
    assert!(!written.contains('\n'));
    let tree: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(tree["children"][0]["tagName"], "h1");
    assert_eq!(tree["children"][0]["children"][0], text("Title"));
}

#[test]
fn test_gfm_flag() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("strike.md"), "~~gone~~").unwrap();

    let plain = stdout_json(&md2dom(&["strike.md"], dir.path()));
    assert_eq!(plain["children"][0]["children"][0], text("~~gone~~"));

    let gfm = stdout_json(&md2dom(&["strike.md", "--gfm"], dir.path()));
    assert_eq!(gfm["children"][0]["children"][0]["tagName"], "del");
}

#[test]
fn test_config_file_enables_gfm() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("_md2dom.toml"), "[parser]\ngfm = true\n").unwrap();
    fs::write(dir.path().join("strike.md"), "~~gone~~").unwrap();

    let tree = stdout_json(&md2dom(&["strike.md"], dir.path()));
    assert_eq!(tree["children"][0]["children"][0]["tagName"], "del");
}

#[test]
fn test_directory_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("nested")).unwrap();
    fs::write(docs.join("a.md"), "# A").unwrap();
    fs::write(docs.join("nested/b.markdown"), "- b").unwrap();
    fs::write(docs.join("ignored.txt"), "not markdown").unwrap();

    let output = md2dom(&["docs", "-o", "out", "-r", "-j2"], dir.path());
    assert!(
        output.status.success(),
        "md2dom failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let a: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/a.json")).unwrap()).unwrap();
    assert_eq!(a["children"][0]["tagName"], "h1");

    let b: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/nested/b.json")).unwrap())
            .unwrap();
    assert_eq!(b["children"][0]["tagName"], "ul");

    assert!(!dir.path().join("out/ignored.json").exists());
}

#[test]
fn test_directory_without_recursion_skips_nested() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("nested")).unwrap();
    fs::write(docs.join("a.md"), "a").unwrap();
    fs::write(docs.join("nested/b.md"), "b").unwrap();

    let output = md2dom(&["docs", "-o", "out", "-q"], dir.path());
    assert!(output.status.success());
    assert!(dir.path().join("out/a.json").exists());
    assert!(!dir.path().join("out/nested/b.json").exists());
}

#[test]
fn test_from_mdast() {
    let dir = tempfile::tempdir().unwrap();
    let mdast = json!({
        "type": "root",
        "children": [
            {"type": "heading", "depth": 3, "children": [{"type": "text", "value": "Deep"}]},
            {"type": "table", "align": ["left"], "children": []}
        ]
    });
    fs::write(dir.path().join("tree.json"), mdast.to_string()).unwrap();

    let tree = stdout_json(&md2dom(&["tree.json", "--from-mdast"], dir.path()));
    assert_eq!(
        tree,
        element(
            "div",
            json!([]),
            vec![
                element("h3", json!([]), vec![text("Deep")]),
                element("span", json!([]), vec![]),
            ]
        )
    );
}

#[test]
fn test_schema() {
    let dir = tempfile::tempdir().unwrap();
    let schema = stdout_json(&md2dom(&["--schema"], dir.path()));
    assert_eq!(schema["title"], "Config");
}

#[test]
fn test_init_writes_sample_config() {
    let dir = tempfile::tempdir().unwrap();

    let output = md2dom(&["--init"], dir.path());
    assert!(output.status.success());
    let written = fs::read_to_string(dir.path().join("_md2dom.toml")).unwrap();
    assert!(written.contains("[parser]"));

    // Refuses to overwrite
    let again = md2dom(&["--init"], dir.path());
    assert!(!again.status.success());
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = md2dom(&["nope.md"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}
