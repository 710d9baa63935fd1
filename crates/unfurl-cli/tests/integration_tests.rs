//! Integration tests for the `unfurl` binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;
use walkdir::WalkDir;

const BASIC: &str = "\
// package.json
{
  \"name\": \"basic-test\",
  \"version\": \"1.0.0\"
}

// src/index.js
console.log('Hello, world!');

// README.md
# Basic Test
";

/// A command isolated from the user's config, `.env` and colour settings.
fn unfurl(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("unfurl");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

/// Relative paths of every file under `root`, sorted.
fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

fn write_input(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_help_flag() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("unpack"));
}

#[test]
fn test_version_flag() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_basic_artifact_named_from_package_json() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path(), "artifact.txt", BASIC);
    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();

    unfurl(tmp.path())
        .arg("unpack")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("-y")
        .assert()
        .success()
        .stdout(predicate::str::contains("basic-test"));

    let root = out.join("basic-test");
    assert_eq!(
        files_under(&root),
        ["README.md", "package.json", "src/index.js"]
    );
    assert_eq!(
        fs::read_to_string(root.join("src/index.js")).unwrap(),
        "console.log('Hello, world!');"
    );
}

#[test]
fn test_nested_paths_without_manifest() {
    let tmp = TempDir::new().unwrap();
    write_input(
        tmp.path(),
        "nested.txt",
        "// src/components/Header.js\nexport default 1;\n\n// src/utils/deep/helpers.js\nexport const x = 2;\n",
    );

    unfurl(tmp.path())
        .args(["unpack", "nested.txt", "-y"])
        .assert()
        .success();

    assert_eq!(
        files_under(&tmp.path().join("project")),
        ["src/components/Header.js", "src/utils/deep/helpers.js"]
    );
}

#[test]
fn test_placeholder_is_written_and_warned() {
    let tmp = TempDir::new().unwrap();
    write_input(
        tmp.path(),
        "a.txt",
        "// src/App.js\n// [Insert App component here]\n\n// src/index.js\nimport App from './App';\n",
    );

    unfurl(tmp.path())
        .args(["unpack", "a.txt", "-y", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Placeholder content in"))
        .stdout(predicate::str::contains("1 placeholder(s)"));

    assert_eq!(
        fs::read_to_string(tmp.path().join("project/src/App.js")).unwrap(),
        "// [Insert App component here]"
    );
}

#[test]
fn test_special_characters_survive() {
    let tmp = TempDir::new().unwrap();
    let content = "const s = `${a} \"quoted\" 'single' \\n`; // émoji 🚀\n\ttabbed";
    write_input(
        tmp.path(),
        "s.txt",
        &format!("// src/special chars.js\n{content}\n"),
    );

    unfurl(tmp.path())
        .args(["unpack", "s.txt", "-y"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(tmp.path().join("project/src/special chars.js")).unwrap(),
        content
    );
}

#[test]
fn test_reads_stdin() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .arg("unpack")
        .write_stdin("# app.py\nprint('hi')\n")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(tmp.path().join("project/app.py")).unwrap(),
        "print('hi')"
    );
}

#[test]
fn test_generated_names_count_up() {
    let tmp = TempDir::new().unwrap();
    for _ in 0..2 {
        unfurl(tmp.path())
            .args(["unpack", "-"])
            .write_stdin("// notes.txt\nhello\n")
            .assert()
            .success();
    }
    assert!(tmp.path().join("project/notes.txt").is_file());
    assert!(tmp.path().join("project 2/notes.txt").is_file());
}

#[test]
fn test_explicit_name() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .args(["unpack", "--name", "custom"])
        .write_stdin(BASIC)
        .assert()
        .success();

    assert!(tmp.path().join("custom/package.json").is_file());
    assert!(!tmp.path().join("basic-test").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .args(["unpack", "--dry-run"])
        .write_stdin(BASIC)
        .assert()
        .success()
        .stdout(predicate::str::contains("src/index.js"))
        .stdout(predicate::str::contains("nothing was written"));

    assert!(!tmp.path().join("basic-test").exists());
}

#[test]
fn test_json_output_is_one_object_per_line() {
    let tmp = TempDir::new().unwrap();
    let assert = unfurl(tmp.path())
        .args(["unpack", "--output-format", "json"])
        .write_stdin(BASIC)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let created = lines
        .iter()
        .filter(|v| v["event"] == "file_created")
        .count();
    assert_eq!(created, 3);
    let summary = lines.last().unwrap();
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["name"]["name"], "basic-test");
    assert_eq!(summary["name"]["source"]["kind"], "manifest");
}

#[test]
fn test_ignored_marker_is_reported() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .args(["unpack", "--no-color"])
        .write_stdin("// ok.txt\nfine\n\n// ../escape.txt\nnope\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("<stdin>: line 4"));

    assert!(!tmp.path().join("escape.txt").exists());
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unfurl"));
}

#[test]
fn test_config_get_reads_env_override() {
    let tmp = TempDir::new().unwrap();
    unfurl(tmp.path())
        .args(["config", "get", "defaults.default_name"])
        .env("UNFURL__DEFAULTS__DEFAULT_NAME", "scratch")
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults.default_name = scratch"));
}

#[test]
fn test_config_file_sets_default_name() {
    let tmp = TempDir::new().unwrap();
    let config = write_input(
        tmp.path(),
        "unfurl.toml",
        "[defaults]\ndefault_name = \"sandbox\"\n",
    );

    unfurl(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("unpack")
        .write_stdin("// a.txt\nx\n")
        .assert()
        .success();

    assert!(tmp.path().join("sandbox/a.txt").is_file());
}
