//! End-to-end unpacking onto a real directory.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;
use unfurl_adapters::{InputSource, LocalFilesystem, MemoryFilesystem, sources};
use unfurl_core::prelude::*;

const ARTIFACT: &str = "\
// package.json
{
  \"name\": \"roundtrip\",
  \"version\": \"0.1.0\"
}

// src/components/Header.js
export const Header = () => <header />;

// src/components/Footer.js
// [Insert footer component here]

// src/utils/helpers.js
export function add(a, b) {

  return a + b;
}
";

fn service(dir: &Path) -> UnpackService {
    UnpackService::new(Box::new(LocalFilesystem::new())).with_output_dir(dir)
}

fn stdin(text: &str) -> Vec<(&'static str, Cursor<Vec<u8>>)> {
    vec![("<stdin>", Cursor::new(text.as_bytes().to_vec()))]
}

#[test]
fn unpack_then_read_back() {
    let tmp = TempDir::new().unwrap();
    let svc = service(tmp.path());
    let outcome = svc.parse_sources(stdin(ARTIFACT)).unwrap();
    let plan = svc.plan(outcome.clone()).unwrap();
    let report = svc.execute(&plan, |_| {}).unwrap();

    let root = tmp.path().join("roundtrip");
    assert_eq!(report.root, root);
    assert_eq!(report.created(), 4);
    assert_eq!(report.placeholders(), 1);

    for def in &outcome.definitions {
        let on_disk = fs::read_to_string(def.path().to_native(&root)).unwrap();
        assert_eq!(on_disk, def.content(), "{}", def.path());
    }
}

#[test]
fn second_run_conflicts_on_manifest_name() {
    let tmp = TempDir::new().unwrap();
    service(tmp.path()).unpack(stdin(ARTIFACT), |_| {}).unwrap();

    let err = service(tmp.path())
        .unpack(stdin(ARTIFACT), |_| {})
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Conflict);
}

#[test]
fn generated_names_count_up() {
    let tmp = TempDir::new().unwrap();
    let text = "// notes.txt\nhello\n";
    let names: Vec<String> = (0..3)
        .map(|_| {
            service(tmp.path())
                .unpack(stdin(text), |_| {})
                .unwrap()
                .name
                .as_str()
                .to_owned()
        })
        .collect();

    assert_eq!(names, ["project", "project 2", "project 3"]);
    assert!(tmp.path().join("project 3/notes.txt").is_file());
}

#[test]
fn file_where_directory_is_needed_fails_only_that_definition() {
    let tmp = TempDir::new().unwrap();
    let text = "// src\nI am a file\n\n// src/main.rs\nfn main() {}\n\n// ok.txt\nfine\n";
    let report = service(tmp.path()).unpack(stdin(text), |_| {}).unwrap();

    assert_eq!(report.created(), 2);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_complete());
    assert_eq!(
        fs::read_to_string(tmp.path().join("project/ok.txt")).unwrap(),
        "fine"
    );
}

#[test]
fn files_and_stdin_sources_share_one_project() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.txt");
    let b = tmp.path().join("b.txt");
    fs::write(&a, "// one.txt\n1\n").unwrap();
    fs::write(&b, "# two.txt\n2\n").unwrap();

    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();
    let inputs = InputSource::from_args([&a, &b]);
    let opened = sources::open_all(&inputs).unwrap();
    let report = service(&out).unpack(opened, |_| {}).unwrap();

    assert_eq!(report.created(), 2);
    assert!(out.join("project/one.txt").is_file());
    assert!(out.join("project/two.txt").is_file());
}

#[test]
fn memory_adapter_behaves_like_local() {
    let memory = MemoryFilesystem::with_dir("out");
    let report = UnpackService::new(Box::new(memory.clone()))
        .with_output_dir("out")
        .unpack(stdin(ARTIFACT), |_| {})
        .unwrap();

    assert_eq!(report.created(), 4);
    assert_eq!(
        memory
            .read_file(Path::new("out/roundtrip/src/components/Footer.js"))
            .as_deref(),
        Some("// [Insert footer component here]")
    );
    assert_eq!(
        memory.mode_of(Path::new("out/roundtrip/src")),
        Some(0o755)
    );
}
