//! Project manifests and their declared names.
//!
//! Extraction is deliberately tolerant. `package.json` is scanned line by
//! line for the first `"name"` key instead of being parsed as JSON, so a
//! trailing comma or odd spacing does not defeat it. The known price: a
//! nested `"name"` that appears before the top-level one wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// Recognised project-descriptor files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    PackageJson,
    CargoToml,
    PyProject,
    SetupPy,
    GoMod,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 5] = [
        ManifestKind::PackageJson,
        ManifestKind::CargoToml,
        ManifestKind::PyProject,
        ManifestKind::SetupPy,
        ManifestKind::GoMod,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::PackageJson => "package.json",
            Self::CargoToml => "Cargo.toml",
            Self::PyProject => "pyproject.toml",
            Self::SetupPy => "setup.py",
            Self::GoMod => "go.mod",
        }
    }

    /// Match an exact file name (no directory part).
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }

    /// Extract the raw declared name. The result is not yet sanitized.
    pub fn extract_name(self, content: &str) -> Option<String> {
        let name = match self {
            Self::PackageJson => scan_json_name(content),
            Self::CargoToml => cargo_name(content),
            Self::PyProject => pyproject_name(content),
            Self::SetupPy => setup_py_name(content),
            Self::GoMod => go_module_name(content),
        };
        debug!(manifest = %self, ?name, "manifest name extracted");
        name.filter(|n| !n.is_empty())
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

// ── package.json ──────────────────────────────────────────────────────────────

/// First line containing `"name"`: the value after the first colon, up to
/// the next quote or comma.
fn scan_json_name(content: &str) -> Option<String> {
    let line = content.lines().find(|line| line.contains("\"name\""))?;
    let (_, value) = line.split_once(':')?;
    let value = value.trim().trim_start_matches('"');
    let end = value.find(['"', ',']).unwrap_or(value.len());
    Some(value[..end].trim().to_owned())
}

// ── TOML manifests ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NamedSection {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<NamedSection>,
}

#[derive(Debug, Deserialize)]
struct PyProjectManifest {
    tool: Option<PyProjectTools>,
    project: Option<NamedSection>,
}

#[derive(Debug, Deserialize)]
struct PyProjectTools {
    poetry: Option<NamedSection>,
}

static TOML_NAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*name\s*=\s*"([^"]+)""#).expect("valid regex"));

/// Fallback for manifests that are not valid TOML.
fn scan_toml_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| TOML_NAME_LINE.captures(line))
        .map(|caps| caps[1].to_owned())
}

fn cargo_name(content: &str) -> Option<String> {
    match toml::from_str::<CargoManifest>(content) {
        Ok(manifest) => manifest.package.and_then(|p| p.name),
        Err(e) => {
            debug!(error = %e, "Cargo.toml is not valid TOML, scanning lines");
            scan_toml_name(content)
        }
    }
}

fn pyproject_name(content: &str) -> Option<String> {
    match toml::from_str::<PyProjectManifest>(content) {
        Ok(manifest) => manifest
            .tool
            .and_then(|t| t.poetry)
            .and_then(|p| p.name)
            .or_else(|| manifest.project.and_then(|p| p.name)),
        Err(e) => {
            debug!(error = %e, "pyproject.toml is not valid TOML, scanning lines");
            scan_toml_name(content)
        }
    }
}

// ── setup.py / go.mod ─────────────────────────────────────────────────────────

static SETUP_CALL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"setup\s*\([^)]*name\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

fn setup_py_name(content: &str) -> Option<String> {
    SETUP_CALL_NAME
        .captures(content)
        .map(|caps| caps[1].to_owned())
}

/// Last path segment of the `module` directive.
fn go_module_name(content: &str) -> Option<String> {
    let module = content
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("module "))?;
    let module = module.trim().trim_matches('"');
    module.rsplit('/').next().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_round_trip() {
        for kind in ManifestKind::ALL {
            assert_eq!(ManifestKind::from_file_name(kind.file_name()), Some(kind));
        }
        assert_eq!(ManifestKind::from_file_name("package-lock.json"), None);
        assert_eq!(ManifestKind::from_file_name("cargo.toml"), None);
    }

    #[test]
    fn package_json_standard() {
        let content = "{\n  \"name\": \"my-app\",\n  \"version\": \"1.0.0\"\n}";
        assert_eq!(
            ManifestKind::PackageJson.extract_name(content).as_deref(),
            Some("my-app")
        );
    }

    #[test]
    fn package_json_tolerates_odd_spacing_and_missing_comma() {
        let content = "{\n\"name\"   :\"tool\"\n}";
        assert_eq!(
            ManifestKind::PackageJson.extract_name(content).as_deref(),
            Some("tool")
        );
    }

    #[test]
    fn package_json_single_line() {
        let content = r#"{"name": "one-liner", "private": true}"#;
        assert_eq!(
            ManifestKind::PackageJson.extract_name(content).as_deref(),
            Some("one-liner")
        );
    }

    #[test]
    fn package_json_nested_name_matches_first() {
        // Accepted heuristic limitation.
        let content = "{\n  \"author\": {\n    \"name\": \"Ada\"\n  },\n  \"name\": \"real\"\n}";
        assert_eq!(
            ManifestKind::PackageJson.extract_name(content).as_deref(),
            Some("Ada")
        );
    }

    #[test]
    fn package_json_without_name() {
        assert_eq!(ManifestKind::PackageJson.extract_name("{}"), None);
        assert_eq!(
            ManifestKind::PackageJson.extract_name("{\n  \"name\":\n}"),
            None
        );
    }

    #[test]
    fn cargo_toml_package_name() {
        let content = "[package]\nname = \"crab\"\nversion = \"0.1.0\"\n";
        assert_eq!(
            ManifestKind::CargoToml.extract_name(content).as_deref(),
            Some("crab")
        );
    }

    #[test]
    fn cargo_workspace_has_no_name() {
        let content = "[workspace]\nmembers = [\"a\"]\n";
        assert_eq!(ManifestKind::CargoToml.extract_name(content), None);
    }

    #[test]
    fn cargo_toml_invalid_falls_back_to_line_scan() {
        let content = "[package\nname = \"broken\"\n";
        assert_eq!(
            ManifestKind::CargoToml.extract_name(content).as_deref(),
            Some("broken")
        );
    }

    #[test]
    fn pyproject_prefers_poetry() {
        let content = "[project]\nname = \"pep621\"\n\n[tool.poetry]\nname = \"poetic\"\n";
        assert_eq!(
            ManifestKind::PyProject.extract_name(content).as_deref(),
            Some("poetic")
        );
    }

    #[test]
    fn pyproject_project_table() {
        let content = "[project]\nname = \"pep621\"\n";
        assert_eq!(
            ManifestKind::PyProject.extract_name(content).as_deref(),
            Some("pep621")
        );
    }

    #[test]
    fn setup_py_call() {
        let content = "from setuptools import setup\n\nsetup(\n    name='snake',\n    version='1.0',\n)\n";
        assert_eq!(
            ManifestKind::SetupPy.extract_name(content).as_deref(),
            Some("snake")
        );
    }

    #[test]
    fn go_mod_last_segment() {
        let content = "module github.com/acme/gopher\n\ngo 1.22\n";
        assert_eq!(
            ManifestKind::GoMod.extract_name(content).as_deref(),
            Some("gopher")
        );
    }

    #[test]
    fn go_mod_without_module_line() {
        assert_eq!(ManifestKind::GoMod.extract_name("go 1.22\n"), None);
    }
}
