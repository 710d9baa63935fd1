//! Project root naming.
//!
//! A manifest in the artifact names the project. Without one, a default
//! base name is numbered until it is free in the output directory.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::domain::entities::{FileDefinition, ProjectName, RelativePath};
use crate::domain::manifest::ManifestKind;

pub const DEFAULT_BASE_NAME: &str = "project";

/// Names already taken in the output directory.
pub trait NameRegistry {
    fn contains_name(&self, name: &str) -> bool;
}

impl NameRegistry for HashSet<String> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl NameRegistry for BTreeSet<String> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Where the project name came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NameSource {
    Manifest {
        path: RelativePath,
        #[serde(serialize_with = "serialize_kind")]
        manifest: ManifestKind,
    },
    Generated,
    Explicit,
}

fn serialize_kind<S: serde::Serializer>(kind: &ManifestKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.file_name())
}

impl NameSource {
    /// Manifest and explicit names are never renumbered; a collision is fatal.
    pub fn is_fixed(&self) -> bool {
        !matches!(self, Self::Generated)
    }
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifest { path, .. } => write!(f, "from {path}"),
            Self::Generated => f.write_str("generated"),
            Self::Explicit => f.write_str("explicit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    pub name: ProjectName,
    pub source: NameSource,
}

impl ResolvedName {
    pub fn explicit(name: ProjectName) -> Self {
        Self {
            name,
            source: NameSource::Explicit,
        }
    }

    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }
}

/// First manifest in the definitions, preferring the artifact root.
pub fn find_manifest(definitions: &[FileDefinition]) -> Option<(ManifestKind, &FileDefinition)> {
    fn manifest(def: &FileDefinition) -> Option<(ManifestKind, &FileDefinition)> {
        ManifestKind::from_file_name(def.path().file_name()).map(|kind| (kind, def))
    }

    definitions
        .iter()
        .filter(|def| def.path().depth() == 0)
        .find_map(manifest)
        .or_else(|| definitions.iter().find_map(manifest))
}

#[derive(Debug, Clone)]
pub struct NameResolver {
    default_base: ProjectName,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self {
            default_base: ProjectName::default_base(),
        }
    }
}

impl NameResolver {
    /// Resolver whose generated names start from `default_base`.
    pub fn new(default_base: &str) -> Result<Self, DomainError> {
        Ok(Self {
            default_base: ProjectName::sanitize(default_base)?,
        })
    }

    pub fn default_base(&self) -> &ProjectName {
        &self.default_base
    }

    pub fn resolve(
        &self,
        definitions: &[FileDefinition],
        existing: &impl NameRegistry,
    ) -> ResolvedName {
        if let Some(resolved) = Self::from_manifest(definitions) {
            return resolved;
        }
        ResolvedName {
            name: self.generate(existing),
            source: NameSource::Generated,
        }
    }

    fn from_manifest(definitions: &[FileDefinition]) -> Option<ResolvedName> {
        let (kind, def) = find_manifest(definitions)?;
        let raw = kind.extract_name(def.content())?;
        match ProjectName::sanitize(&raw) {
            Ok(name) => {
                debug!(%name, manifest = %def.path(), "project name from manifest");
                Some(ResolvedName {
                    name,
                    source: NameSource::Manifest {
                        path: def.path().clone(),
                        manifest: kind,
                    },
                })
            }
            Err(e) => {
                warn!(candidate = %raw, manifest = %def.path(), error = %e, "unusable manifest name");
                None
            }
        }
    }

    /// `base`, then `base 2`, `base 3`, ... until one is free.
    fn generate(&self, existing: &impl NameRegistry) -> ProjectName {
        let base = &self.default_base;
        if !existing.contains_name(base.as_str()) {
            return base.clone();
        }
        let mut n = 2u64;
        loop {
            let candidate = format!("{base} {n}");
            if !existing.contains_name(&candidate) {
                if let Ok(name) = ProjectName::sanitize(&candidate) {
                    return name;
                }
            }
            n += 1;
        }
    }
}
