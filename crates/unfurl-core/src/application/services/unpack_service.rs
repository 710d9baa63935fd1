//! Unpack Service - main application orchestrator.
//!
//! This service coordinates the unpacking workflow:
//! 1. Parse every input source into file definitions
//! 2. Plan: pick the project name and check the output location
//! 3. Execute: materialize the plan through the filesystem port
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::fmt::Display;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError, CancellationToken,
        ports::Filesystem,
        services::materializer::{MaterializationReport, Materializer},
    },
    domain::{
        FileDefinition, MaterializationEvent, NameRegistry, NameResolver, ParseOutcome,
        ParseWarning, ProjectName, ResolvedName, parser,
    },
    error::UnfurlResult,
};

/// A parsed artifact with its project name decided, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackPlan {
    pub name: ResolvedName,
    pub root: PathBuf,
    pub definitions: Vec<FileDefinition>,
    pub warnings: Vec<ParseWarning>,
}

impl UnpackPlan {
    pub fn file_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn placeholder_count(&self) -> usize {
        self.definitions.iter().filter(|d| d.is_placeholder()).count()
    }
}

/// Directory entries under the output directory, probed through the port.
struct FilesystemNames<'a> {
    filesystem: &'a dyn Filesystem,
    dir: &'a Path,
}

impl NameRegistry for FilesystemNames<'_> {
    fn contains_name(&self, name: &str) -> bool {
        self.filesystem.exists(&self.dir.join(name))
    }
}

/// Main unpacking service.
pub struct UnpackService {
    filesystem: Box<dyn Filesystem>,
    output_dir: PathBuf,
    explicit_name: Option<String>,
    resolver: NameResolver,
    cancellation: CancellationToken,
}

impl UnpackService {
    /// Create a service writing into the current directory.
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            output_dir: PathBuf::from("."),
            explicit_name: None,
            resolver: NameResolver::default(),
            cancellation: CancellationToken::default(),
        }
    }

    /// Parent directory of the project root. It must already exist.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Use this name instead of manifest detection.
    pub fn with_explicit_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_name = Some(name.into());
        self
    }

    /// Base for generated names (`project` unless set).
    pub fn with_default_base(mut self, base: &str) -> UnfurlResult<Self> {
        self.resolver = NameResolver::new(base)?;
        Ok(self)
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Parse labelled sources in order, each with fresh parser state.
    ///
    /// A source that cannot be read aborts with `InputUnreadable`.
    #[instrument(skip_all)]
    pub fn parse_sources<I, S, R>(&self, sources: I) -> UnfurlResult<ParseOutcome>
    where
        I: IntoIterator<Item = (S, R)>,
        S: Display,
        R: BufRead,
    {
        let mut combined = ParseOutcome::default();
        for (index, (label, reader)) in sources.into_iter().enumerate() {
            let outcome = parser::parse_source(index, reader).map_err(|e| {
                ApplicationError::InputUnreadable {
                    source_name: label.to_string(),
                    reason: e.to_string(),
                }
            })?;
            info!(source = %label, files = outcome.len(), "source parsed");
            combined.append(outcome);
        }
        for warning in &combined.warnings {
            warn!(source = warning.source, %warning, "ignored marker");
        }
        Ok(combined)
    }

    /// Decide the project name and root without writing anything.
    #[instrument(skip_all, fields(output_dir = %self.output_dir.display()))]
    pub fn plan(&self, outcome: ParseOutcome) -> UnfurlResult<UnpackPlan> {
        if outcome.is_empty() {
            return Err(ApplicationError::EmptyInput.into());
        }
        if !self.filesystem.is_dir(&self.output_dir) {
            return Err(ApplicationError::OutputDirMissing {
                path: self.output_dir.clone(),
            }
            .into());
        }

        let name = match &self.explicit_name {
            Some(raw) => ResolvedName::explicit(ProjectName::sanitize(raw)?),
            None => {
                let taken = FilesystemNames {
                    filesystem: self.filesystem.as_ref(),
                    dir: &self.output_dir,
                };
                self.resolver.resolve(&outcome.definitions, &taken)
            }
        };
        let root = self.output_dir.join(name.as_str());

        if name.source.is_fixed() && self.filesystem.exists(&root) {
            return Err(ApplicationError::NameConflict { path: root }.into());
        }

        info!(
            project = %name.name,
            source = %name.source,
            files = outcome.len(),
            "unpack planned"
        );
        Ok(UnpackPlan {
            name,
            root,
            definitions: outcome.definitions,
            warnings: outcome.warnings,
        })
    }

    /// Write a plan to disk, reporting each event as it happens.
    #[instrument(skip_all, fields(project = %plan.name.as_str()))]
    pub fn execute<F>(&self, plan: &UnpackPlan, on_event: F) -> UnfurlResult<MaterializationReport>
    where
        F: FnMut(&MaterializationEvent),
    {
        Materializer::new(self.filesystem.as_ref())
            .with_cancellation(self.cancellation.clone())
            .materialize_with(&self.output_dir, &plan.name, &plan.definitions, on_event)
    }

    /// Parse, plan and execute in one go.
    pub fn unpack<I, S, R, F>(&self, sources: I, on_event: F) -> UnfurlResult<MaterializationReport>
    where
        I: IntoIterator<Item = (S, R)>,
        S: Display,
        R: BufRead,
        F: FnMut(&MaterializationEvent),
    {
        let outcome = self.parse_sources(sources)?;
        let plan = self.plan(outcome)?;
        self.execute(&plan, on_event)
    }
}
