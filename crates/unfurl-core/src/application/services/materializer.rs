//! Materializer - turns parsed definitions into files on disk.
//!
//! One run creates the project root, then walks the definitions in order.
//! Per-file problems become `FileFailed` events and the run carries on;
//! only root-level problems and cancellation abort it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, CancellationToken,
        ports::{CreateOutcome, Filesystem},
    },
    domain::{
        DomainValidator as validator, FileDefinition, MaterializationEvent, Permissions,
        ResolvedName, SkipReason,
    },
    error::{UnfurlError, UnfurlResult},
};

/// Everything one run did, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializationReport {
    pub root: PathBuf,
    pub name: ResolvedName,
    pub events: Vec<MaterializationEvent>,
}

impl MaterializationReport {
    fn count(&self, pred: impl Fn(&MaterializationEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|e| matches!(e, MaterializationEvent::FileCreated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|e| matches!(e, MaterializationEvent::FileSkipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(MaterializationEvent::is_failure)
    }

    pub fn placeholders(&self) -> usize {
        self.count(|e| matches!(e, MaterializationEvent::PlaceholderWarning { .. }))
    }

    /// Directories created by this run, the root included.
    pub fn directories(&self) -> usize {
        self.count(|e| matches!(e, MaterializationEvent::DirectoryCreated { .. }))
    }

    /// `true` when no definition failed.
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }
}

pub struct Materializer<'a> {
    filesystem: &'a dyn Filesystem,
    cancellation: CancellationToken,
}

impl<'a> Materializer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self {
            filesystem,
            cancellation: CancellationToken::default(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn materialize(
        &self,
        output_dir: &Path,
        name: &ResolvedName,
        definitions: &[FileDefinition],
    ) -> UnfurlResult<MaterializationReport> {
        self.materialize_with(output_dir, name, definitions, |_| {})
    }

    /// Like [`Materializer::materialize`], handing each event to `on_event`
    /// as soon as it happens.
    #[instrument(
        skip_all,
        fields(project = %name.as_str(), files = definitions.len())
    )]
    pub fn materialize_with<F>(
        &self,
        output_dir: &Path,
        name: &ResolvedName,
        definitions: &[FileDefinition],
        mut on_event: F,
    ) -> UnfurlResult<MaterializationReport>
    where
        F: FnMut(&MaterializationEvent),
    {
        let root = output_dir.join(name.as_str());
        let mut run = Run {
            events: Vec::with_capacity(definitions.len() + 1),
            on_event: &mut on_event,
        };

        if self.cancellation.is_cancelled() {
            warn!("materialization interrupted before the project root was created");
            return Err(ApplicationError::Interrupted { completed: 0 }.into());
        }
        self.create_root(&root, name)?;
        run.emit(MaterializationEvent::DirectoryCreated { path: root.clone() });

        let mut seen: HashSet<PathBuf> = HashSet::new();
        for (index, def) in definitions.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                warn!(completed = index, "materialization interrupted");
                return Err(ApplicationError::Interrupted { completed: index }.into());
            }
            self.materialize_one(&root, def, &mut seen, &mut run);
        }

        let report = MaterializationReport {
            root,
            name: name.clone(),
            events: run.events,
        };
        info!(
            created = report.created(),
            skipped = report.skipped(),
            failed = report.failed(),
            "materialization finished"
        );
        Ok(report)
    }

    fn create_root(&self, root: &Path, name: &ResolvedName) -> UnfurlResult<()> {
        let conflict = || -> UnfurlError {
            if name.source.is_fixed() {
                ApplicationError::NameConflict {
                    path: root.to_path_buf(),
                }
                .into()
            } else {
                ApplicationError::InvariantViolation {
                    reason: format!("generated name '{}' is already taken", name.as_str()),
                }
                .into()
            }
        };

        if self.filesystem.exists(root) {
            return Err(conflict());
        }
        match self.filesystem.create_dir(root, Permissions::full())? {
            CreateOutcome::Created => Ok(()),
            CreateOutcome::AlreadyExists => Err(conflict()),
        }
    }

    fn materialize_one(
        &self,
        root: &Path,
        def: &FileDefinition,
        seen: &mut HashSet<PathBuf>,
        run: &mut Run<'_>,
    ) {
        let target = def.path().to_native(root);

        if let Err(e) = validator::validate_relative_path(def.path().as_str()) {
            warn!(path = %def.path(), error = %e, "rejected definition path");
            run.emit(MaterializationEvent::FileFailed {
                path: target,
                reason: e.to_string(),
            });
            return;
        }

        for ancestor in def.path().ancestors() {
            let dir = root.join(ancestor);
            if seen.contains(&dir) {
                continue;
            }
            match self.filesystem.create_dir(&dir, Permissions::full()) {
                Ok(CreateOutcome::Created) => {
                    run.emit(MaterializationEvent::DirectoryCreated { path: dir.clone() });
                }
                Ok(CreateOutcome::AlreadyExists) => {
                    debug!(dir = %dir.display(), "directory already present");
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "directory creation failed");
                    run.emit(MaterializationEvent::FileFailed {
                        path: target,
                        reason: e.to_string(),
                    });
                    return;
                }
            }
            seen.insert(dir);
        }

        let outcome =
            self.filesystem
                .write_new_file(&target, def.content(), Permissions::read_write());
        match outcome {
            Ok(CreateOutcome::Created) => {
                debug!(path = %def.path(), bytes = def.size(), "file written");
                run.emit(MaterializationEvent::FileCreated {
                    path: target.clone(),
                });
            }
            Ok(CreateOutcome::AlreadyExists) => {
                debug!(path = %def.path(), "file exists, skipping");
                run.emit(MaterializationEvent::FileSkipped {
                    path: target.clone(),
                    reason: SkipReason::AlreadyExists,
                });
            }
            Err(e) => {
                warn!(path = %def.path(), error = %e, "file write failed");
                run.emit(MaterializationEvent::FileFailed {
                    path: target,
                    reason: e.to_string(),
                });
                return;
            }
        }

        if def.is_placeholder() {
            run.emit(MaterializationEvent::PlaceholderWarning { path: target });
        }
    }
}

struct Run<'f> {
    events: Vec<MaterializationEvent>,
    on_event: &'f mut dyn FnMut(&MaterializationEvent),
}

impl Run<'_> {
    fn emit(&mut self, event: MaterializationEvent) {
        (self.on_event)(&event);
        self.events.push(event);
    }
}
