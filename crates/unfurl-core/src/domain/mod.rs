// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Unfurl.
//!
//! Pure logic over in-memory text: line classification, the streaming
//! artifact parser, manifest inspection and project naming. Nothing here
//! touches the filesystem; materialization goes through the ports defined
//! in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No filesystem**: Readers are accepted, paths are never opened
//! - **Validated values**: `RelativePath` and `ProjectName` cannot hold unsafe text
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod manifest;
pub mod marker;
pub mod naming;
pub mod parser;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    FileDefinition, MaterializationEvent, Permissions, ProjectName, RelativePath, SkipReason,
};
pub use error::{DomainError, ErrorCategory};
pub use manifest::ManifestKind;
pub use marker::{LineKind, MarkerStyle};
pub use naming::{NameRegistry, NameResolver, NameSource, ResolvedName};
pub use parser::{ParseOutcome, ParseWarning, StreamParser};

pub(crate) use validation::DomainValidator;
