//! Unfurl Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Unfurl
//! artifact unpacker: it reads marker-delimited multi-file text and turns it
//! into a directory tree, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           unfurl-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (UnpackService, Materializer)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │            (Filesystem)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    unfurl-adapters (Infrastructure)     │
//! │  (LocalFilesystem, MemoryFilesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │   (StreamParser, NameResolver, ...)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use unfurl_core::prelude::*;
//!
//! let service = UnpackService::new(Box::new(filesystem)).with_output_dir("out");
//! let report = service.unpack([("artifact.txt", reader)], |event| println!("{event}"))?;
//! println!("{} files created", report.created());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, CancellationToken, MaterializationReport, UnpackPlan, UnpackService,
        ports::{CreateOutcome, Filesystem},
    };
    pub use crate::domain::{
        FileDefinition, MaterializationEvent, ParseOutcome, ParseWarning, Permissions,
        ProjectName, RelativePath, ResolvedName, SkipReason,
    };
    pub use crate::error::{ErrorCategory, UnfurlError, UnfurlResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
