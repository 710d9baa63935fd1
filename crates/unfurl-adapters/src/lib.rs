//! Infrastructure adapters for Unfurl.
//!
//! This crate implements the ports defined in `unfurl-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod sources;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use sources::InputSource;
