//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "unpack an artifact into a directory".

pub mod materializer;
pub mod unpack_service;

pub use materializer::{MaterializationReport, Materializer};
pub use unpack_service::{UnpackPlan, UnpackService};
