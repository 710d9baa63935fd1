pub mod common;
pub mod event;
pub mod file_definition;
pub mod project_name;

pub use crate::domain::DomainError;
pub use common::{Permissions, RelativePath};
pub use event::{MaterializationEvent, SkipReason};
pub use file_definition::FileDefinition;
pub use project_name::ProjectName;
