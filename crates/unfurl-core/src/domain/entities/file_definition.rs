use serde::Serialize;

use crate::domain::entities::common::RelativePath;

/// One file parsed out of an artifact, ready for materialization.
///
/// This is the output of the stream parser.
/// It contains no business logic, only data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDefinition {
    path: RelativePath,
    content: String,
    is_placeholder: bool,
}

impl FileDefinition {
    pub fn new(path: RelativePath, content: impl Into<String>, is_placeholder: bool) -> Self {
        Self {
            path,
            content: content.into(),
            is_placeholder,
        }
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}
