use crate::domain::error::DomainError;

/// Centralized domain validation.
///
/// Path and name rules live here so the parser, the name resolver and the
/// materializer all apply exactly the same checks.
pub struct DomainValidator;

/// Characters that are not allowed in a single directory entry name on any
/// supported platform.
const ILLEGAL_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

impl DomainValidator {
    /// Validate a forward-slash separated relative file path.
    ///
    /// Backslashes are rejected outright: they would be a separator on
    /// Windows and a literal character elsewhere.
    pub fn validate_relative_path(path: &str) -> Result<(), DomainError> {
        let reject = |reason| {
            Err(DomainError::InvalidPath {
                path: path.to_owned(),
                reason,
            })
        };

        if path.is_empty() {
            return reject("path is empty");
        }
        if path.starts_with('/') {
            return reject("absolute paths are not allowed");
        }
        if path.contains('\\') {
            return reject("backslashes are not allowed");
        }
        if path.contains('\0') {
            return reject("NUL bytes are not allowed");
        }
        if has_drive_prefix(path) {
            return reject("drive prefixes are not allowed");
        }
        if path.ends_with('/') {
            return reject("path must name a file, not a directory");
        }

        for segment in path.split('/') {
            match segment {
                "" => return reject("empty path segment"),
                "." | ".." => return reject("'.' and '..' segments are not allowed"),
                _ => {}
            }
        }

        Ok(())
    }

    /// Validate a candidate project directory name.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let reject = |reason| {
            Err(DomainError::InvalidProjectName {
                name: name.to_owned(),
                reason,
            })
        };

        if name.is_empty() {
            return reject("name is empty");
        }
        if name == "." || name == ".." {
            return reject("'.' and '..' are not valid names");
        }
        if name.contains('/') || name.contains('\\') {
            return reject("name contains a path separator");
        }
        if name.chars().any(|c| c.is_control()) {
            return reject("name contains control characters");
        }
        if name.contains(ILLEGAL_NAME_CHARS) {
            return reject("name contains characters illegal in file names");
        }
        if cfg!(windows) && is_reserved_windows_name(name) {
            return reject("name is reserved on Windows");
        }

        Ok(())
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn is_reserved_windows_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name).to_ascii_uppercase();
    matches!(stem.as_str(), "CON" | "PRN" | "AUX" | "NUL")
        || ((stem.starts_with("COM") || stem.starts_with("LPT"))
            && stem.len() == 4
            && stem.as_bytes()[3].is_ascii_digit())
}
