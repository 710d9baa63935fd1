//! Line classification for the artifact format.
//!
//! Pure functions, no state. Two comment styles are recognised so artifacts
//! written with C-style (`// `) or shell-style (`# `) comments parse the same
//! way.

/// Comment prefix that introduced a marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// `// path`
    Slashes,
    /// `# path`
    Hash,
}

impl MarkerStyle {
    pub const ALL: [MarkerStyle; 2] = [MarkerStyle::Slashes, MarkerStyle::Hash];

    /// The prefix including its single trailing space.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Slashes => "// ",
            Self::Hash => "# ",
        }
    }

    fn strip(self, line: &str) -> Option<&str> {
        line.strip_prefix(self.prefix())
    }
}

/// What a single line of input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `// <path>` or `# <path>`; carries the raw path text.
    PathMarker { style: MarkerStyle, path: &'a str },
    /// `// [text]` or `# [text]`.
    Placeholder { style: MarkerStyle },
    /// An empty line.
    Blank,
    /// Anything else, verbatim.
    Content,
}

/// Classify a line whose terminator has already been stripped.
pub fn classify(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }
    for style in MarkerStyle::ALL {
        if let Some(rest) = style.strip(line) {
            if rest.starts_with('[') {
                if line.ends_with(']') {
                    return LineKind::Placeholder { style };
                }
                return LineKind::Content;
            }
            return LineKind::PathMarker { style, path: rest };
        }
    }
    LineKind::Content
}

/// `true` if the line is a file-path marker.
pub fn is_path_marker(line: &str) -> bool {
    matches!(classify(line), LineKind::PathMarker { .. })
}

/// `true` if the line is a bracketed placeholder marker.
pub fn is_placeholder_marker(line: &str) -> bool {
    matches!(classify(line), LineKind::Placeholder { .. })
}

/// Path carried by a marker line, with only the prefix removed.
pub fn extract_path(line: &str) -> Option<&str> {
    match classify(line) {
        LineKind::PathMarker { path, .. } => Some(path),
        _ => None,
    }
}
