//! Streaming artifact parser.
//!
//! A line-at-a-time state machine that turns marker-delimited text into an
//! ordered list of [`FileDefinition`]s. Only the current file's lines and at
//! most one pending blank line are held in memory.
//!
//! ```text
//! // package.json          <- path marker opens a file
//! {"name": "demo"}
//!                          <- blank line: pending boundary
//! // src/index.js          <- marker after blank closes the previous file
//! // [Insert code here]    <- placeholder replaces the file's content
//! ```
//!
//! A blank line only terminates a file when the next line is a marker or
//! the input ends; otherwise it belongs to the content.
//!
//! The first accepted marker of a source fixes its comment style. After
//! that, lines in the other style are ordinary content, so a `# Heading`
//! inside a `// README.md` file stays in the README.

use std::fmt;
use std::io::{self, BufRead};

use tracing::{debug, trace, warn};

use crate::domain::{
    DomainError,
    entities::{FileDefinition, common::RelativePath},
    marker::{self, LineKind, MarkerStyle},
};

/// A marker-shaped line that was not accepted as a file boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Zero-based index of the input source.
    pub source: usize,
    /// One-based line number within that source.
    pub line: usize,
    pub error: DomainError,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Everything the parser produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub definitions: Vec<FileDefinition>,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Append another source's results, keeping source order.
    pub fn append(&mut self, mut other: ParseOutcome) {
        self.definitions.append(&mut other.definitions);
        self.warnings.append(&mut other.warnings);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    AwaitingMarker,
    CollectingContent,
}

/// The parser state machine. Feed it lines, then call [`StreamParser::finish`].
#[derive(Debug)]
pub struct StreamParser {
    mode: Mode,
    style: Option<MarkerStyle>,
    source: usize,
    line_no: usize,
    current: Option<RelativePath>,
    lines: Vec<String>,
    placeholder: bool,
    pending_blank: bool,
    outcome: ParseOutcome,
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamParser {
    pub fn new() -> Self {
        Self::for_source(0)
    }

    /// Parser whose warnings are attributed to input source `source`.
    pub fn for_source(source: usize) -> Self {
        Self {
            mode: Mode::AwaitingMarker,
            style: None,
            source,
            line_no: 0,
            current: None,
            lines: Vec::new(),
            placeholder: false,
            pending_blank: false,
            outcome: ParseOutcome::default(),
        }
    }

    /// Process one line with its terminator already stripped.
    pub fn feed(&mut self, line: &str) {
        self.line_no += 1;
        let kind = self.classify(line);
        trace!(line = self.line_no, ?kind, "classified");

        match self.mode {
            Mode::AwaitingMarker => {
                if let LineKind::PathMarker { style, path } = kind {
                    match RelativePath::try_new(path) {
                        Ok(path) => {
                            self.style.get_or_insert(style);
                            self.open(path);
                        }
                        Err(e) => self.warn(e),
                    }
                }
            }
            Mode::CollectingContent => match kind {
                LineKind::Blank => {
                    if self.pending_blank {
                        self.lines.push(String::new());
                    }
                    self.pending_blank = true;
                }
                LineKind::Placeholder { .. } => {
                    self.lines.clear();
                    self.lines.push(line.to_owned());
                    self.placeholder = true;
                    self.pending_blank = false;
                }
                LineKind::PathMarker { path, .. } if self.at_boundary() => {
                    match RelativePath::try_new(path) {
                        Ok(path) => {
                            self.close();
                            self.open(path);
                        }
                        Err(e) => {
                            self.warn(e);
                            self.push_content(line);
                        }
                    }
                }
                _ => self.push_content(line),
            },
        }
    }

    /// Close any in-progress file and return the results.
    pub fn finish(mut self) -> ParseOutcome {
        if self.mode == Mode::CollectingContent {
            self.close();
        }
        self.outcome
    }

    /// Classify under the locked marker style, if any.
    fn classify<'l>(&self, line: &'l str) -> LineKind<'l> {
        let kind = marker::classify(line);
        match (kind, self.style) {
            (LineKind::PathMarker { style, .. } | LineKind::Placeholder { style }, Some(locked))
                if style != locked =>
            {
                LineKind::Content
            }
            _ => kind,
        }
    }

    /// A marker closes the current file after a blank line, or when the file
    /// has nothing but (at most) its placeholder so far.
    fn at_boundary(&self) -> bool {
        self.pending_blank || self.lines.is_empty() || (self.placeholder && self.lines.len() == 1)
    }

    fn open(&mut self, path: RelativePath) {
        self.current = Some(path);
        self.lines.clear();
        self.placeholder = false;
        self.pending_blank = false;
        self.mode = Mode::CollectingContent;
    }

    fn push_content(&mut self, line: &str) {
        if self.pending_blank {
            self.lines.push(String::new());
            self.pending_blank = false;
        }
        self.lines.push(line.to_owned());
    }

    fn close(&mut self) {
        let Some(path) = self.current.take() else {
            return;
        };
        let is_placeholder = self.placeholder;
        let content = self.lines.join("\n");
        debug!(
            path = %path,
            bytes = content.len(),
            placeholder = is_placeholder,
            "file definition closed"
        );
        self.outcome
            .definitions
            .push(FileDefinition::new(path, content, is_placeholder));
        self.lines.clear();
        self.placeholder = false;
        self.pending_blank = false;
        self.mode = Mode::AwaitingMarker;
    }

    fn warn(&mut self, error: DomainError) {
        warn!(line = self.line_no, %error, "marker line ignored");
        self.outcome.warnings.push(ParseWarning {
            source: self.source,
            line: self.line_no,
            error,
        });
    }
}

/// Parse an in-memory artifact. Accepts `\n` and `\r\n` line endings.
pub fn parse_str(input: &str) -> ParseOutcome {
    parse_lines(input.lines())
}

/// Parse any sequence of lines.
pub fn parse_lines<I, S>(lines: I) -> ParseOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = StreamParser::new();
    for line in lines {
        parser.feed(line.as_ref());
    }
    parser.finish()
}

/// Stream-parse a reader.
///
/// # Errors
///
/// Returns the underlying I/O error, including `InvalidData` for input that
/// is not valid UTF-8.
pub fn parse_reader<R: BufRead>(reader: R) -> io::Result<ParseOutcome> {
    parse_source(0, reader)
}

/// Parse several independent sources as one logical stream.
///
/// Each source starts with a fresh state; results are concatenated in
/// source order.
pub fn parse_sources<I, R>(sources: I) -> io::Result<ParseOutcome>
where
    I: IntoIterator<Item = R>,
    R: BufRead,
{
    let mut combined = ParseOutcome::default();
    for (index, reader) in sources.into_iter().enumerate() {
        combined.append(parse_source(index, reader)?);
    }
    Ok(combined)
}

/// Stream-parse one reader, attributing warnings to source `index`.
pub fn parse_source<R: BufRead>(index: usize, reader: R) -> io::Result<ParseOutcome> {
    let mut parser = StreamParser::for_source(index);
    for line in reader.lines() {
        parser.feed(&line?);
    }
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(outcome: &ParseOutcome) -> Vec<&str> {
        outcome.definitions.iter().map(|d| d.path().as_str()).collect()
    }

    #[test]
    fn basic_artifact_in_encounter_order() {
        let input = "\
// package.json
{
  \"name\": \"basic-test\",
  \"version\": \"1.0.0\"
}

// README.md
# Basic Test

// src/index.js
console.log('hi');
";
        let outcome = parse_str(input);
        assert_eq!(paths(&outcome), vec!["package.json", "README.md", "src/index.js"]);
        assert_eq!(
            outcome.definitions[0].content(),
            "{\n  \"name\": \"basic-test\",\n  \"version\": \"1.0.0\"\n}"
        );
        assert_eq!(outcome.definitions[1].content(), "# Basic Test");
        assert_eq!(outcome.definitions[2].content(), "console.log('hi');");
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn blank_line_followed_by_content_is_kept() {
        let outcome = parse_str("// a.txt\nfirst\n\nsecond\n\n// b.txt\nx");
        assert_eq!(outcome.definitions[0].content(), "first\n\nsecond");
        assert_eq!(outcome.definitions[1].content(), "x");
    }

    #[test]
    fn only_the_terminating_blank_line_is_dropped() {
        let outcome = parse_str("// a.txt\nline\n\n\n// b.txt\n");
        assert_eq!(outcome.definitions[0].content(), "line\n");
    }

    #[test]
    fn consecutive_markers_yield_empty_file() {
        let outcome = parse_str("// empty.txt\n// next.txt\ncontent");
        assert_eq!(paths(&outcome), vec!["empty.txt", "next.txt"]);
        assert_eq!(outcome.definitions[0].content(), "");
        assert!(outcome.definitions[0].is_empty());
    }

    #[test]
    fn marker_at_end_of_input_yields_empty_file() {
        let outcome = parse_str("// a.txt\nx\n\n// .gitkeep");
        assert_eq!(paths(&outcome), vec!["a.txt", ".gitkeep"]);
        assert_eq!(outcome.definitions[1].content(), "");
    }

    #[test]
    fn placeholder_with_slashes() {
        let outcome = parse_str("// src/Footer.jsx\n// [TODO]\n\n// b.txt\nb");
        let def = &outcome.definitions[0];
        assert_eq!(def.content(), "// [TODO]");
        assert!(def.is_placeholder());
        assert!(!outcome.definitions[1].is_placeholder());
    }

    #[test]
    fn placeholder_with_hash() {
        let outcome = parse_str("# config.yml\n# [TODO]");
        assert_eq!(outcome.definitions[0].content(), "# [TODO]");
        assert!(outcome.definitions[0].is_placeholder());
    }

    #[test]
    fn placeholder_followed_directly_by_marker() {
        let outcome = parse_str("// a.js\n// [fill me]\n// b.js\nb");
        assert_eq!(paths(&outcome), vec!["a.js", "b.js"]);
        assert!(outcome.definitions[0].is_placeholder());
    }

    #[test]
    fn placeholder_replaces_earlier_content() {
        let outcome = parse_str("// a.js\nlet x = 1;\n// [TODO]\n\n// b.js\nb");
        let def = &outcome.definitions[0];
        assert_eq!(def.content(), "// [TODO]");
        assert!(def.is_placeholder());
        assert_eq!(outcome.definitions[1].content(), "b");
        assert!(!outcome.definitions[1].is_placeholder());
    }

    #[test]
    fn placeholder_drops_pending_blank_line() {
        let outcome = parse_str("// a.js\nold\n\n// [fill]\n// b.js\n");
        assert_eq!(paths(&outcome), vec!["a.js", "b.js"]);
        assert_eq!(outcome.definitions[0].content(), "// [fill]");
        assert!(outcome.definitions[0].is_placeholder());
    }

    #[test]
    fn content_after_placeholder_keeps_the_flag() {
        let outcome = parse_str("// a.js\n// [fill]\nextra");
        let def = &outcome.definitions[0];
        assert_eq!(def.content(), "// [fill]\nextra");
        assert!(def.is_placeholder());
    }

    #[test]
    fn comment_marker_inside_content_is_content() {
        let outcome = parse_str("// main.rs\nfn main() {\n// not a file\n}");
        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.definitions[0].content(), "fn main() {\n// not a file\n}");
    }

    #[test]
    fn lines_before_first_marker_are_ignored() {
        let outcome = parse_str("Here is your project:\n\n```\n// a.txt\nA");
        assert_eq!(paths(&outcome), vec!["a.txt"]);
    }

    #[test]
    fn invalid_marker_paths_are_reported_not_opened() {
        let outcome = parse_str("// ../escape.txt\nsecret\n\n// ok.txt\nfine\n\n// /abs\nmore");
        assert_eq!(paths(&outcome), vec!["ok.txt"]);
        assert_eq!(outcome.definitions[0].content(), "fine\n\n// /abs\nmore");
        assert_eq!(outcome.warnings.len(), 2);
        assert_eq!(outcome.warnings[0].line, 1);
        assert_eq!(outcome.warnings[1].line, 7);
    }

    #[test]
    fn empty_and_garbage_inputs_yield_nothing() {
        assert!(parse_str("").is_empty());
        assert!(parse_str("no markers here\nat all").is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let outcome = parse_str("// a.txt\r\none\r\ntwo\r\n\r\n// b.txt\r\nthree\r\n");
        assert_eq!(outcome.definitions[0].content(), "one\ntwo");
        assert_eq!(outcome.definitions[1].content(), "three");
    }

    #[test]
    fn n_markers_produce_n_definitions() {
        let input: String = (0..25)
            .map(|i| format!("// dir{}/file{i}.txt\ncontent {i}\n\n", i % 4))
            .collect();
        let outcome = parse_str(&input);
        assert_eq!(outcome.len(), 25);
        for (i, def) in outcome.definitions.iter().enumerate() {
            assert_eq!(def.path().as_str(), format!("dir{}/file{i}.txt", i % 4));
            assert_eq!(def.content(), format!("content {i}"));
        }
    }

    #[test]
    fn first_marker_locks_the_comment_style() {
        let outcome = parse_str("// README.md\n# Title\n\n# Usage\nrun it\n\n// src/main.rs\nfn main() {}");
        assert_eq!(paths(&outcome), vec!["README.md", "src/main.rs"]);
        assert_eq!(outcome.definitions[0].content(), "# Title\n\n# Usage\nrun it");
    }

    #[test]
    fn other_style_placeholder_is_plain_content() {
        let outcome = parse_str("// notes.md\n# [not a placeholder]");
        assert!(!outcome.definitions[0].is_placeholder());
    }

    #[test]
    fn each_source_locks_its_own_style() {
        let first: &[u8] = b"// a.txt\nA\n";
        let second: &[u8] = b"# b.py\nprint()\n";
        let outcome = parse_sources([first, second]).unwrap();
        assert_eq!(paths(&outcome), vec!["a.txt", "b.py"]);
    }

    #[test]
    fn special_path_characters() {
        let outcome = parse_str(
            "# .gitignore\nnode_modules\n\n# src/spaces in path/test.js\nx\n\n# src/special#chars/test.txt\ny",
        );
        assert_eq!(
            paths(&outcome),
            vec![".gitignore", "src/spaces in path/test.js", "src/special#chars/test.txt"]
        );
    }

    #[test]
    fn reader_and_sources_reset_state_between_sources() {
        let first: &[u8] = b"// a.txt\nA\n\n// b.txt\n";
        let second: &[u8] = b"dangling line\n// c.txt\nC";
        let outcome = parse_sources([first, second]).unwrap();
        assert_eq!(paths(&outcome), vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(outcome.definitions[1].content(), "");
        assert_eq!(outcome.definitions[2].content(), "C");
    }

    #[test]
    fn warnings_carry_source_index() {
        let first: &[u8] = b"// ok.txt\n";
        let second: &[u8] = b"// ../bad\n";
        let outcome = parse_sources([first, second]).unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].source, 1);
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = b"// a.txt\n\xff\xfe\n";
        let err = parse_reader(bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
