//! Input sources: files named on the command line, or standard input.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;
use unfurl_core::{application::ApplicationError, error::UnfurlResult};

/// Where artifact text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means standard input; anything else is a file path.
    pub fn from_arg(arg: impl AsRef<Path>) -> Self {
        let arg = arg.as_ref();
        if arg == Path::new("-") {
            Self::Stdin
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    /// Sources for the given arguments; no arguments means standard input.
    pub fn from_args<I, P>(args: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let sources: Vec<Self> = args.into_iter().map(Self::from_arg).collect();
        if sources.is_empty() {
            vec![Self::Stdin]
        } else {
            sources
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Open for buffered line reading.
    pub fn open(&self) -> io::Result<Box<dyn BufRead>> {
        match self {
            Self::Stdin => Ok(Box::new(io::stdin().lock())),
            Self::File(path) => {
                debug!(path = %path.display(), "opening input");
                Ok(Box::new(BufReader::new(File::open(path)?)))
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Open every source up front so a missing file fails before any parsing.
pub fn open_all(sources: &[InputSource]) -> UnfurlResult<Vec<(String, Box<dyn BufRead>)>> {
    sources
        .iter()
        .map(|source| {
            let reader = source
                .open()
                .map_err(|e| ApplicationError::InputUnreadable {
                    source_name: source.to_string(),
                    reason: e.to_string(),
                })?;
            Ok((source.to_string(), reader))
        })
        .collect()
}
