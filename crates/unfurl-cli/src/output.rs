//! Output management and formatting.

use std::io::{self, IsTerminal, Write as _};
use std::path::{Path, PathBuf};

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use unfurl_core::prelude::{MaterializationEvent, MaterializationReport};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    tree: bool,
    progress: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => config.output.format,
            explicit => explicit,
        };
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            tree: config.output.tree,
            progress: config.output.progress,
            term: Term::stdout(),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode; errors
    /// must always be visible.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// One compact JSON object per line. Printed even in quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let line = serde_json::to_string(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")
    }

    // ── Unpack rendering ──────────────────────────────────────────────────

    /// Render one materialization event in the active format.
    pub fn event(&self, event: &MaterializationEvent) -> io::Result<()> {
        if self.is_json() {
            return self.json(event);
        }
        let text = event.to_string();
        match event {
            MaterializationEvent::FileCreated { .. }
            | MaterializationEvent::DirectoryCreated { .. } => self.success(&text),
            MaterializationEvent::PlaceholderWarning { .. }
            | MaterializationEvent::FileSkipped { .. } => self.warning(&text),
            MaterializationEvent::FileFailed { .. } => self.error(&text),
        }
    }

    /// A progress bar over `total` definitions, only on an interactive
    /// human-format terminal.
    pub fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.progress
            || self.quiet
            || self.resolved_format != OutputFormat::Human
            || !io::stdout().is_terminal()
        {
            return None;
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} {wide_msg}  {bar:40.cyan/blue}  {pos}/{len}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }

    /// Print the tree of everything the run created under its root.
    pub fn tree(&self, report: &MaterializationReport) -> io::Result<()> {
        if self.quiet || !self.tree || self.is_json() {
            return Ok(());
        }
        self.header(&format!("{}/", report.root.display()))?;
        for line in render_tree(&report.root, &report.events) {
            self.print(&line)?;
        }
        Ok(())
    }

    /// Closing counts, or the whole report as JSON.
    pub fn summary(&self, report: &MaterializationReport) -> io::Result<()> {
        if self.is_json() {
            return self.json(&serde_json::json!({
                "event": "summary",
                "root": report.root,
                "name": report.name,
                "created": report.created(),
                "skipped": report.skipped(),
                "failed": report.failed(),
                "placeholders": report.placeholders(),
                "directories": report.directories(),
            }));
        }

        let counts = format!(
            "{} created, {} skipped, {} failed, {} placeholder(s)",
            report.created(),
            report.skipped(),
            report.failed(),
            report.placeholders()
        );
        if report.is_complete() {
            self.success(&format!(
                "Unpacked '{}' into {} ({counts})",
                report.name.as_str(),
                report.root.display()
            ))
        } else {
            self.warning(&format!(
                "Unpacked '{}' with failures ({counts})",
                report.name.as_str()
            ))
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────


    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

/// Tree lines (`├── name`) for the entries created under `root`, in the
/// order they were created.
pub fn render_tree(root: &Path, events: &[MaterializationEvent]) -> Vec<String> {
    #[derive(Default)]
    struct Node(Vec<(String, Node)>);

    impl Node {
        fn child(&mut self, name: String) -> &mut Node {
            let index = match self.0.iter().position(|(n, _)| *n == name) {
                Some(index) => index,
                None => {
                    self.0.push((name, Node::default()));
                    self.0.len() - 1
                }
            };
            &mut self.0[index].1
        }
    }

    let mut top = Node::default();
    for event in events {
        let path: &PathBuf = match event {
            MaterializationEvent::DirectoryCreated { path }
            | MaterializationEvent::FileCreated { path } => path,
            _ => continue,
        };
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let mut node = &mut top;
        for part in relative.components() {
            let key = part.as_os_str().to_string_lossy().into_owned();
            node = node.child(key);
        }
    }

    fn walk(node: &Node, prefix: &str, out: &mut Vec<String>) {
        let last = node.0.len().saturating_sub(1);
        for (i, (name, child)) in node.0.iter().enumerate() {
            let (branch, indent) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            let suffix = if child.0.is_empty() { "" } else { "/" };
            out.push(format!("{prefix}{branch}{name}{suffix}"));
            walk(child, &format!("{prefix}{indent}"), out);
        }
    }

    let mut lines = Vec::new();
    walk(&top, "", &mut lines);
    lines
}

// ── tests ─────────────────────────────────────────────────────────────────────
