//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "unfurl",
    bin_name = "unfurl",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Unpack multi-file text artifacts into a project directory",
    long_about = "Unfurl reads text in which files are introduced by marker lines \
                  such as '// src/main.rs' or '# app.py' and writes each file \
                  into a new project directory.",
    after_help = "EXAMPLES:\n\
        \x20 unfurl unpack artifact.txt\n\
        \x20 pbpaste | unfurl unpack --name my-app\n\
        \x20 unfurl unpack part1.txt part2.txt -o ~/projects\n\
        \x20 unfurl completions bash > /usr/share/bash-completion/completions/unfurl",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Unpack an artifact into a new project directory.
    #[command(
        visible_alias = "u",
        about = "Unpack an artifact",
        after_help = "EXAMPLES:\n\
            \x20 unfurl unpack artifact.txt\n\
            \x20 unfurl unpack - < artifact.txt\n\
            \x20 unfurl unpack artifact.txt --dry-run\n\
            \x20 unfurl unpack artifact.txt --name demo -o /tmp -y"
    )]
    Unpack(UnpackArgs),

    /// Initialise an Unfurl configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 unfurl init           # default location\n\
            \x20 unfurl init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 unfurl completions bash > ~/.local/share/bash-completion/completions/unfurl\n\
            \x20 unfurl completions zsh  > ~/.zfunc/_unfurl\n\
            \x20 unfurl completions fish > ~/.config/fish/completions/unfurl.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Unfurl configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 unfurl config get defaults.output_dir\n\
            \x20 unfurl config list\n\
            \x20 unfurl config path"
    )]
    Config(ConfigCommands),
}

// ── unpack ────────────────────────────────────────────────────────────────────

/// Arguments for `unfurl unpack`.
#[derive(Debug, Args)]
pub struct UnpackArgs {
    /// Artifact files, read in order. `-` or nothing reads standard input.
    #[arg(value_name = "FILES", help = "Input files (default: stdin)")]
    pub files: Vec<PathBuf>,

    /// Project directory name, bypassing manifest detection.
    #[arg(
        short = 'n',
        long = "name",
        value_name = "NAME",
        help = "Project name (default: from manifest, else 'project')"
    )]
    pub name: Option<String>,

    /// Parent directory of the project.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Directory to create the project in (default: current directory)"
    )]
    pub output_dir: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Do not print the resulting directory tree.
    #[arg(long = "no-tree", help = "Skip the final directory tree")]
    pub no_tree: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `unfurl init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `unfurl completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `unfurl config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.output_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
