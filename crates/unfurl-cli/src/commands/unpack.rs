//! `unfurl unpack`: write an artifact's files into a new project directory.

use std::io::{self, IsTerminal as _};
use std::path::PathBuf;

use tracing::{debug, instrument, warn};
use unfurl_adapters::{InputSource, LocalFilesystem, sources};
use unfurl_core::prelude::*;

use crate::{
    cli::UnpackArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    signal,
};

#[instrument(skip_all, fields(inputs = args.files.len(), dry_run = args.dry_run))]
pub fn execute(
    args: UnpackArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let inputs = InputSource::from_args(&args.files);
    let labels: Vec<String> = inputs.iter().map(ToString::to_string).collect();
    let opened = sources::open_all(&inputs)?;

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    debug!(output_dir = %output_dir.display(), format = ?output.format(), "resolved output");

    let cancellation = CancellationToken::new();

    let mut service = UnpackService::new(Box::new(LocalFilesystem::new()))
        .with_output_dir(output_dir)
        .with_default_base(&config.defaults.default_name)?
        .with_cancellation(cancellation.clone());
    if let Some(name) = &args.name {
        service = service.with_explicit_name(name.clone());
    }

    let outcome = service.parse_sources(opened)?;
    report_warnings(&outcome.warnings, &labels, &output)?;

    let plan = service.plan(outcome)?;

    if args.dry_run {
        return show_plan(&plan, &output);
    }

    if needs_confirmation(&args, &inputs, &output) && !confirm(&plan)? {
        return Err(CliError::Cancelled);
    }

    // Installed only now so an interrupt while reading input or at the
    // prompt still ends the process immediately.
    if let Err(e) = signal::install_interrupt_handler(cancellation) {
        warn!("{e:#}");
    }

    let bar = output.progress_bar(plan.file_count());
    let mut write_error: Option<io::Error> = None;
    let report = service.execute(&plan, |event| {
        let rendered = match &bar {
            Some(pb) => {
                if matches!(
                    event,
                    MaterializationEvent::FileCreated { .. }
                        | MaterializationEvent::FileSkipped { .. }
                        | MaterializationEvent::FileFailed { .. }
                ) {
                    pb.set_message(event.path().display().to_string());
                    pb.inc(1);
                }
                pb.suspend(|| output.event(event))
            }
            None => output.event(event),
        };
        if let Err(e) = rendered {
            write_error.get_or_insert(e);
        }
    });
    if let Some(pb) = &bar {
        pb.finish_and_clear();
    }
    let report = report?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    if !args.no_tree {
        output.tree(&report)?;
    }
    output.summary(&report)?;

    // Partial failures were already reported per file; the run still counts.
    Ok(())
}

fn report_warnings(
    warnings: &[ParseWarning],
    labels: &[String],
    output: &OutputManager,
) -> CliResult<()> {
    for warning in warnings {
        let label = labels
            .get(warning.source)
            .map(String::as_str)
            .unwrap_or("<input>");
        if output.is_json() {
            output.json(&serde_json::json!({
                "event": "parse_warning",
                "source": label,
                "line": warning.line,
                "message": warning.error.to_string(),
            }))?;
        } else {
            output.warning(&format!("{label}: {warning} (ignored)"))?;
        }
    }
    Ok(())
}

fn show_plan(plan: &UnpackPlan, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        let files: Vec<&str> = plan.definitions.iter().map(|d| d.path().as_str()).collect();
        output.json(&serde_json::json!({
            "event": "plan",
            "root": plan.root,
            "name": plan.name,
            "files": files,
            "placeholders": plan.placeholder_count(),
        }))?;
        return Ok(());
    }

    output.header(&format!(
        "Would create {} ({} file(s), name {})",
        plan.root.display(),
        plan.file_count(),
        plan.name.source
    ))?;
    for def in &plan.definitions {
        if def.is_placeholder() {
            output.print(&format!("  {} (placeholder)", def.path()))?;
        } else {
            output.print(&format!("  {} ({} bytes)", def.path(), def.size()))?;
        }
    }
    output.info("Dry run: nothing was written")?;
    Ok(())
}

/// Ask only when a person is at the keyboard and stdin is not the artifact.
fn needs_confirmation(args: &UnpackArgs, inputs: &[InputSource], output: &OutputManager) -> bool {
    !args.yes
        && !output.is_json()
        && !inputs.iter().any(InputSource::is_stdin)
        && io::stdin().is_terminal()
}

#[cfg(feature = "interactive")]
fn confirm(plan: &UnpackPlan) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Create {} with {} file(s)?",
            plan.root.display(),
            plan.file_count()
        ))
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "Failed to read confirmation".into(),
            source: io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_plan: &UnpackPlan) -> CliResult<bool> {
    Ok(true)
}
