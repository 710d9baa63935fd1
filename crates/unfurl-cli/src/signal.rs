//! Ctrl+C handling.

use anyhow::{Context, Result};
use unfurl_core::prelude::CancellationToken;

/// Cancel `token` when the process receives SIGINT or SIGTERM.
///
/// The running unpack stops before its next file definition; everything
/// already written stays on disk.
pub fn install_interrupt_handler(token: CancellationToken) -> Result<()> {
    ctrlc::set_handler(move || {
        tracing::info!("interrupt received, stopping after the current file");
        token.cancel();
    })
    .context("Failed to set Ctrl+C signal handler")
}
