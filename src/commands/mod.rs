//! Command implementations
//!
//! `get` and `delete` fan out one task per id over the engine's executor;
//! `list` is a single request.

pub mod delete;
pub mod get;
pub mod kinds;
pub mod list;

use anyhow::{Context as AnyhowContext, Result, bail};
use declarative::{ExecuteOptions, ExecuteSummary, Lifecycle, LockRegistry, VariantContext};
use serde::Serialize;
use srakit::{HttpTransport, Transport};
use std::io::{self, Write};
use std::sync::Arc;

use crate::Context;
use crate::cli::ConnectionArgs;
use crate::config::Settings;
use crate::ui;

/// An authenticated connection plus the engine state shared by its tasks.
pub struct Session {
    transport: Box<dyn Transport>,
    ctx: VariantContext,
    locks: Arc<LockRegistry>,
    jobs: usize,
}

impl Session {
    /// Resolve settings and open an HTTP transport
    pub fn from_cli(args: &ConnectionArgs) -> Result<Self> {
        let settings = Settings::from_cli(args)?;
        log::debug!("Connecting to {} as {}", settings.client.api_base(), settings.variant);
        let transport =
            HttpTransport::new(settings.client.clone()).context("Failed to set up HTTP client")?;
        Ok(Self::new(
            Box::new(transport),
            settings.variant_context(),
            settings.jobs,
        ))
    }

    pub fn new(transport: Box<dyn Transport>, ctx: VariantContext, jobs: usize) -> Self {
        Self {
            transport,
            ctx,
            locks: Arc::new(LockRegistry::new()),
            jobs,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle<'_> {
        Lifecycle::new(self.transport.as_ref(), self.ctx, Arc::clone(&self.locks))
    }

    pub fn options(&self) -> ExecuteOptions {
        ExecuteOptions { jobs: self.jobs }
    }
}

/// Write a value to stdout as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to encode output")?;
    writeln!(stdout)?;
    Ok(())
}

/// Print the batch summary and fail if any task failed
pub fn report(ctx: &Context, verb: &str, summary: &ExecuteSummary) -> Result<()> {
    for (id, diagnostic) in &summary.failures {
        ui::diagnostic(id, diagnostic);
    }

    if !ctx.quiet {
        let done = summary.total() - summary.failed - summary.gone;
        let mut line = format!("{done} {verb}");
        if summary.gone > 0 {
            line.push_str(&format!(", {} not found", summary.gone));
        }
        if summary.failed > 0 {
            line.push_str(&format!(", {} failed", summary.failed));
        }
        if summary.is_success() {
            ui::success(&line);
        } else {
            ui::warn(&line);
        }
    }

    if !summary.is_success() {
        bail!("{} of {} failed", summary.failed, summary.total());
    }
    Ok(())
}
