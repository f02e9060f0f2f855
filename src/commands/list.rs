use anyhow::{Context as AnyhowContext, Result};
use declarative::{Filter, Lifecycle, ResourceType};
use serde::Serialize;

use super::{Session, print_json};
use crate::Context;
use crate::resource::{Kind, with_resource};
use crate::ui;

/// List records of `kind`, optionally filtered.
pub fn run(ctx: &Context, session: &Session, kind: Kind, filters: &[(String, String)]) -> Result<()> {
    let filter = build_filter(filters);
    let lifecycle = session.lifecycle();

    let count = with_resource!(kind, R => list::<R>(&lifecycle, &filter))
        .with_context(|| format!("Failed to list {}", kind.cli_name()))?;

    if !ctx.quiet {
        ui::info(&format!("{count} {} record(s)", kind.cli_name()));
    }
    Ok(())
}

fn build_filter(filters: &[(String, String)]) -> Filter {
    filters
        .iter()
        .fold(Filter::new(), |filter, (key, value)| filter.with(key, value))
}

fn list<R>(lifecycle: &Lifecycle<'_>, filter: &Filter) -> Result<usize>
where
    R: ResourceType,
    R::Config: Serialize,
{
    let records = lifecycle.list::<R>(filter)?;
    print_json(&records)?;
    Ok(records.len())
}
