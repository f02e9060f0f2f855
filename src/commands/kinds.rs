use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use declarative::{Variant, VariantContext};

use crate::resource::Kind;
use crate::ui;

/// Show every resource kind with its API path and product availability.
pub fn run(variant: Variant) -> Result<()> {
    let ctx = VariantContext::new(variant);
    ui::header(&format!("Resource kinds ({variant})"));

    for kind in Kind::value_variants() {
        let products = match kind.variant() {
            Some(only) => format!("{only} only"),
            None => "all products".to_string(),
        };
        let line = format!("{}  ({products})", kind.path());
        if ctx.allows(kind.variant()) {
            ui::kv(&kind.cli_name(), &line);
        } else {
            ui::kv(&kind.cli_name(), &line.dimmed().to_string());
        }
    }
    Ok(())
}
