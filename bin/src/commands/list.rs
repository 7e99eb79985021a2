//! List command implementation.

use crate::display::{describe_flags, describe_source};
use crate::settings::Settings;
use anyhow::Result;

/// List configured series in catalog order.
pub(crate) fn list_series(settings: &Settings) -> Result<()> {
    let registry = settings.registry();

    if registry.is_empty() {
        println!("No series configured.");
        return Ok(());
    }

    println!(
        "{:<20} {:<9} {:<28} {:<36} {}",
        "ID", "GRAIN", "SEMANTICS", "SOURCE", "FLAGS"
    );
    println!("{}", "-".repeat(110));

    for def in registry.all() {
        println!(
            "{:<20} {:<9} {:<28} {:<36} {}",
            def.id(),
            def.granularity().to_string(),
            def.semantics().to_string(),
            describe_source(def.source()),
            describe_flags(def)
        );
    }

    println!("\nTotal: {} series", registry.len());
    Ok(())
}
