//! Show command implementation.

use crate::display::format_value;
use crate::settings::Settings;
use anyhow::{Context, Result};

/// Print the last `tail` entries of a series, oldest first.
pub(crate) fn show_entries(settings: &Settings, id: &str, tail: usize) -> Result<()> {
    let def = settings.series(id)?;
    let store = settings.store(def);
    let series = store
        .load()
        .with_context(|| format!("Cannot read series {}", def.id()))?;

    if series.is_empty() {
        println!("{} has no entries.", def.id());
        return Ok(());
    }

    for (key, value) in series.tail(tail) {
        println!("{key:<12} {:>16}", format_value(value, def.precision()));
    }
    Ok(())
}
