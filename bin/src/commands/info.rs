//! Info command implementation.
//!
//! Prints a series definition followed by what the store currently holds.

use crate::display::{describe_flags, describe_source, format_value};
use crate::settings::Settings;
use anyhow::Result;
use tasa_lib::prelude::*;

/// Show a series definition and the state of its file.
pub(crate) fn show_info(settings: &Settings, id: &str) -> Result<()> {
    let def = settings.series(id)?;
    let store = settings.store(def);

    println!("Series:      {}", def.name());
    println!("ID:          {}", def.id());
    if !def.description().is_empty() {
        println!("Description: {}", def.description());
    }
    println!("Granularity: {}", def.granularity());
    println!("Semantics:   {}", def.semantics());
    println!("Precision:   {}", def.precision());
    println!("Source:      {}", describe_source(def.source()));
    if let Some(endpoint) = def.endpoint() {
        println!("Endpoint:    {endpoint}");
    }
    let flags = describe_flags(def);
    if !flags.is_empty() {
        println!("Flags:       {flags}");
    }
    let dependents: Vec<&str> = settings
        .registry()
        .dependents(def.id())
        .map(SeriesDef::id)
        .collect();
    if !dependents.is_empty() {
        println!("Copied by:   {}", dependents.join(", "));
    }
    println!("File:        {}", store.path().display());

    if !store.exists() {
        println!("\nNo data yet.");
        return Ok(());
    }

    match store.load() {
        Ok(series) => {
            println!("\nEntries:     {}", series.len());
            if let Some((key, value)) = series.first() {
                println!("First:       {key} = {}", format_value(value, def.precision()));
            }
            if let Some((key, value)) = SeriesStore::latest(&series) {
                println!("Latest:      {key} = {}", format_value(value, def.precision()));
            }
        }
        // Report a broken file without failing the command.
        Err(err) => println!("\nUnreadable:  {err}"),
    }

    Ok(())
}
