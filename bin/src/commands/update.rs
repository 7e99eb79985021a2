//! Update command implementation.
//!
//! Runs reconciliation for the selected series one after another, in catalog
//! order so derived series see their upstream's fresh value.

use crate::settings::Settings;
use anyhow::{Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tasa_lib::prelude::*;
use tasa_lib::build_source;

/// Execute the update command.
pub(crate) async fn update(
    settings: &Settings,
    ids: &[String],
    all: bool,
    dry_run: bool,
    quiet: bool,
) -> Result<()> {
    let registry = settings.registry();
    let defs: Vec<&SeriesDef> = if all {
        registry.all().collect()
    } else {
        if ids.is_empty() {
            bail!("Name at least one series, or pass --all");
        }
        registry
            .ordered(ids.iter().map(String::as_str))
            .map_err(|unknown| anyhow!("Unknown series: {}", unknown.join(", ")))?
    };

    let ctx = ObserveContext::new(settings.today);
    let progress = (all && !quiet).then(|| {
        let pb = ProgressBar::new(defs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    });

    let mut failures = Vec::new();
    for def in &defs {
        if let Some(pb) = &progress {
            pb.set_message(def.id().to_string());
        }

        let (line, result) = update_series(settings, def, &ctx, dry_run).await;
        match result {
            Ok(()) => emit(progress.as_ref(), || println!("{line}")),
            Err(err) => {
                emit(progress.as_ref(), || eprintln!("{line}"));
                failures.push(err);
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let total = defs.len();
    let failed = failures.len();
    let mut failures = failures.into_iter();
    match failures.next() {
        None => Ok(()),
        Some(first) if total == 1 => Err(first.into()),
        Some(first) => Err(anyhow::Error::new(first).context(format!("{failed} of {total} series failed"))),
    }
}

/// Builds the source and runs one series, returning its summary line.
async fn update_series(
    settings: &Settings,
    def: &SeriesDef,
    ctx: &ObserveContext,
    dry_run: bool,
) -> (String, Result<(), ReconcileError>) {
    let source = match build_source(def, settings.registry(), &settings.data_dir, &settings.client) {
        Ok(source) => source,
        Err(source) => {
            let err = ReconcileError::Fetch {
                series: def.id().to_string(),
                source,
            };
            return (format!("{}: failed at {}: {err}", def.id(), err.stage()), Err(err));
        }
    };

    let store = settings.store(def);
    let report = Reconciler::new(def, &store)
        .with_dry_run(dry_run)
        .run(source.as_ref(), ctx)
        .await;
    let line = report.summary();
    (line, report.into_result().map(drop))
}

/// Prints above the progress bar when there is one.
fn emit(progress: Option<&ProgressBar>, print: impl FnOnce()) {
    match progress {
        Some(pb) => pb.suspend(print),
        None => print(),
    }
}
