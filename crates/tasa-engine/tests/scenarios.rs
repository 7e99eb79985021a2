//! End-to-end reconciliation runs against temporary stores.

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use async_trait::async_trait;
use chrono::NaiveDate;
use tasa_engine::{ReconcileError, Reconciler, RunReport, RunState, Stage};
use tasa_registry::SeriesRegistry;
use tasa_store::SeriesStore;
use tasa_types::{
    FetchError, Granularity, Observation, ObserveContext, PeriodKey, SeriesDef, Source,
    SourceError, round_to,
};
use tempfile::TempDir;

/// Source that always reports the same thing.
struct FixedSource(Result<Observation, SourceError>);

#[async_trait]
impl Source for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn observe(&self, _ctx: &ObserveContext) -> Result<Observation, SourceError> {
        self.0.clone()
    }
}

fn day(s: &str) -> PeriodKey {
    PeriodKey::parse(s, Granularity::Daily).unwrap()
}

fn month(y: i32, m: u32) -> PeriodKey {
    PeriodKey::month(y, m).unwrap()
}

fn ctx() -> ObserveContext {
    ObserveContext::new(NaiveDate::from_ymd_opt(2025, 7, 19).unwrap())
}

fn def(id: &str) -> &'static SeriesDef {
    SeriesRegistry::global().get(id).unwrap()
}

fn store_with(dir: &Path, def: &SeriesDef, contents: Option<&str>) -> SeriesStore {
    let store = SeriesStore::for_series(def, dir);
    if let Some(contents) = contents {
        fs::write(store.path(), contents).unwrap();
    }
    store
}

async fn run(def: &SeriesDef, store: &SeriesStore, obs: Observation) -> RunReport {
    Reconciler::new(def, store)
        .run(&FixedSource(Ok(obs)), &ctx())
        .await
}

#[tokio::test]
async fn test_daily_compounding_one_day() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let store = store_with(temp_dir.path(), activa, Some("{\n  \"2025-07-18\": 100.0\n}\n"));

    let report = run(activa, &store, Observation::new(day("2025-07-19"), 36.5)).await;

    assert_eq!(report.state, RunState::Persisted);
    assert_eq!(report.outcome(), Some(RunState::Appended));
    assert_eq!(
        report.trail,
        vec![
            RunState::Loaded,
            RunState::Fetched,
            RunState::Appended,
            RunState::Persisted
        ]
    );
    let series = store.load().unwrap();
    assert_eq!(series.get(&day("2025-07-19")), Some(100.1));
}

#[tokio::test]
async fn test_second_run_is_noop_and_file_is_identical() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let store = store_with(temp_dir.path(), activa, Some("{\n  \"2025-07-15\": 100.0\n}\n"));
    let obs = Observation::new(day("2025-07-19"), 36.5);

    let first = run(activa, &store, obs).await;
    assert!(first.persisted());
    let saved = fs::read(store.path()).unwrap();

    let second = run(activa, &store, obs).await;
    assert_eq!(second.state, RunState::Noop);
    assert_eq!(second.trail.len(), 3);
    assert_eq!(fs::read(store.path()).unwrap(), saved);
}

#[tokio::test]
async fn test_monthly_percent_step() {
    let temp_dir = TempDir::new().unwrap();
    let inflacion = def("inflacion");
    let store = store_with(temp_dir.path(), inflacion, Some("{\n  \"jun-25\": 100.0\n}\n"));

    let report = run(inflacion, &store, Observation::new(month(2025, 7), 1.6)).await;

    assert_eq!(report.outcome(), Some(RunState::Appended));
    assert_eq!(store.load().unwrap().get(&month(2025, 7)), Some(101.6));
}

#[tokio::test]
async fn test_same_day_rate_change_rewrites_only_target() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let store = store_with(
        temp_dir.path(),
        activa,
        Some("{\n  \"2025-07-18\": 100.0,\n  \"2025-07-19\": 100.1\n}\n"),
    );
    let obs = Observation::new(day("2025-07-19"), 73.0).with_effective_from(day("2025-07-19"));

    let report = run(activa, &store, obs).await;

    assert_eq!(report.outcome(), Some(RunState::Rewritten));
    assert_eq!((report.diff.added, report.diff.changed, report.diff.removed), (0, 1, 0));
    let series = store.load().unwrap();
    assert_eq!(series.get(&day("2025-07-18")), Some(100.0));
    assert_eq!(series.get(&day("2025-07-19")), Some(100.2));
    assert!(!series.contains(&day("2025-07-20")));
}

#[tokio::test]
async fn test_retroactive_rate_regenerates_window() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let store = store_with(
        temp_dir.path(),
        activa,
        Some("{\n  \"2025-06-28\": 100.0,\n  \"2025-06-29\": 100.1,\n  \"2025-06-30\": 100.2001,\n}\n"),
    );
    let obs = Observation::new(day("2025-06-30"), 73.0).with_effective_from(day("2025-06-29"));

    let report = run(activa, &store, obs).await;

    assert_eq!(report.outcome(), Some(RunState::Rewritten));
    assert_eq!(report.diff.changed, 2);
    assert_eq!(report.diff.first, Some(day("2025-06-29")));
    let series = store.load().unwrap();
    assert_eq!(series.get(&day("2025-06-29")), Some(100.2));
    assert_eq!(series.get(&day("2025-06-30")), Some(100.4004));
}

#[tokio::test]
async fn test_compounding_matches_iterated_reference() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let store = store_with(temp_dir.path(), activa, Some("{\"2025-07-01\": 100.0}"));

    let report = run(activa, &store, Observation::new(day("2025-07-11"), 36.5)).await;
    assert_eq!(report.diff.added, 10);

    let mut expected = 100.0;
    for _ in 0..10 {
        expected = round_to(expected * (1.0 + 36.5 / 100.0 / 365.0), 6);
    }
    let latest = store.load().unwrap().latest().unwrap();
    assert_eq!(latest, (day("2025-07-11"), expected));
    assert_relative_eq!(latest.1, 100.0 * 1.001_f64.powi(10), epsilon = 1e-4);
}

#[tokio::test]
async fn test_missing_anchor_leaves_store_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let inflacion = def("inflacion");
    let contents = "{\n  \"may-25\": 100.0\n}\n";
    let store = store_with(temp_dir.path(), inflacion, Some(contents));

    let report = run(inflacion, &store, Observation::new(month(2025, 7), 1.6)).await;

    assert!(report.is_failed());
    assert_eq!(report.trail, vec![RunState::Loaded, RunState::Fetched, RunState::Failed]);
    let err = report.into_result().unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::MissingAnchor { expected, .. } if expected == month(2025, 6)
    ));
    assert_eq!(err.stage(), Stage::Reconcile);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), contents);
}

#[tokio::test]
async fn test_retroactive_rate_before_first_stored_day_fails() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let contents = "{\n  \"2025-07-10\": 100.0\n}\n";
    let store = store_with(temp_dir.path(), activa, Some(contents));
    let obs = Observation::new(day("2025-07-19"), 36.5).with_effective_from(day("2025-07-05"));

    let report = run(activa, &store, obs).await;

    assert!(report.is_failed());
    assert_eq!(report.trail, vec![RunState::Loaded, RunState::Fetched, RunState::Failed]);
    let err = report.into_result().unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::MissingAnchor { expected, .. } if expected == day("2025-07-04")
    ));
    assert_eq!(err.exit_code(), 6);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), contents);
}

#[tokio::test]
async fn test_rate_series_without_file_fails_at_load() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let store = store_with(temp_dir.path(), activa, None);

    let report = run(activa, &store, Observation::new(day("2025-07-19"), 36.5)).await;

    assert_eq!(report.trail, vec![RunState::Failed]);
    assert_eq!(report.into_result().unwrap_err().exit_code(), 3);
    assert!(!store.exists());
}

#[tokio::test]
async fn test_level_bootstrap() {
    let temp_dir = TempDir::new().unwrap();
    let cer = def("cer");
    let store = store_with(temp_dir.path(), cer, None);

    let report = run(cer, &store, Observation::new(day("2025-07-19"), 607.67994)).await;

    assert_eq!(report.outcome(), Some(RunState::Appended));
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "{\n  \"2025-07-19\": 607.6799\n}\n"
    );
}

#[tokio::test]
async fn test_level_without_gap_fill_skips_periods() {
    let temp_dir = TempDir::new().unwrap();
    let cer = def("cer");
    let store = store_with(temp_dir.path(), cer, Some("{\"2025-07-16\": 605.0}"));

    let report = run(cer, &store, Observation::new(day("2025-07-19"), 607.68)).await;

    assert_eq!(report.diff.added, 1);
    assert_eq!(store.load().unwrap().len(), 2);
}

#[tokio::test]
async fn test_level_past_insert_is_rewrite() {
    let temp_dir = TempDir::new().unwrap();
    let cer = def("cer");
    let store = store_with(
        temp_dir.path(),
        cer,
        Some("{\"2025-07-17\": 605.0, \"2025-07-19\": 607.68}"),
    );

    let report = run(cer, &store, Observation::new(day("2025-07-18"), 606.3)).await;

    assert_eq!(report.outcome(), Some(RunState::Rewritten));
    assert_eq!(store.load().unwrap().len(), 3);
}

#[tokio::test]
async fn test_level_revision_respects_flag() {
    let temp_dir = TempDir::new().unwrap();

    let cer = def("cer");
    let cer_store = store_with(temp_dir.path(), cer, Some("{\"2025-07-19\": 607.6799}"));
    let report = run(cer, &cer_store, Observation::new(day("2025-07-19"), 610.0)).await;
    assert_eq!(report.state, RunState::Noop);
    assert!(report.reason.unwrap().contains("not revisable"));
    assert_eq!(cer_store.load().unwrap().get(&day("2025-07-19")), Some(607.6799));

    let rem = def("inflacion_esperada");
    let rem_store = store_with(temp_dir.path(), rem, Some("{\"jun-25\": 25.0}"));
    let report = run(rem, &rem_store, Observation::new(month(2025, 6), 24.5)).await;
    assert_eq!(report.outcome(), Some(RunState::Rewritten));
    assert_eq!(rem_store.load().unwrap().get(&month(2025, 6)), Some(24.5));
}

#[tokio::test]
async fn test_carry_forward_saved_in_chronological_order() {
    let temp_dir = TempDir::new().unwrap();
    let smvm = def("smvm");
    let store = store_with(temp_dir.path(), smvm, Some("{\"nov-25\": 317800.0}"));

    let report = run(smvm, &store, Observation::new(month(2026, 2), 322_000.0)).await;

    assert_eq!(report.diff.added, 3);
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "{\n  \"nov-25\": 317800.0,\n  \"dic-25\": 317800.0,\n  \"ene-26\": 317800.0,\n  \"feb-26\": 322000.0\n}\n"
    );
}

#[tokio::test]
async fn test_fetch_failure_leaves_store_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let cer = def("cer");
    let contents = "{\"2025-07-18\": 606.0}";
    let store = store_with(temp_dir.path(), cer, Some(contents));
    let source = FixedSource(Err(SourceError::Fetch(FetchError::Timeout {
        url: "https://www.bcra.gob.ar".to_string(),
        secs: 10,
    })));

    let report = Reconciler::new(cer, &store).run(&source, &ctx()).await;

    assert_eq!(report.trail, vec![RunState::Loaded, RunState::Failed]);
    assert!(report.summary().contains("failed at fetch"));
    assert_eq!(report.into_result().unwrap_err().exit_code(), 4);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), contents);
}

#[tokio::test]
async fn test_dry_run_does_not_save() {
    let temp_dir = TempDir::new().unwrap();
    let activa = def("activa");
    let contents = "{\"2025-07-18\": 100.0}";
    let store = store_with(temp_dir.path(), activa, Some(contents));

    let report = Reconciler::new(activa, &store)
        .with_dry_run(true)
        .run(&FixedSource(Ok(Observation::new(day("2025-07-19"), 36.5))), &ctx())
        .await;

    assert_eq!(report.state, RunState::Appended);
    assert!(report.summary().ends_with("(dry run)"));
    assert_eq!(fs::read_to_string(store.path()).unwrap(), contents);
}

#[tokio::test]
async fn test_month_after_current_two_digit_year_reloads_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let smvm = def("smvm");
    let store = store_with(temp_dir.path(), smvm, Some("{\"dic-26\": 100.0}"));
    let obs = Observation::new(month(2027, 1), 110.0);

    let first = run(smvm, &store, obs).await;
    assert!(first.persisted());
    let saved = fs::read_to_string(store.path()).unwrap();
    assert_eq!(saved, "{\n  \"dic-26\": 100.0,\n  \"ene-27\": 110.0\n}\n");

    let series = store.load().unwrap();
    assert_eq!(series.latest(), Some((month(2027, 1), 110.0)));

    let second = run(smvm, &store, obs).await;
    assert_eq!(second.state, RunState::Noop);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), saved);
}
