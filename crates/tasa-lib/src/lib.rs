//! Facade for the tasa workspace: Argentine index series kept up to date
//! from their publishers.
//!
//! # Quick Start
//!
//! ```no_run
//! use tasa_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = SeriesRegistry::global();
//!     let def = registry.get("cer").ok_or("unknown series")?;
//!     let data_dir = default_data_dir();
//!
//!     let store = SeriesStore::for_series(def, &data_dir);
//!     let source = build_source(def, registry, &data_dir, &ClientConfig::default())?;
//!     let ctx = ObserveContext::new(chrono::Local::now().date_naive());
//!
//!     let report = Reconciler::new(def, &store).run(source.as_ref(), &ctx).await;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tasa-rs/tasa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tasa_types::*;

// Re-export the catalog and storage
pub use tasa_registry::{RegistryError, SeriesRegistry};
pub use tasa_store::{SeriesStore, StoreError, default_data_dir};

// Re-export rate models
pub use tasa_model::{FillError, FillPlan, GapFiller, RateModel};

// Re-export publisher adapters
#[cfg(feature = "fetch")]
pub use tasa_fetch::{ClientConfig, HttpClient, build_source, providers};

// Re-export the engine
#[cfg(feature = "engine")]
pub use tasa_engine::{
    Decision, Diff, ReconcileError, Reconciler, RunReport, RunState, Stage, classify,
};

/// Prelude module for convenient imports.
///
/// ```
/// use tasa_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tasa_types::{
        GapFill, Granularity, ModelKind, Observation, ObserveContext, PeriodKey, Semantics,
        SeriesDef, Source, SourceError, TimeSeries,
    };

    pub use tasa_registry::SeriesRegistry;
    pub use tasa_store::{SeriesStore, default_data_dir};

    pub use tasa_model::{GapFiller, RateModel};

    #[cfg(feature = "fetch")]
    pub use tasa_fetch::{ClientConfig, HttpClient, build_source};

    #[cfg(feature = "engine")]
    pub use tasa_engine::{ReconcileError, Reconciler, RunReport, RunState};
}
