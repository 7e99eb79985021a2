//! Series reconciliation engine for tasa.
//!
//! Given a stored series and one fresh observation, the engine decides how
//! they relate, fills any skipped periods, and saves at most once:
//!
//! - [`classify`] - Pure decision: no-op, append, or rewrite
//! - [`Reconciler`] - Drives load, observe, classify and persist
//! - [`RunReport`] - Transition trail, diff and one-line summary
//! - [`ReconcileError`] - Terminal failures, each tied to a [`Stage`]

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tasa-rs/tasa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod report;
mod state;

pub use engine::{Decision, Reconciler, classify};
pub use error::ReconcileError;
pub use report::{Diff, RunReport};
pub use state::{RunState, Stage};
