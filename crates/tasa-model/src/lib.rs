//! Rate models and gap filling for the tasa reconciler.
//!
//! This crate extends a series from a known anchor:
//!
//! - [`RateModel`] - Per-unit extrapolation formula bound to a rate
//! - [`GapFiller`] - Generates every missing unit from an anchor to a target
//! - [`FillPlan`] - Either new entries or a signal that nothing is appendable

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tasa-rs/tasa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod filler;
mod model;

pub use error::FillError;
pub use filler::{FillPlan, GapFiller, Steps};
pub use model::{DAYS_PER_YEAR, RateModel};
