//! Core types for the tasa series reconciler.
//!
//! This crate provides the fundamental data structures shared by every tasa
//! crate:
//!
//! - [`PeriodKey`] - A daily or monthly series key with chronological ordering
//! - [`PeriodRange`] - Inclusive range of keys
//! - [`TimeSeries`] - Ordered key to value mapping
//! - [`Observation`] - What a publisher currently reports
//! - [`SeriesDef`] - Where a series lives and how it is updated
//! - [`Source`] - Trait implemented by every publisher adapter

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tasa-rs/tasa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod definition;
mod error;
mod observation;
mod period;
mod range;
mod series;
mod source;

pub use definition::{GapFill, ModelKind, Semantics, SeriesDef, SourceDef};
pub use error::{FetchError, KeyError, ParseError, SourceError};
pub use observation::Observation;
pub use period::{Granularity, MONTH_ABBR, PeriodKey, month_from_abbr, month_from_name};
pub use range::PeriodRange;
pub use series::{TimeSeries, round_to};
pub use source::{ObserveContext, Source};
