//! Series file storage for the tasa reconciler.
//!
//! This crate loads and saves the persisted key to value files:
//!
//! - [`SeriesStore`] - One series file with its granularity and load rules
//! - [`StoreError`] - Load and save failures, including malformed files
//! - [`strip_trailing_commas`] - Pre-normalization for lenient files
//! - [`default_data_dir`] - Where series files live by default

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tasa-rs/tasa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod dirs;
mod error;
mod store;

pub use codec::{decode, encode, strip_trailing_commas};
pub use dirs::{DATA_DIR_ENV, default_data_dir};
pub use error::{Result, StoreError};
pub use store::SeriesStore;
