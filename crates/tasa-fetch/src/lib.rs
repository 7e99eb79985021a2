//! Publisher adapters for tasa.
//!
//! - [`HttpClient`] - one GET per call, typed transport errors
//! - [`providers`] - one [`Source`](tasa_types::Source) per publisher
//! - [`build_source`] - picks the adapter a series definition names
//! - [`html`], [`parse`] - tolerant scraping helpers for Argentine formats
//! - [`strategy`] - ordered fallback extraction

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tasa-rs/tasa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod factory;
pub mod html;
pub mod parse;
pub mod providers;
pub mod strategy;
pub mod url;

pub use client::{ClientConfig, HttpClient};
pub use factory::build_source;
