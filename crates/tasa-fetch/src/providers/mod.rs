//! One adapter per publisher.
//!
//! Every adapter implements [`Source`](tasa_types::Source) and reports a
//! single [`Observation`](tasa_types::Observation) per call. Parsing is
//! exposed separately so page fixtures can be tested without a network.

mod bcra_api;
mod bcra_variables;
mod bna_activa;
mod derived;
mod indec_ipc;
mod ripte;
mod smvm;

pub use bcra_api::{BcraApi, parse_latest};
pub use bcra_variables::{BcraVariables, parse_variable};
pub use bna_activa::{ActivaQuote, BnaActiva, parse_activa};
pub use derived::Derived;
pub use indec_ipc::{IndecIpc, parse_ipc};
pub use ripte::{Ripte, parse_ripte};
pub use smvm::{Smvm, parse_smvm};
