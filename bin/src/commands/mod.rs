//! CLI command implementations.

pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod show;
pub(crate) mod update;
