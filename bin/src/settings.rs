//! Run settings resolved from global flags and the environment.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tasa_lib::prelude::*;
use tracing::debug;

/// Catalog in use: the built-in one or a user file.
enum Catalog {
    Builtin(&'static SeriesRegistry),
    File(SeriesRegistry),
}

/// Everything a command needs besides its own arguments.
pub(crate) struct Settings {
    catalog: Catalog,
    pub(crate) data_dir: PathBuf,
    pub(crate) today: NaiveDate,
    pub(crate) client: ClientConfig,
}

impl Settings {
    /// Resolves the flags, falling back to `TASA_DATA_DIR`, the platform data
    /// directory and the local date.
    pub(crate) fn resolve(
        data_dir: Option<PathBuf>,
        registry: Option<&Path>,
        today: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let catalog = match registry {
            Some(path) => Catalog::File(
                SeriesRegistry::load_from_path(path)
                    .with_context(|| format!("Invalid series catalog {}", path.display()))?,
            ),
            None => Catalog::Builtin(SeriesRegistry::global()),
        };

        let today = match today {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid run date: {s}"))?,
            None => chrono::Local::now().date_naive(),
        };

        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let client = ClientConfig::default().with_timeout(Duration::from_secs(timeout_secs));
        debug!(data_dir = %data_dir.display(), %today, timeout_secs, "settings resolved");

        Ok(Self {
            catalog,
            data_dir,
            today,
            client,
        })
    }

    /// Returns the series catalog.
    pub(crate) const fn registry(&self) -> &SeriesRegistry {
        match &self.catalog {
            Catalog::Builtin(registry) => *registry,
            Catalog::File(registry) => registry,
        }
    }

    /// Looks up a series, failing with the known ids listed.
    pub(crate) fn series(&self, id: &str) -> Result<&SeriesDef> {
        self.registry().get(id).with_context(|| {
            format!(
                "Unknown series: {id}. Known series: {}",
                self.registry().ids().join(", ")
            )
        })
    }

    /// Returns the store for a series under the data directory.
    pub(crate) fn store(&self, def: &SeriesDef) -> SeriesStore {
        SeriesStore::for_series(def, &self.data_dir)
    }
}
