//! Series catalog for the tasa reconciler.
//!
//! This crate provides the list of known series with the metadata needed to
//! load, fetch and extend each one: file name, granularity, precision, rate
//! model and publisher.
//!
//! # Example
//!
//! ```
//! use tasa_registry::SeriesRegistry;
//!
//! let registry = SeriesRegistry::global();
//!
//! // Lookup by ID
//! if let Some(def) = registry.get("activa") {
//!     println!("{}: {} ({})", def.id(), def.file(), def.semantics());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tasa-rs/tasa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tasa_types::{Granularity, ModelKind, Semantics, SeriesDef};
use thiserror::Error;

/// The series catalog JSON embedded at compile time.
const SERIES_JSON: &str = include_str!("../data/series.json");

/// Largest precision a series may declare.
pub const MAX_PRECISION: u32 = 10;

/// Global registry instance.
static REGISTRY: OnceLock<SeriesRegistry> = OnceLock::new();

/// Errors raised while loading or validating a catalog.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Failed to read a catalog file.
    #[error("Failed to read catalog file {path}: {source}")]
    ReadFile {
        /// Path to the file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON for the expected schema.
    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two series share an identifier.
    #[error("Duplicate series id '{0}'")]
    DuplicateId(String),

    /// Two series would write the same file.
    #[error("Series '{id}' reuses file '{file}'")]
    DuplicateFile {
        /// The second series using the file.
        id: String,
        /// The shared file name.
        file: String,
    },

    /// Precision outside the supported range.
    #[error("Series '{id}' has precision {precision}, maximum is {MAX_PRECISION}")]
    Precision {
        /// Series identifier.
        id: String,
        /// Declared precision.
        precision: u32,
    },

    /// A rate model that does not fit the series granularity.
    #[error("Series '{id}': model {model} is not valid for {granularity} series")]
    ModelGranularity {
        /// Series identifier.
        id: String,
        /// Declared model.
        model: ModelKind,
        /// Declared granularity.
        granularity: Granularity,
    },

    /// A derived series whose upstream is unusable.
    #[error("Series '{id}': upstream '{upstream}' {reason}")]
    Upstream {
        /// Derived series identifier.
        id: String,
        /// Declared upstream identifier.
        upstream: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Registry of every configured series, in catalog order.
///
/// Catalog order is the update order: a derived series is always listed after
/// its upstream.
#[derive(Debug)]
pub struct SeriesRegistry {
    series: Vec<SeriesDef>,
    index: HashMap<String, usize>,
}

impl SeriesRegistry {
    /// Returns the global registry built from the embedded catalog.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads series from the embedded JSON data.
    fn load() -> Self {
        Self::from_json(SERIES_JSON).expect("Invalid embedded series.json")
    }

    /// Parses and validates a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or the catalog is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let series: Vec<SeriesDef> = serde_json::from_str(json)?;
        Self::from_defs(series)
    }

    /// Reads and validates a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load_from_path(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Builds a registry from definitions, validating them.
    ///
    /// # Errors
    ///
    /// Returns an error if the definitions are inconsistent.
    pub fn from_defs(series: Vec<SeriesDef>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(series.len());
        let mut files = HashSet::with_capacity(series.len());

        for (position, def) in series.iter().enumerate() {
            validate(def)?;

            if let Some(upstream) = def.source().upstream() {
                let Some(&up) = index.get(&upstream.to_lowercase()) else {
                    return Err(RegistryError::Upstream {
                        id: def.id().to_string(),
                        upstream: upstream.to_string(),
                        reason: "must be defined before the series derived from it",
                    });
                };
                let up_def: &SeriesDef = &series[up];
                if up_def.source().upstream().is_some() {
                    return Err(RegistryError::Upstream {
                        id: def.id().to_string(),
                        upstream: upstream.to_string(),
                        reason: "is itself derived",
                    });
                }
                if up_def.granularity() != def.granularity() {
                    return Err(RegistryError::Upstream {
                        id: def.id().to_string(),
                        upstream: upstream.to_string(),
                        reason: "has a different granularity",
                    });
                }
            }

            if !files.insert(def.file().to_string()) {
                return Err(RegistryError::DuplicateFile {
                    id: def.id().to_string(),
                    file: def.file().to_string(),
                });
            }
            if index.insert(def.id().to_lowercase(), position).is_some() {
                return Err(RegistryError::DuplicateId(def.id().to_string()));
            }
        }

        Ok(Self { series, index })
    }

    /// Looks up a series by ID (case-insensitive).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SeriesDef> {
        self.index.get(&id.to_lowercase()).map(|&i| &self.series[i])
    }

    /// Returns all series in catalog order.
    pub fn all(&self) -> impl Iterator<Item = &SeriesDef> {
        self.series.iter()
    }

    /// Returns the total number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Returns all series IDs in catalog order.
    pub fn ids(&self) -> Vec<&str> {
        self.series.iter().map(SeriesDef::id).collect()
    }

    /// Returns the series that copy from `id`.
    pub fn dependents<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a SeriesDef> + 'a {
        self.series
            .iter()
            .filter(move |def| def.source().upstream() == Some(id))
    }

    /// Sorts the given IDs into catalog order, dropping duplicates.
    ///
    /// # Errors
    ///
    /// Returns every unknown ID so callers can report them all at once.
    pub fn ordered<'a, I>(&self, ids: I) -> Result<Vec<&SeriesDef>, Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions = Vec::new();
        let mut unknown = Vec::new();
        for id in ids {
            match self.index.get(&id.to_lowercase()) {
                Some(&position) => positions.push(position),
                None => unknown.push(id.to_string()),
            }
        }
        if !unknown.is_empty() {
            return Err(unknown);
        }
        positions.sort_unstable();
        positions.dedup();
        Ok(positions.into_iter().map(|i| &self.series[i]).collect())
    }
}

fn validate(def: &SeriesDef) -> Result<(), RegistryError> {
    if def.precision() > MAX_PRECISION {
        return Err(RegistryError::Precision {
            id: def.id().to_string(),
            precision: def.precision(),
        });
    }
    if let Semantics::Rate { model } = def.semantics() {
        let valid = match model {
            ModelKind::PercentStepChain => def.granularity() == Granularity::Monthly,
            ModelKind::CompoundDaily => def.granularity() == Granularity::Daily,
            ModelKind::CompoundPeriodic { period_days } => period_days > 0,
            ModelKind::DirectCopy => true,
        };
        if !valid {
            return Err(RegistryError::ModelGranularity {
                id: def.id().to_string(),
                model,
                granularity: def.granularity(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasa_types::{GapFill, SourceDef};

    fn level(id: &str, source: SourceDef) -> SeriesDef {
        SeriesDef::new(
            id,
            format!("{id}.json"),
            Granularity::Monthly,
            2,
            Semantics::Level,
            source,
        )
    }

    fn derived(id: &str, upstream: &str) -> SeriesDef {
        level(
            id,
            SourceDef::Derived {
                upstream: upstream.to_string(),
                months: 1,
            },
        )
        .with_gap_fill(GapFill::Carry)
    }

    #[test]
    fn test_registry_loads() {
        let registry = SeriesRegistry::global();
        assert_eq!(registry.len(), 9);
        assert_eq!(
            registry.ids(),
            [
                "cer",
                "activa",
                "pasiva",
                "inflacion",
                "inflacion_esperada",
                "ripte",
                "ripte1",
                "ripte2",
                "smvm"
            ]
        );
    }

    #[test]
    fn test_get_activa() {
        let registry = SeriesRegistry::global();
        let activa = registry.get("activa").expect("activa should exist");
        assert_eq!(activa.file(), "activa.json");
        assert_eq!(activa.precision(), 6);
        assert!(activa.is_rate());
        assert!(activa.is_lenient());
        assert!(!activa.allows_bootstrap());
    }

    #[test]
    fn test_get_case_insensitive() {
        let registry = SeriesRegistry::global();
        assert!(registry.get("CER").is_some());
        assert!(registry.get("Ripte1").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_dependents() {
        let registry = SeriesRegistry::global();
        let ids: Vec<_> = registry.dependents("ripte").map(SeriesDef::id).collect();
        assert_eq!(ids, ["ripte1", "ripte2"]);
    }

    #[test]
    fn test_ordered_follows_catalog() {
        let registry = SeriesRegistry::global();
        let ordered = registry.ordered(["ripte2", "ripte", "cer", "ripte"]).unwrap();
        let ids: Vec<_> = ordered.iter().map(|d| d.id()).collect();
        assert_eq!(ids, ["cer", "ripte", "ripte2"]);

        let unknown = registry.ordered(["cer", "uva", "badlar"]).unwrap_err();
        assert_eq!(unknown, ["uva", "badlar"]);
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let other = SeriesDef::new(
            "SMVM",
            "smvm_copy.json",
            Granularity::Monthly,
            2,
            Semantics::Level,
            SourceDef::Smvm,
        );
        let err = SeriesRegistry::from_defs(vec![level("smvm", SourceDef::Smvm), other]);
        assert!(matches!(err, Err(RegistryError::DuplicateId(id)) if id == "SMVM"));
    }

    #[test]
    fn test_rejects_duplicate_file() {
        let err = SeriesRegistry::from_defs(vec![
            level("smvm", SourceDef::Smvm),
            level("smvm", SourceDef::Smvm).with_name("again"),
        ]);
        assert!(matches!(err, Err(RegistryError::DuplicateFile { .. })));
    }

    #[test]
    fn test_rejects_upstream_defined_later() {
        let err = SeriesRegistry::from_defs(vec![
            derived("ripte1", "ripte"),
            level("ripte", SourceDef::Ripte),
        ]);
        assert!(matches!(err, Err(RegistryError::Upstream { .. })));
    }

    #[test]
    fn test_rejects_chained_derivation() {
        let err = SeriesRegistry::from_defs(vec![
            level("ripte", SourceDef::Ripte),
            derived("ripte1", "ripte"),
            derived("ripte2", "ripte1"),
        ]);
        assert!(matches!(
            err,
            Err(RegistryError::Upstream {
                reason: "is itself derived",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_daily_step_chain() {
        let def = SeriesDef::new(
            "x",
            "x.json",
            Granularity::Daily,
            4,
            Semantics::Rate {
                model: ModelKind::PercentStepChain,
            },
            SourceDef::IndecIpc,
        );
        assert!(matches!(
            SeriesRegistry::from_defs(vec![def]),
            Err(RegistryError::ModelGranularity { .. })
        ));
    }

    #[test]
    fn test_rejects_precision() {
        let json = r#"[{
            "id": "x", "name": "x", "file": "x.json", "granularity": "daily",
            "precision": 12, "semantics": { "kind": "level" },
            "source": { "provider": "smvm" }
        }]"#;
        assert!(matches!(
            SeriesRegistry::from_json(json),
            Err(RegistryError::Precision { precision: 12, .. })
        ));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.json");
        std::fs::write(&path, SERIES_JSON).unwrap();

        let registry = SeriesRegistry::load_from_path(&path).unwrap();
        assert_eq!(registry.len(), SeriesRegistry::global().len());

        let missing = SeriesRegistry::load_from_path(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(RegistryError::ReadFile { .. })));
    }
}
