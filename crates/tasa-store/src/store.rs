//! Load and save of one persisted series.

use std::borrow::Cow;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tasa_types::{Granularity, PeriodKey, SeriesDef, TimeSeries};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::codec::{decode, encode, strip_trailing_commas};
use crate::{Result, StoreError};

/// A single series file and the rules for reading it.
///
/// The store holds no data itself: [`load`](Self::load) returns an owned
/// [`TimeSeries`] and [`save`](Self::save) overwrites the file with one.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    path: PathBuf,
    granularity: Granularity,
    lenient: bool,
    bootstrap: bool,
}

impl SeriesStore {
    /// Creates a store for the file at `path`.
    ///
    /// The store is strict and refuses to start from a missing file until
    /// configured otherwise.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, granularity: Granularity) -> Self {
        Self {
            path: path.into(),
            granularity,
            lenient: false,
            bootstrap: false,
        }
    }

    /// Creates the store for a catalog series inside `data_dir`.
    #[must_use]
    pub fn for_series(def: &SeriesDef, data_dir: &Path) -> Self {
        Self::new(data_dir.join(def.file()), def.granularity())
            .with_lenient(def.is_lenient())
            .with_bootstrap(def.allows_bootstrap())
    }

    /// Tolerates trailing commas when loading.
    #[must_use]
    pub const fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Treats a missing file as an empty series.
    #[must_use]
    pub const fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the key granularity.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Returns true if the series file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the series from disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for a missing file when bootstrapping
    /// is off, [`StoreError::ReadFile`] on I/O failure, and
    /// [`StoreError::Malformed`] when the contents are not a valid series.
    pub fn load(&self) -> Result<TimeSeries> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.bootstrap {
                    info!(path = %self.path.display(), "series file missing, starting empty");
                    return Ok(TimeSeries::new());
                }
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(StoreError::ReadFile {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let text = if self.lenient {
            let stripped = strip_trailing_commas(&text);
            if stripped.len() != text.len() {
                debug!(
                    path = %self.path.display(),
                    removed = text.len() - stripped.len(),
                    "stripped trailing commas"
                );
            }
            stripped
        } else {
            Cow::Borrowed(text.as_str())
        };

        let series = decode(&text, self.granularity, &self.path)?;
        debug!(
            path = %self.path.display(),
            entries = series.len(),
            latest = ?series.latest().map(|(k, _)| k.to_string()),
            "loaded series"
        );
        Ok(series)
    }

    /// Overwrites the file with `series`.
    ///
    /// The contents are written to a temporary file in the same directory
    /// and renamed into place, so readers never see a partial file.
    ///
    /// # Errors
    ///
    /// Returns an error if the series cannot be encoded or written.
    pub fn save(&self, series: &TimeSeries) -> Result<()> {
        let text = encode(series, &self.path)?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let write_err = |source: std::io::Error| StoreError::WriteFile {
            path: self.path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), entries = series.len(), "saved series");
        Ok(())
    }

    /// Returns the chronologically latest entry of `series`.
    #[must_use]
    pub fn latest(series: &TimeSeries) -> Option<(PeriodKey, f64)> {
        series.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasa_types::{GapFill, Semantics, SourceDef};
    use tempfile::TempDir;

    fn day(s: &str) -> PeriodKey {
        PeriodKey::parse(s, Granularity::Daily).unwrap()
    }

    #[test]
    fn test_missing_file_bootstrap() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(temp_dir.path().join("cer.json"), Granularity::Daily)
            .with_bootstrap(true);

        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_strict() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(temp_dir.path().join("smvm.json"), Granularity::Monthly);

        assert!(matches!(store.load(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(temp_dir.path().join("activa.json"), Granularity::Daily);

        let mut series = TimeSeries::new();
        series.insert(day("2025-07-19"), 100.1);
        series.insert(day("2025-07-18"), 100.0);
        store.save(&series).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "{\n  \"2025-07-18\": 100.0,\n  \"2025-07-19\": 100.1\n}\n");

        let loaded = store.load().unwrap();
        assert_eq!(loaded, series);
        assert_eq!(SeriesStore::latest(&loaded), Some((day("2025-07-19"), 100.1)));
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(
            temp_dir.path().join("indices").join("ripte.json"),
            Granularity::Monthly,
        );

        store.save(&TimeSeries::new()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_save_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(temp_dir.path().join("cer.json"), Granularity::Daily);
        let series: TimeSeries = [(day("2025-07-19"), 607.6799)].into_iter().collect();

        store.save(&series).unwrap();
        let first = fs::read(store.path()).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_lenient_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("activa.json");
        fs::write(&path, "{\n  \"2025-07-18\": 100.0,\n  \"2025-07-19\": 100.1,\n}\n").unwrap();

        let strict = SeriesStore::new(&path, Granularity::Daily);
        assert!(matches!(strict.load(), Err(StoreError::Malformed { .. })));

        let lenient = strict.with_lenient(true);
        assert_eq!(lenient.load().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inflacion.json");
        fs::write(&path, "{\"jul-25\": null}").unwrap();

        let err = SeriesStore::new(&path, Granularity::Monthly)
            .load()
            .unwrap_err();
        assert!(err.is_load());
        assert!(err.to_string().contains("inflacion.json"));
        assert!(err.to_string().contains("jul-25"));
    }

    #[test]
    fn test_for_series() {
        let temp_dir = TempDir::new().unwrap();
        let def = SeriesDef::new(
            "ripte1",
            "ripte1.json",
            Granularity::Monthly,
            2,
            Semantics::Level,
            SourceDef::Derived {
                upstream: "ripte".to_string(),
                months: 1,
            },
        )
        .with_gap_fill(GapFill::Carry);

        let store = SeriesStore::for_series(&def, temp_dir.path());
        assert_eq!(store.path(), temp_dir.path().join("ripte1.json"));
        assert_eq!(store.granularity(), Granularity::Monthly);
        assert!(store.load().unwrap().is_empty());
    }
}
