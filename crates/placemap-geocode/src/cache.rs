//! Address -> coordinates cache persisted as a JSON file.
//!
//! Keys are the raw address strings from the sheet; lookups are exact and
//! case-sensitive, so "1 Bay St" and "1 Bay St " are different entries.

use std::collections::BTreeMap;
use std::path::PathBuf;

use placemap_core::{CacheError, Coordinates};

#[derive(Debug)]
pub struct GeocodeCache {
    cache_path: PathBuf,
    entries: BTreeMap<String, Coordinates>,
}

impl GeocodeCache {
    /// Load the cache file. A missing file is an empty cache; any other read
    /// or parse failure is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache_path = path.into();

        let entries = match std::fs::read_to_string(&cache_path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| CacheError::Parse {
                path: cache_path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No geocode cache at {}, starting empty", cache_path.display());
                BTreeMap::new()
            }
            Err(source) => {
                return Err(CacheError::Read {
                    path: cache_path,
                    source,
                })
            }
        };

        let cache = Self {
            cache_path,
            entries,
        };
        tracing::debug!(
            "Loaded {} cached addresses from {}",
            cache.len(),
            cache.cache_path.display()
        );
        Ok(cache)
    }

    pub fn get(&self, address: &str) -> Option<Coordinates> {
        self.entries.get(address).copied()
    }

    pub fn insert(&mut self, address: impl Into<String>, coordinates: Coordinates) {
        self.entries.insert(address.into(), coordinates);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the whole file with every entry currently held.
    pub fn save(&self) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            path: self.cache_path.clone(),
            source,
        };

        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        // BTreeMap of plain data always serializes
        let json = serde_json::to_string_pretty(&self.entries).unwrap_or_default();
        std::fs::write(&self.cache_path, json).map_err(write_err)?;

        tracing::debug!(
            "Saved {} cached addresses to {}",
            self.len(),
            self.cache_path.display()
        );
        Ok(())
    }
}
