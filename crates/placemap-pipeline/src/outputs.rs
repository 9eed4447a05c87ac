use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

use placemap_core::{Listing, OutputConfig};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Data rows read, header excluded
    pub rows_read: usize,
    /// Rows rejected by the location, name or address checks
    pub skipped: usize,
    pub accepted: usize,
    pub cache_hits: usize,
    /// External geocoder calls
    pub lookups: usize,
    /// Listings that could not be geocoded
    pub dropped: usize,
    pub emitted: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} skipped, {} accepted ({} cached, {} looked up), {} dropped, {} on the map",
            self.rows_read,
            self.skipped,
            self.accepted,
            self.cache_hits,
            self.lookups,
            self.dropped,
            self.emitted
        )
    }
}

/// Everything a run produced, ready to be written.
#[derive(Debug, Clone)]
pub struct RenderedOutputs {
    /// Listings on the map, in sheet order
    pub listings: Vec<Listing>,
    pub html: String,
    pub kml: String,
    pub report: RunReport,
}

impl RenderedOutputs {
    /// Write the map page and the KML document to their configured paths.
    pub fn write(&self, output: &OutputConfig) -> Result<()> {
        write_file(&output.html_path, &self.html)?;
        tracing::info!(
            "Generated {} with {} markers",
            output.html_path.display(),
            self.listings.len()
        );

        write_file(&output.kml_path, &self.kml)?;
        tracing::info!(
            "Generated {} with {} placemarks",
            output.kml_path.display(),
            self.listings.len()
        );

        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))
}
