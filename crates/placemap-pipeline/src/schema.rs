//! Named access to the cells of one sheet row.

use placemap_core::{ColumnsConfig, FilterConfig, Listing};

/// A data row viewed through the configured column positions.
///
/// Sheets omits trailing empty cells, so any column past the end of the row
/// reads as the empty string.
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    cells: &'a [String],
    columns: ColumnsConfig,
}

impl<'a> SheetRow<'a> {
    pub fn new(cells: &'a [String], columns: ColumnsConfig) -> Self {
        Self { cells, columns }
    }

    fn cell(&self, index: usize) -> &'a str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn name(&self) -> &'a str {
        self.cell(self.columns.name)
    }

    pub fn location(&self) -> &'a str {
        self.cell(self.columns.location)
    }

    pub fn type_text(&self) -> &'a str {
        self.cell(self.columns.type_text)
    }

    pub fn summary(&self) -> &'a str {
        self.cell(self.columns.summary)
    }

    pub fn address(&self) -> &'a str {
        self.cell(self.columns.address)
    }

    /// Location contains the marker (ignoring case) and both name and
    /// address have content.
    pub fn is_accepted(&self, filter: &FilterConfig) -> bool {
        let marker = filter.location_marker.to_lowercase();
        self.location().to_lowercase().contains(&marker)
            && !self.name().trim().is_empty()
            && !self.address().trim().is_empty()
    }

    /// Build the listing for this row. Cell text is kept verbatim, since the
    /// address is also the geocode cache key.
    pub fn to_listing(&self, photo_url: Option<String>) -> Listing {
        Listing::new(
            self.name(),
            self.type_text(),
            Some(self.summary().to_string()),
            self.address(),
            photo_url,
        )
    }
}
