//! The two spreadsheet read paths the pipeline depends on.

use std::future::Future;

use crate::client::SheetsClient;
use crate::error::SheetsError;
use crate::image::{image_urls_from_column, ImageUrls};
use crate::types::{Row, ValueRenderOption};

/// Plain cell values, one `Row` per sheet row, header included.
pub trait RowSource {
    fn fetch_rows(&self) -> impl Future<Output = Result<Vec<Row>, SheetsError>> + Send;
}

/// Image URLs for the first `data_rows` rows after the header, keyed by
/// data-row index. Rows without an image are absent from the map.
pub trait ImageSource {
    fn image_urls(
        &self,
        data_rows: usize,
    ) -> impl Future<Output = Result<ImageUrls, SheetsError>> + Send;
}

/// Reads one worksheet through the Sheets values API.
pub struct SheetsReader {
    client: SheetsClient,
    spreadsheet_id: String,
    sheet_name: String,
    image_column: String,
}

impl SheetsReader {
    pub fn new(
        client: SheetsClient,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        image_column: impl Into<String>,
    ) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            image_column: image_column.into(),
        }
    }

    /// Sheet name quoted for A1 notation.
    fn quoted_sheet(&self) -> String {
        format!("'{}'", self.sheet_name.replace('\'', "''"))
    }

    fn image_range(&self, data_rows: usize) -> String {
        format!(
            "{}!{col}2:{col}{last}",
            self.quoted_sheet(),
            col = self.image_column,
            last = data_rows + 1,
        )
    }
}

impl RowSource for SheetsReader {
    async fn fetch_rows(&self) -> Result<Vec<Row>, SheetsError> {
        let range = self
            .client
            .get_values(
                &self.spreadsheet_id,
                &self.quoted_sheet(),
                ValueRenderOption::FormattedValue,
            )
            .await?;

        let rows = range.into_rows();
        tracing::info!("Read {} rows from '{}'", rows.len(), self.sheet_name);
        Ok(rows)
    }
}

impl ImageSource for SheetsReader {
    async fn image_urls(&self, data_rows: usize) -> Result<ImageUrls, SheetsError> {
        if data_rows == 0 {
            return Ok(ImageUrls::new());
        }

        let range = self
            .client
            .get_values(
                &self.spreadsheet_id,
                &self.image_range(data_rows),
                ValueRenderOption::Formula,
            )
            .await?;

        let urls = image_urls_from_column(&range.into_rows());
        tracing::debug!("Found {} image formulas in column {}", urls.len(), self.image_column);
        Ok(urls)
    }
}
