use anyhow::{Context, Result};

use placemap_core::{ColumnsConfig, Config, FilterConfig, Listing};
use placemap_geocode::{Enricher, Geocoder};
use placemap_render::{render_html, render_kml};
use placemap_sheets::{ImageSource, ImageUrls, Row, RowSource};

use crate::outputs::{RenderedOutputs, RunReport};
use crate::schema::SheetRow;

/// One run: read the sheet, keep matching rows, geocode, render.
pub struct Pipeline<S, G> {
    source: S,
    enricher: Enricher<G>,
    config: Config,
}

impl<S, G> Pipeline<S, G>
where
    S: RowSource + ImageSource,
    G: Geocoder,
{
    pub fn new(source: S, enricher: Enricher<G>, config: Config) -> Self {
        Self {
            source,
            enricher,
            config,
        }
    }

    pub async fn run(&mut self) -> Result<RenderedOutputs> {
        let rows = self
            .source
            .fetch_rows()
            .await
            .context("Failed to read spreadsheet rows")?;

        // first row is the header
        let data_rows = rows.get(1..).unwrap_or_default();

        let images = self
            .source
            .image_urls(data_rows.len())
            .await
            .context("Failed to read image formulas")?;

        let listings = collect_listings(
            data_rows,
            self.config.sheet.columns,
            &self.config.filter,
            &images,
        );
        tracing::info!("Fetched {} listings from sheet", listings.len());

        let accepted = listings.len();
        let outcome = self
            .enricher
            .enrich(listings)
            .await
            .context("Failed to save geocode cache")?;

        let html = render_html(&outcome.listings, &self.config.categories, &self.config.output)
            .context("Failed to render map page")?;
        let kml = render_kml(
            &outcome.listings,
            &self.config.categories,
            &self.config.output.kml_document_name,
        )
        .context("Failed to render KML")?;

        let report = RunReport {
            rows_read: data_rows.len(),
            skipped: data_rows.len() - accepted,
            accepted,
            cache_hits: outcome.cache_hits,
            lookups: outcome.lookups,
            dropped: outcome.dropped,
            emitted: outcome.listings.len(),
        };
        tracing::info!("{}", report);

        Ok(RenderedOutputs {
            listings: outcome.listings,
            html,
            kml,
            report,
        })
    }
}

/// Turn data rows into listings, in sheet order.
///
/// `images` is keyed by data-row position, so indices are taken before any
/// row is filtered out.
pub fn collect_listings(
    data_rows: &[Row],
    columns: ColumnsConfig,
    filter: &FilterConfig,
    images: &ImageUrls,
) -> Vec<Listing> {
    data_rows
        .iter()
        .enumerate()
        .map(|(index, cells)| (index, SheetRow::new(cells, columns)))
        .filter(|(_, row)| row.is_accepted(filter))
        .map(|(index, row)| row.to_listing(images.get(&index).cloned()))
        .collect()
}
