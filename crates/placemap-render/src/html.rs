//! Interactive Leaflet page.

use serde::Serialize;

use placemap_core::{Categories, Category, Listing, OutputConfig};

use crate::error::RenderError;
use crate::maps_link;

const TEMPLATE: &str = include_str!("templates/map.html");

/// Per-marker data embedded in the page script.
#[derive(Debug, Serialize)]
struct MarkerData<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_text: &'a str,
    category: Category,
    summary: Option<&'a str>,
    address: &'a str,
    photo_url: Option<&'a str>,
    maps_url: String,
    lat: f64,
    lng: f64,
}

/// Category entry for the legend and marker styling, in fixed order.
#[derive(Debug, Serialize)]
struct CategoryData<'a> {
    key: &'static str,
    label: &'a str,
    color: &'a str,
    icon: &'a str,
    count: usize,
}

#[derive(Debug, Serialize)]
struct DefaultView {
    center: [f64; 2],
    zoom: u8,
}

/// Render the full HTML document.
pub fn render_html(
    listings: &[Listing],
    categories: &Categories,
    output: &OutputConfig,
) -> Result<String, RenderError> {
    let markers: Vec<MarkerData<'_>> = listings
        .iter()
        .filter_map(|listing| {
            let coords = listing.coordinates?;
            Some(MarkerData {
                name: &listing.name,
                type_text: &listing.type_text,
                category: listing.category,
                summary: listing.summary.as_deref(),
                address: &listing.address,
                photo_url: listing.photo_url.as_deref(),
                maps_url: maps_link(&listing.address),
                lat: coords.lat,
                lng: coords.lng,
            })
        })
        .collect();

    let category_data: Vec<CategoryData<'_>> = categories
        .iter()
        .map(|(category, style)| CategoryData {
            key: category.key(),
            label: &style.label,
            color: &style.color,
            icon: &style.icon,
            count: markers.iter().filter(|m| m.category == category).count(),
        })
        .collect();

    let view = DefaultView {
        center: output.default_center,
        zoom: output.default_zoom,
    };

    let title = quick_xml::escape::escape(output.title.as_str());
    let listings_json = script_json(&markers)?;
    let categories_json = script_json(&category_data)?;
    let legend_title = script_json(&output.title)?;
    let default_view = script_json(&view)?;

    tracing::debug!("Rendering {} markers to HTML", markers.len());

    Ok(fill(
        TEMPLATE,
        &[
            ("{{title}}", title.as_ref()),
            ("{{listings}}", listings_json.as_str()),
            ("{{categories}}", categories_json.as_str()),
            ("{{legend_title}}", legend_title.as_str()),
            ("{{default_view}}", default_view.as_str()),
        ],
    ))
}

/// JSON that is safe to place inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(value)?.replace("</", "<\\/"))
}

/// Substitute placeholders in a single left-to-right pass, so substituted
/// text is never scanned for further placeholders.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(*key).map(|pos| (pos, *key, *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, key, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
