//! Static outputs for placemap: a Leaflet web page and a KML document.
//!
//! Both renderers take the enriched listings in input order. Listings that
//! somehow reach a renderer without coordinates are skipped.

pub mod error;
pub mod html;
pub mod kml;

pub use error::RenderError;
pub use html::render_html;
pub use kml::render_kml;

/// Google Maps search link for an address.
pub fn maps_link(address: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        urlencoding::encode(address)
    )
}
