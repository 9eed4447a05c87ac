//! Listing records as they move through a run.

use serde::{Deserialize, Serialize};

use crate::category::{classify, Category};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within WGS84 bounds. JSON has no NaN or infinity, so only
    /// valid pairs can round-trip through the cache file.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// One accepted spreadsheet row.
///
/// `category` is always derived from `type_text` by [`Listing::new`]; the
/// coordinates stay `None` until geocoding succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub name: String,
    pub type_text: String,
    pub category: Category,
    pub summary: Option<String>,
    pub address: String,
    pub photo_url: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Listing {
    pub fn new(
        name: impl Into<String>,
        type_text: impl Into<String>,
        summary: Option<String>,
        address: impl Into<String>,
        photo_url: Option<String>,
    ) -> Self {
        let type_text = type_text.into();
        Self {
            name: name.into(),
            category: classify(&type_text),
            type_text,
            summary: summary.filter(|s| !s.is_empty()),
            address: address.into(),
            photo_url: photo_url.filter(|s| !s.is_empty()),
            coordinates: None,
        }
    }

    pub fn is_located(&self) -> bool {
        self.coordinates.is_some()
    }
}
