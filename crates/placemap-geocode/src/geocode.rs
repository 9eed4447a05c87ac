//! Forward geocoding: convert a free-text address to coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use std::future::Future;
use std::time::Duration;

use placemap_core::{Coordinates, GeocodeConfig};
use reqwest::Client;

use crate::types::{GeocodeError, NominatimPlace};

/// Address lookup used by the enricher.
///
/// `Ok(None)` means the service answered but knows no such address.
pub trait Geocoder {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        Self::new(
            &config.nominatim_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl Geocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("Geocode returned status {}", response.status());
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let lat = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeError::Parse(format!("lat {:?}: {}", place.lat, e)))?;
        let lng = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeError::Parse(format!("lon {:?}: {}", place.lon, e)))?;

        let coords = Coordinates::new(lat, lng);
        if !coords.is_valid() {
            return Err(GeocodeError::Parse(format!(
                "coordinates out of range: ({}, {})",
                place.lat, place.lon
            )));
        }

        if let Some(display_name) = &place.display_name {
            tracing::debug!("Matched {:?} to {}", address, display_name);
        }

        Ok(Some(coords))
    }
}
