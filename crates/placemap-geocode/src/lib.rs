//! Address geocoding for placemap
//!
//! Resolves listing addresses via Nominatim with a persistent JSON cache and
//! a global rate limit on external calls.

pub mod cache;
pub mod enrich;
pub mod geocode;
pub mod throttle;
pub mod types;

pub use cache::GeocodeCache;
pub use enrich::{EnrichOutcome, Enricher};
pub use geocode::{Geocoder, NominatimGeocoder};
pub use throttle::RateLimiter;
pub use types::GeocodeError;
