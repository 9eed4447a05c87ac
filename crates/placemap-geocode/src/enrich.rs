//! Attach coordinates to listings, cache first, network second.

use std::time::Duration;

use placemap_core::{CacheError, Listing};

use crate::cache::GeocodeCache;
use crate::geocode::Geocoder;
use crate::throttle::RateLimiter;

/// Result of one enrichment pass.
#[derive(Debug, Clone, Default)]
pub struct EnrichOutcome {
    /// Listings that ended up with coordinates, in input order.
    pub listings: Vec<Listing>,
    pub cache_hits: usize,
    /// External lookups issued, successful or not.
    pub lookups: usize,
    pub dropped: usize,
}

pub struct Enricher<G> {
    geocoder: G,
    cache: GeocodeCache,
    limiter: RateLimiter,
}

impl<G: Geocoder> Enricher<G> {
    pub fn new(geocoder: G, cache: GeocodeCache, min_interval: Duration) -> Self {
        Self {
            geocoder,
            cache,
            limiter: RateLimiter::new(min_interval),
        }
    }

    /// Resolve every listing, persist the cache, and drop whatever stayed
    /// unresolved. Geocoder failures never abort the pass; only a cache
    /// write failure does.
    #[tracing::instrument(skip_all, fields(count = listings.len()))]
    pub async fn enrich(&mut self, mut listings: Vec<Listing>) -> Result<EnrichOutcome, CacheError> {
        let mut cache_hits = 0;
        let mut lookups = 0;

        for listing in &mut listings {
            if let Some(coords) = self.cache.get(&listing.address) {
                tracing::debug!("Cache hit: {} ({})", listing.name, listing.address);
                listing.coordinates = Some(coords);
                cache_hits += 1;
                continue;
            }

            self.limiter.wait().await;
            lookups += 1;

            match self.geocoder.geocode(&listing.address).await {
                Ok(Some(coords)) if !coords.is_valid() => {
                    tracing::warn!(
                        "Ignoring invalid coordinates for {}: ({}, {})",
                        listing.address,
                        coords.lat,
                        coords.lng
                    );
                }
                Ok(Some(coords)) => {
                    tracing::info!(
                        "Geocoded: {} -> ({:.5}, {:.5})",
                        listing.name,
                        coords.lat,
                        coords.lng
                    );
                    listing.coordinates = Some(coords);
                    self.cache.insert(listing.address.clone(), coords);
                }
                Ok(None) => {
                    tracing::warn!(
                        "Could not geocode: {} ({})",
                        listing.name,
                        listing.address
                    );
                }
                Err(e) => {
                    tracing::error!("Geocoding error for {}: {}", listing.address, e);
                }
            }
        }

        self.cache.save()?;

        let before = listings.len();
        listings.retain(Listing::is_located);
        let dropped = before - listings.len();
        if dropped > 0 {
            tracing::warn!("Dropped {} listings without coordinates", dropped);
        }

        Ok(EnrichOutcome {
            listings,
            cache_hits,
            lookups,
            dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::GeocodeError;
    use placemap_core::Coordinates;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    /// Answers from a fixed table; "boom" addresses fail with a status error.
    /// Every call records its start time.
    #[derive(Clone, Default)]
    struct FakeGeocoder {
        known: HashMap<String, Coordinates>,
        starts: Arc<Mutex<Vec<Instant>>>,
    }

    impl FakeGeocoder {
        fn with(mut self, address: &str, lat: f64, lng: f64) -> Self {
            self.known.insert(address.to_string(), Coordinates::new(lat, lng));
            self
        }

        fn calls(&self) -> usize {
            self.starts.lock().unwrap().len()
        }

        fn starts(&self) -> Vec<Instant> {
            self.starts.lock().unwrap().clone()
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.starts.lock().unwrap().push(Instant::now());
            if address.starts_with("boom") {
                return Err(GeocodeError::Status(500));
            }
            Ok(self.known.get(address).copied())
        }
    }

    fn listing(name: &str, address: &str) -> Listing {
        Listing::new(name, "Restaurant", None, address, None)
    }

    fn enricher(
        geocoder: FakeGeocoder,
        dir: &tempfile::TempDir,
    ) -> Enricher<FakeGeocoder> {
        let cache = GeocodeCache::load(dir.path().join("geocode_cache.json")).unwrap();
        Enricher::new(geocoder, cache, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_duplicate_address_geocoded_once() {
        let dir = tempfile::tempdir().unwrap();
        let geocoder = FakeGeocoder::default().with("1 Bay St", 32.080_123_4, -81.091_567_8);
        let mut enricher = enricher(geocoder.clone(), &dir);

        let outcome = enricher
            .enrich(vec![listing("Pier 1", "1 Bay St"), listing("Pier 1 Annex", "1 Bay St")])
            .await
            .unwrap();

        assert_eq!(geocoder.calls(), 1);
        assert_eq!(outcome.lookups, 1);
        assert_eq!(outcome.cache_hits, 1);
        let a = outcome.listings[0].coordinates.unwrap();
        let b = outcome.listings[1].coordinates.unwrap();
        assert_eq!(a.lat.to_bits(), b.lat.to_bits());
        assert_eq!(a.lng.to_bits(), b.lng.to_bits());
    }

    #[tokio::test]
    async fn test_unresolved_and_failed_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let geocoder = FakeGeocoder::default().with("1 Bay St", 32.08, -81.09);
        let mut enricher = enricher(geocoder.clone(), &dir);

        let outcome = enricher
            .enrich(vec![
                listing("Nowhere", "0 Void Ln"),
                listing("Pier 1", "1 Bay St"),
                listing("Broken", "boom 5 St"),
            ])
            .await
            .unwrap();

        assert_eq!(geocoder.calls(), 3);
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.listings.len(), 1);
        assert_eq!(outcome.listings[0].name, "Pier 1");
        let saved = GeocodeCache::load(dir.path().join("geocode_cache.json")).unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved.get("0 Void Ln").is_none());
        assert!(saved.get("boom 5 St").is_none());
    }

    #[tokio::test]
    async fn test_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let geocoder = FakeGeocoder::default()
            .with("a", 1.0, 1.0)
            .with("b", 2.0, 2.0)
            .with("c", 3.0, 3.0);
        let mut enricher = enricher(geocoder, &dir);

        let outcome = enricher
            .enrich(vec![listing("C", "c"), listing("A", "a"), listing("B", "b")])
            .await
            .unwrap();

        let names: Vec<_> = outcome.listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_cache_persists_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let geocoder = FakeGeocoder::default().with("1 Bay St", 32.08, -81.09);

        let mut first = enricher(geocoder.clone(), &dir);
        let run1 = first.enrich(vec![listing("Pier 1", "1 Bay St")]).await.unwrap();
        assert_eq!(geocoder.calls(), 1);

        let mut second = enricher(geocoder.clone(), &dir);
        let run2 = second.enrich(vec![listing("Pier 1", "1 Bay St")]).await.unwrap();

        assert_eq!(geocoder.calls(), 1);
        assert_eq!(run2.cache_hits, 1);
        assert_eq!(run2.lookups, 0);
        assert_eq!(
            run1.listings[0].coordinates.unwrap().lat.to_bits(),
            run2.listings[0].coordinates.unwrap().lat.to_bits()
        );
    }

    #[tokio::test]
    async fn test_external_calls_respect_interval() {
        let dir = tempfile::tempdir().unwrap();
        let geocoder = FakeGeocoder::default()
            .with("a", 1.0, 1.0)
            .with("b", 2.0, 2.0)
            .with("c", 3.0, 3.0);
        let cache = GeocodeCache::load(dir.path().join("c.json")).unwrap();
        let interval = Duration::from_millis(40);
        let mut enricher = Enricher::new(geocoder.clone(), cache, interval);

        enricher
            .enrich(vec![
                listing("A", "a"),
                listing("B", "b"),
                listing("A2", "a"),
                listing("C", "c"),
            ])
            .await
            .unwrap();

        // the cache hit for "a" issues no call
        let starts = geocoder.starts();
        assert_eq!(starts.len(), 3);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= interval, "gap {:?}", pair[1] - pair[0]);
        }
    }

    #[tokio::test]
    async fn test_invalid_coordinates_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let geocoder = FakeGeocoder::default()
            .with("1 Bay St", f64::NAN, f64::INFINITY)
            .with("2 Bay St", 32.08, -81.09);
        let mut enricher = enricher(geocoder, &dir);

        let outcome = enricher
            .enrich(vec![listing("Bad", "1 Bay St"), listing("Good", "2 Bay St")])
            .await
            .unwrap();

        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.listings[0].name, "Good");

        let saved = GeocodeCache::load(dir.path().join("geocode_cache.json")).unwrap();
        assert!(saved.get("1 Bay St").is_none());
        assert_eq!(saved.get("2 Bay St"), Some(Coordinates::new(32.08, -81.09)));
    }

    #[tokio::test]
    async fn test_cache_written_even_when_nothing_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let mut enricher = enricher(FakeGeocoder::default(), &dir);

        let outcome = enricher.enrich(vec![listing("X", "nowhere")]).await.unwrap();

        assert!(outcome.listings.is_empty());
        assert!(dir.path().join("geocode_cache.json").exists());
    }
}
