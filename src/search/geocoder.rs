use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;

use crate::core::geo::LngLat;
use crate::search::SearchResult;
use crate::token::AccessToken;
use crate::{MapError, Result};

/// Forward-geocoding endpoint of the vector map backend. The token probe in
/// [`crate::token`] reuses it.
pub(crate) const PLACES_ENDPOINT: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Shared async HTTP client with a custom User-Agent. Building the client
/// once avoids the cost of TLS and connection pool setup for every request.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("washmap/0.1 (+https://github.com/example/washmap)")
        .build()
        .expect("failed to build reqwest client")
});

/// Remote text-to-coordinate resolution.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `query` to at most `limit` candidate places.
    async fn forward(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    features: Vec<PlaceFeature>,
}

#[derive(Debug, Deserialize)]
struct PlaceFeature {
    place_name: String,
    center: LngLat,
}

/// Geocoder backed by the vector backend's places API.
pub struct ForwardGeocoder {
    endpoint: String,
    token: AccessToken,
}

impl ForwardGeocoder {
    pub fn new(token: AccessToken) -> Self {
        Self {
            endpoint: PLACES_ENDPOINT.to_string(),
            token,
        }
    }

    /// Points the geocoder at a different places endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>, token: AccessToken) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
        }
    }

    fn request_url(&self, query: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| MapError::Geocode(format!("bad endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| MapError::Geocode("endpoint cannot take a path".to_string()))?
            .push(&format!("{}.json", query));
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for ForwardGeocoder {
    async fn forward(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let url = self.request_url(query)?;
        let response = HTTP_CLIENT
            .get(url)
            .query(&[
                ("access_token", self.token.as_str()),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MapError::Geocode(format!("HTTP {}", response.status())));
        }

        let body: PlacesResponse = response.json().await?;
        Ok(body
            .features
            .into_iter()
            .map(|feature| SearchResult {
                label: feature.place_name,
                coords: feature.center,
            })
            .collect())
    }
}

/// Canned geocoder for demos and tests: fixed result list, optional failure,
/// call counting.
pub struct StaticGeocoder {
    results: Vec<SearchResult>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call reports a geocoding failure.
    pub fn failing() -> Self {
        Self {
            results: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many forward calls reached this backend.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn forward(&self, _query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(MapError::Geocode("simulated backend failure".to_string()));
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}
