//! Free-text place lookup, independent of which map engine is active.

pub mod debounce;
pub mod geocoder;

pub use debounce::Debouncer;
pub use geocoder::{ForwardGeocoder, Geocoder, StaticGeocoder};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{config::SearchConfig, geo::LngLat};
use crate::Result;

/// A resolved place. Produced per query, never cached across queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub label: String,
    pub coords: LngLat,
}

impl SearchResult {
    /// The coordinate for downstream consumption (panning the surface,
    /// feeding the tracked stream).
    pub fn coords(&self) -> LngLat {
        self.coords
    }

    pub fn into_coords(self) -> LngLat {
        self.coords
    }
}

/// Front door for place search. Debouncing is the caller's job (see
/// [`Debouncer`]); this type performs no cancellation or coalescing of
/// in-flight calls, so rapid successive distinct queries can resolve out of
/// order.
pub struct LocationSearch {
    geocoder: Arc<dyn Geocoder>,
    config: SearchConfig,
}

impl LocationSearch {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: SearchConfig) -> Self {
        Self { geocoder, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolves free text to candidate places. Empty or whitespace-only
    /// queries yield an empty list without touching the network. Zero
    /// results is not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.geocoder.forward(trimmed, self.config.limit).await?;
        log::debug!("search '{}' resolved {} places", trimmed, results.len());
        Ok(results)
    }
}
