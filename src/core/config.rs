//! Configuration for the location, surface, and search components.
//!
//! Each screen builds its own set of these; the defaults reproduce the
//! behavior of the home map (dark vector style, Harare fallback, 500 ms
//! search debounce).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{constants, geo::LngLat};
use crate::surface::EngineKind;

/// Geolocation behavior for a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Returned (with an error) whenever no fix can be obtained.
    pub fallback: LngLat,
    /// Bounded wait for a one-shot fix before resolving with the fallback.
    pub fix_timeout: Duration,
    /// Platform hint: prefer the high-accuracy source.
    pub high_accuracy: bool,
    /// Platform hint: maximum acceptable age of a cached one-shot fix.
    pub fix_max_age: Duration,
    /// Platform hint: per-fix timeout for the continuous watch.
    pub watch_timeout: Duration,
    /// Platform hint: maximum acceptable age of a cached watch fix.
    pub watch_max_age: Duration,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fallback: constants::FALLBACK_LOCATION,
            fix_timeout: constants::FIX_TIMEOUT,
            high_accuracy: true,
            fix_max_age: constants::FIX_MAX_AGE,
            watch_timeout: constants::WATCH_TIMEOUT,
            watch_max_age: constants::WATCH_MAX_AGE,
        }
    }
}

/// Map surface behavior for a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Which engine backend this surface drives.
    pub engine: EngineKind,
    /// Style variant handed to the vector backend.
    pub style: String,
    /// Static API key for the raster backend.
    pub api_key: Option<String>,
    /// Zoom the surface opens at.
    pub initial_zoom: f64,
    /// Zoom used when flying to a located or searched position.
    pub locate_zoom: f64,
    /// Animation length for programmatic pans.
    pub pan_duration: Duration,
    /// Whether selecting a provider marker recenters the map. Recentring is
    /// a screen policy, never the registry's doing.
    pub recenter_on_select: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Vector,
            style: "dark-v11".to_string(),
            api_key: None,
            initial_zoom: constants::DEFAULT_ZOOM,
            locate_zoom: constants::LOCATE_ZOOM,
            pan_duration: constants::PAN_DURATION,
            recenter_on_select: false,
        }
    }
}

impl SurfaceConfig {
    /// Raster-backend preset: key-gated engine, no style variant.
    pub fn raster(api_key: impl Into<String>) -> Self {
        Self {
            engine: EngineKind::Raster,
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

/// Free-text place search behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Trailing-edge debounce window applied by the caller.
    pub debounce: Duration,
    /// Result cap requested from the geocoding backend.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: constants::SEARCH_DEBOUNCE,
            limit: constants::SEARCH_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_home_screen() {
        let location = LocationConfig::default();
        assert_eq!(location.fallback, LngLat::new(31.0335, -17.8292));
        assert_eq!(location.fix_timeout, Duration::from_secs(10));

        let surface = SurfaceConfig::default();
        assert_eq!(surface.engine, EngineKind::Vector);
        assert_eq!(surface.initial_zoom, 13.0);
        assert_eq!(surface.locate_zoom, 14.0);
        assert!(!surface.recenter_on_select);

        let search = SearchConfig::default();
        assert_eq!(search.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_raster_preset() {
        let surface = SurfaceConfig::raster("demo-key");
        assert_eq!(surface.engine, EngineKind::Raster);
        assert_eq!(surface.api_key.as_deref(), Some("demo-key"));
    }
}
