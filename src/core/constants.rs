//! Named defaults shared across the crate.
//!
//! The fallback coordinate is the documented "no fix available" location:
//! every geolocation failure path resolves to it, paired with an error
//! describing the cause.

use std::time::Duration;

use crate::core::geo::LngLat;

/// Default location (Harare) used whenever no device fix is available.
pub const FALLBACK_LOCATION: LngLat = LngLat {
    lng: 31.0335,
    lat: -17.8292,
};

/// Zoom the map opens at.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Zoom applied when flying to a located or searched position.
pub const LOCATE_ZOOM: f64 = 14.0;

/// Bounded wait for a one-shot position fix.
pub const FIX_TIMEOUT: Duration = Duration::from_secs(10);

/// Platform-side timeout hint for watch fixes.
pub const WATCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Maximum age of a cached one-shot fix the platform may hand back.
pub const FIX_MAX_AGE: Duration = Duration::from_secs(30);

/// Maximum age of a cached watch fix the platform may hand back.
pub const WATCH_MAX_AGE: Duration = Duration::from_secs(10);

/// Trailing-edge debounce window for free-text search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Result cap requested from the geocoding backend.
pub const SEARCH_LIMIT: usize = 5;

/// Window after a manual "locate me" during which watch fixes also recenter.
pub const MANUAL_RECENTER_WINDOW: Duration = Duration::from_secs(2);

/// Animation length for a manual locate fly-to.
pub const LOCATE_PAN_DURATION: Duration = Duration::from_millis(1500);

/// Animation length for programmatic recenters (watch fixes, search results).
pub const PAN_DURATION: Duration = Duration::from_millis(1000);
