//! # washmap
//!
//! The location-tracking and map-marker synchronization layer for a mobile
//! car-wash booking app.
//!
//! Every screen that shows a map shares the same moving parts: a geolocation
//! watch feeding a "you are here" marker, a set of provider-site markers, a
//! free-text place search, and a credential gate for the vector map backend.
//! This crate provides those parts once, parameterized per screen, instead of
//! the copy-pasted per-page wiring they replace.

pub mod core;
pub mod location;
pub mod markers;
pub mod search;
pub mod session;
pub mod surface;
pub mod token;

pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{LocationConfig, SearchConfig, SurfaceConfig},
    geo::LngLat,
};

pub use crate::location::{
    FixError, LocationFix, LocationService, LocationTracker, TrackedLocation, WatchHandle,
};

pub use crate::markers::{MarkerKind, MarkerRegistry, ProviderSite};

pub use crate::search::{LocationSearch, SearchResult};

pub use crate::session::MapSession;

pub use crate::surface::{Container, EngineKind, MapSurface};

pub use crate::token::{AccessToken, TokenGate, TokenState};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Map engine credential required")]
    TokenRequired,

    #[error("Map engine credential rejected")]
    TokenInvalid,

    #[error("Engine initialization failed: {0}")]
    EngineInit(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Geocoding failed: {0}")]
    Geocode(String),

    #[error("Map surface is not initialized")]
    SurfaceNotInitialized,
}

/// Error type alias for convenience
pub type Error = MapError;
