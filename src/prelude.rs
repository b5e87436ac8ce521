//! Prelude module for common washmap types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use washmap::prelude::*;`

pub use crate::core::{
    config::{LocationConfig, SearchConfig, SurfaceConfig},
    constants,
    geo::LngLat,
};

pub use crate::location::{
    FixError, GeolocationCapability, LocationFix, LocationService, LocationTracker,
    SimulatedGeolocation, TrackedLocation, WatchHandle,
};

pub use crate::markers::{MarkerKind, MarkerRegistry, ProviderSite, USER_MARKER_ID};

pub use crate::search::{
    Debouncer, ForwardGeocoder, Geocoder, LocationSearch, SearchResult, StaticGeocoder,
};

pub use crate::session::MapSession;

pub use crate::surface::{Container, EngineKind, MapEngine, MapSurface};

pub use crate::token::{
    AccessToken, CredentialStore, FileStore, MemoryStore, RemoteTokenValidator, StaticValidator,
    TokenGate, TokenState, TokenValidator,
};

pub use crate::{Error as MapError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
