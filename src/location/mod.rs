//! Geolocation: the platform capability seam, the service wrapping it, and
//! the shared tracked self-location.
//!
//! Errors never escape as `Err` from the fetch paths; every failure resolves
//! to the documented fallback coordinate plus error data, so a screen always
//! has something to center on.

pub mod capability;
pub mod service;
pub mod simulated;
pub mod tracker;

pub use capability::{FixError, FixHints, GeolocationCapability};
pub use service::{LocationFix, LocationService, WatchHandle};
pub use simulated::SimulatedGeolocation;
pub use tracker::{LocationTracker, TrackedLocation};
