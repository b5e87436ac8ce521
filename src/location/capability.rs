use std::time::Duration;

use async_trait::async_trait;

use crate::core::{config::LocationConfig, geo::LngLat};

/// Failure causes a position request can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FixError {
    #[error("Geolocation is not supported on this platform")]
    CapabilityUnavailable,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,
}

/// Hints forwarded to the platform position source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixHints {
    pub high_accuracy: bool,
    pub max_age: Duration,
    pub timeout: Duration,
}

impl FixHints {
    /// Hints for a one-shot fetch.
    pub fn one_shot(config: &LocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            max_age: config.fix_max_age,
            timeout: config.fix_timeout,
        }
    }

    /// Hints for the continuous watch.
    pub fn watch(config: &LocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            max_age: config.watch_max_age,
            timeout: config.watch_timeout,
        }
    }
}

/// Callback invoked for every new watch fix.
pub type FixCallback = Box<dyn Fn(LngLat) + Send + Sync>;

/// Callback invoked on transient watch failures; the watch itself survives.
pub type ErrorCallback = Box<dyn Fn(FixError) + Send + Sync>;

/// The platform geolocation seam, shaped after the host API:
/// one-shot fetch, continuous watch, and watch cancellation by id.
#[async_trait]
pub trait GeolocationCapability: Send + Sync {
    /// Whether the platform exposes a position source at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Requests a single fix. May take arbitrarily long; callers bound the
    /// wait themselves.
    async fn current_position(&self, hints: FixHints) -> Result<LngLat, FixError>;

    /// Begins continuous updates, returning the platform watch id.
    fn watch_position(
        &self,
        hints: FixHints,
        on_fix: FixCallback,
        on_error: ErrorCallback,
    ) -> u64;

    /// Cancels a watch. Unknown or already-cleared ids are ignored.
    fn clear_watch(&self, watch_id: u64);
}
