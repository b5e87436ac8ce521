use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{config::LocationConfig, geo::LngLat};
use crate::location::capability::{FixError, FixHints, GeolocationCapability};

/// Outcome of a position request. Always carries a usable coordinate; a
/// non-nil error marks it as the fallback rather than a live fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coords: LngLat,
    pub error: Option<FixError>,
}

impl LocationFix {
    /// Whether the coordinate came from the device rather than the fallback.
    pub fn is_live(&self) -> bool {
        self.error.is_none()
    }
}

/// Wraps the platform capability behind the uniform fetch/watch interface.
pub struct LocationService {
    capability: Arc<dyn GeolocationCapability>,
    config: LocationConfig,
}

impl LocationService {
    pub fn new(capability: Arc<dyn GeolocationCapability>, config: LocationConfig) -> Self {
        Self { capability, config }
    }

    pub fn config(&self) -> &LocationConfig {
        &self.config
    }

    /// Requests a single fix, bounded by the configured wait.
    ///
    /// Never fails: capability absence, platform errors, invalid platform
    /// coordinates, and timeouts all resolve to the fallback coordinate with
    /// the cause attached.
    pub async fn current_location(&self) -> LocationFix {
        if !self.capability.is_available() {
            log::warn!("geolocation unavailable, using fallback location");
            return self.fallback(FixError::CapabilityUnavailable);
        }

        let hints = FixHints::one_shot(&self.config);
        let request = self.capability.current_position(hints);

        match tokio::time::timeout(self.config.fix_timeout, request).await {
            Ok(Ok(coords)) if coords.is_valid() => {
                log::debug!("got location {}", coords);
                LocationFix {
                    coords,
                    error: None,
                }
            }
            Ok(Ok(coords)) => {
                log::warn!("platform reported out-of-range position {}", coords);
                self.fallback(FixError::PositionUnavailable)
            }
            Ok(Err(error)) => {
                log::warn!("error getting location: {}", error);
                self.fallback(error)
            }
            Err(_) => {
                log::warn!("location request timed out, using fallback location");
                self.fallback(FixError::Timeout)
            }
        }
    }

    /// Begins continuous position updates. `on_error` reports transient
    /// failures without terminating the watch; the returned handle must be
    /// stopped on teardown (stopping twice is harmless).
    pub fn watch(
        &self,
        on_update: impl Fn(LngLat) + Send + Sync + 'static,
        on_error: impl Fn(FixError) + Send + Sync + 'static,
    ) -> WatchHandle {
        if !self.capability.is_available() {
            on_error(FixError::CapabilityUnavailable);
            return WatchHandle::inert(self.capability.clone());
        }

        let hints = FixHints::watch(&self.config);
        let watch_id = self.capability.watch_position(
            hints,
            Box::new(move |coords| {
                if coords.is_valid() {
                    on_update(coords);
                }
            }),
            Box::new(move |error| {
                log::warn!("error watching position: {}", error);
                on_error(error);
            }),
        );
        log::debug!("location watch {} started", watch_id);

        WatchHandle {
            watch_id,
            capability: self.capability.clone(),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    fn fallback(&self, error: FixError) -> LocationFix {
        LocationFix {
            coords: self.config.fallback,
            error: Some(error),
        }
    }
}

/// Owner of one platform watch registration.
///
/// `stop` unregisters the watch exactly once; further calls (and the drop
/// guard) are no-ops.
pub struct WatchHandle {
    watch_id: u64,
    capability: Arc<dyn GeolocationCapability>,
    stopped: Arc<AtomicBool>,
}

impl WatchHandle {
    fn inert(capability: Arc<dyn GeolocationCapability>) -> Self {
        Self {
            watch_id: 0,
            capability,
            stopped: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Cancels the watch. Idempotent.
    pub fn stop(&self) {
        if self
            .stopped
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            log::debug!("clearing location watch {}", self.watch_id);
            self.capability.clear_watch(self.watch_id);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
