//! One screen's map session: tracked self location, surface lifecycle,
//! marker synchronization, and search write-back, composed once instead of
//! per-page.
//!
//! Watch fixes arrive on a channel and are applied by
//! [`MapSession::process_updates`] from the owner's update loop, so platform
//! callbacks never mutate session state re-entrantly.

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use crate::core::constants;
use crate::core::geo::LngLat;
use crate::location::{FixError, LocationService, LocationTracker, WatchHandle};
use crate::markers::{MarkerRegistry, ProviderSite};
use crate::search::SearchResult;
use crate::surface::MapSurface;
use crate::token::TokenGate;
use crate::{MapError, Result};

enum TrackEvent {
    Fix(LngLat),
    Failure(FixError),
}

type NoticeCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Owns the surface, registry, and location plumbing for one mounted screen.
pub struct MapSession {
    surface: MapSurface,
    registry: MarkerRegistry,
    service: LocationService,
    tracker: Arc<LocationTracker>,
    watch: Option<WatchHandle>,
    updates: Option<Receiver<TrackEvent>>,
    manual_until: Option<Instant>,
    on_notice: Option<NoticeCallback>,
}

impl MapSession {
    pub fn new(surface: MapSurface, service: LocationService) -> Self {
        Self {
            surface,
            registry: MarkerRegistry::new(),
            service,
            tracker: Arc::new(LocationTracker::new()),
            watch: None,
            updates: None,
            manual_until: None,
            on_notice: None,
        }
    }

    /// Installs the transient-notice sink (the toast layer stand-in).
    pub fn with_notice(mut self, on_notice: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_notice = Some(Box::new(on_notice));
        self
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> Arc<LocationTracker> {
        self.tracker.clone()
    }

    /// Brings the screen up: initial fix (fallback included), surface
    /// initialization centered on it, the self marker, and the continuous
    /// watch. A missing vector credential propagates as
    /// [`MapError::TokenRequired`] so the caller can prompt and retry.
    pub async fn start(&mut self, gate: &TokenGate) -> Result<()> {
        let fix = self.service.current_location().await;
        if let Some(error) = fix.error {
            self.notify(&error.to_string());
        }
        self.tracker.record(fix.coords, fix.is_live());

        self.surface.initialize(fix.coords, gate)?;
        self.registry.upsert_user_marker(&mut self.surface, fix.coords)?;

        let (tx, rx): (Sender<TrackEvent>, Receiver<TrackEvent>) = crossbeam_channel::unbounded();
        let error_tx = tx.clone();
        self.watch = Some(self.service.watch(
            move |coords| {
                let _ = tx.send(TrackEvent::Fix(coords));
            },
            move |error| {
                let _ = error_tx.send(TrackEvent::Failure(error));
            },
        ));
        self.updates = Some(rx);
        Ok(())
    }

    /// Drains pending watch events and applies them: tracker write, self
    /// marker move, and a recenter when inside the manual-locate window.
    /// Call from the owner's update loop; returns how many fixes applied.
    pub fn process_updates(&mut self) -> Result<usize> {
        let Some(updates) = self.updates.clone() else {
            return Ok(0);
        };

        let mut applied = 0;
        while let Ok(event) = updates.try_recv() {
            match event {
                TrackEvent::Fix(coords) => {
                    self.tracker.record(coords, true);
                    self.registry.upsert_user_marker(&mut self.surface, coords)?;
                    if self.manual_window_active() {
                        let zoom = self.surface.config().locate_zoom;
                        self.surface.pan_to(coords, zoom);
                    }
                    applied += 1;
                }
                TrackEvent::Failure(error) => {
                    self.notify(&error.to_string());
                }
            }
        }
        Ok(applied)
    }

    /// Manual "locate me": one-shot fix, fly to it, and open the window
    /// during which watch fixes keep recentring. If a newer write landed
    /// while the fix was in flight, the stale result is dropped and the map
    /// flies to the current tracked coordinate instead.
    pub async fn locate_me(&mut self) -> Result<LngLat> {
        if !self.surface.is_initialized() {
            return Err(MapError::SurfaceNotInitialized);
        }

        let ticket = self.tracker.issue_ticket();
        let fix = self.service.current_location().await;
        if let Some(error) = fix.error {
            self.notify(&error.to_string());
        }

        let target = if self.tracker.apply(ticket, fix.coords, fix.is_live()) {
            fix.coords
        } else {
            self.tracker
                .current()
                .map(|tracked| tracked.coords)
                .unwrap_or(fix.coords)
        };

        let zoom = self.surface.config().locate_zoom;
        self.surface
            .fly_to(target, zoom, constants::LOCATE_PAN_DURATION);
        self.registry.upsert_user_marker(&mut self.surface, target)?;
        self.manual_until = Some(Instant::now() + constants::MANUAL_RECENTER_WINDOW);
        Ok(target)
    }

    /// Replaces the provider marker set; runs whenever the caller's provider
    /// list changes identity.
    pub fn set_providers(
        &mut self,
        sites: &[ProviderSite],
        on_select: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<()> {
        self.registry
            .replace_provider_markers(&mut self.surface, sites, on_select)
    }

    /// Reports a marker activation. Recenters only when the screen's config
    /// opted in; the registry itself never moves the camera.
    pub fn select_site(&mut self, id: &str) -> bool {
        let fired = self.registry.activate(id);
        if fired && self.surface.config().recenter_on_select {
            if let Some(position) = self.surface.marker_position(id) {
                let zoom = self.surface.config().locate_zoom;
                self.surface.pan_to(position, zoom);
            }
        }
        fired
    }

    /// Pans the surface to a resolved search result, through the same center
    /// path watch recenters use. The self marker stays where it is.
    pub fn apply_search_result(&mut self, result: &SearchResult) {
        let zoom = self.surface.config().locate_zoom;
        self.surface.pan_to(result.coords(), zoom);
    }

    /// Tears the screen down: watch unregistered, markers and engine
    /// released. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.stop();
        }
        self.updates = None;
        self.manual_until = None;
        self.registry.reset();
        self.surface.dispose();
    }

    fn manual_window_active(&self) -> bool {
        self.manual_until.is_some_and(|until| Instant::now() < until)
    }

    fn notify(&self, message: &str) {
        log::warn!("{}", message);
        if let Some(on_notice) = &self.on_notice {
            on_notice(message);
        }
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{LocationConfig, SurfaceConfig};
    use crate::location::SimulatedGeolocation;
    use crate::markers::USER_MARKER_ID;
    use crate::surface::Container;
    use crate::token::{MemoryStore, StaticValidator};

    fn session_with(sim: Arc<SimulatedGeolocation>) -> MapSession {
        let surface = MapSurface::new(
            Container::new("home-map", 390, 500),
            SurfaceConfig::raster("test-key"),
        );
        let service = LocationService::new(sim, LocationConfig::default());
        MapSession::new(surface, service)
    }

    fn open_gate() -> TokenGate {
        TokenGate::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticValidator::accepting()),
        )
    }

    #[tokio::test]
    async fn test_start_centers_on_fix_and_places_self_marker() {
        let sim = Arc::new(SimulatedGeolocation::new());
        sim.script_fix(LngLat::new(31.05, -17.83));

        let mut session = session_with(sim.clone());
        session.start(&open_gate()).await.unwrap();

        assert_eq!(session.surface().center(), Some(LngLat::new(31.05, -17.83)));
        assert_eq!(
            session.surface().marker_position(USER_MARKER_ID),
            Some(LngLat::new(31.05, -17.83))
        );
        assert_eq!(sim.watcher_count(), 1);
    }

    #[tokio::test]
    async fn test_watch_fix_moves_marker_without_recentring() {
        let sim = Arc::new(SimulatedGeolocation::new());
        sim.script_fix(LngLat::new(31.05, -17.83));

        let mut session = session_with(sim.clone());
        session.start(&open_gate()).await.unwrap();

        sim.emit(LngLat::new(31.06, -17.84));
        assert_eq!(session.process_updates().unwrap(), 1);

        assert_eq!(
            session.surface().marker_position(USER_MARKER_ID),
            Some(LngLat::new(31.06, -17.84))
        );
        // No manual window open, so the camera stayed put.
        assert_eq!(session.surface().center(), Some(LngLat::new(31.05, -17.83)));
    }

    #[tokio::test]
    async fn test_locate_me_flies_and_opens_manual_window() {
        let sim = Arc::new(SimulatedGeolocation::new());
        sim.script_fix(LngLat::new(31.05, -17.83));
        sim.script_fix(LngLat::new(31.10, -17.90));

        let mut session = session_with(sim.clone());
        session.start(&open_gate()).await.unwrap();

        let target = session.locate_me().await.unwrap();
        assert_eq!(target, LngLat::new(31.10, -17.90));
        assert_eq!(session.surface().zoom(), Some(14.0));

        // Watch fixes inside the window keep recentring.
        sim.emit(LngLat::new(31.11, -17.91));
        session.process_updates().unwrap();
        assert_eq!(session.surface().center(), Some(LngLat::new(31.11, -17.91)));
    }

    #[tokio::test]
    async fn test_locate_me_before_start_is_an_error() {
        let sim = Arc::new(SimulatedGeolocation::new());
        let mut session = session_with(sim);
        assert!(matches!(
            session.locate_me().await,
            Err(MapError::SurfaceNotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_search_result_pans_but_leaves_self_marker() {
        let sim = Arc::new(SimulatedGeolocation::new());
        sim.script_fix(LngLat::new(31.05, -17.83));

        let mut session = session_with(sim);
        session.start(&open_gate()).await.unwrap();

        let result = SearchResult {
            label: "Harare, Zimbabwe".to_string(),
            coords: LngLat::new(31.0335, -17.8292),
        };
        session.apply_search_result(&result);

        assert_eq!(
            session.surface().center(),
            Some(LngLat::new(31.0335, -17.8292))
        );
        assert_eq!(
            session.surface().marker_position(USER_MARKER_ID),
            Some(LngLat::new(31.05, -17.83))
        );
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent_and_releases_everything() {
        let sim = Arc::new(SimulatedGeolocation::new());
        sim.script_fix(LngLat::new(31.05, -17.83));

        let mut session = session_with(sim.clone());
        session.start(&open_gate()).await.unwrap();
        session
            .set_providers(
                &[ProviderSite::new("1", "Sparkle Wash", LngLat::new(31.0, -17.8))],
                |_| {},
            )
            .unwrap();

        session.shutdown();
        session.shutdown();

        assert!(!session.surface().is_initialized());
        assert_eq!(session.surface().marker_count(), 0);
        assert_eq!(sim.watcher_count(), 0);
    }

    #[tokio::test]
    async fn test_watch_failure_surfaces_notice_but_watch_survives() {
        let sim = Arc::new(SimulatedGeolocation::new());
        sim.script_fix(LngLat::new(31.05, -17.83));

        let notices = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = notices.clone();

        let surface = MapSurface::new(
            Container::new("home-map", 390, 500),
            SurfaceConfig::raster("test-key"),
        );
        let service = LocationService::new(sim.clone(), LocationConfig::default());
        let mut session = MapSession::new(surface, service).with_notice(move |message| {
            sink.lock().unwrap().push(message.to_string());
        });

        session.start(&open_gate()).await.unwrap();
        sim.emit_error(FixError::PositionUnavailable);
        session.process_updates().unwrap();

        assert_eq!(notices.lock().unwrap().len(), 1);
        assert_eq!(sim.watcher_count(), 1);

        // Fixes still flow after the transient failure.
        sim.emit(LngLat::new(31.06, -17.84));
        assert_eq!(session.process_updates().unwrap(), 1);
    }
}
