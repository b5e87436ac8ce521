//! Cross-component scenarios for the booking-map layer: fallback behavior,
//! marker synchronization, credential gating, and search flow, driven
//! through scripted backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use washmap::location::simulated::ScriptedFix;
use washmap::prelude::*;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn open_gate() -> TokenGate {
    TokenGate::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticValidator::accepting()),
    )
}

fn raster_surface(id: &str) -> MapSurface {
    MapSurface::new(Container::new(id, 390, 500), SurfaceConfig::raster("test-key"))
}

fn quick_location_config() -> LocationConfig {
    LocationConfig {
        fix_timeout: Duration::from_millis(50),
        ..LocationConfig::default()
    }
}

const FALLBACK: LngLat = LngLat {
    lng: 31.0335,
    lat: -17.8292,
};

/// P1: every geolocation failure cause resolves to the same documented
/// fallback coordinate, paired with a non-nil error.
#[tokio::test]
async fn fallback_is_deterministic_across_failure_causes() {
    init_logs();
    let causes = [
        ScriptedFix::Fail(FixError::PermissionDenied),
        ScriptedFix::Fail(FixError::PositionUnavailable),
        ScriptedFix::Fail(FixError::Timeout),
        ScriptedFix::Hang,
    ];

    for cause in causes {
        let device = Arc::new(SimulatedGeolocation::new());
        device.script(cause);
        let service = LocationService::new(device, quick_location_config());

        let fix = service.current_location().await;
        assert_eq!(fix.coords, FALLBACK);
        assert!(fix.error.is_some());
        assert!(!fix.is_live());
    }

    // Capability absence resolves identically.
    let service = LocationService::new(
        Arc::new(SimulatedGeolocation::unavailable()),
        quick_location_config(),
    );
    let fix = service.current_location().await;
    assert_eq!(fix.coords, FALLBACK);
    assert_eq!(fix.error, Some(FixError::CapabilityUnavailable));
}

/// P2: N consecutive upserts leave exactly one self marker at the last
/// position.
#[tokio::test]
async fn self_marker_stays_singleton_across_upserts() {
    let mut surface = raster_surface("home-map");
    surface.initialize(FALLBACK, &open_gate()).unwrap();
    let mut registry = MarkerRegistry::new();

    let positions = [
        LngLat::new(31.01, -17.81),
        LngLat::new(31.02, -17.82),
        LngLat::new(31.03, -17.83),
        LngLat::new(31.04, -17.84),
    ];
    for position in positions {
        registry.upsert_user_marker(&mut surface, position).unwrap();
    }

    assert_eq!(surface.marker_count(), 1);
    assert_eq!(
        surface.marker_position(USER_MARKER_ID),
        Some(LngLat::new(31.04, -17.84))
    );
}

/// P3: after a replace, live provider marker ids exactly equal the input
/// ids, with no leftovers from the prior call.
#[tokio::test]
async fn provider_replace_leaves_exactly_the_input_set() {
    let mut surface = raster_surface("home-map");
    surface.initialize(FALLBACK, &open_gate()).unwrap();
    let mut registry = MarkerRegistry::new();

    let first = vec![
        ProviderSite::new("1", "Sparkle Wash", LngLat::new(31.0, -17.8)),
        ProviderSite::new("2", "Shine Depot", LngLat::new(28.6, -20.1)),
    ];
    registry
        .replace_provider_markers(&mut surface, &first, |_| {})
        .unwrap();

    let second = vec![
        ProviderSite::new("2", "Shine Depot", LngLat::new(28.6, -20.1)),
        ProviderSite::new("3", "Bubble Bay", LngLat::new(25.8, -17.9)),
        ProviderSite::new("4", "Gleam Garage", LngLat::new(30.1, -19.4)),
    ];
    registry
        .replace_provider_markers(&mut surface, &second, |_| {})
        .unwrap();

    assert_eq!(registry.provider_count(), 3);
    assert_eq!(surface.marker_count(), 3);
    for id in ["2", "3", "4"] {
        assert!(surface.has_marker(id));
    }
    assert!(!surface.has_marker("1"));
}

/// P4: disposing a surface or stopping a watch twice produces no error and
/// no state change after the first call.
#[tokio::test]
async fn teardown_is_idempotent() {
    let mut surface = raster_surface("home-map");
    surface.initialize(FALLBACK, &open_gate()).unwrap();
    surface.dispose();
    surface.dispose();
    assert!(!surface.is_initialized());

    let device = Arc::new(SimulatedGeolocation::new());
    let service = LocationService::new(device.clone(), LocationConfig::default());
    let watch = service.watch(|_| {}, |_| {});
    watch.stop();
    watch.stop();
    assert!(watch.is_stopped());
    assert_eq!(device.watcher_count(), 0);
}

/// P5: empty and whitespace-only queries resolve to an empty list without
/// invoking the network layer.
#[tokio::test]
async fn empty_queries_never_reach_the_geocoder() {
    let geocoder = Arc::new(StaticGeocoder::with_results(vec![SearchResult {
        label: "Harare, Zimbabwe".to_string(),
        coords: FALLBACK,
    }]));
    let search = LocationSearch::new(geocoder.clone(), SearchConfig::default());

    assert!(search.search("").await.unwrap().is_empty());
    assert!(search.search("   ").await.unwrap().is_empty());
    assert_eq!(geocoder.calls(), 0);
}

/// P6: the token-gated engine is never constructed without a credential.
#[tokio::test]
async fn vector_initialization_fails_fast_without_credential() {
    let gate = open_gate();
    assert!(!gate.has_credential());

    let mut surface = MapSurface::new(
        Container::new("home-map", 390, 500),
        SurfaceConfig::default(),
    );
    let err = surface.initialize(FALLBACK, &gate).unwrap_err();
    assert!(matches!(err, MapError::TokenRequired));
    assert!(!surface.is_initialized());

    // Committing a validated credential unblocks the same surface.
    assert!(gate.validate_and_commit("pk.good").await);
    surface.initialize(FALLBACK, &gate).unwrap();
    assert!(surface.is_initialized());
}

/// Scenario A: a successful fix places the self marker exactly there.
#[tokio::test]
async fn scenario_fix_drives_self_marker() {
    let device = Arc::new(SimulatedGeolocation::new());
    device.script_fix(LngLat::new(31.05, -17.83));

    let surface = raster_surface("home-map");
    let service = LocationService::new(device, LocationConfig::default());
    let mut session = MapSession::new(surface, service);

    session.start(&open_gate()).await.unwrap();
    assert_eq!(
        session.surface().marker_position(USER_MARKER_ID),
        Some(LngLat::new(31.05, -17.83))
    );
}

/// Scenario B: three providers render three markers; selecting "2" fires
/// the callback exactly once with that id.
#[tokio::test]
async fn scenario_three_providers_and_one_selection() {
    let device = Arc::new(SimulatedGeolocation::new());
    device.script_fix(LngLat::new(31.05, -17.83));

    let surface = raster_surface("home-map");
    let service = LocationService::new(device, LocationConfig::default());
    let mut session = MapSession::new(surface, service);
    session.start(&open_gate()).await.unwrap();

    let sites = vec![
        ProviderSite::new("1", "Sparkle Wash", LngLat::new(31.0, -17.8)),
        ProviderSite::new("2", "Shine Depot", LngLat::new(28.6, -20.1)),
        ProviderSite::new("3", "Bubble Bay", LngLat::new(25.8, -17.9)),
    ];
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    session
        .set_providers(&sites, move |id| {
            assert_eq!(id, "2");
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

    assert_eq!(session.registry().provider_count(), 3);
    for site in &sites {
        assert_eq!(
            session.surface().marker_position(&site.id),
            Some(site.location)
        );
    }

    assert!(session.select_site("2"));
    assert_eq!(fired.load(Ordering::Relaxed), 1);
}

/// Scenario C: a geocode hit for "harare" selects down to the expected
/// coordinate.
#[tokio::test]
async fn scenario_search_select_extracts_coordinate() {
    let geocoder = Arc::new(StaticGeocoder::with_results(vec![SearchResult {
        label: "Harare, Zimbabwe".to_string(),
        coords: FALLBACK,
    }]));
    let search = LocationSearch::new(geocoder, SearchConfig::default());

    let results = search.search("harare").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "Harare, Zimbabwe");
    assert_eq!(results[0].clone().into_coords(), FALLBACK);
}

/// Scenario D: a rejected probe returns false, nothing is persisted, and
/// the gate still reports no credential.
#[tokio::test]
async fn scenario_rejected_token_is_never_persisted() {
    let gate = TokenGate::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticValidator::rejecting()),
    );

    assert!(!gate.validate("bad-token").await);
    assert!(!gate.has_credential());
    assert_eq!(gate.state(), TokenState::Unset);
}

/// A manual locate that loses the race against the watch recenters on the
/// fresher watch coordinate rather than the stale manual fix.
#[tokio::test]
async fn stale_manual_locate_defers_to_newer_watch_fix() {
    let device = Arc::new(SimulatedGeolocation::new());
    device.script_fix(LngLat::new(31.05, -17.83));

    let surface = raster_surface("home-map");
    let service = LocationService::new(device.clone(), LocationConfig::default());
    let mut session = MapSession::new(surface, service);
    session.start(&open_gate()).await.unwrap();

    // The manual request will resolve to a stale reading; a watch fix lands
    // first because the one-shot queue is empty until we script it.
    let tracker = session.tracker();
    let manual_ticket = tracker.issue_ticket();
    device.emit(LngLat::new(31.20, -17.95));
    session.process_updates().unwrap();

    assert!(!tracker.apply(manual_ticket, LngLat::new(31.00, -17.80), true));
    assert_eq!(
        tracker.current().unwrap().coords,
        LngLat::new(31.20, -17.95)
    );
}

/// Dispose-then-reinitialize on the same container must not double-render
/// markers: the new engine starts empty.
#[tokio::test]
async fn reinitialize_after_dispose_starts_clean() {
    init_logs();
    let device = Arc::new(SimulatedGeolocation::new());
    device.script_fix(LngLat::new(31.05, -17.83));
    device.script_fix(LngLat::new(31.06, -17.84));

    let surface = raster_surface("home-map");
    let service = LocationService::new(device.clone(), LocationConfig::default());
    let mut session = MapSession::new(surface, service);

    session.start(&open_gate()).await.unwrap();
    session
        .set_providers(
            &[ProviderSite::new("1", "Sparkle Wash", LngLat::new(31.0, -17.8))],
            |_| {},
        )
        .unwrap();
    assert_eq!(session.surface().marker_count(), 2);

    session.shutdown();
    assert_eq!(session.surface().marker_count(), 0);
    assert_eq!(device.watcher_count(), 0);

    session.start(&open_gate()).await.unwrap();
    assert_eq!(session.surface().marker_count(), 1);
    assert_eq!(
        session.surface().marker_position(USER_MARKER_ID),
        Some(LngLat::new(31.06, -17.84))
    );
}

/// Notices surface through the session's sink instead of propagating.
#[tokio::test]
async fn failures_become_notices_not_errors() {
    let device = Arc::new(SimulatedGeolocation::new());
    device.script(ScriptedFix::Fail(FixError::PermissionDenied));

    let notices: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = notices.clone();

    let surface = raster_surface("home-map");
    let service = LocationService::new(device, quick_location_config());
    let mut session = MapSession::new(surface, service)
        .with_notice(move |message| sink.lock().unwrap().push(message.to_string()));

    // Start still succeeds, centered on the fallback.
    session.start(&open_gate()).await.unwrap();
    assert_eq!(session.surface().center(), Some(FALLBACK));
    assert_eq!(notices.lock().unwrap().len(), 1);
}
