use std::time::Duration;

use anyhow::Context;

use washmap::prelude::*;

/// Headless walk through one booking-map session: simulated device fixes,
/// provider markers from canned backend rows, a place search, and teardown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Credential flow first; the vector surface refuses to come up without it.
    let gate = TokenGate::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticValidator::accepting()),
    );
    let token = std::env::var("WASHMAP_TOKEN").unwrap_or_else(|_| "pk.demo".to_string());
    if !gate.validate_and_commit(&token).await {
        anyhow::bail!("map token was rejected");
    }

    // Scripted device: one fix for startup, one for the manual locate.
    let device = Arc::new(SimulatedGeolocation::new());
    device.script_fix(LngLat::new(31.0450, -17.8300));
    device.script_fix(LngLat::new(31.0500, -17.8350));

    let surface = MapSurface::new(
        Container::new("home-map", 390, 500),
        SurfaceConfig::default(),
    );
    let service = LocationService::new(device.clone(), LocationConfig::default());
    let mut session = MapSession::new(surface, service)
        .with_notice(|message| println!("notice: {}", message));

    session.start(&gate).await.context("session start failed")?;
    println!(
        "map up at {} (zoom {:.0})",
        session.surface().center().unwrap(),
        session.surface().zoom().unwrap()
    );

    // Provider sites as the backend would hand them over.
    let rows = r#"[
        {"id": "1", "name": "Sparkle Wash CBD", "location": [31.0335, -17.8292]},
        {"id": "2", "name": "Shine Depot Avondale", "location": [31.0210, -17.8010]},
        {"id": "3", "name": "Bubble Bay Borrowdale", "location": [31.0870, -17.7450]}
    ]"#;
    let sites = ProviderSite::from_rows(rows)?;
    session.set_providers(&sites, |id| println!("selected provider {}", id))?;
    println!("{} provider markers live", session.registry().provider_count());

    // Background fixes trickle in while the screen idles.
    device.emit(LngLat::new(31.0460, -17.8310));
    device.emit(LngLat::new(31.0470, -17.8320));
    let applied = session.process_updates()?;
    log::info!("applied {} watch fixes", applied);

    // The user taps "locate me".
    let located = session.locate_me().await?;
    println!("located at {}", located);

    // And searches for a place.
    let geocoder = Arc::new(StaticGeocoder::with_results(vec![SearchResult {
        label: "Harare, Zimbabwe".to_string(),
        coords: LngLat::new(31.0335, -17.8292),
    }]));
    let search = LocationSearch::new(geocoder, SearchConfig::default());

    let debouncer = Debouncer::new(Duration::from_millis(50));
    if debouncer.settle().await {
        let results = search.search("harare").await?;
        if let Some(first) = results.first() {
            println!("search hit: {} at {}", first.label, first.coords());
            session.apply_search_result(first);
        }
    }

    session.select_site("2");

    session.shutdown();
    println!("session closed");
    Ok(())
}
