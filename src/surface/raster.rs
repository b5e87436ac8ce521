//! Key-gated raster engine backend.

use std::time::Duration;

use crate::core::geo::LngLat;
use crate::markers::MarkerKind;
use crate::surface::camera::Camera;
use crate::surface::engine::{EngineKind, MapEngine, MarkerTable};
use crate::surface::Container;
use crate::{MapError, Result};

const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Driver state for the raster SDK instance bound to one container.
pub struct RasterEngine {
    container_id: String,
    size: (u32, u32),
    api_key: String,
    camera: Camera,
    markers: MarkerTable,
}

impl RasterEngine {
    pub fn new(container: &Container, center: LngLat, zoom: f64, api_key: &str) -> Result<Self> {
        container.validate()?;
        if api_key.trim().is_empty() {
            return Err(MapError::EngineInit(
                "raster engine requires a non-empty API key".to_string(),
            ));
        }

        log::debug!("raster engine binding to '{}'", container.id);
        Ok(Self {
            container_id: container.id.clone(),
            size: (container.width, container.height),
            api_key: api_key.to_string(),
            camera: Camera::new(center, zoom),
            markers: MarkerTable::new(),
        })
    }

    /// Shareable static-snapshot URL for the current view, markers included.
    /// The raster endpoint takes `lat,lng` order.
    pub fn static_map_url(&self) -> String {
        let center = self.camera.center();
        let mut url = format!(
            "{}?center={:.6},{:.6}&zoom={}&size={}x{}",
            STATIC_MAP_ENDPOINT,
            center.lat,
            center.lng,
            self.camera.zoom().round() as i64,
            self.size.0,
            self.size.1
        );
        for (id, marker) in self.markers.iter() {
            let color = match marker.kind {
                MarkerKind::UserLocation => "blue",
                MarkerKind::Provider => "red",
            };
            url.push_str(&format!(
                "&markers=color:{}%7Clabel:{}%7C{:.6},{:.6}",
                color,
                id.chars().next().unwrap_or('x').to_ascii_uppercase(),
                marker.position.lat,
                marker.position.lng
            ));
        }
        url.push_str(&format!("&key={}", self.api_key));
        url
    }
}

impl MapEngine for RasterEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Raster
    }

    fn add_marker(&mut self, id: &str, kind: MarkerKind, position: LngLat) -> Result<()> {
        self.markers.add(id, kind, position)?;
        log::debug!("raster '{}': marker '{}' added at {}", self.container_id, id, position);
        Ok(())
    }

    fn move_marker(&mut self, id: &str, position: LngLat) -> Result<()> {
        self.markers.reposition(id, position)
    }

    fn remove_marker(&mut self, id: &str) -> Result<()> {
        self.markers.remove(id)
    }

    fn has_marker(&self, id: &str) -> bool {
        self.markers.contains(id)
    }

    fn marker_position(&self, id: &str) -> Option<LngLat> {
        self.markers.position(id)
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn pan_to(&mut self, center: LngLat, zoom: f64, duration: Duration) {
        self.camera.fly_to(center, zoom, duration);
    }

    fn center(&self) -> LngLat {
        self.camera.center()
    }

    fn zoom(&self) -> f64 {
        self.camera.zoom()
    }

    fn shutdown(&mut self) {
        log::debug!(
            "raster '{}': shutting down, dropping {} markers",
            self.container_id,
            self.markers.len()
        );
        self.markers.clear();
    }
}
