//! Token-gated vector-tile engine backend.

use std::time::Duration;

use crate::core::geo::LngLat;
use crate::markers::MarkerKind;
use crate::surface::camera::Camera;
use crate::surface::engine::{EngineKind, MapEngine, MarkerTable};
use crate::surface::Container;
use crate::token::AccessToken;
use crate::Result;

/// Driver state for the vector-tile SDK instance bound to one container.
///
/// Construction is only reachable through [`crate::surface::MapSurface`],
/// which refuses to get this far without a gate-held credential.
pub struct VectorEngine {
    container_id: String,
    style_url: String,
    token: AccessToken,
    camera: Camera,
    markers: MarkerTable,
}

impl VectorEngine {
    pub fn new(
        container: &Container,
        center: LngLat,
        zoom: f64,
        style: &str,
        token: AccessToken,
    ) -> Result<Self> {
        container.validate()?;

        let style_url = format!("mapbox://styles/mapbox/{}", style);
        log::debug!(
            "vector engine binding to '{}' with style {}",
            container.id,
            style_url
        );

        Ok(Self {
            container_id: container.id.clone(),
            style_url,
            token,
            camera: Camera::new(center, zoom),
            markers: MarkerTable::new(),
        })
    }

    pub fn style_url(&self) -> &str {
        &self.style_url
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }
}

impl MapEngine for VectorEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Vector
    }

    fn add_marker(&mut self, id: &str, kind: MarkerKind, position: LngLat) -> Result<()> {
        self.markers.add(id, kind, position)?;
        log::debug!("vector '{}': marker '{}' added at {}", self.container_id, id, position);
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
            "vector '{}': shutting down, dropping {} markers",
            self.container_id,
            self.markers.len()
        );
        self.markers.clear();
    }
}
