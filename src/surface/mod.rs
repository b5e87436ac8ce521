//! The map surface: one engine instance per container, created at most once,
//! disposed exactly once, panned through superseding animated transitions.
//!
//! Two interchangeable backends are provided: a token-gated vector-tile
//! engine and a key-gated raster engine. Which one a surface drives is a
//! construction-time choice; call sites never branch on engine type.

pub mod camera;
pub mod engine;
pub mod raster;
pub mod vector;

pub use camera::{Camera, Transition};
pub use engine::{EngineKind, MapEngine};
pub use raster::RasterEngine;
pub use vector::VectorEngine;

use std::time::Duration;

use crate::core::{config::SurfaceConfig, geo::LngLat};
use crate::token::TokenGate;
use crate::{MapError, Result};

/// The host view an engine instance binds to. At most one live engine may be
/// bound to a container at a time; [`MapSurface`] enforces this with its
/// initialized guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Container {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(MapError::EngineInit("container has no id".to_string()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(MapError::EngineInit(format!(
                "container '{}' has zero size",
                self.id
            )));
        }
        Ok(())
    }
}

/// Owns zero-or-one live engine instance for one container.
pub struct MapSurface {
    container: Container,
    config: SurfaceConfig,
    engine: Option<Box<dyn MapEngine>>,
}

impl MapSurface {
    pub fn new(container: Container, config: SurfaceConfig) -> Self {
        Self {
            container,
            config,
            engine: None,
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Creates the engine instance bound to this surface's container.
    ///
    /// Re-invocation while an engine is live is a guarded no-op, never a
    /// duplicate instance. For the vector backend this fails fast with
    /// [`MapError::TokenRequired`] before any engine construction when the
    /// gate holds no credential.
    pub fn initialize(&mut self, center: LngLat, gate: &TokenGate) -> Result<()> {
        if self.engine.is_some() {
            log::warn!(
                "surface '{}' already initialized, ignoring",
                self.container.id
            );
            return Ok(());
        }

        let engine: Box<dyn MapEngine> = match self.config.engine {
            EngineKind::Vector => {
                if !gate.has_credential() {
                    return Err(MapError::TokenRequired);
                }
                let token = gate.access_token().ok_or(MapError::TokenRequired)?;
                Box::new(VectorEngine::new(
                    &self.container,
                    center,
                    self.config.initial_zoom,
                    &self.config.style,
                    token,
                )?)
            }
            EngineKind::Raster => {
                let key = self.config.api_key.as_deref().ok_or_else(|| {
                    MapError::EngineInit("raster engine requires an API key".to_string())
                })?;
                Box::new(RasterEngine::new(
                    &self.container,
                    center,
                    self.config.initial_zoom,
                    key,
                )?)
            }
        };

        log::info!(
            "surface '{}' initialized with {} engine at {}",
            self.container.id,
            engine.kind(),
            center
        );
        self.engine = Some(engine);
        Ok(())
    }

    /// Recenters with an animated transition at the configured pan duration.
    /// Safe to call repeatedly; later calls supersede in-flight animations.
    /// A no-op (with a warning) before initialization.
    pub fn pan_to(&mut self, center: LngLat, zoom: f64) {
        let duration = self.config.pan_duration;
        self.fly_to(center, zoom, duration);
    }

    /// `pan_to` with an explicit animation length.
    pub fn fly_to(&mut self, center: LngLat, zoom: f64, duration: Duration) {
        match self.engine.as_mut() {
            Some(engine) => engine.pan_to(center, zoom, duration),
            None => log::warn!(
                "pan on uninitialized surface '{}' ignored",
                self.container.id
            ),
        }
    }

    /// Releases the engine instance and every marker it owns. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.shutdown();
            log::info!("surface '{}' disposed", self.container.id);
        }
    }

    pub(crate) fn engine_mut(&mut self) -> Result<&mut (dyn MapEngine + 'static)> {
        self.engine
            .as_deref_mut()
            .ok_or(MapError::SurfaceNotInitialized)
    }

    pub fn center(&self) -> Option<LngLat> {
        self.engine.as_ref().map(|e| e.center())
    }

    pub fn zoom(&self) -> Option<f64> {
        self.engine.as_ref().map(|e| e.zoom())
    }

    pub fn marker_count(&self) -> usize {
        self.engine.as_ref().map_or(0, |e| e.marker_count())
    }

    pub fn has_marker(&self, id: &str) -> bool {
        self.engine.as_ref().is_some_and(|e| e.has_marker(id))
    }

    pub fn marker_position(&self, id: &str) -> Option<LngLat> {
        self.engine.as_ref().and_then(|e| e.marker_position(id))
    }
}

impl Drop for MapSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}
