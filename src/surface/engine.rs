use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::geo::LngLat;
use crate::markers::MarkerKind;
use crate::prelude::HashMap;
use crate::{MapError, Result};

/// Which third-party backend a surface drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    /// Vector-tile engine; requires a caller-supplied access token.
    Vector,
    /// Raster engine; requires a statically supplied API key.
    Raster,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Vector => write!(f, "vector"),
            EngineKind::Raster => write!(f, "raster"),
        }
    }
}

/// The contract both engine backends satisfy: marker add/move/remove by id,
/// animated pan/zoom, and shutdown that releases every owned marker.
pub trait MapEngine: Send {
    fn kind(&self) -> EngineKind;

    fn add_marker(&mut self, id: &str, kind: MarkerKind, position: LngLat) -> Result<()>;
    fn move_marker(&mut self, id: &str, position: LngLat) -> Result<()>;
    fn remove_marker(&mut self, id: &str) -> Result<()>;

    fn has_marker(&self, id: &str) -> bool;
    fn marker_position(&self, id: &str) -> Option<LngLat>;
    fn marker_count(&self) -> usize;

    /// Non-blocking animated recenter; later calls supersede earlier
    /// in-flight animations.
    fn pan_to(&mut self, center: LngLat, zoom: f64, duration: Duration);

    fn center(&self) -> LngLat;
    fn zoom(&self) -> f64;

    /// Releases the native instance and all markers. Called exactly once by
    /// the owning surface.
    fn shutdown(&mut self);
}

/// A marker as the engine holds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineMarker {
    pub kind: MarkerKind,
    pub position: LngLat,
}

/// Id-keyed marker storage shared by both backends.
#[derive(Default)]
pub struct MarkerTable {
    markers: HashMap<String, EngineMarker>,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self {
            markers: HashMap::default(),
        }
    }

    pub fn add(&mut self, id: &str, kind: MarkerKind, position: LngLat) -> Result<()> {
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "marker '{}' at {}",
                id, position
            )));
        }
        if self.markers.contains_key(id) {
            return Err(MapError::EngineInit(format!(
                "marker '{}' already exists",
                id
            )));
        }
        self.markers
            .insert(id.to_string(), EngineMarker { kind, position });
        Ok(())
    }

    pub fn reposition(&mut self, id: &str, position: LngLat) -> Result<()> {
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "marker '{}' at {}",
                id, position
            )));
        }
        match self.markers.get_mut(id) {
            Some(marker) => {
                marker.position = position;
                Ok(())
            }
            None => Err(MapError::EngineInit(format!("no marker '{}'", id))),
        }
    }

    pub fn remove(&mut self, id: &str) -> Result<()> {
        self.markers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MapError::EngineInit(format!("no marker '{}'", id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<LngLat> {
        self.markers.get(id).map(|m| m.position)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EngineMarker)> {
        self.markers.iter()
    }
}
