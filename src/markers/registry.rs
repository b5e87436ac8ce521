use crate::core::geo::LngLat;
use crate::markers::{MarkerKind, ProviderSite};
use crate::surface::MapSurface;
use crate::Result;

/// Engine-side id of the singleton self marker.
pub const USER_MARKER_ID: &str = "user-location";

type SelectCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Keeps the on-map marker set synchronized with its sources of truth: the
/// tracked self coordinate and the caller-supplied provider list.
///
/// A registry serves exactly one surface; markers it created die with that
/// surface's engine on dispose, after which [`MarkerRegistry::reset`] brings
/// the bookkeeping back in line.
pub struct MarkerRegistry {
    user_position: Option<LngLat>,
    provider_ids: Vec<String>,
    on_select: Option<SelectCallback>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self {
            user_position: None,
            provider_ids: Vec::new(),
            on_select: None,
        }
    }

    /// Creates the self marker if absent, otherwise repositions it. Never a
    /// second self marker on the same surface.
    pub fn upsert_user_marker(&mut self, surface: &mut MapSurface, position: LngLat) -> Result<()> {
        let engine = surface.engine_mut()?;
        if engine.has_marker(USER_MARKER_ID) {
            engine.move_marker(USER_MARKER_ID, position)?;
        } else {
            engine.add_marker(USER_MARKER_ID, MarkerKind::UserLocation, position)?;
        }
        self.user_position = Some(position);
        Ok(())
    }

    /// Full-replace of the provider marker set: every currently-registered
    /// provider marker is removed, then one marker is created per site in
    /// input order. Sites repeating an id are skipped with a warning.
    pub fn replace_provider_markers(
        &mut self,
        surface: &mut MapSurface,
        sites: &[ProviderSite],
        on_select: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<()> {
        let engine = surface.engine_mut()?;

        for id in self.provider_ids.drain(..) {
            if engine.has_marker(&id) {
                engine.remove_marker(&id)?;
            }
        }

        for site in sites {
            if engine.has_marker(&site.id) {
                log::warn!("duplicate provider id '{}' in marker input, skipping", site.id);
                continue;
            }
            engine.add_marker(&site.id, MarkerKind::Provider, site.location)?;
            self.provider_ids.push(site.id.clone());
        }

        log::debug!("provider markers replaced, {} live", self.provider_ids.len());
        self.on_select = Some(Box::new(on_select));
        Ok(())
    }

    /// Reports a primary input activation on a provider marker. Fires the
    /// selection callback exactly once per call and never moves the camera;
    /// recentring on selection is the caller's policy. Returns whether a
    /// live provider marker was hit.
    pub fn activate(&self, id: &str) -> bool {
        if !self.provider_ids.iter().any(|known| known == id) {
            log::debug!("activation on unknown marker '{}' ignored", id);
            return false;
        }
        if let Some(on_select) = &self.on_select {
            on_select(id);
        }
        true
    }

    /// Removes every registry-owned marker from a still-live surface.
    pub fn clear(&mut self, surface: &mut MapSurface) -> Result<()> {
        let engine = surface.engine_mut()?;
        for id in self.provider_ids.drain(..) {
            if engine.has_marker(&id) {
                engine.remove_marker(&id)?;
            }
        }
        if self.user_position.take().is_some() && engine.has_marker(USER_MARKER_ID) {
            engine.remove_marker(USER_MARKER_ID)?;
        }
        Ok(())
    }

    /// Forgets all bookkeeping without touching an engine; for use after the
    /// surface was disposed and the markers died with it.
    pub fn reset(&mut self) {
        self.user_position = None;
        self.provider_ids.clear();
        self.on_select = None;
    }

    pub fn user_position(&self) -> Option<LngLat> {
        self.user_position
    }

    pub fn provider_count(&self) -> usize {
        self.provider_ids.len()
    }

    pub fn provider_ids(&self) -> &[String] {
        &self.provider_ids
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
