use serde::{Deserialize, Serialize};

use crate::core::geo::LngLat;
use crate::Result;

/// The slice of a `service_providers` row the map layer consumes: an id to
/// key the marker by, a label, a `[lng, lat]` coordinate, and an opaque
/// image URL. Everything else in the row belongs to other screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSite {
    pub id: String,
    pub name: String,
    pub location: LngLat,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProviderSite {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: LngLat) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            image_url: None,
        }
    }

    /// Decodes a JSON array of backend rows, dropping rows whose coordinate
    /// is out of range rather than failing the whole batch.
    pub fn from_rows(json: &str) -> Result<Vec<ProviderSite>> {
        let rows: Vec<ProviderSite> = serde_json::from_str(json)?;
        let total = rows.len();
        let sites: Vec<ProviderSite> = rows
            .into_iter()
            .filter(|site| {
                let ok = site.location.is_valid();
                if !ok {
                    log::warn!(
                        "dropping provider '{}' with out-of-range location {}",
                        site.id,
                        site.location
                    );
                }
                ok
            })
            .collect();
        log::debug!("decoded {}/{} provider rows", sites.len(), total);
        Ok(sites)
    }
}
