use async_trait::async_trait;

use crate::search::geocoder::{HTTP_CLIENT, PLACES_ENDPOINT};

/// Remote acceptance check for a candidate credential.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// One probe request. `false` on rejection and on any network or HTTP
    /// failure; never an error.
    async fn probe(&self, token: &str) -> bool;
}

/// Probes the map backend with a limit-1 forward geocode, the cheapest
/// request that exercises the credential.
pub struct RemoteTokenValidator {
    endpoint: String,
}

impl RemoteTokenValidator {
    pub fn new() -> Self {
        Self {
            endpoint: PLACES_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for RemoteTokenValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenValidator for RemoteTokenValidator {
    async fn probe(&self, token: &str) -> bool {
        let url = format!("{}/harare.json", self.endpoint);
        let result = HTTP_CLIENT
            .get(&url)
            .query(&[("access_token", token), ("limit", "1")])
            .send()
            .await;

        match result {
            Ok(response) => {
                let accepted = response.status().is_success();
                if !accepted {
                    log::warn!("credential probe rejected: HTTP {}", response.status());
                }
                accepted
            }
            Err(e) => {
                log::warn!("credential probe failed: {}", e);
                false
            }
        }
    }
}

/// Fixed-verdict validator for demos and tests.
pub struct StaticValidator {
    accept: bool,
}

impl StaticValidator {
    pub fn accepting() -> Self {
        Self { accept: true }
    }

    pub fn rejecting() -> Self {
        Self { accept: false }
    }
}

#[async_trait]
impl TokenValidator for StaticValidator {
    async fn probe(&self, _token: &str) -> bool {
        self.accept
    }
}
