//! Serde models for the slices of the Docker Engine API this daemon
//! reads. Fields the engine may omit or null are `Option` and default
//! to empty during conversion.

use harbor_dns_domain::{ContainerSummary, NetworkAttachment};
use serde::Deserialize;
use std::collections::HashMap;

/// One entry of `GET /containers/json`. Only the id is used; the full
/// metadata comes from the per-container inspect call.
#[derive(Debug, Deserialize)]
pub struct ContainerListEntry {
    #[serde(rename = "Id")]
    pub id: String,
}

/// `GET /containers/{id}/json`, reduced to the identity fields.
#[derive(Debug, Deserialize)]
pub struct ContainerInspect {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Config")]
    pub config: Option<ContainerConfig>,
    #[serde(rename = "NetworkSettings")]
    pub network_settings: Option<NetworkSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContainerConfig {
    #[serde(rename = "Hostname", default)]
    pub hostname: String,
    #[serde(rename = "Labels")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkSettings {
    #[serde(rename = "Networks")]
    pub networks: Option<HashMap<String, EndpointSettings>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndpointSettings {
    #[serde(rename = "Aliases")]
    pub aliases: Option<Vec<String>>,
}

impl ContainerInspect {
    pub fn into_summary(self) -> ContainerSummary {
        let config = self.config.unwrap_or_default();
        let networks = self
            .network_settings
            .and_then(|settings| settings.networks)
            .unwrap_or_default()
            .into_iter()
            .map(|(network, endpoint)| NetworkAttachment {
                network,
                aliases: endpoint.aliases.unwrap_or_default(),
            })
            .collect();

        ContainerSummary {
            name: self.name,
            hostname: config.hostname,
            networks,
            labels: config.labels.unwrap_or_default(),
        }
    }
}

/// One message of the `GET /events` stream. Everything except the
/// resource kind and action is ignored.
#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Action", default)]
    pub action: String,
}
