//! Plain records describing a running container, decoupled from any
//! particular runtime client's object shapes, plus the rules that
//! derive DNS names from them.

use std::collections::{HashMap, HashSet};

/// Label keys a compose-managed container carries.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";
pub const COMPOSE_SERVICE_LABEL: &str = "com.docker.compose.service";

/// A container's attachment to one network, with its declared aliases.
#[derive(Debug, Clone, Default)]
pub struct NetworkAttachment {
    pub network: String,
    pub aliases: Vec<String>,
}

/// Identity metadata of one running container, read fresh on every
/// cache rebuild and never retained.
#[derive(Debug, Clone, Default)]
pub struct ContainerSummary {
    /// Display name as reported by the runtime, possibly with a
    /// leading `/`.
    pub name: String,
    pub hostname: String,
    pub networks: Vec<NetworkAttachment>,
    pub labels: HashMap<String, String>,
}

impl ContainerSummary {
    /// Every DNS name this container answers to: the stripped display
    /// name, the configured hostname, all network aliases, and for
    /// compose-managed containers both `<project>-<service>` and the
    /// bare service name.
    pub fn dns_names(&self) -> impl Iterator<Item = String> + '_ {
        let mut names: Vec<String> = Vec::with_capacity(4);

        names.push(self.name.trim_start_matches('/').to_string());
        names.push(self.hostname.clone());

        for attachment in &self.networks {
            names.extend(attachment.aliases.iter().cloned());
        }

        if let (Some(project), Some(service)) = (
            self.labels.get(COMPOSE_PROJECT_LABEL),
            self.labels.get(COMPOSE_SERVICE_LABEL),
        ) {
            names.push(format!("{project}-{service}"));
            names.push(service.clone());
        }

        names.into_iter().filter(|name| !name.is_empty())
    }
}

/// Accumulate the complete hostname set for one rebuild. Duplicates
/// across containers collapse; the result is installed wholesale by
/// the caller.
pub fn collect_hostnames(containers: &[ContainerSummary]) -> HashSet<String> {
    containers
        .iter()
        .flat_map(ContainerSummary::dns_names)
        .collect()
}
