use crate::hostname_cache::HostnameCache;
use crate::ports::ContainerRuntime;
use harbor_dns_domain::{collect_hostnames, DomainError};
use std::sync::Arc;
use tracing::info;

/// One full, non-incremental cache rebuild: enumerate every running
/// container, derive the complete hostname set, then install it with
/// a single `replace`. Calling `replace` per container would expose
/// partial snapshots to concurrent readers.
pub struct RebuildHostnamesUseCase {
    runtime: Arc<dyn ContainerRuntime>,
    cache: Arc<HostnameCache>,
}

impl RebuildHostnamesUseCase {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, cache: Arc<HostnameCache>) -> Self {
        Self { runtime, cache }
    }

    /// Returns the size of the installed snapshot.
    pub async fn execute(&self) -> Result<usize, DomainError> {
        let containers = self.runtime.running_containers().await?;
        let names = collect_hostnames(&containers);
        let count = names.len();

        info!(
            containers = containers.len(),
            hostnames = count,
            "Rebuilt container hostname cache"
        );

        self.cache.replace(names);
        Ok(count)
    }
}
