use futures::StreamExt;
use harbor_dns_application::ports::ContainerRuntime;
use harbor_dns_application::RebuildHostnamesUseCase;
use harbor_dns_domain::DomainError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// The sole writer of the hostname cache.
///
/// Performs one rebuild up front so the cache is warm before the
/// first query, then rebuilds after every container-scoped lifecycle
/// event. Events for other resource kinds are ignored.
///
/// Any runtime failure (enumeration, event read, stream end) ends the
/// job with an error: there is no degraded mode in which a stale
/// cache keeps serving, and the stream is not re-established. The
/// caller is expected to treat a job error as fatal to the process.
pub struct HostnameRefreshJob {
    rebuild: Arc<RebuildHostnamesUseCase>,
    runtime: Arc<dyn ContainerRuntime>,
    shutdown: CancellationToken,
}

impl HostnameRefreshJob {
    pub fn new(
        rebuild: Arc<RebuildHostnamesUseCase>,
        runtime: Arc<dyn ContainerRuntime>,
    ) -> Self {
        Self {
            rebuild,
            runtime,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Run until cancelled (`Ok`) or until the runtime collaborator
    /// fails (`Err`).
    pub async fn run(self) -> Result<(), DomainError> {
        info!("Hostname refresh job starting, performing initial rebuild");
        self.rebuild.execute().await?;

        let mut events = self.runtime.lifecycle_events().await?;
        info!("Subscribed to container lifecycle events");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Hostname refresh job: shutting down");
                    return Ok(());
                }
                event = events.next() => match event {
                    Some(Ok(event)) if event.is_container() => {
                        debug!(action = %event.action, "Container event, rebuilding cache");
                        self.rebuild.execute().await?;
                    }
                    Some(Ok(event)) => {
                        debug!(
                            kind = %event.resource_kind,
                            action = %event.action,
                            "Ignoring non-container event"
                        );
                    }
                    Some(Err(e)) => return Err(e),
                    None => return Err(DomainError::EventStreamEnded),
                }
            }
        }
    }
}
