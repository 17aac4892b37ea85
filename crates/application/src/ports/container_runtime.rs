use async_trait::async_trait;
use futures::stream::BoxStream;
use harbor_dns_domain::{ContainerSummary, DomainError};

/// Resource kind that triggers a cache rebuild.
const CONTAINER_KIND: &str = "container";

/// One lifecycle notification from the runtime. Events carry a
/// resource kind (`container`, `network`, `image`, ...); only
/// container-scoped events are acted on.
#[derive(Debug, Clone)]
pub struct RuntimeEvent {
    pub resource_kind: String,
    pub action: String,
}

impl RuntimeEvent {
    pub fn is_container(&self) -> bool {
        self.resource_kind == CONTAINER_KIND
    }
}

pub type EventStream = BoxStream<'static, Result<RuntimeEvent, DomainError>>;

/// The container runtime collaborator: enumeration of running
/// containers and a live lifecycle event stream.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn running_containers(&self) -> Result<Vec<ContainerSummary>, DomainError>;

    /// Subscribe to lifecycle events. The stream suspends between
    /// events; it ending is an error condition for the subscriber.
    async fn lifecycle_events(&self) -> Result<EventStream, DomainError>;
}
