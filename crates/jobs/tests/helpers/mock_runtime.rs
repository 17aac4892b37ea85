#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use harbor_dns_application::ports::{ContainerRuntime, EventStream, RuntimeEvent};
use harbor_dns_domain::{ContainerSummary, DomainError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

type EventResult = Result<RuntimeEvent, DomainError>;

/// In-memory stand-in for the container runtime: a fixed container
/// list, injectable failures, and a hand-fed lifecycle event channel.
pub struct MockContainerRuntime {
    containers: Arc<RwLock<Vec<ContainerSummary>>>,
    list_calls: Arc<AtomicU64>,
    should_fail: Arc<RwLock<bool>>,
    events_tx: Mutex<Option<mpsc::UnboundedSender<EventResult>>>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<EventResult>>>,
}

impl MockContainerRuntime {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded();
        Self {
            containers: Arc::new(RwLock::new(Vec::new())),
            list_calls: Arc::new(AtomicU64::new(0)),
            should_fail: Arc::new(RwLock::new(false)),
            events_tx: Mutex::new(Some(tx)),
            events_rx: Mutex::new(Some(rx)),
        }
    }

    pub fn with_containers(containers: Vec<ContainerSummary>) -> Self {
        let runtime = Self::new();
        // Freshly created lock, uncontended.
        *runtime.containers.try_write().unwrap() = containers;
        runtime
    }

    pub async fn set_containers(&self, containers: Vec<ContainerSummary>) {
        *self.containers.write().await = containers;
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::Relaxed)
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }

    /// Feed one lifecycle event to the subscriber.
    pub fn send_event(&self, resource_kind: &str, action: &str) {
        let guard = self.events_tx.lock().unwrap();
        if let Some(tx) = guard.as_ref() {
            tx.unbounded_send(Ok(RuntimeEvent {
                resource_kind: resource_kind.to_string(),
                action: action.to_string(),
            }))
            .expect("event subscriber dropped");
        }
    }

    /// Feed a stream error to the subscriber.
    pub fn send_event_error(&self, message: &str) {
        let guard = self.events_tx.lock().unwrap();
        if let Some(tx) = guard.as_ref() {
            tx.unbounded_send(Err(DomainError::RuntimeError(message.to_string())))
                .expect("event subscriber dropped");
        }
    }

    /// Drop the sender so the subscriber sees the stream end.
    pub fn close_events(&self) {
        self.events_tx.lock().unwrap().take();
    }
}

#[async_trait]
impl ContainerRuntime for MockContainerRuntime {
    async fn running_containers(&self) -> Result<Vec<ContainerSummary>, DomainError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        if *self.should_fail.read().await {
            return Err(DomainError::RuntimeError(
                "container enumeration failed".to_string(),
            ));
        }
        Ok(self.containers.read().await.clone())
    }

    async fn lifecycle_events(&self) -> Result<EventStream, DomainError> {
        let rx = self
            .events_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| DomainError::RuntimeError("events already subscribed".to_string()))?;
        Ok(rx.boxed())
    }
}

/// Container fixture mirroring a typical compose-managed service.
pub fn make_container(name: &str, hostname: &str) -> ContainerSummary {
    ContainerSummary {
        name: format!("/{name}"),
        hostname: hostname.to_string(),
        ..Default::default()
    }
}
