//! Minimal Docker Engine API client over the daemon's Unix socket.
//!
//! Speaks plain HTTP/1.1 with one connection per request; the event
//! subscription holds its connection open for the process lifetime.
//! Only the three read-only endpoints this daemon needs are
//! implemented: container list, container inspect, and the lifecycle
//! event stream.

use super::model::{ContainerInspect, ContainerListEntry, EventMessage};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use harbor_dns_application::ports::{ContainerRuntime, EventStream, RuntimeEvent};
use harbor_dns_domain::{ContainerSummary, DomainError};
use http::{header, Method, Request};
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tokio::net::UnixStream;
use tracing::{debug, trace};

pub struct DockerRuntime {
    socket_path: PathBuf,
}

impl DockerRuntime {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Issue one GET against the engine API and return the response
    /// body stream after checking the status line.
    async fn get(&self, path: &str) -> Result<Incoming, DomainError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            DomainError::RuntimeError(format!(
                "Failed to connect to Docker socket {}: {e}",
                self.socket_path.display()
            ))
        })?;

        let (mut sender, conn) = http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| {
                DomainError::RuntimeError(format!("Docker API handshake failed: {e}"))
            })?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                trace!(error = %e, "Docker API connection closed");
            }
        });

        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            // The engine ignores the value but HTTP/1.1 requires one.
            .header(header::HOST, "docker")
            .body(Empty::<Bytes>::new())
            .map_err(|e| {
                DomainError::RuntimeError(format!("Invalid Docker API request: {e}"))
            })?;

        let response = sender.send_request(request).await.map_err(|e| {
            DomainError::RuntimeError(format!("Docker API request {path} failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::RuntimeError(format!(
                "Docker API request {path} returned {status}"
            )));
        }

        Ok(response.into_body())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let body = self.get(path).await?;
        let bytes = body
            .collect()
            .await
            .map_err(|e| {
                DomainError::RuntimeError(format!("Docker API read of {path} failed: {e}"))
            })?
            .to_bytes();
        serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::RuntimeError(format!("Malformed Docker API response from {path}: {e}"))
        })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn running_containers(&self) -> Result<Vec<ContainerSummary>, DomainError> {
        let entries: Vec<ContainerListEntry> = self.get_json("/containers/json").await?;
        debug!(count = entries.len(), "Enumerated running containers");

        let mut containers = Vec::with_capacity(entries.len());
        for entry in entries {
            let inspect: ContainerInspect = self
                .get_json(&format!("/containers/{}/json", entry.id))
                .await?;
            containers.push(inspect.into_summary());
        }
        Ok(containers)
    }

    async fn lifecycle_events(&self) -> Result<EventStream, DomainError> {
        let body = self.get("/events").await?;
        let decoder = EventDecoder::new(body);

        let stream = futures::stream::try_unfold(decoder, |mut decoder| async move {
            match decoder.next_event().await? {
                Some(event) => Ok(Some((event, decoder))),
                None => Ok(None),
            }
        });
        Ok(stream.boxed())
    }
}

/// Incremental decoder for the event endpoint: a long-lived response
/// whose body is a sequence of JSON objects. Objects may arrive split
/// or coalesced across body frames, so decoding buffers until one
/// complete object is available.
struct EventDecoder {
    body: Incoming,
    buf: Vec<u8>,
}

impl EventDecoder {
    fn new(body: Incoming) -> Self {
        Self {
            body,
            buf: Vec::new(),
        }
    }

    /// `Ok(None)` means the engine closed the stream.
    async fn next_event(&mut self) -> Result<Option<RuntimeEvent>, DomainError> {
        loop {
            let decoded = {
                let mut iter = serde_json::Deserializer::from_slice(&self.buf)
                    .into_iter::<EventMessage>();
                match iter.next() {
                    Some(Ok(message)) => Some((message, iter.byte_offset())),
                    Some(Err(e)) if e.is_eof() => None,
                    Some(Err(e)) => {
                        return Err(DomainError::RuntimeError(format!(
                            "Malformed Docker event: {e}"
                        )))
                    }
                    None => None,
                }
            };

            if let Some((message, consumed)) = decoded {
                self.buf.drain(..consumed);
                trace!(kind = %message.kind, action = %message.action, "Docker event");
                return Ok(Some(RuntimeEvent {
                    resource_kind: message.kind,
                    action: message.action,
                }));
            }

            match self.body.frame().await {
                Some(Ok(frame)) => {
                    if let Some(data) = frame.data_ref() {
                        self.buf.extend_from_slice(data);
                    }
                }
                Some(Err(e)) => {
                    return Err(DomainError::RuntimeError(format!(
                        "Docker event stream read failed: {e}"
                    )))
                }
                None => return Ok(None),
            }
        }
    }
}
