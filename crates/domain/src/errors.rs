use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Container runtime error: {0}")]
    RuntimeError(String),

    #[error("Container runtime event stream ended")]
    EventStreamEnded,

    #[error("Upstream query timeout")]
    UpstreamTimeout,

    #[error("Upstream resolution failed: {0}")]
    UpstreamError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
