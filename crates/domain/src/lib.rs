//! Harbor DNS Domain Layer
pub mod config;
pub mod container;
pub mod errors;
pub mod resolv_conf;

pub use config::{CliOverrides, Config, ConfigError};
pub use container::{collect_hostnames, ContainerSummary, NetworkAttachment};
pub use errors::DomainError;
pub use resolv_conf::{ResolvConf, ResolvConfError, ResolvOption};
