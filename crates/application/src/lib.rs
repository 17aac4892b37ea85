//! Harbor DNS Application Layer
//!
//! Ports toward the container runtime, the shared hostname cache, and
//! the two use cases built on them: full cache rebuild and per-query
//! resolution.
pub mod hostname_cache;
pub mod ports;
pub mod use_cases;

pub use hostname_cache::HostnameCache;
pub use ports::{ContainerRuntime, RuntimeEvent};
pub use use_cases::{
    LocalRecord, RebuildHostnamesUseCase, ResolveQueryUseCase, Resolution,
};
