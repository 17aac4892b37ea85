//! Harbor DNS Infrastructure Layer
//!
//! Adapters behind the application ports: the Docker Engine API
//! client and the DNS server/upstream plumbing.
pub mod dns;
pub mod docker;

pub use dns::server::DnsServerHandler;
pub use dns::upstream::UdpUpstream;
pub use docker::DockerRuntime;
