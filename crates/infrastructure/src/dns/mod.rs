pub mod server;
pub mod upstream;

pub use server::DnsServerHandler;
pub use upstream::UdpUpstream;
