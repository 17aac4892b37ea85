pub mod rebuild_hostnames;
pub mod resolve_query;

pub use rebuild_hostnames::RebuildHostnamesUseCase;
pub use resolve_query::{LocalRecord, Resolution, ResolveQueryUseCase};
