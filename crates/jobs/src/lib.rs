pub mod hostname_refresh;

pub use hostname_refresh::HostnameRefreshJob;
