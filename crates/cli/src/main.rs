//! # Harbor DNS
//!
//! Local DNS daemon for a container host: hostnames of running
//! containers resolve to 127.0.0.1, every other query is forwarded to
//! the first nameserver from the host's resolv.conf.

mod bootstrap;
mod server;

use anyhow::Context;
use clap::Parser;
use harbor_dns_application::{
    HostnameCache, RebuildHostnamesUseCase, ResolveQueryUseCase,
};
use harbor_dns_domain::{CliOverrides, ResolvConf};
use harbor_dns_infrastructure::{DnsServerHandler, DockerRuntime, UdpUpstream};
use harbor_dns_jobs::HostnameRefreshJob;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "harbor-dns")]
#[command(version)]
#[command(about = "Local DNS resolver for container hostnames")]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Resolver configuration supplying the upstream nameserver
    #[arg(long)]
    resolv_conf: Option<PathBuf>,

    /// Docker Engine API socket
    #[arg(long)]
    docker_socket: Option<PathBuf>,

    /// Upstream query timeout in seconds
    #[arg(long)]
    upstream_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = CliOverrides {
        bind_address: cli.bind,
        dns_port: cli.port,
        resolv_conf: cli.resolv_conf,
        docker_socket: cli.docker_socket,
        upstream_timeout_secs: cli.upstream_timeout,
    };

    let config = bootstrap::config::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::logging::init_logging(&config);

    // Read once at startup; later changes to the file are not observed.
    let resolv_conf = ResolvConf::load(&config.upstream.resolv_conf)
        .with_context(|| {
            format!(
                "failed to load resolver configuration from {}",
                config.upstream.resolv_conf.display()
            )
        })?;
    let upstream_addr = SocketAddr::new(
        resolv_conf.primary_nameserver()?,
        config.upstream.port,
    );
    info!(upstream = %upstream_addr, "Using upstream resolver");

    let runtime = Arc::new(DockerRuntime::new(&config.docker.socket));
    let cache = Arc::new(HostnameCache::new());
    let rebuild = Arc::new(RebuildHostnamesUseCase::new(
        runtime.clone(),
        cache.clone(),
    ));
    let resolver = ResolveQueryUseCase::new(cache);
    let upstream = UdpUpstream::new(
        upstream_addr,
        Duration::from_secs(config.upstream.timeout_secs),
    );
    let handler = DnsServerHandler::new(resolver, upstream);

    let shutdown = CancellationToken::new();
    let refresh_job =
        HostnameRefreshJob::new(rebuild, runtime).with_cancellation(shutdown.clone());
    let mut refresh_handle = tokio::spawn(refresh_job.run());

    let bind_addr = format!(
        "{}:{}",
        config.server.bind_address, config.server.dns_port
    );
    let mut server_handle = tokio::spawn(server::dns::start_dns_server(bind_addr, handler));

    tokio::select! {
        result = &mut refresh_handle => {
            server_handle.abort();
            match result? {
                // The sole cache writer is gone; a silently stale
                // cache is worse than a visible exit.
                Ok(()) => anyhow::bail!("hostname refresh job exited unexpectedly"),
                Err(e) => {
                    return Err(anyhow::Error::new(e).context("hostname refresh job failed"));
                }
            }
        }
        result = &mut server_handle => {
            shutdown.cancel();
            let _ = refresh_handle.await;
            result?.context("DNS server failed")?;
            anyhow::bail!("DNS server exited unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            shutdown.cancel();
            server_handle.abort();
            // An in-flight rebuild is allowed to finish.
            let _ = refresh_handle.await;
        }
    }

    info!("Exited");
    Ok(())
}
