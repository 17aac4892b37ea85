use harbor_dns_domain::{CliOverrides, Config};
use std::path::Path;
use tracing::info;

pub fn load_config(
    config_path: Option<&Path>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;

    info!(
        config_file = %config_path.map(|p| p.display().to_string()).unwrap_or_else(|| "default".to_string()),
        dns_port = config.server.dns_port,
        bind = %config.server.bind_address,
        resolv_conf = %config.upstream.resolv_conf.display(),
        docker_socket = %config.docker.socket.display(),
        "Configuration loaded"
    );

    Ok(config)
}
