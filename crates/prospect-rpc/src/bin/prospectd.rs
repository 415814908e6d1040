use std::io;

use prospect_core::EngineConfig;
use prospect_rpc::ProspectServer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> io::Result<()> {
    // stdout carries protocol frames; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let mode = std::env::var("PROSPECTD_TRANSPORT").unwrap_or_else(|_| "stdio".to_string());
    if mode.trim() != "stdio" {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "PROSPECTD_TRANSPORT must be stdio",
        ));
    }

    let config = EngineConfig::from_env();
    info!(sigma = config.sigma, range_policy = config.range_policy.label(), "starting prospectd");
    let server = ProspectServer::from_config(&config)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    server.serve_stdio()
}
