use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use github_lens::{config::Config, routes::routes, Lens, LensError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), LensError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "github_lens=info,warp=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid SERVER_HOST {}, falling back to 127.0.0.1", config.server_host);
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }),
        config.server_port,
    );

    tracing::info!(
        "Using {} (cache TTL {}s, timeout {}s)",
        config.api_base,
        config.cache_ttl.as_secs(),
        config.request_timeout.as_secs()
    );
    let lens = Arc::new(Lens::new(config)?);

    tracing::info!("GitHub Lens running on http://{}", addr);
    warp::serve(routes(lens)).run(addr).await;
    Ok(())
}
