mod config;
mod metrics;
mod prober;
mod report;
mod server;

use config::CheckerConfig;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    // Load config first to get log level
    let config = CheckerConfig::load().await?;
    let log_level = config.get_tracing_level()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("status_checker={}", log_level.as_str().to_lowercase()).parse()?,
            ),
        )
        .init();

    info!("Starting status_checker");

    let client = prober::http::build_client()?;
    let routes = server::routes(client);

    let addr: SocketAddr = ([0, 0, 0, 0], config.listen_port).into();
    info!("Listening on {}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
