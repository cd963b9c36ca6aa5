use secretsanta::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let app = secretsanta::app(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(bind = %config.bind_addr, public_url = %config.public_url, "secret santa listening");

    axum::serve(listener, app).await?;
    Ok(())
}
