use tracing_subscriber::EnvFilter;
use trichess::core::ClientConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    trichess::networking::run(config).await?;
    Ok(())
}
