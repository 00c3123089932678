use anyhow::Context;
use fnordload::Driver;
use fnordload::LoadConfig;
use fnordload::RedisStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = LoadConfig::from_env()?;
    let store = RedisStore::connect(config.redis_url.as_str())
        .await
        .with_context(|| format!("failed to connect to {}", config.redis_url))?;
    tracing::info!(
        redis_url = store.redis_url(),
        batch_size = config.batch_size,
        queue = %config.queue_key,
        inspect_pattern = %config.inspect_pattern,
        "connected, starting load"
    );

    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::info!("interrupt received, finishing current iteration");
            signal_token.cancel();
        }
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::warn!("second interrupt, exiting immediately");
            std::process::exit(130);
        }
    });

    let driver = Driver::new(store, config);
    let mut stdout = std::io::stdout().lock();
    driver.run(&mut stdout, cancellation).await?;

    Ok(())
}
