use anyhow::Result;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rosrustext_spin_demo::config::Config;
use rosrustext_spin_demo::demo;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_args();
    if config.loops > 1 {
        warn!(loops = config.loops, "more than one driver loop: callbacks may overlap");
    }

    let report = demo::run(&config).await?;
    println!(
        "delivered={} max_concurrent={}",
        report.delivered, report.max_concurrent
    );
    Ok(())
}
