mod browser;
mod config;
mod crawler;
mod storage;

use config::Config;
use crawler::service::ScrapingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    let output_path = cfg.output_path.clone();

    let service = ScrapingService::new(cfg)?;
    let saved = service.run().await?;

    println!("\n==============================");
    println!("TOTAL ADS SCRAPED: {}", saved);
    println!("==============================\n");
    println!("Data saved to '{}'", output_path);

    Ok(())
}
