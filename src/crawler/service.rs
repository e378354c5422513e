use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use crate::browser::chromium::ChromiumSession;
use crate::config::Config;
use crate::crawler::models::{LinkTable, ListingRecord};
use crate::crawler::{self, fetcher, parser};
use crate::storage;

pub struct ScrapingService {
    cfg: Config,
    client: reqwest::Client,
}

impl ScrapingService {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let client = fetcher::build_client(&cfg.user_agent)?;
        Ok(Self { cfg, client })
    }

    /// Run the whole pipeline: collect links, scrape each detail page,
    /// persist the result set in one shot. Returns the record count.
    pub async fn run(&self) -> anyhow::Result<usize> {
        let session = ChromiumSession::launch().await?;
        let links = crawler::collect_links(Box::new(session), &self.cfg).await;

        if links.is_empty() {
            warn!("No links collected; writing an empty result set");
        }

        let records = self.scrape_details(&links).await;

        storage::json::write_records(&self.cfg.output_path, &records).await?;
        info!(
            records = records.len(),
            path = %self.cfg.output_path,
            "Result set saved"
        );

        Ok(records.len())
    }

    /// Fetch every collected link in key order. A failed fetch is
    /// logged and skipped; it never aborts the run.
    async fn scrape_details(&self, links: &LinkTable) -> Vec<ListingRecord> {
        let mut records = Vec::new();

        for (key, link) in links.entries() {
            match fetcher::fetch_page(&self.client, link).await {
                Ok((status, body)) if status.is_success() => {
                    info!(%key, link, "Scraped detail page");
                    records.push(parser::extract_record(&body, link));
                }
                Ok((status, _)) => {
                    warn!(%key, link, %status, "Failed to retrieve detail page");
                }
                Err(e) => {
                    error!(%key, link, error = %e, "Request for detail page failed");
                }
            }

            // polite delay
            sleep(Duration::from_millis(self.cfg.fetch_delay_ms)).await;
        }

        records
    }
}
