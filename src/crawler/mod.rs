use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::crawler::models::LinkTable;

pub mod fetcher;
pub mod models;
pub mod parser;
pub mod service;

/// Pagination control on the listing pages; its class gains `inactive`
/// once the last page is reached.
const NEXT_SELECTOR: &str = "li.next";

/// Outcome of one look at the pagination state, decided in a single
/// place rather than scattered across the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    Continue,
    StopExhausted,
    StopCapped,
}

fn decide(next_class: &str, collected: usize, max_links: usize) -> WalkDecision {
    if next_class.split_whitespace().any(|c| c == "inactive") {
        WalkDecision::StopExhausted
    } else if collected >= max_links {
        WalkDecision::StopCapped
    } else {
        WalkDecision::Continue
    }
}

/// Walk the paginated listing index and accumulate unique detail-page
/// links, up to `cfg.max_links`.
///
/// The session is closed on every exit path. Any automation failure
/// aborts the walk and yields an empty table; callers can only tell
/// "aborted" from "zero listings" through the logs.
pub async fn collect_links(mut session: Box<dyn BrowserSession>, cfg: &Config) -> LinkTable {
    let result = walk(session.as_mut(), cfg).await;

    if let Err(e) = session.close().await {
        error!(error = %e, "Failed to close browser session");
    }

    match result {
        Ok(table) => {
            info!(count = table.len(), "Link collection finished");
            table
        }
        Err(e) => {
            error!(error = %e, "Pagination aborted, discarding partial links");
            LinkTable::new()
        }
    }
}

async fn walk(session: &mut dyn BrowserSession, cfg: &Config) -> Result<LinkTable> {
    let timeout = Duration::from_millis(cfg.next_timeout_ms);
    let mut table = LinkTable::new();

    session.navigate(&cfg.start_url).await?;

    loop {
        // Bounded readiness wait stands in for the page's async render;
        // expiry is a hard failure of the whole collection phase.
        session.wait_until_interactive(NEXT_SELECTOR, timeout).await?;

        let html = session.current_document().await?;
        let page_links = parser::extract_listing_links(&html, &cfg.base_url);
        debug!(found = page_links.len(), "Links on current page");

        for url in page_links {
            // Capacity check before the insert keeps len <= max_links
            // even for a cap of zero; remaining links on the page are
            // skipped for exact cap compliance.
            if table.len() >= cfg.max_links {
                info!(max_links = cfg.max_links, "Reached link cap mid-page");
                return Ok(table);
            }
            table.insert(url);
        }

        let next_class = session
            .element_attr(NEXT_SELECTOR, "class")
            .await?
            .unwrap_or_default();

        match decide(&next_class, table.len(), cfg.max_links) {
            WalkDecision::Continue => session.click(NEXT_SELECTOR).await?,
            WalkDecision::StopExhausted => {
                info!(count = table.len(), "Pagination exhausted");
                return Ok(table);
            }
            WalkDecision::StopCapped => {
                info!(count = table.len(), "Reached link cap");
                return Ok(table);
            }
        }
    }
}
