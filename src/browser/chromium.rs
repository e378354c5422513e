//! Chromium-backed [`BrowserSession`] using chromiumoxide.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;

use super::BrowserSession;

const NAV_TIMEOUT_MS: u64 = 30_000;
const POLL_INTERVAL_MS: u64 = 250;

/// Locate the Chromium binary: explicit env override first, then PATH.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("CHROME_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }
    None
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
}

impl ChromiumSession {
    /// Launch a headless Chromium instance and open a blank page.
    pub async fn launch() -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found; set CHROME_PATH or install google-chrome")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;

        Ok(Self { browser, page })
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> Result<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("JS evaluation failed")?;
        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert JS result: {e:?}"))
    }
}

fn js_str(s: &str) -> String {
    // JSON string literal doubles as a JS one.
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".into())
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let result = tokio::time::timeout(
            Duration::from_millis(NAV_TIMEOUT_MS),
            self.page.goto(url),
        )
        .await;

        match result {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => bail!("navigation to {url} failed: {e}"),
            Err(_) => bail!("navigation to {url} timed out after {NAV_TIMEOUT_MS}ms"),
        }
    }

    async fn wait_until_interactive(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let script = format!("!!document.querySelector({})", js_str(selector));

        loop {
            if self.eval::<bool>(script.clone()).await.unwrap_or(false) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!(
                    "element {selector} not interactive after {}ms",
                    timeout.as_millis()
                );
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    async fn element_attr(&mut self, selector: &str, attr: &str) -> Result<Option<String>> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); \
             if (!el) return null; \
             return {{ value: el.getAttribute({attr}) }}; }})()",
            sel = js_str(selector),
            attr = js_str(attr),
        );

        #[derive(serde::Deserialize)]
        struct AttrResult {
            value: Option<String>,
        }

        let result: Option<AttrResult> = self.eval(script).await?;
        match result {
            Some(r) => Ok(r.value),
            None => bail!("element {selector} not found"),
        }
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); \
             if (!el) return false; el.click(); return true; }})()",
            sel = js_str(selector),
        );
        let clicked: bool = self.eval(script).await?;
        if !clicked {
            bail!("element {selector} not found, cannot click");
        }

        // A pagination click triggers a page load; settle it here so a
        // later document or attribute read cannot observe the pre-click
        // page. Bounded: a click that navigates nowhere falls through.
        let _ = tokio::time::timeout(
            Duration::from_millis(NAV_TIMEOUT_MS),
            self.page.wait_for_navigation(),
        )
        .await;

        Ok(())
    }

    async fn current_document(&mut self) -> Result<String> {
        self.eval("document.documentElement.outerHTML".to_string())
            .await
            .context("failed to read current document")
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        let _ = self.page.close().await;
        let _ = self.browser.close().await;
        Ok(())
    }
}
