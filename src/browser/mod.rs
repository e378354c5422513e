//! Capability interface over the browser automation engine.
//!
//! The pagination walker only ever talks to [`BrowserSession`]; the
//! chromiumoxide-backed implementation lives in [`chromium`].

pub mod chromium;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// A single exclusive browser session driving the paginated listing site.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load a URL, waiting for the navigation to settle.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Block until the element matching `selector` is present and
    /// interactive, or fail once `timeout` expires.
    async fn wait_until_interactive(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Read an attribute of the first element matching `selector`.
    /// Fails when no such element exists; `Ok(None)` when the element
    /// exists but carries no such attribute.
    async fn element_attr(&mut self, selector: &str, attr: &str) -> Result<Option<String>>;

    /// Click the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Full markup of the currently loaded document.
    async fn current_document(&mut self) -> Result<String>;

    /// Release the session. Must be called on every exit path.
    async fn close(self: Box<Self>) -> Result<()>;
}
