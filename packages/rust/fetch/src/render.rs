//! Rendered-page fetching via WebDriver.
//!
//! JavaScript-heavy documentation shells serve an empty static page and
//! build the DOM client-side. The [`Renderer`] trait is the seam the fetch
//! gateway escalates to when a static fetch is insufficient.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use specsift_shared::{Result, SpecsiftError};
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// How often the renderer re-checks the page while waiting for idleness.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Fetches a fully rendered DOM snapshot for a URL.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `url` and return the page source once the page has settled,
    /// or best-effort at `idle_timeout`.
    async fn render(&self, url: &Url, idle_timeout: Duration) -> Result<String>;
}

// ---------------------------------------------------------------------------
// WebDriverRenderer
// ---------------------------------------------------------------------------

/// Renderer backed by a WebDriver endpoint (chromedriver, geckodriver,
/// selenium). A fresh session is opened per render and released on every
/// exit path.
pub struct WebDriverRenderer {
    webdriver_url: String,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
        }
    }

    /// Navigate and snapshot the DOM once the page has settled.
    ///
    /// WebDriver has no network-idle event, so idleness is approximated:
    /// `document.readyState == "complete"` plus two consecutive polls with
    /// an unchanged DOM size. At `idle_timeout` the current DOM is returned
    /// as-is rather than failing.
    async fn snapshot(client: &Client, url: &Url, idle_timeout: Duration) -> Result<String> {
        client
            .goto(url.as_str())
            .await
            .map_err(|e| SpecsiftError::Render(format!("{url}: {e}")))?;

        let deadline = Instant::now() + idle_timeout;
        let mut last_len: Option<usize> = None;

        loop {
            let ready = client
                .execute("return document.readyState", vec![])
                .await
                .ok()
                .and_then(|v| v.as_str().map(|s| s == "complete"))
                .unwrap_or(false);

            let source = client
                .source()
                .await
                .map_err(|e| SpecsiftError::Render(format!("{url}: page source: {e}")))?;

            if ready && last_len == Some(source.len()) {
                return Ok(source);
            }
            last_len = Some(source.len());

            if Instant::now() >= deadline {
                debug!(%url, "idle timeout reached, snapshotting current DOM");
                return Ok(source);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &Url, idle_timeout: Duration) -> Result<String> {
        let client = ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| {
                SpecsiftError::Render(format!(
                    "webdriver connect {}: {e}",
                    self.webdriver_url
                ))
            })?;

        let result = Self::snapshot(&client, url, idle_timeout).await;

        // The session must be released whether the snapshot succeeded or not.
        if let Err(e) = client.close().await {
            warn!(error = %e, "failed to close webdriver session");
        }

        result
    }
}

// ---------------------------------------------------------------------------
// NullRenderer
// ---------------------------------------------------------------------------

/// Renderer that always fails. Used when rendering is disabled so the
/// gateway's fallback path surfaces a render error instead of hanging on a
/// missing WebDriver endpoint.
pub struct NullRenderer;

#[async_trait]
impl Renderer for NullRenderer {
    async fn render(&self, url: &Url, _idle_timeout: Duration) -> Result<String> {
        Err(SpecsiftError::Render(format!("rendering disabled: {url}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_renderer_always_fails() {
        let url = Url::parse("https://docs.example.com/").unwrap();
        let err = NullRenderer
            .render(&url, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SpecsiftError::Render(_)));
    }
}
