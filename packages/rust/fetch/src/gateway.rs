//! Dual-mode page fetching: cheap static HTTP first, rendered browser second.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use specsift_shared::{CrawlConfig, Result, SpecsiftError};
use tracing::{debug, instrument};
use url::Url;

use crate::render::Renderer;

/// User-Agent string for static fetches.
const USER_AGENT: &str = concat!("specsift/", env!("CARGO_PKG_VERSION"));

/// Obtains HTML for a URL, trying the static transport first and the
/// rendering collaborator second.
///
/// A static response only counts as success when it has a 2xx status AND a
/// body longer than the minimum content threshold — many documentation
/// shells render their real content client-side, and a short static body is
/// a strong signal of that. There is exactly one static→render fallback and
/// no further retries.
pub struct FetchGateway {
    client: Client,
    renderer: Arc<dyn Renderer>,
    render_idle_timeout: Duration,
    min_content_len: usize,
}

impl FetchGateway {
    /// Build a gateway from the crawl configuration and a renderer.
    pub fn new(config: &CrawlConfig, renderer: Arc<dyn Renderer>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.static_timeout_secs))
            .build()
            .map_err(|e| SpecsiftError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            renderer,
            render_idle_timeout: Duration::from_secs(config.render_idle_timeout_secs),
            min_content_len: config.min_content_len,
        })
    }

    /// Fetch HTML for `url`, escalating to the renderer when the static
    /// attempt fails or is insufficient and `allow_render` is set.
    #[instrument(skip(self), fields(url = %url, allow_render))]
    pub async fn fetch(&self, url: &Url, allow_render: bool) -> Result<String> {
        let static_err = match self.fetch_static(url).await {
            Ok(body) => return Ok(body),
            Err(e) => e,
        };

        if !allow_render {
            return Err(static_err);
        }

        debug!(error = %static_err, "static fetch insufficient, escalating to renderer");
        self.renderer.render(url, self.render_idle_timeout).await
    }

    async fn fetch_static(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SpecsiftError::Transport(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpecsiftError::Transport(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SpecsiftError::Transport(format!("{url}: body read failed: {e}")))?;

        if body.chars().count() <= self.min_content_len {
            return Err(SpecsiftError::Transport(format!(
                "{url}: body too short ({} chars, min {})",
                body.chars().count(),
                self.min_content_len
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Renderer stub returning canned HTML and counting invocations.
    struct StubRenderer {
        html: String,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl StubRenderer {
        fn new(html: &str) -> Self {
            Self {
                html: html.into(),
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Renderer for StubRenderer {
        async fn render(&self, _url: &Url, _idle_timeout: Duration) -> Result<String> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.html.clone())
        }
    }

    fn test_config() -> CrawlConfig {
        CrawlConfig::default()
    }

    fn long_body() -> String {
        "<html><body>".to_string() + &"documentation content ".repeat(50) + "</body></html>"
    }

    #[tokio::test]
    async fn static_success_skips_renderer() {
        let server = wiremock::MockServer::start().await;
        let body = long_body();

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(&body))
            .mount(&server)
            .await;

        let renderer = Arc::new(StubRenderer::new("<html>rendered</html>"));
        let gateway = FetchGateway::new(&test_config(), renderer.clone()).unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        let html = gateway.fetch(&url, true).await.unwrap();
        assert_eq!(html, body);
        assert_eq!(renderer.call_count(), 0);
    }

    #[tokio::test]
    async fn short_body_escalates_to_renderer() {
        let server = wiremock::MockServer::start().await;
        // 250 chars: a 2xx status but below the 300-char content threshold.
        let shell: String = "x".repeat(250);
        let rendered = long_body();

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(&shell))
            .mount(&server)
            .await;

        let renderer = Arc::new(StubRenderer::new(&rendered));
        let gateway = FetchGateway::new(&test_config(), renderer.clone()).unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        let html = gateway.fetch(&url, true).await.unwrap();
        assert_eq!(html, rendered);
        assert_eq!(renderer.call_count(), 1);
    }

    #[tokio::test]
    async fn short_body_without_render_is_an_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("x".repeat(250)))
            .mount(&server)
            .await;

        let renderer = Arc::new(StubRenderer::new("<html>rendered</html>"));
        let gateway = FetchGateway::new(&test_config(), renderer.clone()).unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        let err = gateway.fetch(&url, false).await.unwrap_err();
        assert!(matches!(err, SpecsiftError::Transport(_)));
        assert_eq!(renderer.call_count(), 0);
    }

    #[tokio::test]
    async fn non_success_status_escalates_to_renderer() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let rendered = long_body();
        let renderer = Arc::new(StubRenderer::new(&rendered));
        let gateway = FetchGateway::new(&test_config(), renderer.clone()).unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        let html = gateway.fetch(&url, true).await.unwrap();
        assert_eq!(html, rendered);
    }
}
