//! Breadth-first documentation crawl engine.
//!
//! The engine starts from a root URL, performs a FIFO BFS restricted to the
//! root's origin, and runs the per-page pipeline on every fetched page:
//! classify → find spec link → resolve spec → extract frontier links.
//! A single unreachable page never aborts the crawl; partial results are
//! valid output.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use scraper::{Html, Selector};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

use specsift_detect::{classify, extract_links, find_spec_link};
use specsift_fetch::{FetchGateway, WebDriverRenderer};
use specsift_resolver::SpecResolver;
use specsift_shared::{CrawlConfig, Page, Result, SpecDocument, SpecsiftError};

// ---------------------------------------------------------------------------
// CrawlOutcome
// ---------------------------------------------------------------------------

/// Summary of a completed crawl operation.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Pages successfully fetched, in visit order.
    pub pages: Vec<Page>,
    /// Pages skipped (already visited, fetch failed, budget).
    pub pages_skipped: usize,
    /// Errors encountered (URL, error message). Informational only.
    pub errors: Vec<(String, String)>,
    /// Total duration of the crawl, both passes included.
    pub duration: Duration,
    /// Whether the results come from the rendered re-run.
    pub rendered_pass: bool,
}

impl CrawlOutcome {
    /// The first resolved spec encountered in visit order, if any.
    pub fn first_spec(&self) -> Option<&SpecDocument> {
        self.pages.iter().find_map(|p| p.spec.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Progress event sink. Keeps observability out of the engine's control
/// flow; all decision logic is independent of what observers do.
pub trait CrawlObserver: Send + Sync {
    /// Called when a crawl pass starts.
    fn pass_started(&self, _rendered: bool) {}
    /// Called after each page is fetched and processed.
    fn page_visited(&self, _url: &Url, _visited: usize) {}
    /// Called when a spec reference is found on a page.
    fn spec_discovered(&self, _url: &Url) {}
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl CrawlObserver for SilentObserver {}

// ---------------------------------------------------------------------------
// CrawlEngine
// ---------------------------------------------------------------------------

/// Orchestrates the bounded breadth-first traversal of a documentation site.
pub struct CrawlEngine {
    gateway: FetchGateway,
    resolver: SpecResolver,
    config: CrawlConfig,
}

/// Results of one crawl pass.
struct PassData {
    pages: Vec<Page>,
    pages_skipped: usize,
    errors: Vec<(String, String)>,
}

impl CrawlEngine {
    /// Create an engine with the default WebDriver renderer.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let renderer = Arc::new(WebDriverRenderer::new(&config.webdriver_url));
        let gateway = FetchGateway::new(&config, renderer)?;
        let resolver = SpecResolver::with_timeout(config.static_timeout_secs)?;
        Ok(Self::with_components(gateway, resolver, config))
    }

    /// Create an engine from pre-built components (custom renderers, tests).
    pub fn with_components(
        gateway: FetchGateway,
        resolver: SpecResolver,
        config: CrawlConfig,
    ) -> Self {
        Self {
            gateway,
            resolver,
            config,
        }
    }

    /// Crawl the site rooted at `root` and return everything gathered.
    ///
    /// Runs one pass with rendering per `allow_render_initially`. If that
    /// pass produces no page carrying a spec reference (including the
    /// degenerate case of zero fetchable pages), the whole crawl is re-run
    /// once from scratch with rendering enabled for every fetch — a site
    /// that needs JavaScript to build its navigation needs it uniformly.
    ///
    /// The only fatal error is an invalid root URL.
    #[instrument(skip_all, fields(root = %root))]
    pub async fn crawl(&self, root: &Url, observer: &dyn CrawlObserver) -> Result<CrawlOutcome> {
        validate_root(root)?;
        let start = Instant::now();

        info!(
            max_pages = self.config.max_pages,
            max_duration_secs = self.config.max_duration_secs,
            single_page = self.config.single_page,
            "starting crawl"
        );

        let first = self
            .crawl_pass(root, self.config.allow_render_initially, observer)
            .await;

        let needs_render_retry = !self.config.allow_render_initially
            && first.pages.iter().all(|p| p.spec_ref.is_none());

        let (pass, rendered_pass) = if needs_render_retry {
            info!("no spec reference found statically, re-crawling with rendering");
            (self.crawl_pass(root, true, observer).await, true)
        } else {
            (first, self.config.allow_render_initially)
        };

        let outcome = CrawlOutcome {
            pages: pass.pages,
            pages_skipped: pass.pages_skipped,
            errors: pass.errors,
            duration: start.elapsed(),
            rendered_pass,
        };

        info!(
            pages = outcome.pages.len(),
            pages_skipped = outcome.pages_skipped,
            errors = outcome.errors.len(),
            specs = outcome.pages.iter().filter(|p| p.spec.is_some()).count(),
            duration_ms = outcome.duration.as_millis(),
            rendered = outcome.rendered_pass,
            "crawl completed"
        );

        Ok(outcome)
    }

    /// One full traversal from scratch: fresh frontier, visited set, and
    /// spec cache.
    async fn crawl_pass(
        &self,
        root: &Url,
        allow_render: bool,
        observer: &dyn CrawlObserver,
    ) -> PassData {
        observer.pass_started(allow_render);

        let deadline = Instant::now() + Duration::from_secs(self.config.max_duration_secs);
        let mut frontier: VecDeque<Url> = VecDeque::from([root.clone()]);
        let mut visited: HashSet<String> = HashSet::new();
        // Resolved specs keyed by URL. Failed resolutions are cached too, so
        // a spec referenced from many pages is fetched at most once per pass.
        let mut spec_cache: HashMap<Url, Option<SpecDocument>> = HashMap::new();
        let mut pages: Vec<Page> = Vec::new();
        let mut pages_skipped: usize = 0;
        let mut errors: Vec<(String, String)> = Vec::new();

        while let Some(url) = frontier.pop_front() {
            if pages.len() >= self.config.max_pages {
                warn!(max_pages = self.config.max_pages, "page budget exhausted");
                break;
            }
            if Instant::now() >= deadline {
                warn!(
                    max_duration_secs = self.config.max_duration_secs,
                    "wall-clock budget exhausted"
                );
                break;
            }

            // Dedupe at pop time, not only at enqueue time: two frontier
            // entries for the same URL must not cause a second fetch.
            if !visited.insert(normalize_url(&url)) {
                pages_skipped += 1;
                continue;
            }

            let html = match self.gateway.fetch(&url, allow_render).await {
                Ok(html) => html,
                Err(e) => {
                    debug!(%url, error = %e, "fetch failed, skipping page");
                    errors.push((url.to_string(), e.to_string()));
                    pages_skipped += 1;
                    continue;
                }
            };

            let doc_type = classify(&html);
            let (title, text_content) = extract_title_and_text(&html);

            let spec_ref = find_spec_link(&html, &url);
            let spec = match &spec_ref {
                Some(spec_url) => {
                    observer.spec_discovered(spec_url);
                    match spec_cache.get(spec_url) {
                        Some(cached) => cached.clone(),
                        None => {
                            let resolved = self.resolver.resolve(spec_url, &doc_type).await;
                            spec_cache.insert(spec_url.clone(), resolved.clone());
                            resolved
                        }
                    }
                }
                None => None,
            };

            let discovered_links = if self.config.single_page {
                Vec::new()
            } else {
                extract_links(&html, &url)
            };

            for link in &discovered_links {
                if !visited.contains(&normalize_url(link)) {
                    frontier.push_back(link.clone());
                }
            }

            pages.push(Page {
                url: url.clone(),
                title,
                text_content,
                doc_type,
                discovered_links,
                spec_ref,
                spec,
                fetched_at: Utc::now(),
            });
            observer.page_visited(&url, pages.len());
        }

        PassData {
            pages,
            pages_skipped,
            errors,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The root URL is the only input whose invalidity is fatal.
fn validate_root(root: &Url) -> Result<()> {
    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(SpecsiftError::validation(format!(
            "root URL must be http or https: {root}"
        )));
    }
    if root.host_str().is_none_or(str::is_empty) {
        return Err(SpecsiftError::validation(format!(
            "root URL has no host: {root}"
        )));
    }
    Ok(())
}

/// Normalize a URL for deduplication (strip fragment, trailing slash).
fn normalize_url(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    let mut s = normalized.to_string();
    // Remove trailing slash for consistency (except root path)
    if s.ends_with('/') && s.matches('/').count() > 3 {
        s.pop();
    }
    s
}

/// Extract the page title (`<title>`, falling back to the first `<h1>`)
/// and the whitespace-collapsed main-content text.
fn extract_title_and_text(html: &str) -> (Option<String>, String) {
    let doc = Html::parse_document(html);

    let title_sel = Selector::parse("title").unwrap();
    let h1_sel = Selector::parse("h1").unwrap();
    let title = doc
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            doc.select(&h1_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
        });

    let content_sel = Selector::parse(r#"main, article, [role="main"]"#).unwrap();
    let body_sel = Selector::parse("body").unwrap();
    let text = doc
        .select(&content_sel)
        .next()
        .or_else(|| doc.select(&body_sel).next())
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    (title, text)
}
