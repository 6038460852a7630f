//! Spec artifact retrieval, parsing, and canonicalization.
//!
//! Given a candidate spec URL discovered on a documentation page, this crate
//! fetches the artifact, decodes it as JSON-or-YAML, and re-serializes it to
//! indented JSON as the canonical form. Canonicalization is
//! format-normalizing, not content-validating: no schema checks, no `$ref`
//! resolution.
//!
//! Every failure (transport, parse, serialize) is converted to `None` at
//! this crate's boundary — a broken spec reference never aborts a crawl.

use std::time::Duration;

use reqwest::Client;
use specsift_shared::{DocTypeResult, Result, SpecDocument, SpecsiftError};
use tracing::{debug, info, instrument};
use url::Url;

/// Maximum number of redirects to follow when fetching a spec.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for spec retrieval.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Maximum response size we consider valid (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// User-Agent string for spec retrieval requests.
const USER_AGENT: &str = concat!("specsift/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// SpecResolver
// ---------------------------------------------------------------------------

/// Retrieves and canonicalizes spec artifacts.
pub struct SpecResolver {
    client: Client,
}

impl SpecResolver {
    /// Create a resolver with the default retrieval timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a resolver with a specific retrieval timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SpecsiftError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Retrieve `spec_url`, parse it, and build its canonical form.
    ///
    /// Returns `None` on any transport, parse, or serialization failure;
    /// failures are logged, not raised.
    #[instrument(skip_all, fields(url = %spec_url))]
    pub async fn resolve(
        &self,
        spec_url: &Url,
        doc_type: &DocTypeResult,
    ) -> Option<SpecDocument> {
        let raw = match self.retrieve(spec_url).await {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "spec retrieval failed");
                return None;
            }
        };

        let structured = match parse_spec_text(&raw) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "spec text decodes as neither JSON nor YAML");
                return None;
            }
        };

        let canonical_json = match serde_json::to_string_pretty(&structured)
            .map_err(|e| SpecsiftError::Serialize(e.to_string()))
        {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "canonical serialization failed");
                return None;
            }
        };

        info!(kind = %doc_type.kind, bytes = raw.len(), "spec resolved");

        Some(SpecDocument {
            source_url: spec_url.clone(),
            doc_type: *doc_type,
            raw,
            structured,
            canonical_json,
        })
    }

    async fn retrieve(&self, url: &Url) -> Result<String> {
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

        if let Some(len) = response.content_length() {
            if len > MAX_RESPONSE_SIZE {
                return Err(SpecsiftError::validation(format!(
                    "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
                )));
            }
        }

        response
            .text()
            .await
            .map_err(|e| SpecsiftError::Transport(format!("{url}: failed to read body: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse spec text as JSON first, and as YAML only if JSON parsing fails.
pub fn parse_spec_text(text: &str) -> Result<serde_json::Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str(text).map_err(|yaml_err| {
            SpecsiftError::parse(format!("not JSON ({json_err}) nor YAML ({yaml_err})"))
        }),
    }
}
