//! Core domain types for spec discovery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// DocType
// ---------------------------------------------------------------------------

/// The documentation tooling family a page was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Swagger UI or Redoc rendering an OpenAPI definition.
    OpenApi,
    /// A bare `swagger-ui` container element without a script signal.
    Swagger,
    /// Postman-published documentation.
    Postman,
    /// No known fingerprint matched.
    Unknown,
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DocType::OpenApi => "openapi",
            DocType::Swagger => "swagger",
            DocType::Postman => "postman",
            DocType::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// DocTypeResult
// ---------------------------------------------------------------------------

/// Classification outcome for a single page: tooling kind plus a confidence
/// score in `[0, 1]`. Pure value, produced once per page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocTypeResult {
    /// Detected tooling family.
    pub kind: DocType,
    /// Confidence of the fingerprint that matched.
    pub confidence: f32,
}

impl DocTypeResult {
    pub fn new(kind: DocType, confidence: f32) -> Self {
        Self { kind, confidence }
    }

    /// The no-match result: `Unknown` with zero confidence.
    pub fn unknown() -> Self {
        Self {
            kind: DocType::Unknown,
            confidence: 0.0,
        }
    }
}

impl Default for DocTypeResult {
    fn default() -> Self {
        Self::unknown()
    }
}

// ---------------------------------------------------------------------------
// SpecDocument
// ---------------------------------------------------------------------------

/// A retrieved and canonicalized API spec artifact.
///
/// Immutable once built. `canonical_json` is the re-serialized form of
/// `structured`, independent of whether the source was JSON or YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecDocument {
    /// Where the spec was fetched from.
    pub source_url: Url,
    /// Classification of the page that referenced this spec.
    pub doc_type: DocTypeResult,
    /// Raw text as retrieved.
    pub raw: String,
    /// Parsed structure (arbitrary nested maps/arrays/scalars).
    pub structured: serde_json::Value,
    /// Pretty-printed JSON canonical form.
    pub canonical_json: String,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A single visited documentation page and what was discovered on it.
///
/// Created by the crawl engine when a frontier URL is dequeued and fetched;
/// read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Absolute page URL.
    pub url: Url,
    /// Page title (from `<title>`, falling back to the first `<h1>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Main-content text, whitespace-collapsed.
    pub text_content: String,
    /// Tooling classification for this page.
    pub doc_type: DocTypeResult,
    /// Same-origin links discovered on this page (absolute, deduped).
    pub discovered_links: Vec<Url>,
    /// Spec artifact URL found on this page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_ref: Option<Url>,
    /// Resolved spec, if `spec_ref` was retrievable and parseable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<SpecDocument>,
    /// When the page was fetched.
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_type_display() {
        assert_eq!(DocType::OpenApi.to_string(), "openapi");
        assert_eq!(DocType::Unknown.to_string(), "unknown");
    }

    #[test]
    fn doc_type_result_unknown() {
        let r = DocTypeResult::unknown();
        assert_eq!(r.kind, DocType::Unknown);
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn page_serialization_roundtrip() {
        let page = Page {
            url: Url::parse("https://docs.example.com/api/").unwrap(),
            title: Some("API Reference".into()),
            text_content: "Welcome to the API".into(),
            doc_type: DocTypeResult::new(DocType::OpenApi, 0.9),
            discovered_links: vec![Url::parse("https://docs.example.com/api/auth").unwrap()],
            spec_ref: Some(Url::parse("https://docs.example.com/openapi.json").unwrap()),
            spec: None,
            fetched_at: Utc::now(),
        };

        let json = serde_json::to_string(&page).expect("serialize");
        let parsed: Page = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.url, page.url);
        assert_eq!(parsed.doc_type.kind, DocType::OpenApi);
        assert_eq!(parsed.discovered_links.len(), 1);
    }

    #[test]
    fn spec_document_serialization() {
        let structured = serde_json::json!({"openapi": "3.0.0", "paths": {}});
        let doc = SpecDocument {
            source_url: Url::parse("https://docs.example.com/openapi.json").unwrap(),
            doc_type: DocTypeResult::new(DocType::OpenApi, 0.9),
            raw: r#"{"openapi":"3.0.0","paths":{}}"#.into(),
            structured: structured.clone(),
            canonical_json: serde_json::to_string_pretty(&structured).unwrap(),
        };

        let json = serde_json::to_string(&doc).expect("serialize");
        let parsed: SpecDocument = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.structured["openapi"], "3.0.0");
    }
}
