//! Documentation tooling classifier.
//!
//! Scores a page's HTML against known fingerprints of API documentation
//! generators. Checks are ordered strongest-signal-first; the first match
//! wins and order is the tie-break when multiple weak signals could apply.

use scraper::{Html, Selector};
use specsift_shared::{DocType, DocTypeResult};

/// Classify a page's HTML by documentation tooling fingerprint.
///
/// Pure function of its input: no I/O, deterministic. Empty or
/// whitespace-only HTML short-circuits to `Unknown` with zero confidence.
pub fn classify(html: &str) -> DocTypeResult {
    if html.trim().is_empty() {
        return DocTypeResult::unknown();
    }

    let doc = Html::parse_document(html);

    // 1. Swagger UI / Redoc script reference — an OpenAPI renderer.
    let script_sel = Selector::parse("script[src]").unwrap();
    for el in doc.select(&script_sel) {
        if let Some(src) = el.value().attr("src") {
            let src = src.to_lowercase();
            if src.contains("swagger-ui") || src.contains("redoc") {
                return DocTypeResult::new(DocType::OpenApi, 0.9);
            }
        }
    }

    // 2. Bare swagger-ui container element without a script signal.
    let container_sel = Selector::parse("#swagger-ui").unwrap();
    if doc.select(&container_sel).next().is_some() {
        return DocTypeResult::new(DocType::Swagger, 0.8);
    }

    // 3. Link to Postman-published documentation.
    let anchor_sel = Selector::parse("a[href]").unwrap();
    for el in doc.select(&anchor_sel) {
        if let Some(href) = el.value().attr("href") {
            let href = href.to_lowercase();
            if href.contains("getpostman") || href.contains("documenter.getpostman.com") {
                return DocTypeResult::new(DocType::Postman, 0.7);
            }
        }
    }

    // 4. "Run in Postman" badge image.
    let img_sel = Selector::parse("img[alt]").unwrap();
    for el in doc.select(&img_sel) {
        if let Some(alt) = el.value().attr("alt") {
            if alt.to_lowercase().contains("run in postman") {
                return DocTypeResult::new(DocType::Postman, 0.6);
            }
        }
    }

    DocTypeResult::unknown()
}
