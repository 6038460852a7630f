//! Direct spec-artifact link discovery.
//!
//! Scans a page for references to machine-readable spec files
//! (`swagger.json`, `openapi.json`, `openapi.yml|yaml`,
//! `postman_collection.json`), first in tag attributes, then as absolute
//! URL literals in the raw text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use specsift_shared::SpecsiftError;
use tracing::debug;
use url::Url;

/// Spec file-name patterns, matched as case-insensitive substrings —
/// tooling frequently appends query parameters or hashes.
static SPEC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)swagger\.json|openapi\.json|openapi\.ya?ml|postman_collection\.json")
        .expect("spec name pattern")
});

/// Absolute URL literal ending in a spec file name, for the full-text phase.
static ABSOLUTE_SPEC_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)https?://[^"'<>\s]+(?:swagger\.json|openapi\.(?:json|ya?ml)|postman_collection\.json)"#,
    )
    .expect("absolute spec URL pattern")
});

/// Tag/attribute pairs scanned for spec references, in priority order.
const TAG_ATTRS: [(&str, &str); 3] = [("script", "src"), ("link", "href"), ("a", "href")];

/// Find a direct link to the underlying API spec file, if the page has one.
///
/// Tag attributes are scanned in priority order (script src, link href,
/// anchor href); the first matching value is resolved against `base`.
/// Relative values that fail to resolve are skipped, not fatal. If no tag
/// attribute matches, falls back to scanning the raw HTML for an absolute
/// URL literal.
pub fn find_spec_link(html: &str, base: &Url) -> Option<Url> {
    if html.trim().is_empty() {
        return None;
    }

    let doc = Html::parse_document(html);

    for (tag, attr) in TAG_ATTRS {
        let sel = Selector::parse(&format!("{tag}[{attr}]")).unwrap();
        for el in doc.select(&sel) {
            let Some(value) = el.value().attr(attr) else {
                continue;
            };
            if !SPEC_NAME.is_match(value) {
                continue;
            }
            match base.join(value) {
                Ok(resolved) => return Some(resolved),
                Err(e) => {
                    let err = SpecsiftError::resolution(format!("{value}: {e}"));
                    debug!(error = %err, "skipping unresolvable spec candidate");
                }
            }
        }
    }

    // Full-text fallback: absolute URL literals anywhere in the markup,
    // e.g. inside inline configuration scripts.
    ABSOLUTE_SPEC_URL
        .find(html)
        .and_then(|m| Url::parse(m.as_str()).ok())
}
