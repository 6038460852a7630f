//! Same-origin navigation link extraction.
//!
//! Feeds the crawl frontier: anchors are collected only from
//! navigation-like and primary-content containers, resolved against the
//! page URL, and restricted to the page's own host so the crawl cannot
//! escape the documentation site.

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

/// Containers worth scanning for navigation: explicit landmarks plus
/// class/id hints for nav, menu, sidebar, TOC, and main content areas.
const CONTAINER_SELECTOR: &str = r#"nav, aside, main, article, [role="main"], [role="navigation"], [class*="nav"], [class*="menu"], [class*="sidebar"], [class*="toc"], [class*="content"], [class*="docs"], [id*="nav"], [id*="sidebar"], [id*="toc"], [id*="content"]"#;

/// Extract same-origin links from a page's navigation and content areas.
///
/// Returns absolute URLs with fragments stripped, deduplicated in
/// first-seen order. An empty result is a normal outcome, not an error.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let container_sel = Selector::parse(CONTAINER_SELECTOR).unwrap();
    let anchor_sel = Selector::parse("a[href]").unwrap();

    let base_host = base.host_str().unwrap_or("");
    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for container in doc.select(&container_sel) {
        for el in container.select(&anchor_sel) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };

            // Skip anchors, javascript:, mailto:
            if href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
            {
                continue;
            }

            let Ok(mut resolved) = base.join(href) else {
                continue;
            };
            resolved.set_fragment(None);

            // Same-origin restriction.
            if resolved.host_str().unwrap_or("") != base_host {
                continue;
            }

            if seen.insert(resolved.to_string()) {
                links.push(resolved);
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://docs.example.com/guide/").unwrap()
    }

    #[test]
    fn collects_links_from_nav_container() {
        let html = r#"<html><body>
            <nav>
                <a href="/guide/intro">Intro</a>
                <a href="./auth">Auth</a>
            </nav>
        </body></html>"#;
        let links = extract_links(html, &base());
        let as_strings: Vec<String> = links.iter().map(|u| u.to_string()).collect();
        assert!(as_strings.contains(&"https://docs.example.com/guide/intro".to_string()));
        assert!(as_strings.contains(&"https://docs.example.com/guide/auth".to_string()));
    }

    #[test]
    fn excludes_cross_origin_links() {
        let html = r#"<html><body>
            <nav>
                <a href="https://other.com/x">Elsewhere</a>
                <a href="/guide/local">Local</a>
            </nav>
        </body></html>"#;
        let links = extract_links(html, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].host_str(), Some("docs.example.com"));
    }

    #[test]
    fn collects_from_class_hinted_sidebar() {
        let html = r#"<html><body>
            <div class="docs-sidebar">
                <a href="/guide/endpoints">Endpoints</a>
            </div>
        </body></html>"#;
        let links = extract_links(html, &base());
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn ignores_anchors_outside_recognized_containers() {
        let html = r#"<html><body>
            <p><a href="/guide/stray">stray link in a bare paragraph</a></p>
        </body></html>"#;
        assert!(extract_links(html, &base()).is_empty());
    }

    #[test]
    fn empty_when_no_containers() {
        let html = "<html><body><p>Nothing here.</p></body></html>";
        assert!(extract_links(html, &base()).is_empty());
    }

    #[test]
    fn skips_fragment_javascript_and_mailto() {
        let html = r##"<html><body><nav>
            <a href="#section">Jump</a>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:team@example.com">Mail</a>
            <a href="/guide/real">Real</a>
        </nav></body></html>"##;
        let links = extract_links(html, &base());
        assert_eq!(links.len(), 1);
        assert!(links[0].path().ends_with("/real"));
    }

    #[test]
    fn dedupes_and_strips_fragments() {
        let html = r##"<html><body>
            <nav><a href="/guide/intro#one">A</a></nav>
            <main><a href="/guide/intro#two">B</a></main>
        </body></html>"##;
        let links = extract_links(html, &base());
        assert_eq!(links.len(), 1);
        assert!(links[0].fragment().is_none());
    }
}
