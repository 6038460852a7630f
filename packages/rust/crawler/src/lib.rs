//! Documentation-site crawl orchestration.
//!
//! This crate provides:
//! - [`CrawlEngine`] — bounded breadth-first traversal running the per-page
//!   discovery pipeline (fetch → classify → spec link → resolve → expand)
//! - [`CrawlOutcome`] — everything a crawl gathered, in visit order
//! - [`CrawlObserver`] — the progress-event seam for CLIs and tests

pub mod engine;

pub use engine::{CrawlEngine, CrawlObserver, CrawlOutcome, SilentObserver};
