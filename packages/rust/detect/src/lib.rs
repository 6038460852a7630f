//! HTML analysis for spec discovery.
//!
//! This crate provides the three pure, side-effect-free analyses the crawl
//! engine runs on every fetched page:
//! - [`classify`] — score HTML against documentation-tooling fingerprints
//! - [`find_spec_link`] — locate a direct spec-artifact reference
//! - [`extract_links`] — collect same-origin navigation links for the frontier

pub mod classifier;
pub mod links;
pub mod speclink;

pub use classifier::classify;
pub use links::extract_links;
pub use speclink::find_spec_link;
