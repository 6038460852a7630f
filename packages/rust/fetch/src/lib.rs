//! Page fetching for spec discovery.
//!
//! This crate provides:
//! - [`FetchGateway`] — static-first fetch with a single rendered fallback
//! - [`Renderer`] — the rendered-fetch seam, with [`WebDriverRenderer`]
//!   (fantoccini) and [`NullRenderer`] implementations

pub mod gateway;
pub mod render;

pub use gateway::FetchGateway;
pub use render::{NullRenderer, Renderer, WebDriverRenderer};
