//! # Quakemap
//!
//! A native earthquake visualizer built on egui.
//!
//! The library fetches recent seismic events from the USGS GeoJSON summary
//! feeds, filters them by a user-adjustable minimum magnitude, and renders
//! them as colored, sized circle markers on an interactive slippy map with
//! popups and viewport auto-framing.

pub mod basemap;
pub mod core;
pub mod feed;
mod net;
pub mod style;
pub mod ui;

// Re-export public API
pub use crate::core::{
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    viewport::Viewport,
};

pub use crate::feed::{
    catalog::EventCatalog, event::SeismicEvent, loader::FeedLoader, source::FeedPeriod,
};

pub use crate::style::{magnitude_color, magnitude_radius, MarkerStyle};

pub use crate::ui::app::QuakeApp;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum QuakeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = QuakeError;
