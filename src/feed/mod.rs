//! USGS earthquake feed: endpoints, wire decoding, background fetching,
//! and the filtered in-memory event catalog.

pub mod catalog;
pub mod event;
pub mod loader;
pub mod source;

pub use catalog::EventCatalog;
pub use event::SeismicEvent;
pub use loader::{FeedLoader, FeedResponse};
pub use source::FeedPeriod;
