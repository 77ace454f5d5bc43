pub mod app;
pub mod map;
pub mod popup;

pub use app::QuakeApp;
pub use map::MapView;
pub use popup::EventPopup;
