pub mod geo;
pub mod viewport;
