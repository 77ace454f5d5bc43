use crate::core::geo::LatLngBounds;
use crate::feed::event::SeismicEvent;

/// Slider range for the minimum-magnitude threshold
pub const MIN_MAGNITUDE: f64 = 0.0;
pub const MAX_MAGNITUDE: f64 = 7.0;

/// The in-memory event collection plus the user's magnitude threshold.
///
/// This is the only state the viewer holds: events are replaced wholesale on
/// a period change, and the threshold re-filters the already-fetched data
/// without touching the network.
#[derive(Debug, Default)]
pub struct EventCatalog {
    events: Vec<SeismicEvent>,
    min_magnitude: f64,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the event collection with a freshly fetched one
    pub fn replace(&mut self, events: Vec<SeismicEvent>) {
        self.events = events;
    }

    /// Sets the minimum-magnitude threshold, clamped to the slider range
    pub fn set_min_magnitude(&mut self, threshold: f64) {
        self.min_magnitude = threshold.clamp(MIN_MAGNITUDE, MAX_MAGNITUDE);
    }

    pub fn min_magnitude(&self) -> f64 {
        self.min_magnitude
    }

    /// All fetched events, unfiltered
    pub fn all(&self) -> &[SeismicEvent] {
        &self.events
    }

    /// Events at or above the magnitude threshold
    pub fn visible(&self) -> impl Iterator<Item = &SeismicEvent> {
        self.events
            .iter()
            .filter(move |e| e.magnitude >= self.min_magnitude)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Bounding box of the visible events; `None` when the filtered set is
    /// empty, which tells the viewport fit to skip
    pub fn visible_bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.visible().map(|e| e.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn event(id: &str, magnitude: f64, lat: f64, lng: f64) -> SeismicEvent {
        SeismicEvent {
            id: id.to_string(),
            magnitude,
            place: format!("near {}", id),
            time_ms: Some(1_735_689_600_000),
            position: LatLng::new(lat, lng),
            depth_km: 10.0,
            url: None,
        }
    }

    #[test]
    fn test_filter_keeps_at_or_above_threshold() {
        let mut catalog = EventCatalog::new();
        catalog.replace(vec![
            event("a", 2.0, 10.0, 20.0),
            event("b", 4.0, 11.0, 21.0),
            event("c", 6.0, 12.0, 22.0),
        ]);
        catalog.set_min_magnitude(3.0);

        let visible: Vec<_> = catalog.visible().map(|e| e.magnitude).collect();
        assert_eq!(visible, vec![4.0, 6.0]);
        assert_eq!(catalog.visible_count(), 2);
    }

    #[test]
    fn test_filter_boundary_is_inclusive() {
        let mut catalog = EventCatalog::new();
        catalog.replace(vec![event("a", 3.0, 0.0, 0.0)]);
        catalog.set_min_magnitude(3.0);

        assert_eq!(catalog.visible_count(), 1);

        catalog.set_min_magnitude(3.1);
        assert_eq!(catalog.visible_count(), 0);
    }

    #[test]
    fn test_threshold_is_clamped() {
        let mut catalog = EventCatalog::new();

        catalog.set_min_magnitude(-1.0);
        assert_eq!(catalog.min_magnitude(), 0.0);

        catalog.set_min_magnitude(9.5);
        assert_eq!(catalog.min_magnitude(), 7.0);
    }

    #[test]
    fn test_zero_threshold_keeps_everything() {
        let mut catalog = EventCatalog::new();
        catalog.replace(vec![
            event("a", 0.0, 0.0, 0.0),
            event("b", 1.1, 1.0, 1.0),
        ]);

        assert_eq!(catalog.visible_count(), 2);
    }

    #[test]
    fn test_visible_bounds_covers_filtered_set() {
        let mut catalog = EventCatalog::new();
        catalog.replace(vec![
            event("a", 5.0, 35.0, -118.0),
            event("b", 5.5, 61.0, -150.0),
            event("c", 1.0, -45.0, 170.0), // filtered out below
        ]);
        catalog.set_min_magnitude(4.0);

        let bounds = catalog.visible_bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(35.0, -150.0));
        assert_eq!(bounds.north_east, LatLng::new(61.0, -118.0));
    }

    #[test]
    fn test_visible_bounds_empty_set() {
        let mut catalog = EventCatalog::new();
        catalog.replace(vec![event("a", 2.0, 0.0, 0.0)]);
        catalog.set_min_magnitude(6.0);

        assert!(catalog.visible_bounds().is_none());
    }

    #[test]
    fn test_replace_swaps_collection() {
        let mut catalog = EventCatalog::new();
        catalog.replace(vec![event("a", 2.0, 0.0, 0.0)]);
        catalog.replace(vec![event("b", 3.0, 1.0, 1.0), event("c", 4.0, 2.0, 2.0)]);

        assert_eq!(catalog.all().len(), 2);
        assert_eq!(catalog.all()[0].id, "b");
    }
}
