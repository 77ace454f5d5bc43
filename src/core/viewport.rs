use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pixel width of the world at zoom 0 (one 256 px tile)
const WORLD_TILE_SIZE: f64 = 256.0;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level (fractional zooms allowed)
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Sets the center of the viewport, clamping latitude to the projectable
    /// range and wrapping longitude across the antimeridian
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(
            LatLng::clamp_lat(center.lat),
            LatLng::wrap_lng(center.lng),
        );
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// (standard slippy-map Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = WORLD_TILE_SIZE * 2_f64.powf(zoom.unwrap_or(self.zoom));
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();

        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * scale;

        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = WORLD_TILE_SIZE * 2_f64.powf(zoom.unwrap_or(self.zoom));

        let lng = pixel.x / scale * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * pixel.y / scale)).sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts a geographical coordinate to screen pixel coordinates
    /// (relative to the top-left corner of the viewport)
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let world = self.project(lat_lng, None);
        let origin = self.world_origin();
        world.subtract(&origin)
    }

    /// Converts screen pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.world_origin();
        self.unproject(&pixel.add(&origin), None)
    }

    /// World pixel coordinate of the viewport's top-left corner
    pub fn world_origin(&self) -> Point {
        let center_world = self.project(&self.center, None);
        Point::new(
            center_world.x - self.size.x / 2.0,
            center_world.y - self.size.y / 2.0,
        )
    }

    /// Pans the viewport by the given pixel offset
    pub fn pan(&mut self, delta: Point) {
        let center_world = self.project(&self.center, None);
        let new_center = self.unproject(&center_world.add(&delta), None);
        self.set_center(new_center);
    }

    /// Zooms the viewport to a specific level, keeping the geographic point
    /// under `focus_point` (screen coordinates) stationary when given
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 1e-9 {
            return;
        }

        match focus_point {
            Some(focus) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;

                // Shift the center so the focus point maps back to the same
                // screen position after the zoom change
                let new_focus_screen = self.lat_lng_to_pixel(&focus_lat_lng);
                self.pan(new_focus_screen.subtract(&focus));
            }
            None => {
                self.zoom = new_zoom;
            }
        }
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&Point::new(self.size.x, self.size.y));

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Fits the viewport to contain the given bounds with `padding` pixels on
    /// each side, never zooming in past `zoom_cap`.
    ///
    /// Degenerate bounds (a single event) would allow an unbounded zoom, so
    /// the cap also decides that case.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64, zoom_cap: f64) {
        let avail_x = (self.size.x - 2.0 * padding).max(1.0);
        let avail_y = (self.size.y - 2.0 * padding).max(1.0);

        // Bounds size in world pixels at zoom 0
        let nw = self.project(
            &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
            Some(0.0),
        );
        let se = self.project(
            &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
            Some(0.0),
        );
        let span_x = (se.x - nw.x).abs();
        let span_y = (se.y - nw.y).abs();

        let zoom_x = if span_x > 0.0 {
            (avail_x / span_x).log2()
        } else {
            f64::INFINITY
        };
        let zoom_y = if span_y > 0.0 {
            (avail_y / span_y).log2()
        } else {
            f64::INFINITY
        };

        let zoom = zoom_x
            .min(zoom_y)
            .min(zoom_cap)
            .clamp(self.min_zoom, self.max_zoom);

        self.set_center(bounds.center());
        self.set_zoom(zoom);
    }

}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(20.0, 0.0), 2.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, 2.0);
        assert_eq!(viewport.center.lat, 20.0);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_center_pixel_round_trip() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        let center = viewport.pixel_to_lat_lng(&Point::new(256.0, 256.0));
        assert!((center.lat - 0.0).abs() < 0.01);
        assert!((center.lng - 0.0).abs() < 0.01);

        let pixel = viewport.lat_lng_to_pixel(&LatLng::new(0.0, 0.0));
        assert!((pixel.x - 256.0).abs() < 0.01);
        assert!((pixel.y - 256.0).abs() < 0.01);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0); // Below minimum
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0); // Above maximum
        assert_eq!(viewport.zoom, 15.0);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 3.0, Point::new(512.0, 512.0));

        let before = viewport.center;
        viewport.pan(Point::new(64.0, 0.0));

        assert!(viewport.center.lng > before.lng);
        assert!((viewport.center.lat - before.lat).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_to_keeps_focus_stationary() {
        let mut viewport = Viewport::new(LatLng::new(20.0, 0.0), 3.0, Point::new(800.0, 600.0));

        let focus = Point::new(200.0, 150.0);
        let anchor = viewport.pixel_to_lat_lng(&focus);

        viewport.zoom_to(5.0, Some(focus));

        let after = viewport.lat_lng_to_pixel(&anchor);
        assert!((after.x - focus.x).abs() < 1.0);
        assert!((after.y - focus.y).abs() < 1.0);
    }

    #[test]
    fn test_pan_wraps_across_antimeridian() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 175.0), 3.0, Point::new(512.0, 512.0));

        // 64 px east at zoom 3 is 11.25 degrees, crossing the antimeridian
        viewport.pan(Point::new(64.0, 0.0));

        assert!((viewport.center.lng - (-173.75)).abs() < 0.01);

        viewport.set_center(LatLng::new(0.0, -190.0));
        assert!((viewport.center.lng - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_bounds_contains_bounds() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
        let bounds = LatLngBounds::from_coords(30.0, -125.0, 45.0, -110.0);

        viewport.fit_bounds(&bounds, 40.0, 6.0);

        let view = viewport.bounds();
        assert!(view.contains(&bounds.south_west));
        assert!(view.contains(&bounds.north_east));
        assert!(viewport.zoom <= 6.0);
    }

    #[test]
    fn test_fit_bounds_single_point_hits_cap() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
        let point = LatLng::new(38.3, 142.4);
        let bounds = LatLngBounds::new(point, point);

        viewport.fit_bounds(&bounds, 40.0, 6.0);

        assert_eq!(viewport.zoom, 6.0);
        assert!((viewport.center.lat - point.lat).abs() < 1e-9);
        assert!((viewport.center.lng - point.lng).abs() < 1e-9);
    }
}
