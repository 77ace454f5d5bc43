//! Magnitude-to-visual mapping for event markers.
//!
//! Radius grows exponentially with magnitude and is floored at a minimum
//! size; color comes from a fixed six-band palette where the highest
//! matching band wins.

use egui::Color32;

/// Smallest marker radius in pixels
pub const MARKER_MIN_RADIUS: f64 = 4.0;

/// Marker fill alpha (~0.7 opacity)
const MARKER_FILL_ALPHA: u8 = 178;

/// Six-band magnitude palette, strongest first
const PALETTE: [(f64, Color32); 5] = [
    (6.0, Color32::from_rgb(0x80, 0x00, 0x26)),
    (5.0, Color32::from_rgb(0xBD, 0x00, 0x26)),
    (4.0, Color32::from_rgb(0xE3, 0x1A, 0x1C)),
    (3.0, Color32::from_rgb(0xFC, 0x4E, 0x2A)),
    (2.0, Color32::from_rgb(0xFD, 0x8D, 0x3C)),
];

/// Fallback band for magnitudes below 2
const PALETTE_FLOOR: Color32 = Color32::from_rgb(0xFE, 0xB2, 0x4C);

/// Marker radius in pixels for a magnitude
pub fn magnitude_radius(magnitude: f64) -> f64 {
    2_f64.powf(magnitude / 1.5).max(MARKER_MIN_RADIUS)
}

/// Marker color for a magnitude
pub fn magnitude_color(magnitude: f64) -> Color32 {
    for (threshold, color) in PALETTE {
        if magnitude >= threshold {
            return color;
        }
    }
    PALETTE_FLOOR
}

/// Resolved visual attributes for one event marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub stroke_color: Color32,
    pub fill_color: Color32,
}

impl MarkerStyle {
    /// Derives the marker style for an event magnitude
    pub fn for_magnitude(magnitude: f64) -> Self {
        let color = magnitude_color(magnitude);
        Self {
            radius: magnitude_radius(magnitude),
            stroke_color: color,
            fill_color: Color32::from_rgba_unmultiplied(
                color.r(),
                color.g(),
                color.b(),
                MARKER_FILL_ALPHA,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_floor() {
        // 2^(0/1.5) = 1, well under the floor
        assert_eq!(magnitude_radius(0.0), MARKER_MIN_RADIUS);
        assert_eq!(magnitude_radius(1.0), MARKER_MIN_RADIUS);
    }

    #[test]
    fn test_radius_monotonic_and_never_below_floor() {
        let mut previous = 0.0;
        for step in 0..=70 {
            let magnitude = step as f64 / 10.0;
            let radius = magnitude_radius(magnitude);
            assert!(radius >= MARKER_MIN_RADIUS);
            assert!(radius >= previous, "radius shrank at magnitude {}", magnitude);
            previous = radius;
        }
    }

    #[test]
    fn test_radius_grows_exponentially() {
        // Above the floor, +1.5 magnitude doubles the radius
        let r4 = magnitude_radius(4.5);
        let r6 = magnitude_radius(6.0);
        assert!((r6 / r4 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_color_band_boundaries() {
        let darkest = Color32::from_rgb(0x80, 0x00, 0x26);
        let second = Color32::from_rgb(0xBD, 0x00, 0x26);

        assert_eq!(magnitude_color(6.0), darkest);
        assert_eq!(magnitude_color(7.5), darkest);
        assert_eq!(magnitude_color(5.9), second);
        assert_eq!(magnitude_color(5.0), second);
        assert_eq!(magnitude_color(4.9), Color32::from_rgb(0xE3, 0x1A, 0x1C));
        assert_eq!(magnitude_color(3.2), Color32::from_rgb(0xFC, 0x4E, 0x2A));
        assert_eq!(magnitude_color(2.0), Color32::from_rgb(0xFD, 0x8D, 0x3C));
        assert_eq!(magnitude_color(1.9), PALETTE_FLOOR);
        assert_eq!(magnitude_color(0.0), PALETTE_FLOOR);
    }

    #[test]
    fn test_marker_style_fill_is_translucent() {
        let style = MarkerStyle::for_magnitude(6.3);
        assert_eq!(style.stroke_color, Color32::from_rgb(0x80, 0x00, 0x26));
        assert!(style.fill_color.a() < 255);
        assert_eq!(style.radius, magnitude_radius(6.3));
    }
}
