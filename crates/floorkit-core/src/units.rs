//! Unit conversion utilities
//!
//! Converts real-world millimetres to layout pixels and back, snaps pixel
//! coordinates to a grid, and maps the percentage-of-image coordinates
//! produced by floor-plan analysis into pixel space.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default scale: one metre of shop floor spans 200 layout pixels.
pub const DEFAULT_PX_PER_MM: f64 = 0.2;

/// Millimetres per centimetre
pub const MM_PER_CM: f64 = 10.0;

/// Fixed millimetre-to-pixel scale for one editing session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Pixels per millimetre
    pub px_per_mm: f64,
}

impl Scale {
    /// Create a scale, falling back to the default for non-positive factors
    pub fn new(px_per_mm: f64) -> Self {
        if px_per_mm.is_finite() && px_per_mm > 0.0 {
            Self { px_per_mm }
        } else {
            tracing::warn!(
                "Invalid scale factor {}, using default {}",
                px_per_mm,
                DEFAULT_PX_PER_MM
            );
            Self::default()
        }
    }

    /// Millimetres to layout pixels
    pub fn to_pixels(&self, mm: f64) -> f64 {
        mm * self.px_per_mm
    }

    /// Layout pixels to millimetres
    pub fn to_millimeters(&self, px: f64) -> f64 {
        px / self.px_per_mm
    }

    /// Centimetres to layout pixels
    pub fn cm_to_pixels(&self, cm: f64) -> f64 {
        self.to_pixels(cm_to_mm(cm))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            px_per_mm: DEFAULT_PX_PER_MM,
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 mm = {} px", self.px_per_mm)
    }
}

/// Convert millimetres to pixels
///
/// * `mm` - Length in millimetres
/// * `scale` - Session scale
pub fn to_pixels(mm: f64, scale: Scale) -> f64 {
    scale.to_pixels(mm)
}

/// Convert pixels to millimetres
///
/// * `px` - Length in layout pixels
/// * `scale` - Session scale
pub fn to_millimeters(px: f64, scale: Scale) -> f64 {
    scale.to_millimeters(px)
}

/// Convert centimetres to millimetres
pub fn cm_to_mm(cm: f64) -> f64 {
    cm * MM_PER_CM
}

/// Convert millimetres to centimetres
pub fn mm_to_cm(mm: f64) -> f64 {
    mm / MM_PER_CM
}

/// Snap a pixel coordinate to the nearest multiple of `grid_px`.
///
/// A grid that is not a positive finite number leaves the value unsnapped.
pub fn snap(px: f64, grid_px: f64) -> f64 {
    if !(grid_px.is_finite() && grid_px > 0.0) {
        return px;
    }
    (px / grid_px).round() * grid_px
}

/// Map a percentage (0-100) of an extent into pixels
pub fn percent_to_pixels(percent: f64, extent_px: f64) -> f64 {
    percent / 100.0 * extent_px
}

/// Map pixels into a percentage (0-100) of an extent
///
/// Returns 0 for an empty extent.
pub fn pixels_to_percent(px: f64, extent_px: f64) -> f64 {
    if extent_px.abs() < f64::EPSILON {
        return 0.0;
    }
    px / extent_px * 100.0
}

/// Normalize an angle in degrees into `(-180, 180]`
pub fn normalize_degrees(degrees: f64) -> f64 {
    let mut d = degrees % 360.0;
    if d <= -180.0 {
        d += 360.0;
    } else if d > 180.0 {
        d -= 360.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_conversion() {
        let scale = Scale::new(0.5);
        assert_eq!(scale.to_pixels(100.0), 50.0);
        assert_eq!(scale.to_millimeters(50.0), 100.0);
        assert_eq!(scale.cm_to_pixels(10.0), 50.0);
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        assert_eq!(Scale::new(0.0), Scale::default());
        assert_eq!(Scale::new(-2.0), Scale::default());
        assert_eq!(Scale::new(f64::NAN), Scale::default());
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(14.0, 10.0), 10.0);
        assert_eq!(snap(15.0, 10.0), 20.0);
        assert_eq!(snap(-14.0, 10.0), -10.0);
        assert_eq!(snap(37.5, 0.0), 37.5);
        assert_eq!(snap(37.5, -5.0), 37.5);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent_to_pixels(25.0, 800.0), 200.0);
        assert_eq!(pixels_to_percent(200.0, 800.0), 25.0);
        assert_eq!(pixels_to_percent(200.0, 0.0), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }
}
