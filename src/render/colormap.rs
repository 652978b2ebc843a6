// Scalar-to-colour mapping for image canvases and colour bars

use image::Rgba;
use serde::{Deserialize, Serialize};

// Anchors are evenly spaced over [0, 1].
const SEISMIC: [[f64; 3]; 5] = [
    [0.0, 0.0, 0.3],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.5, 0.0, 0.0],
];

const GRAY: [[f64; 3]; 2] = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Seismic,
    Gray,
}

impl Colormap {
    fn anchors(self) -> &'static [[f64; 3]] {
        match self {
            Colormap::Seismic => &SEISMIC,
            Colormap::Gray => &GRAY,
        }
    }

    /// Colour at `t` in [0, 1]; values outside are clamped.
    pub fn color_at(self, t: f64) -> Rgba<u8> {
        let anchors = self.anchors();
        let segments = (anchors.len() - 1) as f64;
        let pos = t.clamp(0.0, 1.0) * segments;
        let lo = (pos.floor() as usize).min(anchors.len() - 2);
        let frac = pos - lo as f64;

        let channel = |c: usize| {
            let v = anchors[lo][c] + (anchors[lo + 1][c] - anchors[lo][c]) * frac;
            (v * 255.0).round() as u8
        };

        Rgba([channel(0), channel(1), channel(2), 255])
    }
}

/// Linear value normalisation onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub min: f64,
    pub max: f64,
}

impl Normalize {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate ranges (empty, inverted or non-finite) map everything to the
    /// midpoint. NaN values have no position.
    pub fn apply(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        if !self.is_valid() {
            return Some(0.5);
        }
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seismic_anchors() {
        let cmap = Colormap::Seismic;
        let low = cmap.color_at(0.0);
        assert_eq!(&low.0[..2], &[0u8, 0]);
        assert!((76..=77).contains(&low.0[2]));
        assert_eq!(cmap.color_at(0.25), Rgba([0, 0, 255, 255]));
        assert_eq!(cmap.color_at(0.5), Rgba([255, 255, 255, 255]));
        assert_eq!(cmap.color_at(0.75), Rgba([255, 0, 0, 255]));
        assert_eq!(cmap.color_at(1.0), Rgba([128, 0, 0, 255]));
        assert_eq!(cmap.color_at(7.0), cmap.color_at(1.0));
    }

    #[test]
    fn test_gray_interpolates() {
        assert_eq!(Colormap::Gray.color_at(0.5), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(Normalize::new(2.0, 2.0).apply(2.0), Some(0.5));
        assert_eq!(Normalize::new(f64::NAN, f64::NAN).apply(1.0), Some(0.5));
        assert_eq!(Normalize::new(f64::INFINITY, f64::NEG_INFINITY).apply(1.0), Some(0.5));
        assert_eq!(Normalize::new(0.0, 10.0).apply(f64::NAN), None);
    }

    #[test]
    fn test_normalize_clamps() {
        let norm = Normalize::new(0.0, 10.0);
        assert_eq!(norm.apply(5.0), Some(0.5));
        assert_eq!(norm.apply(-3.0), Some(0.0));
        assert_eq!(norm.apply(30.0), Some(1.0));
    }

    #[test]
    fn test_colormap_config_names() {
        let cmap: Colormap = serde_json::from_str("\"gray\"").unwrap();
        assert_eq!(cmap, Colormap::Gray);
    }
}
