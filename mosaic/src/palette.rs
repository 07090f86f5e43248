//! Intensity bin colours.

use crate::MosaicError;
use image::Rgb;
use nexrad::{NexradError, ProductKey, MAX_INTENSITY};
use plotters::style::{Color, HSLColor};

/// (hue degrees, lightness) per intensity bin, fully saturated.
///
/// Sweeps from dark blue for bin 0 to light red for bin 7.
const INTENSITY_HL: [(f64, f64); MAX_INTENSITY as usize + 1] = [
    (240.0, 0.15),
    (240.0, 0.20),
    (200.0, 0.40),
    (160.0, 0.40),
    (120.0, 0.50),
    (80.0, 0.50),
    (40.0, 0.60),
    (0.0, 0.70),
];

/// Background for anything other than the national composite.
const REGIONAL_BACKGROUND_HL: (f64, f64) = (270.0, 0.10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    intensities: [Rgb<u8>; MAX_INTENSITY as usize + 1],
    regional_background: Rgb<u8>,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            intensities: INTENSITY_HL.map(hl_to_rgb),
            regional_background: hl_to_rgb(REGIONAL_BACKGROUND_HL),
        }
    }

    /// Returns the colour for an intensity bin.
    pub fn color_for(&self, intensity: u8) -> Result<Rgb<u8>, MosaicError> {
        self.intensities
            .get(usize::from(intensity))
            .copied()
            .ok_or(MosaicError::MalformedTile(NexradError::Intensity(
                intensity,
            )))
    }

    /// Returns the fill colour painted before any tiles.
    ///
    /// The national composite reuses bin 0 so empty areas read as "no
    /// echo"; regional products get a dim violet.
    pub fn background(&self, key: &ProductKey) -> Rgb<u8> {
        if key.is_conus() {
            self.intensities[0]
        } else {
            self.regional_background
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

fn hl_to_rgb((hue, lightness): (f64, f64)) -> Rgb<u8> {
    let (r, g, b) = HSLColor(hue / 360.0, 1.0, lightness)
        .to_backend_color()
        .rgb;
    Rgb([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::{Palette, ProductKey};
    use crate::MosaicError;
    use image::Rgb;

    #[test]
    fn test_hue_sweep() {
        let palette = Palette::new();

        let Rgb([r, g, b]) = palette.color_for(0).unwrap();
        assert!(b > r && b > g, "bin 0 should be blue, got {r},{g},{b}");

        let Rgb([r, g, b]) = palette.color_for(4).unwrap();
        assert!(g > r && g > b, "bin 4 should be green, got {r},{g},{b}");

        let Rgb([r, g, b]) = palette.color_for(7).unwrap();
        assert!(r > 250 && g == b && g < r, "bin 7 should be red, got {r},{g},{b}");
    }

    #[test]
    fn test_bins_are_distinct() {
        let palette = Palette::new();
        for a in 0..=7 {
            for b in (a + 1)..=7 {
                assert_ne!(palette.color_for(a).unwrap(), palette.color_for(b).unwrap());
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        let palette = Palette::new();
        assert!(matches!(
            palette.color_for(8),
            Err(MosaicError::MalformedTile(_))
        ));
    }

    #[test]
    fn test_background() {
        let palette = Palette::new();
        let conus = ProductKey::new("CONUS", "14:05");
        let regional = ProductKey::new("Regional", "14:05");
        assert_eq!(palette.background(&conus), palette.color_for(0).unwrap());
        let Rgb([r, g, b]) = palette.background(&regional);
        assert_ne!(Rgb([r, g, b]), palette.color_for(0).unwrap());
        assert!(b > g && r > g, "violet expected, got {r},{g},{b}");
    }
}
