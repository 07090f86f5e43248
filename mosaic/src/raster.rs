//! RGB raster buffer and polygon fill.

use geo::geometry::{Coord, Rect};
use image::{Rgb, RgbImage};
use nexrad::ProductKey;

use crate::C;

/// Affine map from planar (projected) coordinates to pixels.
///
/// Pixel rows grow downward while planar y grows northward, so the
/// vertical scale is negative and the origin sits at the planar
/// extent's northwest corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    scale: Coord<C>,
    translate: Coord<C>,
}

impl Transform {
    /// Returns the transform stretching `extent` over a `width` by
    /// `height` raster.
    pub fn new(extent: Rect<C>, width: u32, height: u32) -> Self {
        let scale = Coord {
            x: C::from(width) / extent.width(),
            y: -C::from(height) / extent.height(),
        };
        let translate = Coord {
            x: -extent.min().x,
            y: -extent.max().y,
        };
        Self { scale, translate }
    }

    pub fn apply(&self, Coord { x, y }: Coord<C>) -> Coord<C> {
        Coord {
            x: self.scale.x * (x + self.translate.x),
            y: self.scale.y * (y + self.translate.y),
        }
    }
}

/// A rendered product image.
#[derive(Debug, Clone)]
pub struct Raster {
    key: ProductKey,
    layers: usize,
    image: RgbImage,
}

impl Raster {
    /// Returns a raster filled with `background`.
    pub fn new(key: ProductKey, width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            key,
            layers: 0,
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn key(&self) -> &ProductKey {
        &self.key
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the number of scale-factor layers painted.
    pub fn layers(&self) -> usize {
        self.layers
    }

    pub(crate) fn set_layers(&mut self, layers: usize) {
        self.layers = layers;
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// Fills the polygon with vertices `points` (pixel space).
    ///
    /// A pixel is painted when its center falls inside the polygon
    /// (even-odd rule). Edges are half-open, so polygons sharing an
    /// edge never paint the same pixel twice and leave no gap. Fill
    /// overwrites, it does not blend.
    pub fn fill_polygon(&mut self, points: &[Coord<C>], color: Rgb<u8>) {
        if points.len() < 3 {
            return;
        }
        let (width, height) = (C::from(self.width()), C::from(self.height()));

        let (min_y, max_y) = points
            .iter()
            .fold((C::INFINITY, C::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let first_row = (min_y - 0.5).ceil().max(0.0);
        let end_row = (max_y - 0.5).ceil().min(height);

        let mut crossings = Vec::with_capacity(points.len());
        let mut row = first_row;
        while row < end_row {
            let center_y = row + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = &points[(i + 1) % points.len()];
                if (a.y <= center_y) != (b.y <= center_y) {
                    crossings.push(a.x + (center_y - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(C::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0);
                let end = (span[1] - 0.5).ceil().min(width);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let (start, end, y) = (start as u32, end as u32, row as u32);
                for x in start..end {
                    self.image.put_pixel(x, y, color);
                }
            }
            row += 1.0;
        }
    }
}
