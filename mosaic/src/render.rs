//! Mosaic compositing.

use crate::{
    math::{project_coord, project_rect},
    mosaics::{Group, Resolution},
    palette::Palette,
    raster::{Raster, Transform},
    MosaicError, C,
};
use geo::geometry::Rect;
use log::debug;
use nexrad::ProductKey;
use std::f64::consts::PI;

/// Knobs for [render].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Largest width or height, in pixels, a group may render to.
    pub max_dimension: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_dimension: 16_384,
        }
    }
}

/// Output geometry of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Finest resolution present, which sets pixel density.
    pub finest: Resolution,
    /// Planar extent of the group's bounds.
    pub extent: Rect<C>,
    pub width: u32,
    pub height: u32,
}

/// Computes the raster size and planar extent of `group`.
pub fn layout(
    key: &ProductKey,
    group: &Group,
    options: &RenderOptions,
) -> Result<Layout, MosaicError> {
    let empty = || MosaicError::EmptyMosaic(key.clone());

    let finest = group.finest().ok_or_else(empty)?;
    let pixels_per_degree = finest.pixels_per_degree();

    let extent = project_rect(group.bounds());
    let (dx, dy) = (extent.width(), extent.height());
    if !dx.is_finite() || !dy.is_finite() {
        return Err(empty());
    }

    // Planar spans are radians; scale back to degree-proportional pixels.
    let width = pixels_per_degree * 180.0 * dx / PI;
    let height = pixels_per_degree * 180.0 * dy / PI;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (width, height) = (width as u32, height as u32);
    if width == 0 || height == 0 {
        return Err(empty());
    }
    if width > options.max_dimension || height > options.max_dimension {
        return Err(MosaicError::TooLarge {
            key: key.clone(),
            width,
            height,
            limit: options.max_dimension,
        });
    }

    Ok(Layout {
        finest,
        extent,
        width,
        height,
    })
}

/// Composites every tile of `group` into a single raster.
///
/// Output density follows the group's finest resolution. Layers are
/// painted coarsest first so finer blocks overdraw coarser ones.
pub fn render(
    key: &ProductKey,
    group: &Group,
    palette: &Palette,
    options: &RenderOptions,
) -> Result<Raster, MosaicError> {
    let Layout {
        finest,
        extent,
        width,
        height,
    } = layout(key, group, options)?;
    debug!(
        "{key}: {width}x{height} at {} px/deg from scale factor {}",
        finest.pixels_per_degree(),
        finest.scale_factor()
    );

    let transform = Transform::new(extent, width, height);
    let mut raster = Raster::new(key.clone(), width, height, palette.background(key));

    for (_, tiles) in group.layers() {
        for tile in tiles {
            for cell in tile.cells() {
                let color = palette.color_for(cell.intensity())?;
                let quad = cell
                    .corners()
                    .map(|corner| transform.apply(project_coord(corner)));
                raster.fill_polygon(&quad, color);
            }
        }
    }
    raster.set_layers(group.layer_count());

    Ok(raster)
}
