//! # NEXRAD mosaics
//!
//! `mosaic` composites FIS-B NEXRAD blocks into georeferenced
//! rasters, one per product type and time.
//!
//! Blocks are accumulated into [Mosaics] until the input is exhausted,
//! since a group's extent and output resolution are only known once
//! all of its blocks have arrived. Each [Group] is then projected with
//! a simplified Mercator, painted coarsest layer first, and written
//! out as a PNG.

pub mod emit;
mod error;
pub mod math;
mod mosaics;
mod palette;
mod raster;
mod render;

pub use crate::{
    error::MosaicError,
    mosaics::{Group, IngestStats, Ingested, Mosaics, Resolution, PIXELS_PER_DEGREE},
    palette::Palette,
    raster::{Raster, Transform},
    render::{layout, render, Layout, RenderOptions},
};
pub use nexrad;

/// Floating point type used for projected coordinates.
pub type C = f64;
