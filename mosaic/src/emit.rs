//! Raster output.

use crate::{raster::Raster, MosaicError};
use image::ImageFormat;
use nexrad::ProductKey;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Returns the output file name for `key`.
pub fn file_name(prefix: &str, key: &ProductKey) -> String {
    format!("{prefix}_{}_{}.png", key.product, key.time)
}

/// Writes `raster` as a PNG under `out_dir` and returns its path.
///
/// The image is written to a temporary sibling first and renamed into
/// place, so a failed write never leaves a truncated PNG behind.
/// Existing files are replaced.
pub fn write_png(raster: &Raster, out_dir: &Path, prefix: &str) -> Result<PathBuf, MosaicError> {
    let out_path = out_dir.join(file_name(prefix, raster.key()));
    let tmp_path = {
        let mut p = out_path.clone();
        p.set_extension("png.tmp");
        p
    };
    raster
        .image()
        .save_with_format(&tmp_path, ImageFormat::Png)?;
    fs::rename(&tmp_path, &out_path)?;
    Ok(out_path)
}
