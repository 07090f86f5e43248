mod options;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use mosaic::{
    emit, layout, nexrad::ProductKey, render, Group, MosaicError, Mosaics, Palette, RenderOptions,
};
use options::Cli;
use rayon::prelude::*;
use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let (mosaics, lines) = ingest(open_input(cli.input.as_deref())?)?;
    let stats = mosaics.stats();
    info!(
        "read {lines} lines: {} tiles, {} ignored, {} rejected, {} images",
        stats.accepted,
        stats.ignored,
        stats.rejected,
        mosaics.len()
    );

    let options = RenderOptions {
        max_dimension: cli.max_dimension,
    };

    if cli.dry_run {
        for (key, group) in mosaics.iter() {
            match layout(key, group, &options) {
                Ok(layout) => report(key, layout.width, layout.height, group.layer_count()),
                Err(e) => warn!("{key}: {e}"),
            }
        }
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    let written = match cli.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()?
            .install(|| render_all(&mosaics, &options, &cli)),
        None => render_all(&mosaics, &options, &cli),
    };
    info!("wrote {written} of {} images", mosaics.len());

    Ok(())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Reads every line of `rdr` into a fresh accumulator.
///
/// Malformed records are logged and skipped; a read error aborts.
fn ingest(rdr: impl BufRead) -> Result<(Mosaics, usize)> {
    let mut mosaics = Mosaics::new();
    let mut lines = 0;
    for raw in rdr.split(b'\n') {
        let raw = raw.context("reading input")?;
        lines += 1;
        let line = String::from_utf8_lossy(&raw);
        if let Err(e) = mosaics.ingest(&line) {
            warn!("line {lines}: skipping malformed tile: {e}");
        }
    }
    Ok((mosaics, lines))
}

/// Renders and writes every group, returning how many were written.
fn render_all(mosaics: &Mosaics, options: &RenderOptions, cli: &Cli) -> usize {
    let palette = Palette::new();
    let groups: Vec<(&ProductKey, &Group)> = mosaics.iter().collect();
    groups
        .par_iter()
        .filter(|(key, group)| {
            match render_one(key, group, &palette, options, &cli.out_dir, &cli.prefix) {
                Ok(path) => {
                    info!("{key}: wrote {}", path.display());
                    true
                }
                Err(e) => {
                    warn!("{key}: skipped: {e}");
                    false
                }
            }
        })
        .count()
}

fn render_one(
    key: &ProductKey,
    group: &Group,
    palette: &Palette,
    options: &RenderOptions,
    out_dir: &Path,
    prefix: &str,
) -> Result<PathBuf, MosaicError> {
    let raster = render(key, group, palette, options)?;
    report(key, raster.width(), raster.height(), raster.layers());
    emit::write_png(&raster, out_dir, prefix)
}

fn report(key: &ProductKey, width: u32, height: u32, layers: usize) {
    info!(
        "{} {} dimensions {width} {height} layers {layers}",
        key.product, key.time
    );
}
