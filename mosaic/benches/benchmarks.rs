use criterion::{criterion_group, criterion_main, Criterion};
use mosaic::{render, Mosaics, Palette, RenderOptions};
use nexrad::{ProductKey, Record, Tile, BINS};

/// Builds a national composite of `rows` by `cols` standard blocks
/// under a single coarse block.
fn synthetic_conus(rows: i32, cols: i32) -> Mosaics {
    let key = ProductKey::new("CONUS", "00:00");
    let mut mosaics = Mosaics::new();
    let bins = |seed: i32| {
        let mut bins = [0u8; BINS];
        for (i, bin) in bins.iter_mut().enumerate() {
            *bin = ((i as i32 + seed) % 8) as u8;
        }
        bins
    };
    mosaics.insert(Record {
        key: key.clone(),
        tile: Tile::new(1, 2400, 5760, 4 * rows, 48 * cols, bins(0)).unwrap(),
    });
    for row in 0..rows {
        for col in 0..cols {
            let tile = Tile::new(0, 2400 - 4 * row, 5760 + 48 * col, 4, 48, bins(row + col)).unwrap();
            mosaics.insert(Record {
                key: key.clone(),
                tile,
            });
        }
    }
    mosaics
}

fn render_conus(c: &mut Criterion) {
    let mut group = c.benchmark_group("Render");
    let palette = Palette::new();
    let options = RenderOptions::default();

    for (name, rows, cols) in [("small", 4, 4), ("regional", 30, 10)] {
        let mosaics = synthetic_conus(rows, cols);
        let (key, mosaic) = mosaics.iter().next().unwrap();
        group.bench_function(name, |b| {
            b.iter(|| render(key, mosaic, &palette, &options).unwrap())
        });
    }
}

criterion_group!(benches, render_conus);
criterion_main!(benches);
