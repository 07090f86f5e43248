//! FIS-B NEXRAD block records.
//!
//! An upstream uplink decoder emits one line per radar block:
//!
//! ```text
//! NEXRAD <type> <time> <scale> <north> <west> <height> <width> <bins>
//! ```
//!
//! All geographic fields are integer arc-minutes. `<north>` and
//! `<west>` locate the block's northwest corner, `<height>` extends
//! south and `<width>` extends east. `<west>` is positive-west in
//! the 0..360 degree range.
//!
//! `<bins>` is 128 intensity digits (`0`..=`7`) covering a grid of 32
//! columns by 4 rows, west-to-east then north-to-south.
//!
//! # References
//!
//! 1. [dump978](https://github.com/mutability/dump978) `extract_nexrad`, the usual producer

mod error;

pub use crate::error::NexradError;
use geo::geometry::{Coord, Rect};
use std::fmt;

/// Floating point type used for bin geometry.
pub type C = f64;

/// Leading token of every record line.
pub const MARKER: &str = "NEXRAD";

/// Bins per block, west to east.
pub const COLS: usize = 32;

/// Bins per block, north to south.
pub const ROWS: usize = 4;

/// Total bins per block.
pub const BINS: usize = COLS * ROWS;

/// Highest valid intensity bin.
pub const MAX_INTENSITY: u8 = 7;

/// Identity of one composite image.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductKey {
    /// Product type, e.g. `CONUS` or `Regional`.
    pub product: String,
    /// Product time token, e.g. `14:05`.
    pub time: String,
}

impl ProductKey {
    pub fn new(product: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            time: time.into(),
        }
    }

    /// Returns true for the national composite.
    pub fn is_conus(&self) -> bool {
        self.product == "CONUS"
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product, self.time)
    }
}

/// One radar block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    scale_factor: u32,
    lat_north: i32,
    lon_west: i32,
    lat_span: i32,
    lon_span: i32,
    bins: [u8; BINS],
}

impl Tile {
    /// Returns a tile after checking its spans and intensities.
    pub fn new(
        scale_factor: u32,
        lat_north: i32,
        lon_west: i32,
        lat_span: i32,
        lon_span: i32,
        bins: [u8; BINS],
    ) -> Result<Self, NexradError> {
        if lat_span <= 0 {
            return Err(NexradError::NonPositiveSpan {
                field: "latitude span",
                value: lat_span,
            });
        }
        if lon_span <= 0 {
            return Err(NexradError::NonPositiveSpan {
                field: "longitude span",
                value: lon_span,
            });
        }
        if lat_north.checked_sub(lat_span).is_none() || lon_west.checked_add(lon_span).is_none() {
            return Err(NexradError::Extent);
        }
        if let Some(&bad) = bins.iter().find(|&&bin| bin > MAX_INTENSITY) {
            return Err(NexradError::Intensity(bad));
        }
        Ok(Self {
            scale_factor,
            lat_north,
            lon_west,
            lat_span,
            lon_span,
            bins,
        })
    }

    /// Returns a tile with every bin set to `intensity`.
    pub fn uniform(
        scale_factor: u32,
        lat_north: i32,
        lon_west: i32,
        lat_span: i32,
        lon_span: i32,
        intensity: u8,
    ) -> Result<Self, NexradError> {
        Self::new(
            scale_factor,
            lat_north,
            lon_west,
            lat_span,
            lon_span,
            [intensity; BINS],
        )
    }

    pub fn scale_factor(&self) -> u32 {
        self.scale_factor
    }

    pub fn lat_north(&self) -> i32 {
        self.lat_north
    }

    pub fn lon_west(&self) -> i32 {
        self.lon_west
    }

    pub fn lat_span(&self) -> i32 {
        self.lat_span
    }

    pub fn lon_span(&self) -> i32 {
        self.lon_span
    }

    /// Returns this tile's extent in arc-minutes (x = longitude, y =
    /// latitude).
    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(
            Coord {
                x: self.lon_west,
                y: self.lat_north - self.lat_span,
            },
            Coord {
                x: self.lon_west + self.lon_span,
                y: self.lat_north,
            },
        )
    }

    /// Returns the intensity of the bin at (`col`, `row`).
    ///
    /// # Panics
    ///
    /// Panics if `col >= COLS` or `row >= ROWS`.
    pub fn intensity(&self, col: usize, row: usize) -> u8 {
        assert!(col < COLS && row < ROWS);
        self.bins[col + row * COLS]
    }

    /// Returns an iterator over this tile's bins in record order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        (0..BINS).map(|index| Cell { tile: self, index })
    }
}

/// A single intensity bin of a [Tile].
#[derive(Clone, Copy)]
pub struct Cell<'a> {
    /// The parent [Tile] this bin belongs to.
    tile: &'a Tile,
    /// Index into the parent's bins.
    index: usize,
}

impl<'a> Cell<'a> {
    pub fn col(&self) -> usize {
        self.index % COLS
    }

    pub fn row(&self) -> usize {
        self.index / COLS
    }

    pub fn intensity(&self) -> u8 {
        self.tile.bins[self.index]
    }

    /// Returns the bin outline in arc-minutes as
    /// `[northwest, southwest, southeast, northeast]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn corners(&self) -> [Coord<C>; 4] {
        let height = C::from(self.tile.lat_span) / ROWS as C;
        let width = C::from(self.tile.lon_span) / COLS as C;
        let n = C::from(self.tile.lat_north) - self.row() as C * height;
        let w = C::from(self.tile.lon_west) + self.col() as C * width;
        let s = n - height;
        let e = w + width;
        [
            Coord { x: w, y: n },
            Coord { x: w, y: s },
            Coord { x: e, y: s },
            Coord { x: e, y: n },
        ]
    }
}

/// A parsed record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: ProductKey,
    pub tile: Tile,
}

impl Record {
    /// Parses one line of decoder output.
    ///
    /// Returns `Ok(None)` for lines that aren't `NEXRAD` records.
    pub fn parse(line: &str) -> Result<Option<Self>, NexradError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.first() != Some(&MARKER) {
            return Ok(None);
        }
        let &[_, product, time, sf, north, west, height, width, bins] = fields.as_slice() else {
            return Err(NexradError::FieldCount(fields.len()));
        };
        for token in [product, time] {
            if token.contains(['/', '\\']) {
                return Err(NexradError::Token(token.to_owned()));
            }
        }
        let scale_factor = parse_int::<u32>("scale factor", sf)?;
        let lat_north = parse_int::<i32>("north latitude", north)?;
        let lon_west = parse_int::<i32>("west longitude", west)?;
        let lat_span = parse_int::<i32>("latitude span", height)?;
        let lon_span = parse_int::<i32>("longitude span", width)?;
        let bins = parse_bins(bins)?;
        let tile = Tile::new(scale_factor, lat_north, lon_west, lat_span, lon_span, bins)?;
        Ok(Some(Self {
            key: ProductKey::new(product, time),
            tile,
        }))
    }
}

fn parse_int<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, NexradError> {
    value.parse().map_err(|_| NexradError::Integer {
        field,
        value: value.to_owned(),
    })
}

fn parse_bins(raw: &str) -> Result<[u8; BINS], NexradError> {
    let len = raw.chars().count();
    if len != BINS {
        return Err(NexradError::BinCount(len));
    }
    let mut bins = [0; BINS];
    for (bin, c) in bins.iter_mut().zip(raw.chars()) {
        *bin = match c {
            '0'..='7' => c as u8 - b'0',
            _ => return Err(NexradError::Bin(c)),
        };
    }
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::{Coord, NexradError, ProductKey, Record, Tile, BINS, COLS};

    fn line(bins: &str) -> String {
        format!("NEXRAD CONUS 14:05 1 2400 5760 20 240 {bins}")
    }

    fn zeros() -> String {
        "0".repeat(BINS)
    }

    #[test]
    fn test_parse() {
        let mut bins = zeros();
        bins.replace_range(33..34, "5");
        let record = Record::parse(&line(&bins)).unwrap().unwrap();
        assert_eq!(record.key, ProductKey::new("CONUS", "14:05"));
        assert!(record.key.is_conus());
        let tile = &record.tile;
        assert_eq!(tile.scale_factor(), 1);
        assert_eq!(tile.lat_north(), 2400);
        assert_eq!(tile.lon_west(), 5760);
        assert_eq!(tile.lat_span(), 20);
        assert_eq!(tile.lon_span(), 240);
        assert_eq!(tile.intensity(1, 1), 5);
        assert_eq!(tile.intensity(0, 0), 0);
    }

    #[test]
    fn test_unrelated_lines_are_ignored() {
        assert_eq!(Record::parse("").unwrap(), None);
        assert_eq!(Record::parse("METAR KBOS 121854Z").unwrap(), None);
        assert_eq!(Record::parse("NEXRADX a b").unwrap(), None);
        assert_eq!(Record::parse(&format!(" x{}", line(&zeros()))).unwrap(), None);
    }

    #[test]
    fn test_field_count() {
        assert_eq!(
            Record::parse("NEXRAD CONUS 14:05 1 2400"),
            Err(NexradError::FieldCount(5))
        );
        assert_eq!(
            Record::parse(&format!("{} extra", line(&zeros()))),
            Err(NexradError::FieldCount(10))
        );
    }

    #[test]
    fn test_bin_count() {
        assert_eq!(
            Record::parse(&line(&"0".repeat(127))),
            Err(NexradError::BinCount(127))
        );
        assert_eq!(
            Record::parse(&line(&"0".repeat(129))),
            Err(NexradError::BinCount(129))
        );
    }

    #[test]
    fn test_bin_alphabet() {
        let mut bins = zeros();
        bins.replace_range(127..128, "8");
        assert_eq!(Record::parse(&line(&bins)), Err(NexradError::Bin('8')));
        bins.replace_range(127..128, "x");
        assert_eq!(Record::parse(&line(&bins)), Err(NexradError::Bin('x')));
    }

    #[test]
    fn test_bad_integers() {
        let bins = zeros();
        assert!(matches!(
            Record::parse(&format!("NEXRAD CONUS 14:05 1 24.5 5760 20 240 {bins}")),
            Err(NexradError::Integer {
                field: "north latitude",
                ..
            })
        ));
        assert!(matches!(
            Record::parse(&format!("NEXRAD CONUS 14:05 -1 2400 5760 20 240 {bins}")),
            Err(NexradError::Integer {
                field: "scale factor",
                ..
            })
        ));
        assert_eq!(
            Record::parse(&format!("NEXRAD CONUS 14:05 1 2400 5760 -20 240 {bins}")),
            Err(NexradError::NonPositiveSpan {
                field: "latitude span",
                value: -20
            })
        );
    }

    #[test]
    fn test_zero_span_rejected() {
        let bins = zeros();
        assert_eq!(
            Record::parse(&format!("NEXRAD CONUS 14:05 1 2400 5760 0 48 {bins}")),
            Err(NexradError::NonPositiveSpan {
                field: "latitude span",
                value: 0
            })
        );
        assert_eq!(
            Tile::uniform(0, 600, 0, 4, 0, 1),
            Err(NexradError::NonPositiveSpan {
                field: "longitude span",
                value: 0
            })
        );
    }

    #[test]
    fn test_path_tokens_rejected() {
        let bins = zeros();
        assert_eq!(
            Record::parse(&format!("NEXRAD ../CONUS 14:05 1 2400 5760 20 240 {bins}")),
            Err(NexradError::Token("../CONUS".into()))
        );
    }

    #[test]
    fn test_intensity_range() {
        assert_eq!(
            Tile::uniform(0, 0, 0, 4, 48, 8),
            Err(NexradError::Intensity(8))
        );
    }

    #[test]
    fn test_bounds() {
        let tile = Tile::uniform(1, 0, 0, 240, 1920, 0).unwrap();
        let bounds = tile.bounds();
        assert_eq!(bounds.min(), Coord { x: 0, y: -240 });
        assert_eq!(bounds.max(), Coord { x: 1920, y: 0 });
    }

    #[test]
    fn test_cell_corners() {
        let tile = Tile::uniform(0, 240, 21600, 4, 48, 3).unwrap();
        let cells: Vec<_> = tile.cells().collect();
        assert_eq!(cells.len(), BINS);

        let first = cells[0];
        assert_eq!((first.col(), first.row()), (0, 0));
        assert_eq!(
            first.corners(),
            [
                Coord { x: 21600.0, y: 240.0 },
                Coord { x: 21600.0, y: 239.0 },
                Coord { x: 21601.5, y: 239.0 },
                Coord { x: 21601.5, y: 240.0 },
            ]
        );

        let last = cells[BINS - 1];
        assert_eq!((last.col(), last.row()), (COLS - 1, 3));
        assert_eq!(last.intensity(), 3);
        let [_, sw, se, _] = last.corners();
        assert_eq!(se, Coord { x: 21648.0, y: 236.0 });
        assert_eq!(sw, Coord { x: 21646.5, y: 236.0 });
    }
}
