//! Accumulation of NEXRAD blocks into per-product groups.

use geo::geometry::{Coord, Rect};
use log::debug;
use nexrad::{NexradError, ProductKey, Record, Tile};
use std::collections::{btree_map::Entry, BTreeMap};

use crate::C;

/// Pixels per degree at the finest output scale.
pub const PIXELS_PER_DEGREE: C = 80.0;

/// Output scale of a block scale factor.
///
/// Scale factors 1 and 2 are the long-range products whose bins are
/// 5x and 9x larger than standard blocks; every other factor is drawn
/// at full resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Resolution {
    divisor: u8,
    scale_factor: u32,
}

impl Resolution {
    pub fn new(scale_factor: u32) -> Self {
        let divisor = match scale_factor {
            1 => 5,
            2 => 9,
            _ => 1,
        };
        Self {
            divisor,
            scale_factor,
        }
    }

    pub fn scale_factor(&self) -> u32 {
        self.scale_factor
    }

    pub fn divisor(&self) -> C {
        C::from(self.divisor)
    }

    /// Returns output pixels per degree when this is the finest
    /// resolution present.
    pub fn pixels_per_degree(&self) -> C {
        PIXELS_PER_DEGREE / self.divisor()
    }
}

/// All blocks sharing one [ProductKey].
#[derive(Debug, Clone)]
pub struct Group {
    /// Union of every tile's extent, arc-minutes.
    bounds: Rect<i32>,

    /// Tiles in arrival order, bucketed by resolution.
    layers: BTreeMap<Resolution, Vec<Tile>>,
}

impl Group {
    pub fn new(tile: Tile) -> Self {
        let bounds = tile.bounds();
        let mut layers = BTreeMap::new();
        layers.insert(Resolution::new(tile.scale_factor()), vec![tile]);
        Self { bounds, layers }
    }

    pub fn push(&mut self, tile: Tile) {
        self.bounds = union(self.bounds, tile.bounds());
        self.layers
            .entry(Resolution::new(tile.scale_factor()))
            .or_default()
            .push(tile);
    }

    pub fn bounds(&self) -> Rect<i32> {
        self.bounds
    }

    /// Returns the number of distinct scale factors.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn tile_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Returns the tiles received at `scale_factor`, if any.
    pub fn layer(&self, scale_factor: u32) -> Option<&[Tile]> {
        self.layers
            .get(&Resolution::new(scale_factor))
            .map(Vec::as_slice)
    }

    /// Returns the most detailed resolution present.
    ///
    /// Equal divisors prefer the numerically smaller scale factor.
    pub fn finest(&self) -> Option<Resolution> {
        self.layers.keys().next().copied()
    }

    /// Returns layers in paint order, coarsest first.
    pub fn layers(&self) -> impl Iterator<Item = (Resolution, &[Tile])> + '_ {
        self.layers
            .iter()
            .rev()
            .map(|(res, tiles)| (*res, tiles.as_slice()))
    }
}

/// Outcome of ingesting one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// The line was a record and its tile was stored.
    Tile,
    /// The line was not a record.
    Ignored,
}

/// Line counters gathered during ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: usize,
    pub ignored: usize,
    pub rejected: usize,
}

/// Accumulator of every group seen in one input batch.
#[derive(Debug, Default)]
pub struct Mosaics {
    groups: BTreeMap<ProductKey, Group>,
    stats: IngestStats,
}

impl Mosaics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `line` and stores its tile.
    ///
    /// A malformed record is returned as an error and leaves every
    /// group untouched.
    pub fn ingest(&mut self, line: &str) -> Result<Ingested, NexradError> {
        match Record::parse(line) {
            Ok(Some(record)) => {
                self.insert(record);
                self.stats.accepted += 1;
                Ok(Ingested::Tile)
            }
            Ok(None) => {
                self.stats.ignored += 1;
                Ok(Ingested::Ignored)
            }
            Err(e) => {
                self.stats.rejected += 1;
                Err(e)
            }
        }
    }

    /// Adds a parsed record to its group, creating the group if needed.
    pub fn insert(&mut self, Record { key, tile }: Record) {
        match self.groups.entry(key) {
            Entry::Occupied(mut e) => e.get_mut().push(tile),
            Entry::Vacant(e) => {
                debug!("new group {}", e.key());
                e.insert(Group::new(tile));
            }
        }
    }

    pub fn get(&self, key: &ProductKey) -> Option<&Group> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Returns groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductKey, &Group)> {
        self.groups.iter()
    }
}

fn union(a: Rect<i32>, b: Rect<i32>) -> Rect<i32> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}
