//! Simplified spherical Mercator.
//!
//! Inputs are arc-minutes. Longitude arrives positive-west in the
//! 0..360 degree range and is shifted by -360 degrees before
//! projection. Latitude must stay strictly between the poles.

use geo::geometry::{Coord, Rect};
use std::f64::consts::FRAC_PI_4;

use crate::C;

const ARCMIN_PER_DEG: C = 60.0;

/// Projects (`lat`, `lon`) arc-minutes to planar (x, y).
pub fn project(lat: C, lon: C) -> Coord<C> {
    let lat = (lat / ARCMIN_PER_DEG).to_radians();
    let lon = (lon / ARCMIN_PER_DEG - 360.0).to_radians();
    Coord {
        x: lon,
        y: (FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Projects an arc-minute coordinate where `x` is longitude and `y`
/// is latitude.
pub fn project_coord(Coord { x, y }: Coord<C>) -> Coord<C> {
    project(y, x)
}

/// Returns the planar extent of an arc-minute rectangle.
///
/// All four corners are projected since projected ordering need not
/// follow geographic ordering.
pub fn project_rect(rect: Rect<i32>) -> Rect<C> {
    let (min, max) = (rect.min(), rect.max());
    let corners = [
        (min.y, min.x),
        (min.y, max.x),
        (max.y, min.x),
        (max.y, max.x),
    ]
    .map(|(lat, lon)| project(C::from(lat), C::from(lon)));

    let mut lo = corners[0];
    let mut hi = corners[0];
    for Coord { x, y } in &corners[1..] {
        lo.x = lo.x.min(*x);
        lo.y = lo.y.min(*y);
        hi.x = hi.x.max(*x);
        hi.y = hi.y.max(*y);
    }
    Rect::new(lo, hi)
}
