//! Nearest-neighbour ranking of map markers.
//!
//! Distances use [`planar_distance`], so the ordering is "nearest on a flat
//! lat/lon plot", not nearest by great-circle distance.

use crate::geo::{planar_distance, Coordinates, GeoPoint};
use serde::Serialize;

/// A point together with its distance to the reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPoint<'a> {
    pub point: &'a GeoPoint,
    /// Planar distance in degrees.
    pub distance: f64,
}

/// Return the `limit` points closest to `reference`, ascending by distance.
///
/// Ties keep their input order. A `limit` larger than the input returns
/// every point. The input slice is left untouched.
pub fn rank_nearest<'a>(
    reference: Coordinates,
    points: &'a [GeoPoint],
    limit: usize,
) -> Vec<RankedPoint<'a>> {
    let mut ranked: Vec<RankedPoint<'a>> = points
        .iter()
        .map(|point| RankedPoint {
            point,
            distance: planar_distance(reference, point.coordinates()),
        })
        .collect();

    // sort_by is stable, which gives the input-order tie-break.
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(limit);
    ranked
}

/// Names of the `limit` nearest points, in rank order.
pub fn nearest_names(reference: Coordinates, points: &[GeoPoint], limit: usize) -> Vec<&'static str> {
    rank_nearest(reference, points, limit)
        .into_iter()
        .map(|r| r.point.name)
        .collect()
}
