//! Signal extraction: clipping and timing assignment

use geo::Point;
use log::info;
use rand::Rng;

use crate::model::{RegionBoundary, RoadClass, SignalPoint, SignalTiming};

use super::overpass::OverpassNode;

/// Converts raw signal nodes into simulation-ready points.
///
/// Points outside the boundary are dropped; every surviving point gets an
/// independently drawn timing profile, bucketed by the point's own tags.
/// An empty input (or a region without signals) yields an empty vector,
/// not an error.
pub fn extract_signals<R: Rng + ?Sized>(
    nodes: Vec<OverpassNode>,
    region: &RegionBoundary,
    rng: &mut R,
) -> Vec<SignalPoint> {
    let mut signals = Vec::with_capacity(nodes.len());
    for node in nodes {
        let geometry = Point::new(node.lon, node.lat);
        if !region.contains_point(&geometry) {
            continue;
        }

        let class = RoadClass::from_tags(&node.tags);
        signals.push(SignalPoint {
            node_id: node.id,
            geometry,
            tags: node.tags,
            timing: SignalTiming::synthesize(class, rng),
        });
    }

    info!("Prepared {} signal points", signals.len());
    signals
}
