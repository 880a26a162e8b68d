//! Builds the simplified road graph from raw Overpass ways
//!
//! A way arriving from Overpass is an arbitrary slice of road between two
//! points the mapper happened to draw; junctions usually sit in its interior.
//! The graph wants the opposite: one edge per stretch between junctions.
//! Ways are therefore split at every node shared with another way, then
//! segments are re-joined across junction nodes that connect exactly two
//! segments carrying identical tags. Joining across differing tags would
//! force tag aggregation, so those chains stay separate edges.

use std::collections::HashMap;

use geo::{Coord, LineString, Point};
use log::info;

use crate::{
    Error, OsmNodeId, OsmWayId,
    model::{RegionBoundary, RoadEdge, RoadNetwork, RoadNode},
};

use super::overpass::OverpassWay;

struct Segment {
    start: OsmNodeId,
    end: OsmNodeId,
    way_id: OsmWayId,
    coords: Vec<Coord<f64>>,
    tags: HashMap<String, String>,
}

/// Converts raw ways into a [`RoadNetwork`] clipped to the region.
///
/// Every segment that survives clipping becomes exactly one graph edge;
/// nothing is dropped past that point, so the exported edge count equals
/// the extracted subgraph's edge count.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] when a way's node refs and geometry
/// vertices disagree, which would silently corrupt the splitting step.
pub fn build_road_network(
    ways: Vec<OverpassWay>,
    region: &RegionBoundary,
) -> Result<RoadNetwork, Error> {
    let mut occurrences: hashbrown::HashMap<OsmNodeId, u32> = hashbrown::HashMap::new();
    for way in &ways {
        for &node in &way.nodes {
            *occurrences.entry(node).or_insert(0) += 1;
        }
    }

    let mut segments = Vec::new();
    for way in &ways {
        if way.nodes.len() != way.geometry.len() {
            return Err(Error::InvalidData(format!(
                "way {} has {} node refs but {} geometry vertices",
                way.id,
                way.nodes.len(),
                way.geometry.len()
            )));
        }
        if way.nodes.len() < 2 {
            return Err(Error::InvalidData(format!(
                "way {} has fewer than two nodes",
                way.id
            )));
        }
        split_way(way, &occurrences, &mut segments);
    }
    let raw_count = segments.len();

    // The poly filter keeps any way with a node inside the boundary; clip
    // the leftovers that merely pass through the query ring's bounding area.
    segments.retain(|segment| {
        let line = LineString::new(segment.coords.clone());
        region.intersects_line(&line)
    });
    let clipped_count = segments.len();

    let merged = merge_segments(segments);
    info!(
        "Simplified {raw_count} way segments to {} edges ({} clipped away)",
        merged.len(),
        raw_count - clipped_count
    );

    let mut network = RoadNetwork::new();
    for segment in merged {
        let from = RoadNode {
            id: segment.start,
            geometry: Point(segment.coords[0]),
        };
        let to = RoadNode {
            id: segment.end,
            geometry: Point(segment.coords[segment.coords.len() - 1]),
        };
        network.add_edge(
            from,
            to,
            RoadEdge {
                way_id: segment.way_id,
                geometry: LineString::new(segment.coords),
                tags: segment.tags,
            },
        );
    }

    info!(
        "Road network: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    );
    Ok(network)
}

/// Splits a way at every interior node referenced by another way.
fn split_way(
    way: &OverpassWay,
    occurrences: &hashbrown::HashMap<OsmNodeId, u32>,
    out: &mut Vec<Segment>,
) {
    let last = way.nodes.len() - 1;
    let mut cuts = vec![0];
    for (i, node) in way.nodes.iter().enumerate().take(last).skip(1) {
        if occurrences.get(node).copied().unwrap_or(0) >= 2 {
            cuts.push(i);
        }
    }
    cuts.push(last);

    for window in cuts.windows(2) {
        let (a, b) = (window[0], window[1]);
        out.push(Segment {
            start: way.nodes[a],
            end: way.nodes[b],
            way_id: way.id,
            coords: way.geometry[a..=b]
                .iter()
                .map(|vertex| Coord {
                    x: vertex.lon,
                    y: vertex.lat,
                })
                .collect(),
            tags: way.tags.clone(),
        });
    }
}

/// Finds the single unvisited continuation of a chain at `node`, if the
/// junction joins exactly two segments with matching tags.
fn continuation(
    segments: &[Segment],
    incidence: &hashbrown::HashMap<OsmNodeId, Vec<usize>>,
    visited: &[bool],
    node: OsmNodeId,
    tags: &HashMap<String, String>,
) -> Option<usize> {
    let incident = incidence.get(&node)?;
    if incident.len() != 2 {
        return None;
    }
    let candidate = incident.iter().copied().find(|&i| !visited[i])?;
    (segments[candidate].tags == *tags).then_some(candidate)
}

/// Collapses chains of segments joined at two-segment junctions with
/// identical tags into single segments. Closed rings terminate the walk
/// when the chain wraps back onto its own start.
fn merge_segments(segments: Vec<Segment>) -> Vec<Segment> {
    let mut incidence: hashbrown::HashMap<OsmNodeId, Vec<usize>> = hashbrown::HashMap::new();
    for (i, segment) in segments.iter().enumerate() {
        incidence.entry(segment.start).or_default().push(i);
        if segment.end != segment.start {
            incidence.entry(segment.end).or_default().push(i);
        }
    }

    let mut visited = vec![false; segments.len()];
    let mut merged = Vec::new();

    for i in 0..segments.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let seed = &segments[i];
        let mut coords = seed.coords.clone();
        let mut start = seed.start;
        let mut end = seed.end;

        // grow the chain forward from its tail
        while end != start {
            let Some(next) = continuation(&segments, &incidence, &visited, end, &seed.tags)
            else {
                break;
            };
            visited[next] = true;
            let segment = &segments[next];
            if segment.start == end {
                coords.extend(segment.coords[1..].iter().copied());
                end = segment.end;
            } else {
                coords.extend(segment.coords.iter().rev().skip(1).copied());
                end = segment.start;
            }
        }

        // then backward from its head
        while end != start {
            let Some(prev) = continuation(&segments, &incidence, &visited, start, &seed.tags)
            else {
                break;
            };
            visited[prev] = true;
            let segment = &segments[prev];
            let mut head: Vec<Coord<f64>> = if segment.end == start {
                start = segment.start;
                segment.coords[..segment.coords.len() - 1].to_vec()
            } else {
                start = segment.end;
                segment.coords.iter().skip(1).rev().copied().collect()
            };
            head.append(&mut coords);
            coords = head;
        }

        merged.push(Segment {
            start,
            end,
            way_id: seed.way_id,
            coords,
            tags: seed.tags.clone(),
        });
    }

    merged
}
