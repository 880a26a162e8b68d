//! Drivable road network model - nodes, edges, and the segment graph

use std::collections::HashMap;

use geo::{LineString, Point};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::{OsmNodeId, OsmWayId};

/// Road classification buckets used for signal-timing synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadClass {
    /// motorway, trunk, primary, secondary
    Major,
    /// tertiary, unclassified, residential
    Minor,
    /// everything else, including untagged features
    Other,
}

impl RoadClass {
    /// Classifies an OSM `highway` value.
    pub fn from_highway(highway: &str) -> Self {
        match highway.to_ascii_lowercase().as_str() {
            "motorway" | "trunk" | "primary" | "secondary" => Self::Major,
            "tertiary" | "unclassified" | "residential" => Self::Minor,
            _ => Self::Other,
        }
    }

    pub fn from_tags(tags: &HashMap<String, String>) -> Self {
        tags.get("highway")
            .map_or(Self::Other, |highway| Self::from_highway(highway))
    }
}

/// Road graph node (junction or way endpoint)
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// OSM ID of the node
    pub id: OsmNodeId,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Road graph edge (segment between junctions)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// OSM ID of the way this segment came from
    pub way_id: OsmWayId,
    /// Segment geometry for export
    pub geometry: LineString<f64>,
    /// Original OSM tags, preserved verbatim
    pub tags: HashMap<String, String>,
}

impl RoadEdge {
    pub fn road_class(&self) -> RoadClass {
        RoadClass::from_tags(&self.tags)
    }

    /// Speed limit in km/h.
    ///
    /// Parses the OSM `maxspeed` tag: the first numeric token wins ("50" and
    /// "50;70" both give 50), `FR:rural`-style zone values map to 80/50, and
    /// a missing tag falls back to a per-class default.
    pub fn maxspeed_kmh(&self) -> f64 {
        parse_maxspeed(
            self.tags.get("maxspeed").map(String::as_str),
            self.tags.get("highway").map_or("", String::as_str),
        )
    }
}

fn default_maxspeed(highway: &str) -> f64 {
    match highway {
        "motorway" => 110.0,
        "trunk" => 90.0,
        "primary" | "secondary" | "tertiary" => 80.0,
        "residential" | "unclassified" => 50.0,
        "service" => 30.0,
        _ => 50.0,
    }
}

fn first_number(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

pub(crate) fn parse_maxspeed(raw: Option<&str>, highway: &str) -> f64 {
    let Some(raw) = raw else {
        return default_maxspeed(highway);
    };
    if let Some(value) = first_number(raw) {
        return value;
    }
    let lower = raw.to_ascii_lowercase();
    if lower.contains("rural") {
        80.0
    } else if lower.contains("urban") {
        50.0
    } else {
        50.0
    }
}

/// Undirected graph of road segments between junctions
#[derive(Debug, Default)]
pub struct RoadNetwork {
    pub graph: UnGraph<RoadNode, RoadEdge>,
    node_indices: hashbrown::HashMap<OsmNodeId, NodeIndex>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for the OSM node, inserting it on first sight.
    fn ensure_node(&mut self, node: RoadNode) -> NodeIndex {
        match self.node_indices.entry(node.id) {
            hashbrown::hash_map::Entry::Occupied(entry) => *entry.get(),
            hashbrown::hash_map::Entry::Vacant(entry) => {
                let index = self.graph.add_node(node);
                entry.insert(index);
                index
            }
        }
    }

    pub fn add_edge(&mut self, from: RoadNode, to: RoadNode, edge: RoadEdge) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        self.graph.add_edge(a, b, edge);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edges(&self) -> impl Iterator<Item = &RoadEdge> {
        self.graph.edge_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_with(tags: &[(&str, &str)]) -> RoadEdge {
        RoadEdge {
            way_id: 1,
            geometry: LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn highway_classification_buckets() {
        assert_eq!(RoadClass::from_highway("motorway"), RoadClass::Major);
        assert_eq!(RoadClass::from_highway("Primary"), RoadClass::Major);
        assert_eq!(RoadClass::from_highway("residential"), RoadClass::Minor);
        assert_eq!(RoadClass::from_highway("tertiary"), RoadClass::Minor);
        assert_eq!(RoadClass::from_highway("service"), RoadClass::Other);
        assert_eq!(RoadClass::from_highway("traffic_signals"), RoadClass::Other);
    }

    #[test]
    fn classification_without_highway_tag_is_other() {
        let tags = HashMap::new();
        assert_eq!(RoadClass::from_tags(&tags), RoadClass::Other);
    }

    #[test]
    fn maxspeed_numeric_tokens() {
        assert_eq!(parse_maxspeed(Some("50"), "residential"), 50.0);
        assert_eq!(parse_maxspeed(Some("50;70"), "residential"), 50.0);
        assert_eq!(parse_maxspeed(Some("30 mph"), "residential"), 30.0);
    }

    #[test]
    fn maxspeed_zone_values() {
        assert_eq!(parse_maxspeed(Some("FR:rural"), "primary"), 80.0);
        assert_eq!(parse_maxspeed(Some("FR:urban"), "primary"), 50.0);
        assert_eq!(parse_maxspeed(Some("none"), "primary"), 50.0);
    }

    #[test]
    fn maxspeed_defaults_by_class() {
        assert_eq!(parse_maxspeed(None, "motorway"), 110.0);
        assert_eq!(parse_maxspeed(None, "trunk"), 90.0);
        assert_eq!(parse_maxspeed(None, "secondary"), 80.0);
        assert_eq!(parse_maxspeed(None, "service"), 30.0);
        assert_eq!(parse_maxspeed(None, ""), 50.0);
    }

    #[test]
    fn maxspeed_helper_reads_tags() {
        let edge = edge_with(&[("highway", "motorway")]);
        assert_eq!(edge.maxspeed_kmh(), 110.0);

        let edge = edge_with(&[("highway", "motorway"), ("maxspeed", "130")]);
        assert_eq!(edge.maxspeed_kmh(), 130.0);
    }

    #[test]
    fn network_deduplicates_nodes() {
        let mut network = RoadNetwork::new();
        let a = RoadNode {
            id: 1,
            geometry: Point::new(0.0, 0.0),
        };
        let b = RoadNode {
            id: 2,
            geometry: Point::new(1.0, 1.0),
        };
        let c = RoadNode {
            id: 3,
            geometry: Point::new(2.0, 0.0),
        };

        network.add_edge(a, b.clone(), edge_with(&[]));
        network.add_edge(b, c, edge_with(&[]));

        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 2);
    }
}
