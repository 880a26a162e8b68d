//! Overpass API client and raw response types

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;

use crate::{Error, OsmNodeId, OsmWayId, model::RegionBoundary};

const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const QUERY_TIMEOUT_S: u64 = 180;

/// Highway classes that make up the drivable network: everything a motor
/// vehicle may legally travel on, excluding paths, tracks, and mapped areas.
const DRIVE_HIGHWAY_REGEX: &str = "^(motorway|motorway_link|trunk|trunk_link|primary|primary_link|\
secondary|secondary_link|tertiary|tertiary_link|unclassified|residential|living_street|service)$";

/// Signal node as returned by `out;`
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassNode {
    pub id: OsmNodeId,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Coordinate pair in a way's `geometry` array
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassVertex {
    pub lat: f64,
    pub lon: f64,
}

/// Way as returned by `out geom;`: node refs plus per-vertex coordinates
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassWay {
    pub id: OsmWayId,
    #[serde(default)]
    pub nodes: Vec<OsmNodeId>,
    #[serde(default)]
    pub geometry: Vec<OverpassVertex>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node(OverpassNode),
    Way(OverpassWay),
    /// Relations and anything else the server decides to include
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    /// Populated on server-side failures (query timeout, load shedding)
    /// even when the HTTP status is 200
    remark: Option<String>,
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Client for the Overpass query API
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_endpoint(OVERPASS_URL)
    }

    /// Creates a client against a custom endpoint (mirrors, self-hosted)
    pub fn with_endpoint(endpoint: &str) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("feuvert/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(QUERY_TIMEOUT_S + 30))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Fetches all drivable-class ways touching the region boundary,
    /// with full per-vertex geometry.
    pub fn drive_ways(&self, region: &RegionBoundary) -> Result<Vec<OverpassWay>, Error> {
        let query = format!(
            "[out:json][timeout:{QUERY_TIMEOUT_S}];\n\
             way[\"highway\"~\"{DRIVE_HIGHWAY_REGEX}\"][\"area\"!=\"yes\"](poly:\"{}\");\n\
             out geom;",
            region.overpass_poly()
        );

        let ways: Vec<OverpassWay> = self
            .run(&query)?
            .into_iter()
            .filter_map(|element| match element {
                OverpassElement::Way(way) => Some(way),
                _ => None,
            })
            .collect();

        info!("Overpass returned {} drivable ways", ways.len());
        Ok(ways)
    }

    /// Fetches traffic-signal nodes inside the region boundary.
    pub fn signal_nodes(&self, region: &RegionBoundary) -> Result<Vec<OverpassNode>, Error> {
        let query = format!(
            "[out:json][timeout:{QUERY_TIMEOUT_S}];\n\
             node[\"highway\"=\"traffic_signals\"](poly:\"{}\");\n\
             out;",
            region.overpass_poly()
        );

        let nodes: Vec<OverpassNode> = self
            .run(&query)?
            .into_iter()
            .filter_map(|element| match element {
                OverpassElement::Node(node) => Some(node),
                _ => None,
            })
            .collect();

        info!("Overpass returned {} traffic-signal nodes", nodes.len());
        Ok(nodes)
    }

    fn run(&self, query: &str) -> Result<Vec<OverpassElement>, Error> {
        debug!("Overpass query:\n{query}");

        let response: OverpassResponse = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query)])
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(remark) = response.remark {
            return Err(Error::Overpass(remark));
        }
        Ok(response.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_elements() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 42, "lat": 49.4, "lon": 2.4,
                 "tags": {"highway": "traffic_signals"}},
                {"type": "way", "id": 7, "nodes": [1, 2],
                 "geometry": [{"lat": 49.0, "lon": 2.0}, {"lat": 49.1, "lon": 2.1}],
                 "tags": {"highway": "primary", "name": "D 1016"}},
                {"type": "relation", "id": 99, "members": []}
            ]
        }"#;

        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        assert!(response.remark.is_none());
        assert_eq!(response.elements.len(), 3);

        let nodes: Vec<_> = response
            .elements
            .iter()
            .filter(|e| matches!(e, OverpassElement::Node(_)))
            .collect();
        assert_eq!(nodes.len(), 1);

        match &response.elements[1] {
            OverpassElement::Way(way) => {
                assert_eq!(way.id, 7);
                assert_eq!(way.nodes, vec![1, 2]);
                assert_eq!(way.geometry.len(), 2);
                assert_eq!(way.tags["highway"], "primary");
            }
            other => panic!("expected a way, got {other:?}"),
        }
    }

    #[test]
    fn node_without_tags_decodes() {
        let body = r#"{"elements": [{"type": "node", "id": 1, "lat": 0.0, "lon": 0.0}]}"#;
        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        match &response.elements[0] {
            OverpassElement::Node(node) => assert!(node.tags.is_empty()),
            other => panic!("expected a node, got {other:?}"),
        }
    }

    #[test]
    fn server_remark_surfaces() {
        let body = r#"{"remark": "runtime error: Query timed out", "elements": []}"#;
        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.remark.as_deref(),
            Some("runtime error: Query timed out")
        );
    }
}
