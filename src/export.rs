//! GeoJSON export of road edges and signal points

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};
use log::info;

use crate::Error;
use crate::model::{RoadNetwork, SignalPoint};

/// Converts the road graph to a `GeoJSON` `FeatureCollection`, one
/// `LineString` feature per edge with the original tags plus `osmid`.
pub fn road_network_to_geojson(network: &RoadNetwork) -> FeatureCollection {
    let features = network
        .edges()
        .map(|edge| {
            let mut properties = JsonObject::new();
            for (key, value) in &edge.tags {
                properties.insert(key.clone(), JsonValue::from(value.clone()));
            }
            properties.insert("osmid".to_string(), JsonValue::from(edge.way_id));

            feature(Geometry::new(GeoJsonValue::from(&edge.geometry)), properties)
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

/// Converts signal points to a `GeoJSON` `FeatureCollection`, one `Point`
/// feature per signal with the original tags plus the timing attributes.
pub fn signals_to_geojson(signals: &[SignalPoint]) -> FeatureCollection {
    let features = signals
        .iter()
        .map(|signal| {
            let mut properties = JsonObject::new();
            for (key, value) in &signal.tags {
                properties.insert(key.clone(), JsonValue::from(value.clone()));
            }
            properties.insert("osmid".to_string(), JsonValue::from(signal.node_id));
            properties.insert("cycle_s".to_string(), JsonValue::from(signal.timing.cycle_s));
            properties.insert("green_s".to_string(), JsonValue::from(signal.timing.green_s));
            properties.insert(
                "offset_s".to_string(),
                JsonValue::from(signal.timing.offset_s),
            );

            feature(
                Geometry::new(GeoJsonValue::from(&signal.geometry)),
                properties,
            )
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

fn feature(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Writes the collection to disk, replacing any previous run's output.
pub fn write_feature_collection<P: AsRef<Path>>(
    path: P,
    collection: &FeatureCollection,
) -> Result<(), Error> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush()?;

    info!(
        "Wrote {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use geo::{LineString, Point};

    use crate::model::{RoadEdge, RoadNode, SignalTiming};

    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn small_network() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_edge(
            RoadNode {
                id: 1,
                geometry: Point::new(2.0, 49.0),
            },
            RoadNode {
                id: 2,
                geometry: Point::new(2.1, 49.0),
            },
            RoadEdge {
                way_id: 77,
                geometry: LineString::from(vec![(2.0, 49.0), (2.1, 49.0)]),
                tags: tags(&[("highway", "primary"), ("name", "D 1016")]),
            },
        );
        network
    }

    #[test]
    fn road_feature_count_matches_edge_count() {
        let network = small_network();
        let collection = road_network_to_geojson(&network);
        assert_eq!(collection.features.len(), network.edge_count());
    }

    #[test]
    fn road_features_carry_tags_and_osmid() {
        let collection = road_network_to_geojson(&small_network());
        let properties = collection.features[0].properties.as_ref().unwrap();

        assert_eq!(properties["highway"], "primary");
        assert_eq!(properties["name"], "D 1016");
        assert_eq!(properties["osmid"], 77);
    }

    #[test]
    fn empty_signal_set_is_a_valid_collection() {
        let collection = signals_to_geojson(&[]);
        assert!(collection.features.is_empty());

        let serialized = serde_json::to_string(&collection).unwrap();
        assert!(serialized.contains("\"FeatureCollection\""));
    }

    #[test]
    fn signal_features_carry_timing_attributes() {
        let signals = vec![SignalPoint {
            node_id: 42,
            geometry: Point::new(2.4, 49.4),
            tags: tags(&[("highway", "traffic_signals")]),
            timing: SignalTiming {
                cycle_s: 60,
                green_s: 32,
                offset_s: 17,
            },
        }];

        let collection = signals_to_geojson(&signals);
        let properties = collection.features[0].properties.as_ref().unwrap();

        assert_eq!(properties["highway"], "traffic_signals");
        assert_eq!(properties["osmid"], 42);
        assert_eq!(properties["cycle_s"], 60);
        assert_eq!(properties["green_s"], 32);
        assert_eq!(properties["offset_s"], 17);
    }

    #[test]
    fn writes_and_overwrites_output_file() {
        let path = std::env::temp_dir().join("feuvert-export-test.geojson");

        write_feature_collection(&path, &signals_to_geojson(&[])).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();

        let signals = vec![SignalPoint {
            node_id: 1,
            geometry: Point::new(0.0, 0.0),
            tags: HashMap::new(),
            timing: SignalTiming {
                cycle_s: 60,
                green_s: 30,
                offset_s: 0,
            },
        }];
        write_feature_collection(&path, &signals_to_geojson(&signals)).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        assert_ne!(first, second);
        let parsed: FeatureCollection = second.parse().unwrap();
        assert_eq!(parsed.features.len(), 1);

        std::fs::remove_file(&path).ok();
    }
}
