// Re-export key components
pub use crate::error::Error;
pub use crate::export::{road_network_to_geojson, signals_to_geojson, write_feature_collection};
pub use crate::loading::{NominatimClient, OverpassClient, build_road_network, extract_signals};
pub use crate::model::{RegionBoundary, RoadClass, RoadEdge, RoadNetwork, RoadNode};
pub use crate::model::{SignalPoint, SignalTiming};

// OSM identifier aliases
pub use crate::OsmNodeId;
pub use crate::OsmWayId;
