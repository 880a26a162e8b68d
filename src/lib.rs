//! Road-network and traffic-signal extraction from OpenStreetMap.
//!
//! Resolves a named region to its boundary polygon (Nominatim), pulls the
//! drivable road graph and traffic-signal points inside it (Overpass),
//! attaches synthetic signal-timing profiles, and writes both as GeoJSON
//! for downstream traffic simulation.

pub mod error;
pub mod export;
pub mod loading;
pub mod model;
pub mod prelude;

pub use error::Error;
pub use model::{RegionBoundary, RoadClass, RoadEdge, RoadNetwork, RoadNode};
pub use model::{SignalPoint, SignalTiming};

/// OSM node identifier
pub type OsmNodeId = i64;
/// OSM way identifier
pub type OsmWayId = i64;
