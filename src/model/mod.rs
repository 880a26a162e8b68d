//! Data model for extracted map features

pub mod region;
pub mod roads;
pub mod signals;

pub use region::RegionBoundary;
pub use roads::{RoadClass, RoadEdge, RoadNetwork, RoadNode};
pub use signals::{SignalPoint, SignalTiming};
