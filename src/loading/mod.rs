//! This module is responsible for acquiring upstream map data (Nominatim,
//! Overpass) and converting it into the road-network and signal models.

pub mod geocoding;
mod graph;
pub mod overpass;
mod signals;

pub use geocoding::NominatimClient;
pub use graph::build_road_network;
pub use overpass::OverpassClient;
pub use signals::extract_signals;
