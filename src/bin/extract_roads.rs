//! Exports the drivable road network of the Oise department as GeoJSON.

use feuvert::prelude::*;

const AREA: &str = "Oise, France";
const OUTPUT: &str = "oise-roads.geojson";

fn main() -> Result<(), Error> {
    env_logger::init();

    let region = NominatimClient::new()?.resolve(AREA)?;
    let ways = OverpassClient::new()?.drive_ways(&region)?;
    let network = build_road_network(ways, &region)?;

    let collection = road_network_to_geojson(&network);
    write_feature_collection(OUTPUT, &collection)?;

    println!("✓ exported {} road edges to {OUTPUT}", network.edge_count());
    Ok(())
}
