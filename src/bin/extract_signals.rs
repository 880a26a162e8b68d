//! Exports the traffic signals of the Oise department as GeoJSON, each
//! with a synthetic cycle / green / phase-offset profile.

use feuvert::prelude::*;

const AREA: &str = "Oise, France";
const OUTPUT: &str = "oise-signals.geojson";

fn main() -> Result<(), Error> {
    env_logger::init();

    let region = NominatimClient::new()?.resolve(AREA)?;
    let nodes = OverpassClient::new()?.signal_nodes(&region)?;

    let mut rng = rand::thread_rng();
    let signals = extract_signals(nodes, &region, &mut rng);

    let collection = signals_to_geojson(&signals);
    write_feature_collection(OUTPUT, &collection)?;

    println!(
        "✓ exported {} traffic signals (cycle/green/offset) to {OUTPUT}",
        signals.len()
    );
    Ok(())
}
