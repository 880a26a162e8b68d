//! Place-name resolution through the Nominatim geocoder

use std::time::Duration;

use geo::MultiPolygon;
use log::{debug, info};
use serde::Deserialize;

use crate::{Error, model::RegionBoundary};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

// Nominatim's usage policy requires an identifying User-Agent.
const USER_AGENT: &str = concat!("feuvert/", env!("CARGO_PKG_VERSION"));

/// Nominatim search result, limited to the fields we consume
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    geojson: Option<geojson::Geometry>,
}

/// Client for the Nominatim place-name search API
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(NOMINATIM_URL)
    }

    /// Creates a client against a custom endpoint (self-hosted instances)
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves a free-text place name to its boundary polygon.
    ///
    /// Takes the geocoder's first match; there is no retry and no
    /// disambiguation. Unknown names, matches without an areal geometry,
    /// and transport failures all abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegionResolution`] when no usable boundary comes
    /// back, [`Error::Http`] on transport failures.
    pub fn resolve(&self, name: &str) -> Result<RegionBoundary, Error> {
        let url = format!("{}/search", self.base_url);
        debug!("Geocoding {name:?} via {url}");

        let places: Vec<NominatimPlace> = self
            .client
            .get(&url)
            .query(&[
                ("q", name),
                ("format", "jsonv2"),
                ("polygon_geojson", "1"),
                ("limit", "1"),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        let boundary = boundary_from_places(name, places)?;
        info!(
            "Resolved {name:?} to {:?} ({} member polygon(s))",
            boundary.display_name,
            boundary.geometry.0.len()
        );
        Ok(boundary)
    }
}

/// Converts the raw search response into a [`RegionBoundary`]. Pure, so the
/// decoding rules are testable without network access.
fn boundary_from_places(
    name: &str,
    places: Vec<NominatimPlace>,
) -> Result<RegionBoundary, Error> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| Error::RegionResolution(format!("no geocoding result for {name:?}")))?;

    let geojson_geometry = place.geojson.ok_or_else(|| {
        Error::RegionResolution(format!("geocoder returned no geometry for {name:?}"))
    })?;

    let geometry = geo::Geometry::<f64>::try_from(geojson_geometry.value)
        .map_err(|e| Error::GeoJson(e.to_string()))?;

    let geometry = match geometry {
        geo::Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
        geo::Geometry::MultiPolygon(multi) => multi,
        _ => {
            return Err(Error::RegionResolution(format!(
                "geocoder returned a non-areal geometry for {name:?}"
            )));
        }
    };

    if geometry.0.is_empty() {
        return Err(Error::RegionResolution(format!(
            "geocoder returned an empty boundary for {name:?}"
        )));
    }

    Ok(RegionBoundary {
        display_name: place.display_name,
        geometry,
    })
}
