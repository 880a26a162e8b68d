use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Region resolution failed: {0}")]
    RegionResolution(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Overpass error: {0}")]
    Overpass(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJson(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
