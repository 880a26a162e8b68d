//! Region boundary resolved from a place name

use geo::{Area, Contains, Intersects, LineString, MultiPolygon, Point};

/// Boundary polygon of the area of interest.
///
/// Resolved once per run from a free-text place name, then consumed by the
/// Overpass queries and the clipping steps. Never persisted.
#[derive(Debug, Clone)]
pub struct RegionBoundary {
    /// Canonical name reported by the geocoder
    pub display_name: String,
    /// Boundary geometry in WGS84
    pub geometry: MultiPolygon<f64>,
}

impl RegionBoundary {
    /// Renders the exterior ring of the largest member polygon in Overpass
    /// `poly:` filter syntax (`"lat lon lat lon ..."`).
    ///
    /// Overpass accepts a single ring, so for multipolygon boundaries the
    /// query area is the main landmass; smaller members (islands, exclaves)
    /// are handled by the containment checks after the query.
    pub fn overpass_poly(&self) -> String {
        let Some(largest) = self
            .geometry
            .iter()
            .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        else {
            return String::new();
        };

        let mut out = String::new();
        for coord in largest.exterior().coords() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("{} {}", coord.y, coord.x));
        }
        out
    }

    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        self.geometry.contains(point)
    }

    pub fn intersects_line(&self, line: &LineString<f64>) -> bool {
        self.geometry.intersects(line)
    }
}
