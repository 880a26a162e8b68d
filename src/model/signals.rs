//! Traffic-signal points and synthetic timing profiles

use std::collections::HashMap;

use geo::Point;
use rand::Rng;

use crate::OsmNodeId;

use super::roads::RoadClass;

/// Synthetic timing profile attached to a signal point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTiming {
    /// Total signal period in seconds
    pub cycle_s: u32,
    /// Green portion of the cycle in seconds
    pub green_s: u32,
    /// Start-of-cycle offset in seconds; desynchronizes intersections
    pub offset_s: u32,
}

impl SignalTiming {
    /// Draws a timing profile for a signal on a road of the given class.
    ///
    /// Stateless per point: nothing is coordinated across records, so
    /// intersections do not end up sharing a phase. The green duration is
    /// half the cycle plus an independent jitter of up to ±5 s and is not
    /// re-validated against the cycle afterwards; the offset is drawn from
    /// the pre-jitter cycle range.
    pub fn synthesize<R: Rng + ?Sized>(class: RoadClass, rng: &mut R) -> Self {
        let cycle_s: u32 = match class {
            RoadClass::Major => rng.gen_range(80..=100),
            RoadClass::Minor => rng.gen_range(50..=70),
            RoadClass::Other => rng.gen_range(55..=75),
        };
        let offset_s = rng.gen_range(0..cycle_s);
        let jitter: i32 = rng.gen_range(-5..=5);
        let green_s = (cycle_s / 2).saturating_add_signed(jitter);

        Self {
            cycle_s,
            green_s,
            offset_s,
        }
    }

    /// Whether the signal shows green at the given wall-clock second.
    pub fn is_green_at(&self, epoch_s: u64) -> bool {
        let phase = (epoch_s + u64::from(self.offset_s)) % u64::from(self.cycle_s);
        phase < u64::from(self.green_s)
    }
}

/// Traffic-signal point with its original tags and a synthesized profile
#[derive(Debug, Clone)]
pub struct SignalPoint {
    /// OSM ID of the signal node
    pub node_id: OsmNodeId,
    /// Point coordinates in WGS84
    pub geometry: Point<f64>,
    /// Original OSM tags, preserved verbatim
    pub tags: HashMap<String, String>,
    pub timing: SignalTiming,
}
