use serde::{Deserialize, Serialize};

/// Column order of the combined output CSV.
pub const HEADER: [&str; 7] = [
    "row_num",
    "route_id",
    "location_start",
    "location_end",
    "route_grade",
    "distance_km",
    "daily_km",
];

/// One row of the route statistics table.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub row_num: i64,
    pub route_id: String,
    pub location_start: String,
    pub location_end: String,
    pub route_grade: String,

    // lengths in km
    pub distance_km: f64,
    pub daily_km: f64,
}

impl RouteRecord {
    /// Key under which fragments of the same route are merged.
    pub fn identity_key(&self) -> String {
        format!(
            "{}{}{}",
            self.route_id, self.location_start, self.location_end
        )
    }
}
