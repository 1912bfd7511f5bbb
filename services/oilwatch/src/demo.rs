//! Demo buoys shown when the backend can't be reached

use chrono::{DateTime, SecondsFormat, Utc};

use crate::reading::BuoyView;

/// Banner text shown while the dashboard is serving demo data
pub const FALLBACK_MESSAGE: &str = "Unable to connect to server. Using demo data.";

/// (id, latitude, longitude, oil detected)
const DEMO_FLEET: [(&str, f64, f64, bool); 5] = [
    ("B001", 1.2897, 103.8501, true),
    ("B002", 1.3521, 103.8198, false),
    ("B003", 1.2904, 103.852, true),
    ("B004", 1.3, 103.75, false),
    ("B005", 1.25, 103.9, false),
];

/// The fixed demo fleet, stamped with `now`
pub fn demo_buoys(now: DateTime<Utc>) -> Vec<BuoyView> {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    DEMO_FLEET
        .iter()
        .map(|&(id, latitude, longitude, oil_detected)| BuoyView {
            buoy_id: Some(id.to_string()),
            latitude,
            longitude,
            oil_detected,
            reading: None,
            last_updated: Some(stamp.clone()),
        })
        .collect()
}
