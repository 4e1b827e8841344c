pub mod combinations;
pub mod conversion;
pub mod price_resolver;
pub mod reconciliation;
pub mod totals;

use chrono::{DateTime, Duration, Utc};

/// Absolute distance between two instants.
pub fn time_distance(a: DateTime<Utc>, b: DateTime<Utc>) -> Duration {
    if a >= b {
        a - b
    } else {
        b - a
    }
}
