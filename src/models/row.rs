use crate::models::measurement::Measurement;
use crate::models::trip::Trip;
use crate::transit::profile::Profile;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommuteRow {
    LeaveTime {
        direction: String,
        duration_sec: u64,
        leave_time: String,
        fetched_at: f64,
    },
    Window {
        direction: String,
        duration_sec: u64,
        start_time: Option<String>,
        end_time: Option<String>,
        fetched_at: f64,
    },
    Timestamped {
        direction: String,
        duration_sec: u64,
        departure_tmsp: String,
        fetched_tmsp: String,
    },
}

impl CommuteRow {
    /// Returns `None` for an unmeasured trip: nothing gets written for it.
    pub fn build(
        profile: Profile,
        trip: &Trip<'_>,
        measurement: &Measurement,
        fetched_at: DateTime<Tz>,
    ) -> Option<Self> {
        let (duration_sec, start_time, end_time) = match measurement {
            Measurement::Measured {
                duration_sec,
                start_time,
                end_time,
                ..
            } => (*duration_sec, start_time, end_time),
            Measurement::Unmeasured => return None,
        };
        let direction = trip.direction();
        let tz = fetched_at.timezone();

        let row = match profile {
            Profile::Plan => CommuteRow::LeaveTime {
                direction,
                duration_sec,
                leave_time: trip.departure.to_rfc3339(),
                fetched_at: unix_seconds(&fetched_at),
            },
            Profile::PlanWindow => CommuteRow::Window {
                direction,
                duration_sec,
                start_time: start_time.as_ref().map(|t| t.to_rfc3339(tz)),
                end_time: end_time.as_ref().map(|t| t.to_rfc3339(tz)),
                fetched_at: unix_seconds(&fetched_at),
            },
            Profile::Estimate => CommuteRow::Timestamped {
                direction,
                duration_sec,
                departure_tmsp: trip.departure.to_rfc3339(),
                fetched_tmsp: fetched_at.to_rfc3339(),
            },
        };
        Some(row)
    }

    pub fn direction(&self) -> &str {
        match self {
            CommuteRow::LeaveTime { direction, .. }
            | CommuteRow::Window { direction, .. }
            | CommuteRow::Timestamped { direction, .. } => direction,
        }
    }

    pub fn duration_sec(&self) -> u64 {
        match self {
            CommuteRow::LeaveTime { duration_sec, .. }
            | CommuteRow::Window { duration_sec, .. }
            | CommuteRow::Timestamped { duration_sec, .. } => *duration_sec,
        }
    }
}

fn unix_seconds(dt: &DateTime<Tz>) -> f64 {
    dt.timestamp_millis() as f64 / 1000.0
}
