use crate::models::plan::{PlanResult, TimeValue};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Measured {
        duration_sec: u64,
        transport_type: Option<String>,
        start_time: Option<TimeValue>,
        end_time: Option<TimeValue>,
    },
    Unmeasured,
}

impl Measurement {
    /// Only a finite duration of at least one whole second counts as a measurement.
    pub fn from_result(result: PlanResult) -> Self {
        match result.duration.map(f64::round) {
            Some(secs) if secs.is_finite() && secs >= 1.0 => Measurement::Measured {
                duration_sec: secs as u64,
                transport_type: result.transport_type,
                start_time: result.start_time,
                end_time: result.end_time,
            },
            _ => Measurement::Unmeasured,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Measured {
                duration_sec,
                transport_type,
                ..
            } => write!(
                f,
                "a duration of {} seconds and transport type '{}'",
                duration_sec,
                transport_type.as_deref().unwrap_or("unknown")
            ),
            Measurement::Unmeasured => write!(f, "no duration"),
        }
    }
}
