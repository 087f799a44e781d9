use crate::models::trip::Trip;
use std::fmt;

/// Request/row layouts the routing service has been queried with over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Plan,
    PlanWindow,
    Estimate,
}

impl Profile {
    pub const NAMES: &'static str = "plan, plan_window, estimate";

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "plan" => Some(Profile::Plan),
            "plan_window" => Some(Profile::PlanWindow),
            "estimate" => Some(Profile::Estimate),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Profile::Plan | Profile::PlanWindow => "/public/plan",
            Profile::Estimate => "/public/estimate_duration",
        }
    }

    /// Estimate asks with the clock at call time rather than the run's start time.
    pub fn departs_per_call(&self) -> bool {
        matches!(self, Profile::Estimate)
    }

    pub fn query_params(&self, trip: &Trip<'_>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("from_lat", trip.from.lat.to_string()),
            ("from_lon", trip.from.lon.to_string()),
            ("to_lat", trip.to.lat.to_string()),
            ("to_lon", trip.to.lon.to_string()),
            ("num_result", "1".to_string()),
        ];

        match self {
            Profile::Plan => {}
            Profile::PlanWindow => {
                params.push(("leave_time", trip.departure.timestamp().to_string()));
            }
            Profile::Estimate => {
                params.push(("departure_time", trip.departure.timestamp().to_string()));
                params.push(("mode", "transit".to_string()));
            }
        }
        params
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profile::Plan => "plan",
            Profile::PlanWindow => "plan_window",
            Profile::Estimate => "estimate",
        };
        f.write_str(name)
    }
}
