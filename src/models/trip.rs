use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct Trip<'a> {
    pub from: &'a Location,
    pub to: &'a Location,
    pub departure: DateTime<Tz>,
}

impl<'a> Trip<'a> {
    pub fn new(from: &'a Location, to: &'a Location, departure: DateTime<Tz>) -> Self {
        Self {
            from,
            to,
            departure,
        }
    }

    pub fn direction(&self) -> String {
        format!("{}_to_{}", self.from.name, self.to.name)
    }
}

impl fmt::Display for Trip<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trip from ({}, {}) to ({}, {})",
            self.from.lat, self.from.lon, self.to.lat, self.to.lon
        )
    }
}
