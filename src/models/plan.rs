use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub results: Vec<PlanResult>,
}

#[derive(Debug, Deserialize)]
pub struct PlanResult {
    #[serde(default, deserialize_with = "parse_f64_option")]
    pub duration: Option<f64>,
    #[serde(rename = "type")]
    pub transport_type: Option<String>,
    pub start_time: Option<TimeValue>,
    pub end_time: Option<TimeValue>,
}

/// Start/end times come back either as Unix seconds or as preformatted text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Unix(f64),
    Text(String),
}

impl TimeValue {
    pub fn to_rfc3339(&self, tz: Tz) -> String {
        match self {
            TimeValue::Unix(secs) => {
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9) as u32;
                match DateTime::from_timestamp(whole as i64, nanos) {
                    Some(dt) => dt.with_timezone(&tz).to_rfc3339(),
                    None => secs.to_string(),
                }
            }
            TimeValue::Text(s) => s.clone(),
        }
    }
}

fn parse_f64_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    let v: Option<StringOrFloat> = Option::deserialize(deserializer)?;
    match v {
        Some(StringOrFloat::Float(f)) => Ok(Some(f)),
        Some(StringOrFloat::String(s)) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.trim().parse::<f64>().map(Some).map_err(serde::de::Error::custom)
            }
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_plan_payload() {
        let payload = r#"
        {
            "results": [
                {
                    "duration": 1320,
                    "type": "bus",
                    "start_time": 1741093200,
                    "end_time": "2025-03-04T08:22:00-05:00",
                    "legs": [{"mode": "WALK"}]
                },
                {"duration": 1500, "type": "subway"}
            ]
        }
        "#;

        let response: PlanResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.results.len(), 2);

        let first = &response.results[0];
        assert_eq!(first.duration, Some(1320.0));
        assert_eq!(first.transport_type.as_deref(), Some("bus"));
        assert_eq!(first.start_time, Some(TimeValue::Unix(1741093200.0)));
        assert_eq!(
            first.end_time,
            Some(TimeValue::Text("2025-03-04T08:22:00-05:00".to_string()))
        );
    }

    #[test]
    fn test_missing_fields_are_tolerated() {
        let response: PlanResponse = serde_json::from_str(r#"{"results":[{}]}"#).unwrap();
        let first = &response.results[0];
        assert_eq!(first.duration, None);
        assert_eq!(first.transport_type, None);
        assert_eq!(first.start_time, None);

        let response: PlanResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_duration_as_string() {
        let response: PlanResponse =
            serde_json::from_str(r#"{"results":[{"duration":"845","type":"walk"}]}"#).unwrap();
        assert_eq!(response.results[0].duration, Some(845.0));

        let response: PlanResponse =
            serde_json::from_str(r#"{"results":[{"duration":""}]}"#).unwrap();
        assert_eq!(response.results[0].duration, None);
    }

    #[test]
    fn test_unix_time_rendered_in_zone() {
        let start = TimeValue::Unix(1741093200.0);
        assert_eq!(
            start.to_rfc3339(chrono_tz::America::Toronto),
            "2025-03-04T08:00:00-05:00"
        );
        assert_eq!(start.to_rfc3339(chrono_tz::UTC), "2025-03-04T13:00:00+00:00");
    }

    #[test]
    fn test_fractional_unix_time_before_epoch() {
        assert_eq!(
            TimeValue::Unix(-1.5).to_rfc3339(chrono_tz::UTC),
            "1969-12-31T23:59:58.500+00:00"
        );
        assert_eq!(
            TimeValue::Unix(1.25).to_rfc3339(chrono_tz::UTC),
            "1970-01-01T00:00:01.250+00:00"
        );
    }
}
