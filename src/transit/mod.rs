use crate::config::AppConfig;
use crate::models::measurement::Measurement;
use crate::models::plan::PlanResponse;
use crate::models::trip::Trip;
use profile::Profile;
use reqwest::StatusCode;
use tracing::{debug, error};

pub mod profile;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode routing response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[allow(async_fn_in_trait)]
pub trait TripSource {
    /// Never fails: any problem with the remote call comes back as `Unmeasured`.
    async fn measure(&self, trip: &Trip<'_>) -> Measurement;
}

pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    profile: Profile,
}

impl TransitClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.transit_api_url.trim_end_matches('/').to_string(),
            token: config.transit_api_token.clone(),
            profile: config.profile,
        })
    }

    async fn fetch(&self, trip: &Trip<'_>) -> Result<Measurement, FetchError> {
        let url = format!("{}{}", self.base_url, self.profile.endpoint());
        debug!("GET {} for {}", url, trip.direction());

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&self.profile.query_params(trip))
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url, source })?;

        interpret_response(status, &body)
    }
}

impl TripSource for TransitClient {
    async fn measure(&self, trip: &Trip<'_>) -> Measurement {
        match self.fetch(trip).await {
            Ok(measurement) => measurement,
            Err(e) => {
                error!("{}", e);
                Measurement::Unmeasured
            }
        }
    }
}

/// Only the first result is considered; the request asks for exactly one.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Measurement, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let response: PlanResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .next()
        .map(Measurement::from_result)
        .unwrap_or(Measurement::Unmeasured))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[test]
    fn test_success_takes_first_result() {
        let body = r#"{"results":[{"duration":1320,"type":"bus"},{"duration":90,"type":"walk"}]}"#;
        let m = interpret_response(StatusCode::OK, body).unwrap();

        assert_eq!(
            m,
            Measurement::Measured {
                duration_sec: 1320,
                transport_type: Some("bus".to_string()),
                start_time: None,
                end_time: None,
            }
        );
    }

    #[test]
    fn test_non_success_status_reports_body() {
        let err = interpret_response(StatusCode::SERVICE_UNAVAILABLE, "upstream down").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(err.to_string(), "Error: 503 - upstream down");

        let err = interpret_response(StatusCode::UNAUTHORIZED, "").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 401, .. }));
    }

    #[test]
    fn test_missing_duration_is_unmeasured() {
        let m = interpret_response(StatusCode::OK, r#"{"results":[{"type":"bus"}]}"#).unwrap();
        assert_eq!(m, Measurement::Unmeasured);

        let m = interpret_response(StatusCode::OK, r#"{"results":[]}"#).unwrap();
        assert_eq!(m, Measurement::Unmeasured);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unmeasured() {
        let env = HashMap::from([
            ("TRANSIT_API_TOKEN", "secret"),
            ("TRANSIT_API_URL", "http://127.0.0.1:1"),
            ("TRANSIT_TIMEOUT_SECS", "2"),
            ("LOCATION1_LAT", "43.65"),
            ("LOCATION1_LON", "-79.38"),
            ("LOCATION2_LAT", "43.70"),
            ("LOCATION2_LON", "-79.42"),
            ("PROJECT_ID", "my-project"),
            ("BIGQUERY_ACCESS_TOKEN", "ya29.token"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        let client = TransitClient::new(&config).unwrap();
        let departure = chrono_tz::America::Toronto
            .with_ymd_and_hms(2025, 3, 4, 8, 0, 0)
            .unwrap();
        let trip = Trip::new(&config.origin, &config.destination, departure);

        assert!(matches!(
            client.fetch(&trip).await,
            Err(FetchError::Transport { .. })
        ));
        assert_eq!(client.measure(&trip).await, Measurement::Unmeasured);
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = interpret_response(StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
