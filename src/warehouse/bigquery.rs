use crate::models::row::CommuteRow;
use crate::warehouse::{TableRef, Warehouse, WarehouseError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Serialize)]
struct InsertAllRequest<'a> {
    rows: Vec<InsertAllRow<'a>>,
}

#[derive(Debug, Serialize)]
struct InsertAllRow<'a> {
    json: &'a CommuteRow,
}

#[derive(Debug, Deserialize)]
struct InsertAllResponse {
    #[serde(rename = "insertErrors", default)]
    insert_errors: Vec<Value>,
}

/// Streaming inserts through the `tabledata.insertAll` REST call.
pub struct BigQueryWriter {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl BigQueryWriter {
    pub fn new(api_url: &str, access_token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn insert_url(&self, table: &TableRef) -> String {
        format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            self.api_url, table.project, table.dataset, table.table
        )
    }
}

impl Warehouse for BigQueryWriter {
    async fn insert_rows(&self, table: &TableRef, rows: &[CommuteRow]) -> Result<(), WarehouseError> {
        let request = InsertAllRequest {
            rows: rows.iter().map(|json| InsertAllRow { json }).collect(),
        };

        let response = self
            .http
            .post(self.insert_url(table))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        check_insert_response(status, &body)
    }
}

// insertAll answers 200 even when individual rows are rejected.
fn check_insert_response(status: StatusCode, body: &str) -> Result<(), WarehouseError> {
    if !status.is_success() {
        return Err(WarehouseError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: InsertAllResponse = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => {
            warn!("Unreadable insertAll response ({}), row may not have been stored: {}", e, body);
            return Ok(());
        }
    };
    if parsed.insert_errors.is_empty() {
        Ok(())
    } else {
        Err(WarehouseError::InsertErrors(
            Value::Array(parsed.insert_errors).to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_url() {
        let writer = BigQueryWriter::new(
            "https://bigquery.googleapis.com/bigquery/v2/",
            "token",
            Duration::from_secs(5),
        )
        .unwrap();
        let table = TableRef::new(
            "my-project".to_string(),
            "transit_data".to_string(),
            "commute_times".to_string(),
        );

        assert_eq!(
            writer.insert_url(&table),
            "https://bigquery.googleapis.com/bigquery/v2/projects/my-project/datasets/transit_data/tables/commute_times/insertAll"
        );
    }

    #[test]
    fn test_request_body_wraps_rows() {
        let row = CommuteRow::LeaveTime {
            direction: "home_to_office".to_string(),
            duration_sec: 1320,
            leave_time: "2025-03-04T08:00:00-05:00".to_string(),
            fetched_at: 1741093200.0,
        };
        let request = InsertAllRequest {
            rows: vec![InsertAllRow { json: &row }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "rows": [{
                    "json": {
                        "direction": "home_to_office",
                        "duration_sec": 1320,
                        "leave_time": "2025-03-04T08:00:00-05:00",
                        "fetched_at": 1741093200.0
                    }
                }]
            })
        );
    }

    #[test]
    fn test_check_insert_response() {
        assert!(check_insert_response(StatusCode::OK, r#"{"kind":"bigquery#tableDataInsertAllResponse"}"#).is_ok());
        assert!(check_insert_response(StatusCode::OK, "").is_ok());

        let err = check_insert_response(StatusCode::NOT_FOUND, "Not found: Table").unwrap_err();
        assert!(matches!(err, WarehouseError::Status { status: 404, .. }));

        let body = r#"{"insertErrors":[{"index":0,"errors":[{"reason":"invalid","message":"no such field: leave_time"}]}]}"#;
        let err = check_insert_response(StatusCode::OK, body).unwrap_err();
        match err {
            WarehouseError::InsertErrors(details) => assert!(details.contains("no such field")),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
