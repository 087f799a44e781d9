use crate::models::trip::Location;
use crate::transit::profile::Profile;
use crate::warehouse::TableRef;
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {0} is not a valid number: '{1}'")]
    InvalidNumber(&'static str, String),
    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),
    #[error("environment variable {0} has unsupported value '{1}' (expected {2})")]
    InvalidChoice(&'static str, String, &'static str),
}

#[derive(Debug, Clone)]
pub enum WarehouseSettings {
    BigQuery { api_url: String, access_token: String },
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub transit_api_url: String,
    pub transit_api_token: String,
    pub profile: Profile,
    pub request_timeout: Duration,
    pub origin: Location,
    pub destination: Location,
    pub timezone: Tz,
    pub table: TableRef,
    pub warehouse: WarehouseSettings,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transit_api_token = required(&lookup, "TRANSIT_API_TOKEN")?;
        let transit_api_url = var_or(&lookup, "TRANSIT_API_URL", "https://api.transitapp.com/v3");

        let profile_name = var_or(&lookup, "TRANSIT_PROFILE", "plan");
        let profile = Profile::from_name(&profile_name).ok_or_else(|| {
            ConfigError::InvalidChoice("TRANSIT_PROFILE", profile_name.clone(), Profile::NAMES)
        })?;

        let timeout_raw = var_or(&lookup, "TRANSIT_TIMEOUT_SECS", "10");
        let request_timeout = match timeout_raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => return Err(ConfigError::InvalidNumber("TRANSIT_TIMEOUT_SECS", timeout_raw)),
        };

        let origin = Location {
            name: var_or(&lookup, "LOCATION1_NAME", "Location_1"),
            lat: coordinate(&lookup, "LOCATION1_LAT")?,
            lon: coordinate(&lookup, "LOCATION1_LON")?,
        };
        let destination = Location {
            name: var_or(&lookup, "LOCATION2_NAME", "Location_2"),
            lat: coordinate(&lookup, "LOCATION2_LAT")?,
            lon: coordinate(&lookup, "LOCATION2_LON")?,
        };

        let tz_name = var_or(&lookup, "TZ", "America/Toronto");
        let timezone = tz_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(tz_name.clone()))?;

        let project_id = required(&lookup, "PROJECT_ID")?;
        let dataset = identifier(&lookup, "BQ_DATASET", "transit_data")?;
        let table_name = identifier(&lookup, "BQ_TABLE", "commute_times")?;
        let table = TableRef::new(project_id, dataset, table_name);

        let backend = var_or(&lookup, "WAREHOUSE_BACKEND", "bigquery");
        let warehouse = match backend.as_str() {
            "bigquery" => WarehouseSettings::BigQuery {
                api_url: var_or(
                    &lookup,
                    "BIGQUERY_API_URL",
                    "https://bigquery.googleapis.com/bigquery/v2",
                ),
                access_token: required(&lookup, "BIGQUERY_ACCESS_TOKEN")?,
            },
            "postgres" => {
                let db_host = var_or(&lookup, "DB_HOST", "localhost");
                let db_port = var_or(&lookup, "DB_PORT", "5432");
                let db_name = var_or(&lookup, "DB_DATABASE", "transit");
                let db_user = var_or(&lookup, "DB_USER", "postgres");
                let db_pwd = var_or(&lookup, "DB_PWD", "postgres");

                WarehouseSettings::Postgres {
                    database_url: format!(
                        "postgres://{}:{}@{}:{}/{}",
                        db_user, db_pwd, db_host, db_port, db_name
                    ),
                }
            }
            _ => {
                return Err(ConfigError::InvalidChoice(
                    "WAREHOUSE_BACKEND",
                    backend,
                    "bigquery, postgres",
                ))
            }
        };

        let log_level = var_or(&lookup, "LOG_LEVEL", "info");

        Ok(Self {
            transit_api_url,
            transit_api_token,
            profile,
            request_timeout,
            origin,
            destination,
            timezone,
            table,
            warehouse,
            log_level,
        })
    }
}

fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

// Parsed as-is; out-of-range latitudes are passed through to the routing service.
fn coordinate<F>(lookup: &F, key: &'static str) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, key)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

// Dataset and table names end up inside SQL identifiers for the postgres backend.
fn identifier<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = var_or(lookup, key, default);
    if value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(value)
    } else {
        Err(ConfigError::InvalidChoice(
            key,
            value,
            "letters, digits and underscores",
        ))
    }
}
