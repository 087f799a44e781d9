use crate::config::{AppConfig, WarehouseSettings};
use crate::models::row::CommuteRow;
use bigquery::BigQueryWriter;
use postgres::PostgresWriter;
use std::fmt;

pub mod bigquery;
pub mod postgres;
pub mod queries;

#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("warehouse request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("warehouse returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("warehouse rejected rows: {0}")]
    InsertErrors(String),
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// `<project>.<dataset>.<table>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(project: String, dataset: String, table: String) -> Self {
        Self {
            project,
            dataset,
            table,
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

#[allow(async_fn_in_trait)]
pub trait Warehouse {
    /// Appends rows as-is. No dedup key is sent, so repeated calls add repeated rows.
    async fn insert_rows(&self, table: &TableRef, rows: &[CommuteRow]) -> Result<(), WarehouseError>;
}

pub enum WarehouseClient {
    BigQuery(BigQueryWriter),
    Postgres(PostgresWriter),
}

impl WarehouseClient {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let client = match &config.warehouse {
            WarehouseSettings::BigQuery {
                api_url,
                access_token,
            } => WarehouseClient::BigQuery(BigQueryWriter::new(
                api_url,
                access_token,
                config.request_timeout,
            )?),
            WarehouseSettings::Postgres { database_url } => {
                WarehouseClient::Postgres(PostgresWriter::connect(database_url).await?)
            }
        };
        Ok(client)
    }

    pub fn backend(&self) -> &'static str {
        match self {
            WarehouseClient::BigQuery(_) => "bigquery",
            WarehouseClient::Postgres(_) => "postgres",
        }
    }
}

impl Warehouse for WarehouseClient {
    async fn insert_rows(&self, table: &TableRef, rows: &[CommuteRow]) -> Result<(), WarehouseError> {
        match self {
            WarehouseClient::BigQuery(writer) => writer.insert_rows(table, rows).await,
            WarehouseClient::Postgres(writer) => writer.insert_rows(table, rows).await,
        }
    }
}
