use crate::models::row::CommuteRow;
use crate::warehouse::{queries, TableRef, Warehouse, WarehouseError};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};

pub struct PostgresWriter {
    pool: Pool<Postgres>,
}

impl PostgresWriter {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}

impl Warehouse for PostgresWriter {
    async fn insert_rows(&self, table: &TableRef, rows: &[CommuteRow]) -> Result<(), WarehouseError> {
        sqlx::query(&queries::insert_json_rows(table))
            .bind(Json(rows))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
