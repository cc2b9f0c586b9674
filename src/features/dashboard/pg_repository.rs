//! PostgreSQL向けの集計クエリ
use super::models::CategoryTotal;
use crate::shared::database::parse_pg_column;
use crate::shared::errors::{AppError, AppResult};
use sqlx::{PgConnection, Row};

pub async fn category_totals(conn: &mut PgConnection) -> AppResult<Vec<CategoryTotal>> {
    let rows = sqlx::query(
        "SELECT type, category, SUM(amount) AS total FROM transactions GROUP BY type, category",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| -> Result<CategoryTotal, sqlx::Error> {
            Ok(CategoryTotal {
                transaction_type: parse_pg_column(row, "type")?,
                category: row.try_get("category")?,
                total: row.try_get("total")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}
