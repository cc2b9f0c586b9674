//! PostgreSQL向けの予算クエリ
use super::models::{Budget, BudgetCreate, BudgetStatus};
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use sqlx::{PgConnection, Row};

pub async fn upsert(conn: &mut PgConnection, dto: BudgetCreate) -> AppResult<Budget> {
    let row = sqlx::query(
        "INSERT INTO budgets (category, amount) VALUES ($1, $2)
         ON CONFLICT (category) DO UPDATE SET amount = EXCLUDED.amount
         RETURNING id, category, amount",
    )
    .bind(dto.category)
    .bind(dto.amount)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Budget {
        id: row.try_get("id")?,
        category: row.try_get("category")?,
        amount: row.try_get("amount")?,
    })
}

pub async fn status(
    conn: &mut PgConnection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> AppResult<Vec<BudgetStatus>> {
    let rows = sqlx::query(
        "SELECT b.category, b.amount, COALESCE(SUM(t.amount), 0) AS spent
         FROM budgets b
         LEFT JOIN transactions t
           ON t.category = b.category
          AND t.type = 'expense'
          AND t.date >= $1
          AND t.date <= $2
         GROUP BY b.id, b.category, b.amount
         ORDER BY b.id",
    )
    .bind(start)
    .bind(end)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| -> Result<BudgetStatus, sqlx::Error> {
            Ok(BudgetStatus::new(
                row.try_get("category")?,
                row.try_get("amount")?,
                row.try_get("spent")?,
            ))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}
