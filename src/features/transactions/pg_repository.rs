//! PostgreSQL向けの取引クエリ
use super::models::{Transaction, TransactionCreate, TransactionQuery, TransactionStatus};
use crate::shared::database::parse_pg_column;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Postgres, QueryBuilder, Row};

const TRANSACTION_COLUMNS: &str =
    "id, title, amount, type, category, date, is_recurring, status, due_date_str, icon";

fn map_transaction(row: &PgRow) -> Result<Transaction, sqlx::Error> {
    Ok(Transaction {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        amount: row.try_get("amount")?,
        transaction_type: parse_pg_column(row, "type")?,
        category: row.try_get("category")?,
        date: row.try_get("date")?,
        is_recurring: row.try_get("is_recurring")?,
        status: parse_pg_column(row, "status")?,
        due_date_str: row.try_get("due_date_str")?,
        icon: row.try_get("icon")?,
    })
}

pub async fn create(
    conn: &mut PgConnection,
    dto: TransactionCreate,
    now: NaiveDateTime,
) -> AppResult<Transaction> {
    let row = sqlx::query(&format!(
        "INSERT INTO transactions (title, amount, type, category, date, is_recurring, status, due_date_str, icon)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {TRANSACTION_COLUMNS}"
    ))
    .bind(dto.title)
    .bind(dto.amount)
    .bind(dto.transaction_type.as_str())
    .bind(dto.category)
    .bind(now)
    .bind(dto.is_recurring)
    .bind(dto.status.as_str())
    .bind(dto.due_date_str)
    .bind(dto.icon)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_transaction(&row)?)
}

pub async fn find_all(
    conn: &mut PgConnection,
    query: &TransactionQuery,
) -> AppResult<Vec<Transaction>> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE 1=1"
    ));

    if let Some(t) = &query.transaction_type {
        builder.push(" AND type = ").push_bind(t.clone());
    }
    if let Some(c) = &query.category {
        builder.push(" AND category = ").push_bind(c.clone());
    }

    builder
        .push(" ORDER BY date DESC, id DESC LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.skip);

    let rows = builder.build().fetch_all(&mut *conn).await?;
    rows.iter()
        .map(map_transaction)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

pub async fn find_recurring(conn: &mut PgConnection) -> AppResult<Vec<Transaction>> {
    let rows = sqlx::query(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE is_recurring = TRUE ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(map_transaction)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

pub async fn update_status(
    conn: &mut PgConnection,
    id: i64,
    status: TransactionStatus,
) -> AppResult<Transaction> {
    let row = sqlx::query(&format!(
        "UPDATE transactions SET status = $1 WHERE id = $2 RETURNING {TRANSACTION_COLUMNS}"
    ))
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found("Transaction"))?;

    Ok(map_transaction(&row)?)
}

pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    dto: TransactionCreate,
) -> AppResult<Transaction> {
    let row = sqlx::query(&format!(
        "UPDATE transactions
         SET title = $1, amount = $2, type = $3, category = $4, is_recurring = $5,
             status = $6, due_date_str = $7, icon = $8
         WHERE id = $9
         RETURNING {TRANSACTION_COLUMNS}"
    ))
    .bind(dto.title)
    .bind(dto.amount)
    .bind(dto.transaction_type.as_str())
    .bind(dto.category)
    .bind(dto.is_recurring)
    .bind(dto.status.as_str())
    .bind(dto.due_date_str)
    .bind(dto.icon)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found("Transaction"))?;

    Ok(map_transaction(&row)?)
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Transaction"));
    }

    Ok(())
}

pub async fn count(conn: &mut PgConnection) -> AppResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM transactions")
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.try_get("total")?)
}
