//! PostgreSQL向けの負債クエリ
use super::models::{Debt, DebtCreate};
use crate::shared::database::parse_pg_column;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

const DEBT_COLUMNS: &str = "id, type, name, total_amount, due_date_day, monthly_payment, \
     total_installments, remaining_installments, start_date";

fn map_debt(row: &PgRow) -> Result<Debt, sqlx::Error> {
    Ok(Debt {
        id: row.try_get("id")?,
        debt_type: parse_pg_column(row, "type")?,
        name: row.try_get("name")?,
        total_amount: row.try_get("total_amount")?,
        due_date_day: row.try_get("due_date_day")?,
        monthly_payment: row.try_get("monthly_payment")?,
        total_installments: row.try_get("total_installments")?,
        remaining_installments: row.try_get("remaining_installments")?,
        start_date: row.try_get("start_date")?,
    })
}

pub async fn create(
    conn: &mut PgConnection,
    dto: DebtCreate,
    now: NaiveDateTime,
) -> AppResult<Debt> {
    let row = sqlx::query(&format!(
        "INSERT INTO debts (type, name, total_amount, due_date_day, monthly_payment,
                            total_installments, remaining_installments, start_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {DEBT_COLUMNS}"
    ))
    .bind(dto.debt_type.as_str())
    .bind(dto.name)
    .bind(dto.total_amount)
    .bind(dto.due_date_day)
    .bind(dto.monthly_payment)
    .bind(dto.total_installments)
    .bind(dto.remaining_installments)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_debt(&row)?)
}

pub async fn find_all(conn: &mut PgConnection) -> AppResult<Vec<Debt>> {
    let rows = sqlx::query(&format!("SELECT {DEBT_COLUMNS} FROM debts ORDER BY id"))
        .fetch_all(&mut *conn)
        .await?;

    rows.iter()
        .map(map_debt)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

pub async fn update(conn: &mut PgConnection, id: i64, dto: DebtCreate) -> AppResult<Debt> {
    let row = sqlx::query(&format!(
        "UPDATE debts
         SET type = $1, name = $2, total_amount = $3, due_date_day = $4, monthly_payment = $5,
             total_installments = $6, remaining_installments = $7
         WHERE id = $8
         RETURNING {DEBT_COLUMNS}"
    ))
    .bind(dto.debt_type.as_str())
    .bind(dto.name)
    .bind(dto.total_amount)
    .bind(dto.due_date_day)
    .bind(dto.monthly_payment)
    .bind(dto.total_installments)
    .bind(dto.remaining_installments)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found("Debt"))?;

    Ok(map_debt(&row)?)
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM debts WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Debt"));
    }

    Ok(())
}
