use super::models::{Debt, DebtCreate};
use crate::shared::database::parse_sqlite_column;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};

const DEBT_COLUMNS: &str = "id, type, name, total_amount, due_date_day, monthly_payment, \
     total_installments, remaining_installments, start_date";

fn map_debt(row: &Row<'_>) -> rusqlite::Result<Debt> {
    Ok(Debt {
        id: row.get(0)?,
        debt_type: parse_sqlite_column(row, 1)?,
        name: row.get(2)?,
        total_amount: row.get(3)?,
        due_date_day: row.get(4)?,
        monthly_payment: row.get(5)?,
        total_installments: row.get(6)?,
        remaining_installments: row.get(7)?,
        start_date: row.get(8)?,
    })
}

/// 負債を作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `dto` - 負債作成用DTO
/// * `now` - 開始日時として記録する時刻
///
/// # 戻り値
/// 作成された負債
pub fn create(conn: &Connection, dto: DebtCreate, now: NaiveDateTime) -> AppResult<Debt> {
    conn.execute(
        "INSERT INTO debts (type, name, total_amount, due_date_day, monthly_payment,
                            total_installments, remaining_installments, start_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            dto.debt_type.as_str(),
            dto.name,
            dto.total_amount,
            dto.due_date_day,
            dto.monthly_payment,
            dto.total_installments,
            dto.remaining_installments,
            now,
        ],
    )?;

    find_by_id(conn, conn.last_insert_rowid())
}

/// IDで負債を取得する
pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Debt> {
    conn.query_row(
        &format!("SELECT {DEBT_COLUMNS} FROM debts WHERE id = ?1"),
        params![id],
        map_debt,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("Debt"),
        _ => AppError::from(e),
    })
}

/// すべての負債を取得する（保存順）
pub fn find_all(conn: &Connection) -> AppResult<Vec<Debt>> {
    let mut stmt = conn.prepare(&format!("SELECT {DEBT_COLUMNS} FROM debts ORDER BY id"))?;
    let debts = stmt.query_map([], map_debt)?;
    debts.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

/// 負債の変更可能な項目をすべて置き換える（開始日時は保持）
pub fn update(conn: &Connection, id: i64, dto: DebtCreate) -> AppResult<Debt> {
    let affected_rows = conn.execute(
        "UPDATE debts
         SET type = ?1, name = ?2, total_amount = ?3, due_date_day = ?4, monthly_payment = ?5,
             total_installments = ?6, remaining_installments = ?7
         WHERE id = ?8",
        params![
            dto.debt_type.as_str(),
            dto.name,
            dto.total_amount,
            dto.due_date_day,
            dto.monthly_payment,
            dto.total_installments,
            dto.remaining_installments,
            id,
        ],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("Debt"));
    }

    find_by_id(conn, id)
}

/// 負債を削除する
pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let affected_rows = conn.execute("DELETE FROM debts WHERE id = ?1", params![id])?;

    if affected_rows == 0 {
        return Err(AppError::not_found("Debt"));
    }

    Ok(())
}
