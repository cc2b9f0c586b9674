use super::models::{Budget, BudgetCreate, BudgetStatus};
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

/// カテゴリ単位で予算を作成または上書きする
///
/// # 引数
/// * `conn` - データベース接続
/// * `dto` - 予算作成用DTO
///
/// # 戻り値
/// 保存後の予算（既存カテゴリの場合は元のIDのまま）
pub fn upsert(conn: &Connection, dto: BudgetCreate) -> AppResult<Budget> {
    conn.execute(
        "INSERT INTO budgets (category, amount) VALUES (?1, ?2)
         ON CONFLICT(category) DO UPDATE SET amount = excluded.amount",
        params![dto.category, dto.amount],
    )?;

    find_by_category(conn, &dto.category)
}

/// カテゴリで予算を取得する
pub fn find_by_category(conn: &Connection, category: &str) -> AppResult<Budget> {
    conn.query_row(
        "SELECT id, category, amount FROM budgets WHERE category = ?1",
        params![category],
        |row| {
            Ok(Budget {
                id: row.get(0)?,
                category: row.get(1)?,
                amount: row.get(2)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("Budget"),
        _ => AppError::from(e),
    })
}

/// 指定期間の予算消化状況を取得する
///
/// # 引数
/// * `conn` - データベース接続
/// * `start` - 集計開始日時（今月1日0時）
/// * `end` - 集計終了日時（現在時刻）
///
/// # 戻り値
/// 予算ごとの消化状況（予算ID順）
pub fn status(conn: &Connection, start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Vec<BudgetStatus>> {
    let mut stmt = conn.prepare(
        "SELECT b.category, b.amount, COALESCE(SUM(t.amount), 0.0)
         FROM budgets b
         LEFT JOIN transactions t
           ON t.category = b.category
          AND t.type = 'expense'
          AND t.date >= ?1
          AND t.date <= ?2
         GROUP BY b.id, b.category, b.amount
         ORDER BY b.id",
    )?;

    let rows = stmt.query_map(params![start, end], |row| {
        Ok(BudgetStatus::new(row.get(0)?, row.get(1)?, row.get(2)?))
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}
