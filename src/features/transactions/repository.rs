use super::models::{
    Transaction, TransactionCreate, TransactionQuery, TransactionStatus,
};
use crate::shared::database::parse_sqlite_column;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};

const TRANSACTION_COLUMNS: &str =
    "id, title, amount, type, category, date, is_recurring, status, due_date_str, icon";

fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        transaction_type: parse_sqlite_column(row, 3)?,
        category: row.get(4)?,
        date: row.get(5)?,
        is_recurring: row.get(6)?,
        status: parse_sqlite_column(row, 7)?,
        due_date_str: row.get(8)?,
        icon: row.get(9)?,
    })
}

/// 取引を作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `dto` - 取引作成用DTO
/// * `now` - 記録日時
///
/// # 戻り値
/// 作成された取引（IDと日時が付与済み）、または失敗時はエラー
pub fn create(conn: &Connection, dto: TransactionCreate, now: NaiveDateTime) -> AppResult<Transaction> {
    conn.execute(
        "INSERT INTO transactions (title, amount, type, category, date, is_recurring, status, due_date_str, icon)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            dto.title,
            dto.amount,
            dto.transaction_type.as_str(),
            dto.category,
            now,
            dto.is_recurring,
            dto.status.as_str(),
            dto.due_date_str,
            dto.icon,
        ],
    )?;

    let id = conn.last_insert_rowid();
    find_by_id(conn, id)
}

/// IDで取引を取得する
pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Transaction> {
    conn.query_row(
        &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
        params![id],
        map_transaction,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("Transaction"),
        _ => AppError::from(e),
    })
}

/// 取引一覧を取得する（種類とカテゴリでフィルタリング可能）
///
/// # 引数
/// * `conn` - データベース接続
/// * `query` - 絞り込み条件とページング
///
/// # 戻り値
/// 日時の新しい順に並んだ取引のリスト
pub fn find_all(conn: &Connection, query: &TransactionQuery) -> AppResult<Vec<Transaction>> {
    let mut sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE 1=1");
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    // 種類フィルター
    if let Some(t) = &query.transaction_type {
        sql.push_str(" AND type = ?");
        params.push(Box::new(t.clone()));
    }

    // カテゴリフィルター
    if let Some(c) = &query.category {
        sql.push_str(" AND category = ?");
        params.push(Box::new(c.clone()));
    }

    // 同一日時の場合は新しく登録された方を先に返す
    sql.push_str(" ORDER BY date DESC, id DESC LIMIT ? OFFSET ?");
    params.push(Box::new(query.limit));
    params.push(Box::new(query.skip));

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let transactions = stmt.query_map(param_refs.as_slice(), map_transaction)?;
    transactions.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

/// 定期支払い（請求書）を取得する
pub fn find_recurring(conn: &Connection) -> AppResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE is_recurring = 1 ORDER BY id"
    ))?;
    let bills = stmt.query_map([], map_transaction)?;
    bills.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

/// 支払い状況のみを更新する
pub fn update_status(
    conn: &Connection,
    id: i64,
    status: TransactionStatus,
) -> AppResult<Transaction> {
    let affected_rows = conn.execute(
        "UPDATE transactions SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("Transaction"));
    }

    find_by_id(conn, id)
}

/// 取引の変更可能な項目をすべて置き換える（記録日時は保持）
pub fn update(conn: &Connection, id: i64, dto: TransactionCreate) -> AppResult<Transaction> {
    let affected_rows = conn.execute(
        "UPDATE transactions
         SET title = ?1, amount = ?2, type = ?3, category = ?4, is_recurring = ?5,
             status = ?6, due_date_str = ?7, icon = ?8
         WHERE id = ?9",
        params![
            dto.title,
            dto.amount,
            dto.transaction_type.as_str(),
            dto.category,
            dto.is_recurring,
            dto.status.as_str(),
            dto.due_date_str,
            dto.icon,
            id,
        ],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("Transaction"));
    }

    find_by_id(conn, id)
}

/// 取引を削除する
pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let affected_rows = conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;

    if affected_rows == 0 {
        return Err(AppError::not_found("Transaction"));
    }

    Ok(())
}

/// 取引の件数を数える
pub fn count(conn: &Connection) -> AppResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::transactions::models::TransactionType;
    use crate::shared::database::schema::create_sqlite_tables;
    use chrono::NaiveDate;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_sqlite_tables(&conn).unwrap();
        conn
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn dto(title: &str, amount: f64, transaction_type: TransactionType, category: &str) -> TransactionCreate {
        TransactionCreate {
            title: title.to_string(),
            amount,
            transaction_type,
            category: category.to_string(),
            is_recurring: false,
            status: TransactionStatus::Completed,
            due_date_str: None,
            icon: "payments".to_string(),
        }
    }

    #[test]
    fn test_transaction_crud_operations() {
        let conn = create_test_db();

        let created = create(&conn, dto("Market", 250.5, TransactionType::Expense, "Mutfak"), at(3, 10)).unwrap();
        assert!(created.id > 0);
        assert_eq!(created.amount, 250.5);
        assert_eq!(created.date, at(3, 10));
        assert_eq!(created.status, TransactionStatus::Completed);

        let retrieved = find_by_id(&conn, created.id).unwrap();
        assert_eq!(retrieved, created);

        // 全項目を置き換えても日時は変わらない
        let mut replacement = dto("Pazar", 300.0, TransactionType::Expense, "Mutfak");
        replacement.is_recurring = true;
        replacement.due_date_str = Some("5 Kasım".to_string());
        let updated = update(&conn, created.id, replacement).unwrap();
        assert_eq!(updated.title, "Pazar");
        assert_eq!(updated.amount, 300.0);
        assert!(updated.is_recurring);
        assert_eq!(updated.due_date_str.as_deref(), Some("5 Kasım"));
        assert_eq!(updated.date, at(3, 10));

        let paid = update_status(&conn, created.id, TransactionStatus::Autopay).unwrap();
        assert_eq!(paid.status, TransactionStatus::Autopay);
        assert_eq!(paid.title, "Pazar");

        delete(&conn, created.id).unwrap();
        assert!(matches!(find_by_id(&conn, created.id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_transaction_filtering_and_paging() {
        let conn = create_test_db();

        create(&conn, dto("Maaş", 12500.0, TransactionType::Income, "Maaş"), at(1, 9)).unwrap();
        create(&conn, dto("Market", 300.0, TransactionType::Expense, "Mutfak"), at(2, 9)).unwrap();
        create(&conn, dto("Akbil", 150.0, TransactionType::Expense, "Ulaşım"), at(4, 9)).unwrap();
        create(&conn, dto("Fırın", 40.0, TransactionType::Expense, "Mutfak"), at(3, 9)).unwrap();

        let all = find_all(&conn, &TransactionQuery::default()).unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        // 日時の降順
        assert_eq!(titles, vec!["Akbil", "Fırın", "Market", "Maaş"]);

        let expenses = find_all(
            &conn,
            &TransactionQuery {
                transaction_type: Some("expense".to_string()),
                ..TransactionQuery::default()
            },
        )
        .unwrap();
        assert_eq!(expenses.len(), 3);

        let kitchen = find_all(
            &conn,
            &TransactionQuery {
                category: Some("Mutfak".to_string()),
                ..TransactionQuery::default()
            },
        )
        .unwrap();
        assert_eq!(kitchen.len(), 2);
        assert!(kitchen.iter().all(|t| t.category == "Mutfak"));

        let page = find_all(
            &conn,
            &TransactionQuery {
                limit: 2,
                skip: 1,
                ..TransactionQuery::default()
            },
        )
        .unwrap();
        let titles: Vec<&str> = page.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Fırın", "Market"]);

        let income_in_kitchen = find_all(
            &conn,
            &TransactionQuery {
                transaction_type: Some("income".to_string()),
                category: Some("Mutfak".to_string()),
                ..TransactionQuery::default()
            },
        )
        .unwrap();
        assert!(income_in_kitchen.is_empty());

        // 未知の種類は一致する行がない
        let unknown = find_all(
            &conn,
            &TransactionQuery {
                transaction_type: Some("gift".to_string()),
                ..TransactionQuery::default()
            },
        )
        .unwrap();
        assert!(unknown.is_empty());

        // 正規化済みの負の値は全件を返す
        let unbounded = find_all(
            &conn,
            &TransactionQuery {
                limit: -1,
                skip: -3,
                ..TransactionQuery::default()
            }
            .normalized(),
        )
        .unwrap();
        assert_eq!(unbounded.len(), 4);
    }

    #[test]
    fn test_find_recurring_returns_only_bills() {
        let conn = create_test_db();

        let mut bill = dto("Elektrik Faturası", 450.0, TransactionType::Expense, "Fatura");
        bill.is_recurring = true;
        bill.status = TransactionStatus::Unpaid;
        create(&conn, bill, at(1, 8)).unwrap();
        create(&conn, dto("Market", 300.0, TransactionType::Expense, "Mutfak"), at(2, 8)).unwrap();

        let bills = find_recurring(&conn).unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].title, "Elektrik Faturası");
        assert_eq!(bills[0].status, TransactionStatus::Unpaid);
    }

    #[test]
    fn test_not_found_errors_leave_data_untouched() {
        let conn = create_test_db();
        let existing = create(&conn, dto("Market", 300.0, TransactionType::Expense, "Mutfak"), at(2, 8)).unwrap();

        let result = update_status(&conn, 999, TransactionStatus::Completed);
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = update(&conn, 999, dto("X", 1.0, TransactionType::Income, "Y"));
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = delete(&conn, 999);
        assert!(matches!(result, Err(AppError::NotFound(_))));

        assert_eq!(count(&conn).unwrap(), 1);
        assert_eq!(find_by_id(&conn, existing.id).unwrap(), existing);
    }

    #[test]
    fn test_unknown_stored_type_is_database_error() {
        let conn = create_test_db();
        conn.execute(
            "INSERT INTO transactions (title, amount, type, category, date) VALUES ('X', 1, 'transfer', 'Y', '2026-10-01 00:00:00')",
            [],
        )
        .unwrap();

        let result = find_all(&conn, &TransactionQuery::default());
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
