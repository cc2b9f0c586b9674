use crate::shared::errors::AppResult;
use rusqlite::Connection;

/// SQLite用のテーブル定義
pub const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        amount REAL NOT NULL,
        type TEXT NOT NULL,
        category TEXT NOT NULL,
        date TEXT NOT NULL,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'completed',
        due_date_str TEXT,
        icon TEXT NOT NULL DEFAULT 'payments'
    )",
    "CREATE INDEX IF NOT EXISTS idx_transactions_title ON transactions(title)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category)",
    "CREATE TABLE IF NOT EXISTS budgets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL UNIQUE,
        amount REAL NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS debts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL,
        name TEXT NOT NULL,
        total_amount REAL NOT NULL,
        due_date_day INTEGER NOT NULL,
        monthly_payment REAL,
        total_installments INTEGER,
        remaining_installments INTEGER,
        start_date TEXT NOT NULL
    )",
];

/// PostgreSQL用のテーブル定義
pub const POSTGRES_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS transactions (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        amount DOUBLE PRECISION NOT NULL,
        type TEXT NOT NULL,
        category TEXT NOT NULL,
        date TIMESTAMP NOT NULL,
        is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
        status TEXT NOT NULL DEFAULT 'completed',
        due_date_str TEXT,
        icon TEXT NOT NULL DEFAULT 'payments'
    )",
    "CREATE INDEX IF NOT EXISTS idx_transactions_title ON transactions(title)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category)",
    "CREATE TABLE IF NOT EXISTS budgets (
        id BIGSERIAL PRIMARY KEY,
        category TEXT NOT NULL UNIQUE,
        amount DOUBLE PRECISION NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS debts (
        id BIGSERIAL PRIMARY KEY,
        type TEXT NOT NULL,
        name TEXT NOT NULL,
        total_amount DOUBLE PRECISION NOT NULL,
        due_date_day INTEGER NOT NULL,
        monthly_payment DOUBLE PRECISION,
        total_installments INTEGER,
        remaining_installments INTEGER,
        start_date TIMESTAMP NOT NULL
    )",
];

/// SQLiteのテーブルを作成する（既存テーブルには触れない）
pub fn create_sqlite_tables(conn: &Connection) -> AppResult<()> {
    for statement in SQLITE_SCHEMA {
        conn.execute(statement, [])?;
    }
    Ok(())
}

/// PostgreSQLのテーブルを作成する（既存テーブルには触れない）
pub async fn create_postgres_tables(conn: &mut sqlx::PgConnection) -> AppResult<()> {
    for statement in POSTGRES_SCHEMA {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_create_sqlite_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        create_sqlite_tables(&conn).unwrap();
        // 2回目の実行でもエラーにならない
        create_sqlite_tables(&conn).unwrap();

        assert_eq!(table_names(&conn), vec!["budgets", "debts", "transactions"]);
    }

    #[test]
    fn test_budget_category_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        create_sqlite_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO budgets (category, amount) VALUES ('Mutfak', 1000)",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO budgets (category, amount) VALUES ('Mutfak', 2000)",
            [],
        );
        assert!(duplicate.is_err());
    }
}
