use super::models::CategoryTotal;
use crate::shared::database::parse_sqlite_column;
use crate::shared::errors::{AppError, AppResult};
use rusqlite::Connection;

/// 全取引を種類・カテゴリ別に合計する
pub fn category_totals(conn: &Connection) -> AppResult<Vec<CategoryTotal>> {
    let mut stmt = conn.prepare(
        "SELECT type, category, SUM(amount) FROM transactions GROUP BY type, category",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(CategoryTotal {
            transaction_type: parse_sqlite_column(row, 0)?,
            category: row.get(1)?,
            total: row.get(2)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dashboard::models::DashboardStats;
    use crate::features::transactions::models::{TransactionCreate, TransactionStatus, TransactionType};
    use crate::features::transactions::repository as transactions;
    use crate::shared::database::schema::create_sqlite_tables;

    fn record(conn: &Connection, kind: TransactionType, category: &str, amount: f64) {
        let dto = TransactionCreate {
            title: category.to_string(),
            amount,
            transaction_type: kind,
            category: category.to_string(),
            is_recurring: false,
            status: TransactionStatus::Completed,
            due_date_str: None,
            icon: "payments".to_string(),
        };
        let now = chrono::NaiveDate::from_ymd_opt(2026, 10, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        transactions::create(conn, dto, now).unwrap();
    }

    #[test]
    fn test_category_totals_groups_by_type_and_category() {
        let conn = Connection::open_in_memory().unwrap();
        create_sqlite_tables(&conn).unwrap();

        record(&conn, TransactionType::Expense, "Mutfak", 100.0);
        record(&conn, TransactionType::Expense, "Mutfak", 50.5);
        record(&conn, TransactionType::Income, "Mutfak", 20.0);
        record(&conn, TransactionType::Expense, "Ulaşım", 49.5);

        let mut totals = category_totals(&conn).unwrap();
        totals.sort_by_key(|t| (t.category.clone(), t.transaction_type.as_str()));

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].category, "Mutfak");
        assert_eq!(totals[0].transaction_type, TransactionType::Expense);
        assert_eq!(totals[0].total, 150.5);
        assert_eq!(totals[1].transaction_type, TransactionType::Income);

        let stats = DashboardStats::from_totals(&totals);
        assert_eq!(stats.total_expense, 200.0);
        assert_eq!(stats.total_income, 20.0);
        assert_eq!(stats.chart_data.get("Mutfak"), Some(75));
        assert_eq!(stats.chart_data.get("Ulaşım"), Some(24));
    }

    #[test]
    fn test_category_totals_empty_table() {
        let conn = Connection::open_in_memory().unwrap();
        create_sqlite_tables(&conn).unwrap();
        assert!(category_totals(&conn).unwrap().is_empty());
    }
}
