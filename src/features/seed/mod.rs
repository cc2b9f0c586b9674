//! 初期データ投入モジュール
//!
//! 取引テーブルが空のときだけ、ダッシュボードが空にならないようサンプル取引を投入します。
use crate::features::transactions::models::{TransactionCreate, TransactionStatus, TransactionType};
use crate::features::transactions::{pg_repository, repository};
use crate::shared::database::Database;
use crate::shared::errors::AppResult;
use crate::AppState;
use log::info;

/// 初期データの取引（1件の収入、4件の支出、3件の定期支払い）
pub fn seed_transactions() -> Vec<TransactionCreate> {
    let entry = |title: &str, amount: f64, kind: TransactionType, category: &str, icon: &str| {
        TransactionCreate {
            title: title.to_string(),
            amount,
            transaction_type: kind,
            category: category.to_string(),
            is_recurring: false,
            status: TransactionStatus::Completed,
            due_date_str: None,
            icon: icon.to_string(),
        }
    };
    let bill = |title: &str, amount: f64, status: TransactionStatus, due: &str, icon: &str| {
        TransactionCreate {
            is_recurring: true,
            status,
            due_date_str: Some(due.to_string()),
            ..entry(title, amount, TransactionType::Expense, "Fatura", icon)
        }
    };

    vec![
        entry("Maaş", 12500.00, TransactionType::Income, "Maaş", "account_balance_wallet"),
        entry("Market Alışverişi", 3300.00, TransactionType::Expense, "Mutfak", "shopping_cart"),
        entry("İlaç Alımı", 2062.50, TransactionType::Expense, "Sağlık", "medication"),
        entry("Aylık Akbil", 1650.00, TransactionType::Expense, "Ulaşım", "directions_bus"),
        entry("Diğer Harcamalar", 1237.50, TransactionType::Expense, "Diğer", "receipt"),
        bill("Elektrik Faturası", 450.00, TransactionStatus::Unpaid, "26 Ekim", "bolt"),
        bill("Su Faturası", 120.00, TransactionStatus::Unpaid, "28 Ekim", "water_drop"),
        bill("İnternet", 290.00, TransactionStatus::Autopay, "30 Ekim", "router"),
    ]
}

/// 取引が1件もなければ初期データを投入する
///
/// 件数確認と投入は同じ作業単位で行う。
///
/// # 戻り値
/// 投入した件数（既にデータがある場合は0）
pub async fn seed_if_empty(state: &AppState) -> AppResult<usize> {
    let now = state.clock.now();
    let seeds = seed_transactions();

    let inserted = match &state.db {
        Database::Sqlite(store) => {
            store
                .run(move |conn| {
                    if repository::count(conn)? > 0 {
                        return Ok(0);
                    }
                    let inserted = seeds.len();
                    for dto in seeds {
                        repository::create(conn, dto, now)?;
                    }
                    Ok(inserted)
                })
                .await?
        }
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            if pg_repository::count(&mut tx).await? > 0 {
                0
            } else {
                let inserted = seeds.len();
                for dto in seeds {
                    pg_repository::create(&mut tx, dto, now).await?;
                }
                tx.commit().await?;
                inserted
            }
        }
    };

    if inserted > 0 {
        info!("初期データを投入しました: {inserted}件");
    } else {
        log::debug!("取引データが存在するため初期データの投入をスキップしました");
    }

    Ok(inserted)
}
