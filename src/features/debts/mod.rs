/// 負債機能モジュール
///
/// クレジットカード残高と分割ローンの作成、一覧取得、更新、削除を提供します。
pub mod commands;
pub mod models;
pub mod pg_repository;
pub mod repository;

pub use commands::{create_debt, delete_debt, list_debts, update_debt};
pub use models::{Debt, DebtCreate, DebtType};
