/// 取引機能モジュール
///
/// このモジュールは収入・支出の記録に関連する機能を提供します：
/// - 取引の作成、一覧取得、更新、削除
/// - 支払い状況のみの更新
/// - 定期支払い（請求書）の一覧
pub mod commands;
pub mod models;
pub mod pg_repository;
pub mod repository;

// モデル
pub use models::{
    Transaction, TransactionCreate, TransactionQuery, TransactionStatus, TransactionStatusUpdate,
    TransactionType,
};

// コマンド
pub use commands::{
    create_transaction, delete_transaction, list_bills, list_transactions, update_transaction,
    update_transaction_status,
};
