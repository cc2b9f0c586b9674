/// 機能別モジュール
///
/// 各機能モジュールは、その機能に関連するモデル・データベース操作・コマンドを含む
/// 自己完結型のユニットです。
pub mod budgets;
pub mod dashboard;
pub mod debts;
pub mod seed;
pub mod transactions;
