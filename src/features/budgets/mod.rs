/// 予算機能モジュール
///
/// カテゴリごとの月間予算の保存（カテゴリ単位の上書き）と、
/// 今月の支出に対する消化状況の集計を提供します。
/// 予算と取引はカテゴリ文字列の一致でのみ紐づきます。
pub mod commands;
pub mod models;
pub mod pg_repository;
pub mod repository;

pub use commands::{budget_status, upsert_budget};
pub use models::{Budget, BudgetCreate, BudgetStatus};
