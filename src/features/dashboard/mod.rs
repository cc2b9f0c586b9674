/// ダッシュボード機能モジュール
///
/// 全期間の収入・支出・残高と、固定カテゴリごとの支出割合を集計します。
pub mod commands;
pub mod models;
pub mod pg_repository;
pub mod repository;

pub use commands::dashboard_stats;
pub use models::{CategoryTotal, ChartData, DashboardStats, CHART_CATEGORIES};
