/// 共有エラー型とエラーハンドリング
pub mod errors;

/// 共有データベース接続管理
pub mod database;

/// 共有設定管理
pub mod config;

/// 共有ユーティリティ関数
pub mod utils;

// 便利な再エクスポート
pub use config::{AppConfig, DatabaseTarget, Environment, EnvironmentConfig};
pub use database::Database;
pub use errors::{AppError, AppResult, ErrorSeverity};
pub use utils::AppClock;
