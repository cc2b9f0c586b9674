/// データベース接続と作業単位の管理
pub mod connection;

/// テーブル定義
pub mod schema;

pub use connection::{parse_pg_column, parse_sqlite_column, Database, SqliteStore};
