use crate::shared::config::{AppConfig, DatabaseTarget};
use crate::shared::database::schema;
use crate::shared::errors::{AppError, AppResult};
use rusqlite::Connection;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// SQLiteの書き込みロック待ち時間
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// ファイルベースのSQLiteストア
///
/// 接続は保持せず、作業単位ごとに開いて閉じる。
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// 新しい接続を開く
    pub fn open(&self) -> AppResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(SQLITE_BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// 1つの作業単位を実行する
    ///
    /// # 引数
    /// * `work` - トランザクション内で実行する処理
    ///
    /// # 戻り値
    /// 処理結果。成功時のみコミットし、エラー時はロールバックして接続を閉じる
    pub async fn run<F, T>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.open()?;
            let tx = conn.transaction()?;
            let output = work(&*tx)?;
            tx.commit()?;
            Ok(output)
        })
        .await?
    }
}

/// 各ハンドラーに渡すデータベースハンドル
#[derive(Debug, Clone)]
pub enum Database {
    /// 組み込みSQLiteファイル
    Sqlite(SqliteStore),
    /// PostgreSQL接続プール
    Postgres(PgPool),
}

impl Database {
    /// 設定に従って接続し、テーブルを作成する
    ///
    /// # 引数
    /// * `config` - サーバー設定
    ///
    /// # 戻り値
    /// データベースハンドル、または失敗時はエラー
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let database = match &config.database {
            DatabaseTarget::Sqlite(path) => {
                ensure_parent_directory(path)?;
                log::info!("SQLiteデータベースを使用します: {path:?}");
                Database::Sqlite(SqliteStore::new(path.clone()))
            }
            DatabaseTarget::Postgres(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(url)
                    .await?;
                log::info!(
                    "PostgreSQLに接続しました: max_connections={}",
                    config.max_connections
                );
                Database::Postgres(pool)
            }
        };

        database.create_tables().await?;
        log::info!("データベースを初期化しました: backend={}", database.backend_name());

        Ok(database)
    }

    /// テーブルが存在しなければ作成する
    pub async fn create_tables(&self) -> AppResult<()> {
        match self {
            Database::Sqlite(store) => store.run(|conn| schema::create_sqlite_tables(conn)).await,
            Database::Postgres(pool) => {
                let mut conn = pool.acquire().await?;
                schema::create_postgres_tables(&mut conn).await
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Database::Sqlite(_) => "sqlite",
            Database::Postgres(_) => "postgres",
        }
    }
}

/// SQLiteのTEXT列を列挙型などに変換する
pub fn parse_sqlite_column<T>(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = AppError>,
{
    let raw: String = row.get(index)?;
    raw.parse().map_err(|e: AppError| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// PostgreSQLのTEXT列を列挙型などに変換する
pub fn parse_pg_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = AppError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|e: AppError| sqlx::Error::Decode(Box::new(e)))
}

/// SQLiteファイルの親ディレクトリを作成する
fn ensure_parent_directory(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::configuration(format!("データベースディレクトリの作成に失敗: {e}"))
            })?;
            log::info!("データベースディレクトリを作成しました: {parent:?}");
        }
    }
    Ok(())
}
