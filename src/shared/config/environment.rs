use crate::shared::errors::{AppError, AppResult};
use chrono_tz::Tz;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// DATABASE_URL 未設定時に使うローカルSQLiteファイル
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./finance.db";

/// サーバーのデフォルトポート
pub const DEFAULT_PORT: u16 = 8000;

/// PostgreSQL接続プールのデフォルトサイズ
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// ログレベル
    pub log_level: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            log_level,
        }
    }

    /// プロダクション環境かどうかを判定
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// 接続先データベースの種類
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseTarget {
    /// ファイルベースの組み込みストア（SQLite）
    Sqlite(PathBuf),
    /// サーバー型のリレーショナルストア（PostgreSQL）
    Postgres(String),
}

/// サーバー全体の設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 接続先データベース
    pub database: DatabaseTarget,
    /// 待ち受けアドレス
    pub bind_addr: SocketAddr,
    /// タイムスタンプと月次集計で使うタイムゾーン（未設定ならサーバーのローカル時刻）
    pub timezone: Option<Tz>,
    /// PostgreSQL接続プールの最大接続数
    pub max_connections: u32,
}

impl AppConfig {
    /// プロセスの環境変数から設定を構築する
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を構築する
    ///
    /// # 引数
    /// * `lookup` - 環境変数名を受け取り値を返す関数
    ///
    /// # 戻り値
    /// 設定、または不正な値があればエラー
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空文字列は未設定として扱う
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let database = parse_database_url(&database_url)?;

        let host: IpAddr = match get("HOST") {
            Some(h) => h
                .parse()
                .map_err(|e| AppError::configuration(format!("HOSTが不正です: {h} ({e})")))?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match get("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| AppError::configuration(format!("PORTが不正です: {p} ({e})")))?,
            None => DEFAULT_PORT,
        };

        let timezone = match get("APP_TIMEZONE") {
            Some(name) => Some(name.parse::<Tz>().map_err(|e| {
                AppError::configuration(format!("APP_TIMEZONEが不正です: {name} ({e})"))
            })?),
            None => None,
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => {
                let n = v.parse::<u32>().map_err(|e| {
                    AppError::configuration(format!("DB_MAX_CONNECTIONSが不正です: {v} ({e})"))
                })?;
                if n == 0 {
                    return Err(AppError::configuration(
                        "DB_MAX_CONNECTIONSは1以上である必要があります",
                    ));
                }
                n
            }
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database,
            bind_addr: SocketAddr::new(host, port),
            timezone,
            max_connections,
        })
    }
}

/// 旧形式のURLスキームを正規化する
///
/// 一部のホスティング環境は `postgres://` を渡してくるため `postgresql://` に揃える。
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => {
            log::info!("DATABASE_URLのスキームを postgres:// から postgresql:// に正規化しました");
            format!("postgresql://{rest}")
        }
        None => url.to_string(),
    }
}

/// DATABASE_URL を解析して接続先を決定する
///
/// # 規則
/// - `postgres://` / `postgresql://` → PostgreSQL
/// - `sqlite:///パス` → SQLiteファイル（`sqlite:///` 以降がパス）
/// - スキームなしの文字列 → SQLiteファイルのパス
pub fn parse_database_url(url: &str) -> AppResult<DatabaseTarget> {
    let url = normalize_database_url(url.trim());

    if url.starts_with("postgresql://") {
        return Ok(DatabaseTarget::Postgres(url));
    }

    if url == "sqlite::memory:" || url.ends_with(":memory:") {
        return Err(AppError::configuration(
            "インメモリSQLiteはリクエストごとの接続では使用できません",
        ));
    }

    if let Some(path) = url.strip_prefix("sqlite:///") {
        if path.is_empty() {
            return Err(AppError::configuration("SQLiteのファイルパスが空です"));
        }
        return Ok(DatabaseTarget::Sqlite(PathBuf::from(path)));
    }

    if let Some(path) = url.strip_prefix("sqlite://") {
        if path.is_empty() {
            return Err(AppError::configuration("SQLiteのファイルパスが空です"));
        }
        return Ok(DatabaseTarget::Sqlite(PathBuf::from(path)));
    }

    if url.contains("://") {
        return Err(AppError::configuration(format!(
            "未対応のDATABASE_URLスキームです: {url}"
        )));
    }

    Ok(DatabaseTarget::Sqlite(PathBuf::from(url)))
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. 実行時環境変数 ENVIRONMENT を確認
/// 2. デバッグビルドの場合は Development
/// 3. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    // フォールバック: ビルド設定に基づく判定
    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

/// 環境に応じた.envファイルを読み込む
///
/// ログシステム初期化前に呼ばれるため、結果は戻り値で返して初期化後に記録する。
pub fn load_environment_variables() -> String {
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let env_file = match environment.as_str() {
        "production" => ".env.production",
        _ => ".env",
    };

    match dotenv::from_filename(env_file) {
        Ok(_) => format!("{env_file}ファイルを読み込みました"),
        Err(_) if env_file != ".env" => match dotenv::dotenv() {
            Ok(_) => format!("{env_file}が見つからないため、デフォルトの.envファイルを読み込みました"),
            Err(_) => "環境変数ファイルが見つかりません。直接設定された環境変数を使用します".to_string(),
        },
        Err(_) => ".envファイルが見つかりません。直接設定された環境変数を使用します".to_string(),
    }
}

/// ログシステムを初期化する
///
/// # 処理内容
/// 1. 環境設定を取得
/// 2. ログレベルを設定
/// 3. env_loggerを初期化
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();

    let log_level = match env_config.log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    // 二重初期化はテストなどで起こりうるため無視する
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    log::info!(
        "ログシステムを初期化しました: level={}, environment={}",
        env_config.log_level,
        env_config.environment
    );
}
