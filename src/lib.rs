// 機能モジュール構造
pub mod features;
pub mod server;
pub mod shared;

use log::{info, warn};
use shared::config::environment::{initialize_logging_system, load_environment_variables};
use shared::{AppClock, AppConfig, AppResult, Database, DatabaseTarget, EnvironmentConfig};
use tokio::net::TcpListener;

/// 各リクエストハンドラーに渡すアプリケーション状態
#[derive(Debug, Clone)]
pub struct AppState {
    /// データベースハンドル（接続は作業単位ごとに取得する）
    pub db: Database,
    /// 記録日時と月次集計の時計
    pub clock: AppClock,
}

/// データベースに接続し、テーブル作成と初期データ投入を行う
///
/// # 引数
/// * `config` - サーバー設定
///
/// # 戻り値
/// リクエスト処理に使うアプリケーション状態
pub async fn build_state(config: &AppConfig) -> AppResult<AppState> {
    let db = Database::connect(config).await?;
    let state = AppState {
        db,
        clock: AppClock::new(config.timezone),
    };

    features::seed::seed_if_empty(&state).await?;

    Ok(state)
}

/// サーバーを起動する
///
/// 環境変数の読み込み、ログ初期化、設定構築、データベース準備の順に行い、
/// 待ち受けを開始する。正常時は戻らない。
pub async fn run() -> AppResult<()> {
    let env_message = load_environment_variables();
    initialize_logging_system();
    info!("{env_message}");

    info!("アプリケーション初期化を開始します...");

    let config = AppConfig::from_env()?;
    if EnvironmentConfig::from_env().is_production()
        && matches!(config.database, DatabaseTarget::Sqlite(_))
    {
        warn!("本番環境でローカルSQLiteファイルを使用しています。DATABASE_URLを確認してください");
    }
    match config.timezone {
        Some(tz) => info!("タイムゾーン: {tz}"),
        None => info!("タイムゾーン: サーバーのローカル時刻"),
    }

    let state = build_state(&config).await?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("アプリケーション初期化が完了しました");

    server::serve(listener, state).await
}
