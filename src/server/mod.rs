//! HTTP APIサーバー
//!
//! 接続ごとにタスクを起動し、JSONのREST APIを提供する。
pub mod wire;
pub mod router;


use crate::shared::errors::AppResult;
use crate::AppState;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

/// 接続の受け入れを開始する（戻らない）
///
/// # 引数
/// * `listener` - バインド済みのTCPリスナー
/// * `state` - 各リクエストで共有するアプリケーション状態
pub async fn serve(listener: TcpListener, state: AppState) -> AppResult<()> {
    let local_addr = listener.local_addr()?;
    log::info!("APIサーバーを開始しました: http://{local_addr}");

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                log::debug!("接続を受け入れました: {peer}");
                let state = state.clone();
                tokio::spawn(async move {
                    handle_connection(stream, state).await;
                });
            }
            Err(e) => {
                // 一時的なエラー（ファイルディスクリプタ不足など）では停止しない
                log::error!("接続受け入れエラー: {e}");
            }
        }
    }
}

/// TCP接続を処理する
async fn handle_connection(stream: TcpStream, state: AppState) {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req| router::handle_request(req, state.clone()));

    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
        log::error!("HTTP接続処理エラー: {err}");
    }
}
