//! リクエスト解析とJSONレスポンス生成
use crate::features::transactions::models::TransactionQuery;
use crate::shared::errors::{AppError, AppResult, ErrorSeverity};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::error::Error as StdError;

/// リクエストボディの最大バイト数
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// JSONレスポンスを作成する
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<String> {
    match serde_json::to_string(value) {
        Ok(body) => build_response(status, body),
        Err(e) => {
            let error = AppError::from(e);
            log::error!("レスポンスのシリアライズに失敗しました: {}", error.details());
            // 固定メッセージなのでエスケープは不要
            build_response(
                error.status_code(),
                format!(r#"{{"detail":"{}"}}"#, error.user_message()),
            )
        }
    }
}

/// `{"detail": ...}` 形式のレスポンスを作成する
pub fn detail_response(status: StatusCode, detail: &str) -> Response<String> {
    json_response(status, &json!({ "detail": detail }))
}

/// エラーをレスポンスに変換する（重要度に応じてログ出力）
pub fn error_response(error: &AppError) -> Response<String> {
    match error.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => {
            log::warn!("リクエストを処理できませんでした: {}", error.details())
        }
        ErrorSeverity::High | ErrorSeverity::Critical => {
            log::error!("リクエスト処理エラー: {}", error.details())
        }
    }

    detail_response(error.status_code(), error.user_message())
}

fn build_response(status: StatusCode, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// リクエストボディをJSONとして読み取る
///
/// # 戻り値
/// デシリアライズした値。不正なJSON・必須項目欠落・型違い・サイズ超過はバリデーションエラー
pub async fn read_json<T: DeserializeOwned>(req: Request<Incoming>) -> AppResult<T> {
    let body = collect_body(req.into_body()).await?;

    serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("invalid request body: {e}")))
}

/// `MAX_BODY_BYTES` までのボディを読み取る
async fn collect_body<B>(body: B) -> AppResult<Bytes>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(AppError::validation(format!(
            "request body exceeds {MAX_BODY_BYTES} bytes"
        ))),
        Err(e) => Err(AppError::validation(format!(
            "could not read request body: {e}"
        ))),
    }
}

/// パスのID部分を解析する
pub fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("id must be an integer (got '{raw}')")))
}

/// 取引一覧のクエリ文字列を解析する
///
/// 値が空のパラメータは指定なしとして扱い、未知のパラメータは無視する。
pub fn parse_transaction_query(query: Option<&str>) -> AppResult<TransactionQuery> {
    let mut parsed = TransactionQuery::default();

    let Some(query) = query else {
        return Ok(parsed);
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "type" => parsed.transaction_type = Some(value.into_owned()),
            "category" => parsed.category = Some(value.into_owned()),
            "limit" => parsed.limit = parse_integer(&value, "limit")?,
            "skip" => parsed.skip = parse_integer(&value, "skip")?,
            _ => {}
        }
    }

    Ok(parsed)
}

/// 整数パラメータを解析する（負の値は一覧取得時に正規化する）
fn parse_integer(value: &str, field_name: &str) -> AppResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| AppError::validation(format!("{field_name} must be an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction_query_defaults() {
        assert_eq!(parse_transaction_query(None).unwrap(), TransactionQuery::default());
        assert_eq!(
            parse_transaction_query(Some("")).unwrap(),
            TransactionQuery::default()
        );
    }

    #[test]
    fn test_parse_transaction_query_decodes_values() {
        let query =
            parse_transaction_query(Some("type=expense&category=Sa%C4%9Fl%C4%B1k&limit=10&skip=5"))
                .unwrap();

        assert_eq!(query.transaction_type.as_deref(), Some("expense"));
        assert_eq!(query.category.as_deref(), Some("Sağlık"));
        assert_eq!(query.limit, 10);
        assert_eq!(query.skip, 5);

        let spaced = parse_transaction_query(Some("category=Market+Al%C4%B1%C5%9Fveri%C5%9Fi")).unwrap();
        assert_eq!(spaced.category.as_deref(), Some("Market Alışverişi"));
    }

    #[test]
    fn test_parse_transaction_query_empty_values_are_absent() {
        let query = parse_transaction_query(Some("type=&category=&limit=")).unwrap();
        assert_eq!(query, TransactionQuery::default());
    }

    #[test]
    fn test_parse_transaction_query_rejects_non_integers() {
        for raw in ["skip=abc", "limit=1.5", "limit=ten"] {
            let result = parse_transaction_query(Some(raw));
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_transaction_query_keeps_unknown_type_and_negative_paging() {
        let query = parse_transaction_query(Some("type=gift&limit=-1&skip=-2")).unwrap();
        assert_eq!(query.transaction_type.as_deref(), Some("gift"));
        assert_eq!(query.limit, -1);
        assert_eq!(query.skip, -2);
    }

    #[tokio::test]
    async fn test_collect_body_enforces_size_limit() {
        let exact = http_body_util::Full::new(Bytes::from(vec![b' '; MAX_BODY_BYTES]));
        let collected = collect_body(exact).await.unwrap();
        assert_eq!(collected.len(), MAX_BODY_BYTES);

        let oversized = http_body_util::Full::new(Bytes::from(vec![b' '; MAX_BODY_BYTES + 1]));
        let err = collect_body(oversized).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.user_message().contains("exceeds"));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn test_error_response_uses_status_and_detail() {
        let response = error_response(&AppError::not_found("Debt"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body(), r#"{"detail":"Debt not found"}"#);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let internal = error_response(&AppError::Database("disk I/O error".to_string()));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body(), r#"{"detail":"Database error"}"#);
    }
}
