//! メソッドとパスセグメントによるルーティング
use super::wire::{
    detail_response, error_response, json_response, parse_id, parse_transaction_query, read_json,
};
use crate::features::{budgets, dashboard, debts, transactions};
use crate::shared::errors::AppResult;
use crate::AppState;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::convert::Infallible;

/// HTTPリクエストを処理する
///
/// エラーはすべて `{"detail": ...}` のJSONレスポンスに変換する。
pub async fn handle_request(
    req: Request<Incoming>,
    state: AppState,
) -> Result<Response<String>, Infallible> {
    log::debug!("リクエストを受信: {} {}", req.method(), req.uri());

    match dispatch(req, &state).await {
        Ok(response) => Ok(response),
        Err(error) => Ok(error_response(&error)),
    }
}

async fn dispatch(req: Request<Incoming>, state: &AppState) -> AppResult<Response<String>> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        ["health"] => match method {
            Method::GET => ok(&json!({ "status": "ok" })),
            _ => Ok(method_not_allowed()),
        },

        ["api", "dashboard"] => match method {
            Method::GET => ok(&dashboard::dashboard_stats(state).await?),
            _ => Ok(method_not_allowed()),
        },

        ["api", "bills"] => match method {
            Method::GET => ok(&transactions::list_bills(state).await?),
            _ => Ok(method_not_allowed()),
        },

        ["api", "transactions"] => match method {
            Method::GET => {
                let query = parse_transaction_query(req.uri().query())?;
                ok(&transactions::list_transactions(state, query).await?)
            }
            Method::POST => {
                let dto = read_json(req).await?;
                ok(&transactions::create_transaction(state, dto).await?)
            }
            _ => Ok(method_not_allowed()),
        },

        ["api", "transactions", id] => match method {
            Method::PUT => {
                let id = parse_id(id)?;
                let dto = read_json(req).await?;
                ok(&transactions::update_transaction(state, id, dto).await?)
            }
            Method::DELETE => {
                transactions::delete_transaction(state, parse_id(id)?).await?;
                deleted()
            }
            _ => Ok(method_not_allowed()),
        },

        ["api", "transactions", id, "status"] => match method {
            Method::PUT => {
                let id = parse_id(id)?;
                let update = read_json(req).await?;
                ok(&transactions::update_transaction_status(state, id, update).await?)
            }
            _ => Ok(method_not_allowed()),
        },

        ["api", "budgets"] => match method {
            Method::POST => {
                let dto = read_json(req).await?;
                ok(&budgets::upsert_budget(state, dto).await?)
            }
            _ => Ok(method_not_allowed()),
        },

        ["api", "budgets", "status"] => match method {
            Method::GET => ok(&budgets::budget_status(state).await?),
            _ => Ok(method_not_allowed()),
        },

        ["api", "debts"] => match method {
            Method::GET => ok(&debts::list_debts(state).await?),
            Method::POST => {
                let dto = read_json(req).await?;
                ok(&debts::create_debt(state, dto).await?)
            }
            _ => Ok(method_not_allowed()),
        },

        ["api", "debts", id] => match method {
            Method::PUT => {
                let id = parse_id(id)?;
                let dto = read_json(req).await?;
                ok(&debts::update_debt(state, id, dto).await?)
            }
            Method::DELETE => {
                debts::delete_debt(state, parse_id(id)?).await?;
                deleted()
            }
            _ => Ok(method_not_allowed()),
        },

        _ => {
            log::debug!("未対応のパス: {method} {path}");
            Ok(detail_response(StatusCode::NOT_FOUND, "Not Found"))
        }
    }
}

fn ok<T: Serialize>(value: &T) -> AppResult<Response<String>> {
    Ok(json_response(StatusCode::OK, value))
}

fn deleted() -> AppResult<Response<String>> {
    ok(&json!({ "message": "Deleted" }))
}

fn method_not_allowed() -> Response<String> {
    detail_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
