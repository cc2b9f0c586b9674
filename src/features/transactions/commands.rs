use super::models::{
    Transaction, TransactionCreate, TransactionQuery, TransactionStatusUpdate,
};
use super::{pg_repository, repository};
use crate::shared::database::Database;
use crate::shared::errors::AppResult;
use crate::shared::utils::{validate_amount, validate_required_field};
use crate::AppState;
use log::info;

/// 取引一覧を取得する
///
/// # 引数
/// * `state` - アプリケーション状態
/// * `query` - 種類・カテゴリの絞り込みとページング
///
/// # 戻り値
/// 日時の新しい順の取引リスト
pub async fn list_transactions(
    state: &AppState,
    query: TransactionQuery,
) -> AppResult<Vec<Transaction>> {
    let query = query.normalized();

    match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::find_all(conn, &query)).await,
        Database::Postgres(pool) => {
            let mut conn = pool.acquire().await?;
            pg_repository::find_all(&mut conn, &query).await
        }
    }
}

/// 定期支払い（請求書）の一覧を取得する
pub async fn list_bills(state: &AppState) -> AppResult<Vec<Transaction>> {
    match &state.db {
        Database::Sqlite(store) => store.run(|conn| repository::find_recurring(conn)).await,
        Database::Postgres(pool) => {
            let mut conn = pool.acquire().await?;
            pg_repository::find_recurring(&mut conn).await
        }
    }
}

/// 取引を作成する
///
/// # 戻り値
/// サーバーが付与したIDと記録日時を含む取引
pub async fn create_transaction(
    state: &AppState,
    dto: TransactionCreate,
) -> AppResult<Transaction> {
    validate_transaction_dto(&dto)?;

    let now = state.clock.now();
    let created = match &state.db {
        Database::Sqlite(store) => {
            store
                .run(move |conn| repository::create(conn, dto, now))
                .await?
        }
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let created = pg_repository::create(&mut tx, dto, now).await?;
            tx.commit().await?;
            created
        }
    };

    info!(
        "取引を作成しました: id={}, type={}, category={}",
        created.id, created.transaction_type, created.category
    );
    Ok(created)
}

/// 取引の支払い状況のみを更新する
pub async fn update_transaction_status(
    state: &AppState,
    id: i64,
    update: TransactionStatusUpdate,
) -> AppResult<Transaction> {
    let status = update.status;
    let updated = match &state.db {
        Database::Sqlite(store) => {
            store
                .run(move |conn| repository::update_status(conn, id, status))
                .await?
        }
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let updated = pg_repository::update_status(&mut tx, id, status).await?;
            tx.commit().await?;
            updated
        }
    };

    info!("取引の支払い状況を更新しました: id={id}, status={status}");
    Ok(updated)
}

/// 取引の変更可能な項目をすべて置き換える
pub async fn update_transaction(
    state: &AppState,
    id: i64,
    dto: TransactionCreate,
) -> AppResult<Transaction> {
    validate_transaction_dto(&dto)?;

    let updated = match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::update(conn, id, dto)).await?,
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let updated = pg_repository::update(&mut tx, id, dto).await?;
            tx.commit().await?;
            updated
        }
    };

    info!("取引を更新しました: id={id}");
    Ok(updated)
}

/// 取引を削除する
pub async fn delete_transaction(state: &AppState, id: i64) -> AppResult<()> {
    match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::delete(conn, id)).await?,
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            pg_repository::delete(&mut tx, id).await?;
            tx.commit().await?;
        }
    }

    info!("取引を削除しました: id={id}");
    Ok(())
}

/// 取引作成・更新DTOのバリデーション
///
/// # 戻り値
/// バリデーション成功時はOk(())、失敗時はエラー
fn validate_transaction_dto(dto: &TransactionCreate) -> AppResult<()> {
    validate_required_field(&dto.title, "title")?;
    validate_required_field(&dto.category, "category")?;
    validate_amount(dto.amount, "amount")?;
    Ok(())
}
