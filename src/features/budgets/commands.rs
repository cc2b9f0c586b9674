use super::models::{Budget, BudgetCreate, BudgetStatus};
use super::{pg_repository, repository};
use crate::shared::database::Database;
use crate::shared::errors::AppResult;
use crate::shared::utils::{validate_amount, validate_required_field};
use crate::AppState;
use log::info;

/// 今月の予算消化状況を取得する
///
/// 集計期間は時計のタイムゾーンで今月1日0時から現在まで。
pub async fn budget_status(state: &AppState) -> AppResult<Vec<BudgetStatus>> {
    let (start, end) = state.clock.current_month_window();

    match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::status(conn, start, end)).await,
        Database::Postgres(pool) => {
            let mut conn = pool.acquire().await?;
            pg_repository::status(&mut conn, start, end).await
        }
    }
}

/// 予算を作成する（同じカテゴリの予算があれば金額を上書き）
///
/// # 引数
/// * `state` - アプリケーション状態
/// * `dto` - 予算作成用DTO
///
/// # 戻り値
/// 保存後の予算
pub async fn upsert_budget(state: &AppState, dto: BudgetCreate) -> AppResult<Budget> {
    validate_budget_dto(&dto)?;

    let budget = match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::upsert(conn, dto)).await?,
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let budget = pg_repository::upsert(&mut tx, dto).await?;
            tx.commit().await?;
            budget
        }
    };

    info!(
        "予算を保存しました: id={}, category={}, amount={}",
        budget.id, budget.category, budget.amount
    );
    Ok(budget)
}

/// 予算DTOのバリデーション
fn validate_budget_dto(dto: &BudgetCreate) -> AppResult<()> {
    validate_required_field(&dto.category, "category")?;
    validate_amount(dto.amount, "amount")?;
    Ok(())
}
