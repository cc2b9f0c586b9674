use super::models::DashboardStats;
use super::{pg_repository, repository};
use crate::shared::database::Database;
use crate::shared::errors::AppResult;
use crate::AppState;

/// ダッシュボード統計を取得する（毎回全取引から再計算）
pub async fn dashboard_stats(state: &AppState) -> AppResult<DashboardStats> {
    let totals = match &state.db {
        Database::Sqlite(store) => store.run(|conn| repository::category_totals(conn)).await?,
        Database::Postgres(pool) => {
            let mut conn = pool.acquire().await?;
            pg_repository::category_totals(&mut conn).await?
        }
    };

    Ok(DashboardStats::from_totals(&totals))
}
