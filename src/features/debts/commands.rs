use super::models::{Debt, DebtCreate};
use super::{pg_repository, repository};
use crate::shared::database::Database;
use crate::shared::errors::AppResult;
use crate::shared::utils::{
    validate_amount, validate_count, validate_day_of_month, validate_required_field,
};
use crate::AppState;
use log::info;

/// すべての負債を取得する
pub async fn list_debts(state: &AppState) -> AppResult<Vec<Debt>> {
    match &state.db {
        Database::Sqlite(store) => store.run(|conn| repository::find_all(conn)).await,
        Database::Postgres(pool) => {
            let mut conn = pool.acquire().await?;
            pg_repository::find_all(&mut conn).await
        }
    }
}

/// 負債を作成する（開始日時は現在時刻）
pub async fn create_debt(state: &AppState, dto: DebtCreate) -> AppResult<Debt> {
    validate_debt_dto(&dto)?;

    let now = state.clock.now();
    let debt = match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::create(conn, dto, now)).await?,
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let debt = pg_repository::create(&mut tx, dto, now).await?;
            tx.commit().await?;
            debt
        }
    };

    info!("負債を作成しました: id={}, type={}", debt.id, debt.debt_type);
    Ok(debt)
}

/// 負債を更新する
///
/// # 引数
/// * `state` - アプリケーション状態
/// * `id` - 負債ID
/// * `dto` - 置き換える内容
///
/// # 戻り値
/// 更新後の負債。存在しない場合は NotFound
pub async fn update_debt(state: &AppState, id: i64, dto: DebtCreate) -> AppResult<Debt> {
    validate_debt_dto(&dto)?;

    let debt = match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::update(conn, id, dto)).await?,
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let debt = pg_repository::update(&mut tx, id, dto).await?;
            tx.commit().await?;
            debt
        }
    };

    info!("負債を更新しました: id={id}");
    Ok(debt)
}

/// 負債を削除する
pub async fn delete_debt(state: &AppState, id: i64) -> AppResult<()> {
    match &state.db {
        Database::Sqlite(store) => store.run(move |conn| repository::delete(conn, id)).await?,
        Database::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            pg_repository::delete(&mut tx, id).await?;
            tx.commit().await?;
        }
    }

    info!("負債を削除しました: id={id}");
    Ok(())
}

/// 負債DTOのバリデーション
///
/// ローン用の項目が揃っているかは検証しない。
fn validate_debt_dto(dto: &DebtCreate) -> AppResult<()> {
    validate_required_field(&dto.name, "name")?;
    validate_amount(dto.total_amount, "total_amount")?;
    validate_day_of_month(dto.due_date_day, "due_date_day")?;

    if let Some(payment) = dto.monthly_payment {
        validate_amount(payment, "monthly_payment")?;
    }

    validate_count(dto.total_installments, "total_installments")?;
    validate_count(dto.remaining_installments, "remaining_installments")?;
    Ok(())
}
