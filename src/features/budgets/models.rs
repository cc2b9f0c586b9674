use crate::shared::utils::truncated_percentage;
use serde::{Deserialize, Serialize};

/// 上限が0の予算に返す使用率（使い切り扱い）
pub const FULLY_USED_PERCENTAGE: i64 = 100;

/// カテゴリごとの月間予算
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: f64,
}

/// 予算作成用DTO（同じカテゴリが存在する場合は上書き）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BudgetCreate {
    pub category: String,
    pub amount: f64,
}

/// 今月の予算消化状況
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub percentage: i64,
}

impl BudgetStatus {
    /// 上限と支出額から消化状況を組み立てる
    ///
    /// # 引数
    /// * `category` - 予算カテゴリ
    /// * `limit` - 予算上限
    /// * `spent` - 今月の支出合計
    pub fn new(category: String, limit: f64, spent: f64) -> Self {
        let percentage = truncated_percentage(spent, limit).unwrap_or(FULLY_USED_PERCENTAGE);
        Self {
            category,
            limit,
            spent,
            percentage,
        }
    }
}
