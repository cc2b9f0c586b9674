use crate::features::transactions::models::TransactionType;
use crate::shared::utils::truncated_percentage;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// 円グラフに表示するカテゴリ（表示順）
pub const CHART_CATEGORIES: [&str; 4] = ["Mutfak", "Sağlık", "Ulaşım", "Diğer"];

/// 種類・カテゴリ別の金額合計（集計クエリの1行）
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub transaction_type: TransactionType,
    pub category: String,
    pub total: f64,
}

/// 固定カテゴリごとの支出割合（整数パーセント、切り捨て）
///
/// JSONでは `CHART_CATEGORIES` の順にキーを並べたオブジェクトになる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartData([i64; CHART_CATEGORIES.len()]);

impl ChartData {
    /// カテゴリの割合を取得する（固定カテゴリ以外は None）
    pub fn get(&self, category: &str) -> Option<i64> {
        CHART_CATEGORIES
            .iter()
            .position(|c| *c == category)
            .map(|index| self.0[index])
    }

    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }
}

impl Serialize for ChartData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CHART_CATEGORIES.len()))?;
        for (category, percentage) in CHART_CATEGORIES.iter().zip(self.0.iter()) {
            map.serialize_entry(category, percentage)?;
        }
        map.end()
    }
}

/// ダッシュボードの統計情報（全期間）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub total_balance: f64,
    pub chart_data: ChartData,
}

impl DashboardStats {
    /// 種類・カテゴリ別の合計から統計を計算する
    ///
    /// # 引数
    /// * `totals` - 集計クエリの結果
    ///
    /// # 戻り値
    /// 収入・支出・残高と固定カテゴリの支出割合。支出が0なら割合はすべて0
    pub fn from_totals(totals: &[CategoryTotal]) -> Self {
        let sum_of = |kind: TransactionType| -> f64 {
            totals
                .iter()
                .filter(|t| t.transaction_type == kind)
                .map(|t| t.total)
                .sum()
        };

        let total_income = sum_of(TransactionType::Income);
        let total_expense = sum_of(TransactionType::Expense);

        let mut chart = [0i64; CHART_CATEGORIES.len()];
        for (slot, category) in chart.iter_mut().zip(CHART_CATEGORIES.iter()) {
            let category_total: f64 = totals
                .iter()
                .filter(|t| t.transaction_type == TransactionType::Expense && t.category == *category)
                .map(|t| t.total)
                .sum();
            *slot = truncated_percentage(category_total, total_expense).unwrap_or(0);
        }

        Self {
            total_income,
            total_expense,
            total_balance: total_income - total_expense,
            chart_data: ChartData(chart),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn total(kind: TransactionType, category: &str, amount: f64) -> CategoryTotal {
        CategoryTotal {
            transaction_type: kind,
            category: category.to_string(),
            total: amount,
        }
    }

    #[test]
    fn test_empty_totals() {
        let stats = DashboardStats::from_totals(&[]);
        assert_eq!(stats.total_income, 0.0);
        assert_eq!(stats.total_expense, 0.0);
        assert_eq!(stats.total_balance, 0.0);
        assert_eq!(stats.chart_data, ChartData::default());
    }

    #[test]
    fn test_chart_excludes_unlisted_categories() {
        let stats = DashboardStats::from_totals(&[
            total(TransactionType::Income, "Maaş", 10000.0),
            total(TransactionType::Expense, "Mutfak", 500.0),
            total(TransactionType::Expense, "Fatura", 1500.0),
            // 収入側の同名カテゴリは割合に含めない
            total(TransactionType::Income, "Diğer", 300.0),
        ]);

        assert_eq!(stats.total_income, 10300.0);
        assert_eq!(stats.total_expense, 2000.0);
        assert_eq!(stats.total_balance, 8300.0);
        assert_eq!(stats.chart_data.get("Mutfak"), Some(25));
        assert_eq!(stats.chart_data.get("Diğer"), Some(0));
        assert_eq!(stats.chart_data.get("Fatura"), None);
        assert_eq!(stats.chart_data.total(), 25);
    }

    #[test]
    fn test_chart_data_serializes_in_fixed_order() {
        let stats = DashboardStats::from_totals(&[
            total(TransactionType::Expense, "Diğer", 1.0),
            total(TransactionType::Expense, "Mutfak", 3.0),
        ]);

        let json = serde_json::to_string(&stats.chart_data).unwrap();
        assert_eq!(json, r#"{"Mutfak":75,"Sağlık":0,"Ulaşım":0,"Diğer":25}"#);
    }

    fn build_totals(rows: &[(bool, u8, u16)]) -> Vec<CategoryTotal> {
        let categories = ["Mutfak", "Sağlık", "Ulaşım", "Diğer", "Fatura", "Maaş"];
        rows.iter()
            .map(|(is_income, index, amount)| {
                let kind = if *is_income {
                    TransactionType::Income
                } else {
                    TransactionType::Expense
                };
                total(kind, categories[*index as usize % categories.len()], *amount as f64)
            })
            .collect()
    }

    #[quickcheck]
    fn prop_balance_is_income_minus_expense(rows: Vec<(bool, u8, u16)>) -> bool {
        let stats = DashboardStats::from_totals(&build_totals(&rows));
        stats.total_balance == stats.total_income - stats.total_expense
    }

    #[quickcheck]
    fn prop_chart_percentages_sum_at_most_100(rows: Vec<(bool, u8, u16)>) -> bool {
        let stats = DashboardStats::from_totals(&build_totals(&rows));
        let chart = stats.chart_data;
        chart.total() <= 100 && CHART_CATEGORIES.iter().all(|c| chart.get(c).unwrap_or(-1) >= 0)
    }
}
