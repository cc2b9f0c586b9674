use crate::shared::errors::AppError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 取引一覧のデフォルト取得件数
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// アイコン未指定時のMaterial Symbol名
pub const DEFAULT_ICON: &str = "payments";

/// 取引の種類（符号は金額ではなく種類で表す）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(AppError::validation(format!(
                "type must be 'income' or 'expense' (got '{other}')"
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 取引の支払い状況
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Unpaid,
    Autopay,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Unpaid => "unpaid",
            TransactionStatus::Autopay => "autopay",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TransactionStatus::Completed),
            "unpaid" => Ok(TransactionStatus::Unpaid),
            "autopay" => Ok(TransactionStatus::Autopay),
            other => Err(AppError::validation(format!(
                "status must be 'completed', 'unpaid' or 'autopay' (got '{other}')"
            ))),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 取引データモデル
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub amount: f64, // 0以上の大きさ
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String, // 自由入力のラベル（予算とは文字列一致で紐づく）
    pub date: NaiveDateTime, // 記録日時（サーバーが付与）
    pub is_recurring: bool,
    pub status: TransactionStatus,
    pub due_date_str: Option<String>, // 例: "26 Ekim"
    pub icon: String,
}

/// 取引作成・更新用DTO
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionCreate {
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub due_date_str: Option<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// 支払い状況更新用DTO
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionStatusUpdate {
    pub status: TransactionStatus,
}

/// 取引一覧の絞り込み条件
///
/// `transaction_type` は保存値との完全一致で比較するため、
/// 未知の種類を指定すると空の結果になる。
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub limit: i64,
    pub skip: i64,
}

impl TransactionQuery {
    /// 負のページング値を正規化する
    ///
    /// 負の `limit` は上限なし、負の `skip` は0として扱う。
    pub fn normalized(self) -> Self {
        Self {
            limit: if self.limit < 0 { i64::MAX } else { self.limit },
            skip: self.skip.max(0),
            ..self
        }
    }
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            transaction_type: None,
            category: None,
            limit: DEFAULT_LIST_LIMIT,
            skip: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_defaults() {
        let json = r#"{
            "title": "Test",
            "amount": 100,
            "type": "expense",
            "category": "Mutfak"
        }"#;

        let dto: TransactionCreate = serde_json::from_str(json).unwrap();
        assert_eq!(dto.amount, 100.0);
        assert_eq!(dto.transaction_type, TransactionType::Expense);
        assert!(!dto.is_recurring);
        assert_eq!(dto.status, TransactionStatus::Completed);
        assert_eq!(dto.due_date_str, None);
        assert_eq!(dto.icon, "payments");
    }

    #[test]
    fn test_create_dto_rejects_unknown_type() {
        let json = r#"{"title": "X", "amount": 1, "type": "transfer", "category": "Y"}"#;
        assert!(serde_json::from_str::<TransactionCreate>(json).is_err());
    }

    #[test]
    fn test_create_dto_requires_fields() {
        // category がない
        let json = r#"{"title": "X", "amount": 1, "type": "income"}"#;
        assert!(serde_json::from_str::<TransactionCreate>(json).is_err());

        // amount が文字列
        let json = r#"{"title": "X", "amount": "bir", "type": "income", "category": "Y"}"#;
        assert!(serde_json::from_str::<TransactionCreate>(json).is_err());
    }

    #[test]
    fn test_transaction_serializes_type_field() {
        let transaction = Transaction {
            id: 7,
            title: "Su Faturası".to_string(),
            amount: 120.0,
            transaction_type: TransactionType::Expense,
            category: "Fatura".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            is_recurring: true,
            status: TransactionStatus::Unpaid,
            due_date_str: Some("28 Ekim".to_string()),
            icon: "water_drop".to_string(),
        };

        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["status"], "unpaid");
        assert_eq!(json["date"], "2026-10-01T09:00:00");
        assert!(json.get("transaction_type").is_none());
    }

    #[test]
    fn test_enum_parsing_rejects_unknown_values() {
        let err = "paid".parse::<TransactionStatus>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // 大文字小文字は区別する
        assert!("Income".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_query_normalization() {
        let query = TransactionQuery {
            limit: -1,
            skip: -5,
            ..TransactionQuery::default()
        }
        .normalized();
        assert_eq!(query.limit, i64::MAX);
        assert_eq!(query.skip, 0);

        // 非負の値はそのまま
        let query = TransactionQuery {
            limit: 0,
            skip: 3,
            ..TransactionQuery::default()
        }
        .normalized();
        assert_eq!(query.limit, 0);
        assert_eq!(query.skip, 3);
    }
}
