use crate::shared::errors::AppError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 負債の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    CreditCard,
    Loan,
}

impl DebtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtType::CreditCard => "credit_card",
            DebtType::Loan => "loan",
        }
    }
}

impl FromStr for DebtType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(DebtType::CreditCard),
            "loan" => Ok(DebtType::Loan),
            other => Err(AppError::validation(format!(
                "type must be 'credit_card' or 'loan' (got '{other}')"
            ))),
        }
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 負債データモデル（クレジットカード残高または分割ローン）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Debt {
    pub id: i64,
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    pub name: String,
    pub total_amount: f64, // カード: 現在の残高、ローン: 借入総額
    pub due_date_day: i32, // 毎月の支払日（1〜31）
    // 以下はローンのみ意味を持つ
    pub monthly_payment: Option<f64>,
    pub total_installments: Option<i32>,
    pub remaining_installments: Option<i32>,
    pub start_date: NaiveDateTime,
}

/// 負債作成・更新用DTO
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DebtCreate {
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    pub name: String,
    pub total_amount: f64,
    pub due_date_day: i32,
    #[serde(default)]
    pub monthly_payment: Option<f64>,
    #[serde(default)]
    pub total_installments: Option<i32>,
    #[serde(default)]
    pub remaining_installments: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_card_dto_without_loan_fields() {
        let json = r#"{"type": "credit_card", "name": "Bonus", "total_amount": 4200.5, "due_date_day": 15}"#;
        let dto: DebtCreate = serde_json::from_str(json).unwrap();

        assert_eq!(dto.debt_type, DebtType::CreditCard);
        assert_eq!(dto.monthly_payment, None);
        assert_eq!(dto.total_installments, None);
        assert_eq!(dto.remaining_installments, None);
    }

    #[test]
    fn test_debt_dto_rejects_unknown_type() {
        let json = r#"{"type": "mortgage", "name": "Ev", "total_amount": 1, "due_date_day": 1}"#;
        assert!(serde_json::from_str::<DebtCreate>(json).is_err());
        assert!("CreditCard".parse::<DebtType>().is_err());
    }

    #[test]
    fn test_debt_serializes_type_field() {
        let debt = Debt {
            id: 1,
            debt_type: DebtType::Loan,
            name: "İhtiyaç Kredisi".to_string(),
            total_amount: 24000.0,
            due_date_day: 5,
            monthly_payment: Some(1000.0),
            total_installments: Some(24),
            remaining_installments: Some(20),
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 5)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        };

        let json = serde_json::to_value(&debt).unwrap();
        assert_eq!(json["type"], "loan");
        assert_eq!(json["start_date"], "2026-03-05T10:30:00");
        assert_eq!(json["remaining_installments"], 20);
    }
}
