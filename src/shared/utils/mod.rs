use crate::shared::errors::{AppError, AppResult};
use chrono::{Datelike, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// 金額のバリデーション
///
/// # 引数
/// * `amount` - 金額
/// * `field_name` - フィールド名（エラーメッセージ用）
///
/// # バリデーション規則
/// - 有限の数値であること（NaN・無限大は不可）
/// - 0以上であること（符号は種類で表すため金額は大きさのみ）
pub fn validate_amount(amount: f64, field_name: &str) -> AppResult<()> {
    if !amount.is_finite() {
        return Err(AppError::validation(format!(
            "{field_name} must be a finite number"
        )));
    }

    if amount < 0.0 {
        return Err(AppError::validation(format!(
            "{field_name} must not be negative"
        )));
    }

    Ok(())
}

/// 必須フィールドのバリデーション
///
/// 空文字列や空白のみの文字列はエラーとする。
pub fn validate_required_field(text: &str, field_name: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation(format!("{field_name} is required")));
    }
    Ok(())
}

/// 月の日付（1〜31）のバリデーション
pub fn validate_day_of_month(day: i32, field_name: &str) -> AppResult<()> {
    if !(1..=31).contains(&day) {
        return Err(AppError::validation(format!(
            "{field_name} must be between 1 and 31"
        )));
    }
    Ok(())
}

/// 回数系フィールド（分割回数など）のバリデーション
pub fn validate_count(value: Option<i32>, field_name: &str) -> AppResult<()> {
    if let Some(v) = value {
        if v < 0 {
            return Err(AppError::validation(format!(
                "{field_name} must not be negative"
            )));
        }
    }
    Ok(())
}

/// 割合を整数のパーセントで求める（四捨五入ではなく切り捨て）
///
/// # 戻り値
/// `whole` が0以下の場合は None（呼び出し側で代替値を決める）
pub fn truncated_percentage(part: f64, whole: f64) -> Option<i64> {
    if whole > 0.0 {
        Some(((part / whole) * 100.0).trunc() as i64)
    } else {
        None
    }
}

/// 記録日時と月次集計の基準になる時計
///
/// タイムゾーン未指定の場合はサーバーのローカル時刻を使う。
#[derive(Debug, Clone, Copy, Default)]
pub struct AppClock {
    timezone: Option<Tz>,
}

impl AppClock {
    pub fn new(timezone: Option<Tz>) -> Self {
        Self { timezone }
    }

    /// 現在時刻（タイムゾーン情報なしの壁時計時刻）
    pub fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }

    /// 今月1日の0時から現在までの期間
    pub fn current_month_window(&self) -> (NaiveDateTime, NaiveDateTime) {
        let now = self.now();
        (start_of_month(now), now)
    }
}

/// 指定日時が属する月の1日0時を返す
pub fn start_of_month(at: NaiveDateTime) -> NaiveDateTime {
    at.date()
        .with_day(1)
        .and_then(|first| first.and_hms_opt(0, 0, 0))
        .unwrap_or(at)
}
