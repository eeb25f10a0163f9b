//! 时间工具函数 — 业务时区转换
//!
//! 每个请求在入口处捕获一次 `now` (Unix millis)，
//! 之后所有时间计算都显式传入该值，避免同一请求内时钟漂移。

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时刻字符串 (HH:MM)，失败返回 00:00
pub fn parse_hhmm(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse time-of-day '{}': {}, falling back to 00:00",
            value,
            e
        );
        NaiveTime::MIN
    })
}

/// 日期 + 时刻 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_time_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_time_millis(next_day, NaiveTime::MIN, tz)
}

/// Unix millis → 业务时区的当地日期
pub fn local_date(now_millis: i64, tz: Tz) -> NaiveDate {
    millis_to_datetime(now_millis)
        .with_timezone(&tz)
        .date_naive()
}

/// 日期所在周的周一 (ISO 周)
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
}
