//! One-shot calendar expressions for the external trigger store.
//!
//! The store's syntax is `cron(minutes hours day-of-month month day-of-week year)`.
//! Pinning the year makes the expression match exactly once.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Timelike, Utc};

/// Render a `cron(..)` expression that fires once at `reference + secs_from_now`.
///
/// Minute-granular: seconds of the fire time are dropped. Returns `None` when
/// the fire time is not representable.
pub fn one_time_cron_expression(secs_from_now: i64, reference: DateTime<Utc>) -> Option<String> {
    let at = reference.checked_add_signed(TimeDelta::try_seconds(secs_from_now)?)?;
    Some(format!(
        "cron({:02} {:02} {:02} {:02} ? {})",
        at.minute(),
        at.hour(),
        at.day(),
        at.month(),
        at.year()
    ))
}

/// Read back the fire time of an expression produced by [`one_time_cron_expression`].
///
/// Returns `None` for anything that is not a pinned one-shot expression.
pub fn parse_one_time_cron_expression(expr: &str) -> Option<DateTime<Utc>> {
    let body = expr.trim().strip_prefix("cron(")?.strip_suffix(')')?;
    let fields: Vec<&str> = body.split_whitespace().collect();
    let [minute, hour, day, month, "?", year] = fields.as_slice() else {
        return None;
    };

    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    let naive = date.and_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)?;
    Utc.from_local_datetime(&naive).single()
}
