//! Progress arithmetic for year, day, minute and month.
//!
//! Every function takes the instant to measure, already converted to the
//! reference zone. Fractions are percentages clamped to `[0, 100]`.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Seconds since local midnight, including the sub-second part.
fn seconds_into_day(now: &DateTime<FixedOffset>) -> f64 {
    now.num_seconds_from_midnight() as f64 + now.nanosecond() as f64 / 1e9
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Percentage of the calendar year elapsed.
pub fn year_progress(now: &DateTime<FixedOffset>) -> f64 {
    let days_in_year = if now.date_naive().leap_year() { 366.0 } else { 365.0 };
    let elapsed = now.ordinal0() as f64 * SECONDS_PER_DAY + seconds_into_day(now);
    clamp_percent(elapsed / (days_in_year * SECONDS_PER_DAY) * 100.0)
}

/// Percentage of the day elapsed since midnight.
pub fn day_progress(now: &DateTime<FixedOffset>) -> f64 {
    clamp_percent(seconds_into_day(now) / SECONDS_PER_DAY * 100.0)
}

/// Sub-minute tick: second of the minute over 59.
///
/// Second 59 reads exactly 100 and second 0 reads exactly 0.
pub fn tick_progress(now: &DateTime<FixedOffset>) -> f64 {
    clamp_percent(now.second() as f64 / 59.0 * 100.0)
}

/// Calendar position within the month and year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthInfo {
    /// Full month name, e.g. "March"
    pub name: String,
    /// Days left before the first day of next month (0 on the last day)
    pub days_left: u32,
    /// Whole months not yet begun in this year
    pub months_left: u32,
}

impl MonthInfo {
    /// Compute month information for an instant.
    pub fn at(now: &DateTime<FixedOffset>) -> Self {
        let month_days = u32::from(now.num_days_in_month());
        let days_left = month_days.saturating_sub(now.day());
        let mut months_left = 12 - now.month();
        if now.day() == month_days {
            months_left = months_left.saturating_sub(1);
        }

        Self {
            name: now.format("%B").to_string(),
            days_left,
            months_left,
        }
    }
}

/// Format a percentage with `decimals` places, then drop trailing zeros and a
/// trailing decimal point: `100.000000` becomes `100`, `42.500000` becomes
/// `42.5`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    if decimals == 0 {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
