use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use tracing::debug;

// Same-day time literals accepted after the strict and 12-hour shapes
const TIME_LITERAL_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

// Calendar dates as produced by date pickers
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// A date as handed over by the form: either a typed value or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Text(&'a str),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        DateInput::Text(text)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(text: &'a String) -> Self {
        DateInput::Text(text.as_str())
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(timestamp: DateTime<Utc>) -> Self {
        DateInput::Timestamp(timestamp)
    }
}

/// Normalize a user-entered time to 24-hour `HH:mm`.
///
/// Accepted shapes, tried in order:
/// 1. strict `HH:mm`, returned unchanged
/// 2. `H:mm AM` / `H:mm PM`, case-insensitive, optional space before the meridiem
/// 3. a same-day time literal such as `9:05` or `21:30:15`
///
/// Returns `None` for anything else, including the empty string.
pub fn normalize_time(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    if is_strict_24h(input) {
        return Some(input.to_string());
    }

    if let Some((hour, minute)) = parse_meridiem(input) {
        return Some(format!("{:02}:{:02}", hour, minute));
    }

    let parsed = TIME_LITERAL_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(input, format).ok());

    match parsed {
        Some(time) => Some(time.format("%H:%M").to_string()),
        None => {
            debug!("Unrecognized time input: {:?}", input);
            None
        }
    }
}

/// Normalize a date value or date-like string to an ISO-8601 UTC timestamp
/// with millisecond precision, e.g. `2035-03-30T00:00:00.000Z`.
///
/// Calendar dates are taken as midnight UTC. Returns `None` when there is no
/// input or it cannot be parsed.
pub fn normalize_date(input: Option<DateInput<'_>>) -> Option<String> {
    let timestamp = match input? {
        DateInput::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        DateInput::Timestamp(timestamp) => timestamp,
        DateInput::Text(text) => parse_date_text(text)?,
    };

    Some(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// Two-digit hour and minute within the clock range
fn is_strict_24h(input: &str) -> bool {
    let Some((hour, minute)) = input.split_once(':') else {
        return false;
    };

    if hour.len() != 2 || minute.len() != 2 || !all_digits(hour) || !all_digits(minute) {
        return false;
    }

    matches!((hour.parse::<u32>(), minute.parse::<u32>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}

// "H:mm AM|PM" converted to a 24-hour (hour, minute) pair
fn parse_meridiem(input: &str) -> Option<(u32, u32)> {
    let upper = input.to_ascii_uppercase();
    let (clock, is_pm) = if let Some(clock) = upper.strip_suffix("AM") {
        (clock, false)
    } else if let Some(clock) = upper.strip_suffix("PM") {
        (clock, true)
    } else {
        return None;
    };

    let (hour, minute) = clock.trim_end().split_once(':')?;
    if hour.len() > 2 || minute.len() != 2 || !all_digits(hour) || !all_digits(minute) {
        return None;
    }

    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let hour = match (is_pm, hour) {
        (false, 12) => 0,
        (true, h) if h < 12 => h + 12,
        (_, h) => h,
    };

    Some((hour, minute))
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }

    if let Some(naive) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(naive.and_utc());
    }

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN).and_utc());

    if parsed.is_none() {
        debug!("Unrecognized date input: {:?}", text);
    }
    parsed
}
