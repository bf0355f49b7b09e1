use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

use crate::core::error::DataError;

/// Minutes east of UTC for Asia/Kolkata, where the classes run
pub const INDIA_UTC_OFFSET_MINUTES: i32 = 330;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Resolves "today" in the business's own timezone.
///
/// Every status and period computation takes its reference date from here, so
/// a payment recorded at 01:00 IST on the 1st lands in the new month even
/// though UTC is still on the previous day.
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    offset: FixedOffset,
}

impl BusinessClock {
    pub fn new(offset_minutes: i32) -> Result<Self, String> {
        FixedOffset::east_opt(offset_minutes * 60)
            .map(|offset| Self { offset })
            .ok_or_else(|| format!("Invalid UTC offset: {} minutes", offset_minutes))
    }

    pub fn india() -> Self {
        let offset = FixedOffset::east_opt(INDIA_UTC_OFFSET_MINUTES * 60).unwrap_or(Utc.fix());
        Self { offset }
    }

    /// Calendar date in the business timezone at the given instant
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

/// Parses a record date. Accepts `YYYY-MM-DD` and timestamps that start with one
/// (`2024-03-05T00:00:00`, `2024-03-05 10:00:00`).
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, DataError> {
    let trimmed = value.trim();
    let date_part = match trimmed.char_indices().nth(10) {
        Some((idx, 'T')) | Some((idx, ' ')) => &trimmed[..idx],
        _ => trimmed,
    };

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| DataError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Empty strings count as "no date", matching how the edit form clears an end date.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, DataError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

/// Parses a wall-clock class time, `HH:MM` or `HH:MM:SS` (24h)
pub fn parse_class_time(value: &str) -> Result<NaiveTime, DataError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| DataError::InvalidClassTime(value.to_string()))
}

pub fn month_abbreviation(date: NaiveDate) -> &'static str {
    MONTH_ABBREVIATIONS[date.month0() as usize]
}

pub fn is_same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}
