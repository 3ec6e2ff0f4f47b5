//! Text encodings used in stored rows.
//!
//! List-shaped values (cue lists, workout exercise lists, performed sets)
//! are stored as JSON text, and timestamps as UTC ISO-8601 with millisecond
//! precision. Query code calls into this module and never formats either by
//! hand.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encode a value as JSON text for storage.
///
/// # Errors
///
/// Returns a conversion error if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Decode a JSON text column. NULL, empty and `null` decode to the default.
///
/// # Errors
///
/// Returns a conversion error naming the column if the text is not valid.
pub fn decode_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: DeserializeOwned + Default,
{
    let text: Option<String> = row.get(idx)?;
    match text.as_deref().map(str::trim) {
        None | Some("" | "null") => Ok(T::default()),
        Some(s) => serde_json::from_str(s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

/// Storage form of a timestamp, e.g. `2025-03-01T18:04:05.120Z`.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in storage form.
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// UTC bounds `[start, end)` of a local calendar day, in storage form.
///
/// Stored timestamps share one fixed-width format, so comparing them as text
/// against these bounds selects exactly the rows of that local day.
#[must_use]
pub fn local_day_bounds(day: NaiveDate) -> (String, String) {
    let start = local_midnight(day);
    let end = day
        .succ_opt()
        .map_or_else(|| start + chrono::Duration::days(1), local_midnight);
    (format_timestamp(start), format_timestamp(end))
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(chrono::NaiveTime::MIN);
    // DST can skip midnight; fall back to reading the wall time as UTC.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| Utc.from_utc_datetime(&naive), |dt| dt.with_timezone(&Utc))
}

/// Today's date on the local calendar.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// LIKE pattern matching `needle` anywhere, with wildcards escaped.
///
/// Use with `ESCAPE '\'`.
#[must_use]
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 8, 4, 5).unwrap();
        assert_eq!(format_timestamp(ts), "2025-03-01T08:04:05.000Z");
        let later = ts.with_nanosecond(120_000_000).unwrap();
        assert_eq!(format_timestamp(later), "2025-03-01T08:04:05.120Z");
    }

    #[test]
    fn test_local_day_bounds_cover_local_noon() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (start, end) = local_day_bounds(day);
        let noon = Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        let noon = format_timestamp(noon);
        assert!(start <= noon && noon < end, "{start} <= {noon} < {end}");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("bicep"), "%bicep%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
