use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Timelike, Utc};

use crate::error::Result;

/// Parses a user supplied point in time, e.g. for `ls --since`.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    // A bare date means the start of that day
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Storage representation of a timestamp. Keeps microseconds so ordering by
/// the text column matches ordering by time.
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn from_storage(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Current time truncated to storage precision.
pub fn now() -> DateTime<Utc> {
    truncate_micros(Utc::now())
}

/// Returns a timestamp strictly later than `previous`, using the wall clock
/// when it has moved on.
pub fn advance_from(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn truncate_micros(dt: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = (dt.nanosecond() / 1_000) * 1_000;
    dt.with_nanosecond(nanos).unwrap_or(dt)
}
