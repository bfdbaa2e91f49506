use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timezone: {0}")]
pub struct InvalidTimezone(pub String);

/// Looks an IANA identifier up in the bundled tz database.
pub fn resolve_timezone(timezone: &str) -> Result<Tz, InvalidTimezone> {
    let trimmed = timezone.trim();
    if trimmed.is_empty() {
        return Err(InvalidTimezone(timezone.to_string()));
    }
    trimmed
        .parse::<Tz>()
        .map_err(|_| InvalidTimezone(timezone.to_string()))
}

pub fn is_valid_timezone(timezone: &str) -> bool {
    resolve_timezone(timezone).is_ok()
}

/// UTC offset of `timezone` at `instant`, in whole minutes, DST included.
pub fn utc_offset_minutes(timezone: &str, instant: DateTime<Utc>) -> Result<i32, InvalidTimezone> {
    let tz = resolve_timezone(timezone)?;
    let offset = tz.offset_from_utc_datetime(&instant.naive_utc()).fix();
    Ok(offset.local_minus_utc() / 60)
}

/// UTC offset of `timezone` at `instant`, in hours (`5.5` for India).
pub fn utc_offset_hours(timezone: &str, instant: DateTime<Utc>) -> Result<f64, InvalidTimezone> {
    utc_offset_minutes(timezone, instant).map(|minutes| f64::from(minutes) / 60.0)
}
