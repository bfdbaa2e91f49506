use chrono::{DateTime, Utc};

use crate::service::timezone_offset::resolve_timezone;

const KNOWN_ABBREVIATIONS: [(&str, &str); 12] = [
    ("Asia/Kolkata", "IST"),
    ("Asia/Calcutta", "IST"),
    ("Asia/Colombo", "IST"),
    ("America/New_York", "EST"),
    ("America/Chicago", "CST"),
    ("America/Denver", "MST"),
    ("America/Los_Angeles", "PST"),
    ("Europe/London", "GMT"),
    ("Europe/Paris", "CET"),
    ("Asia/Tokyo", "JST"),
    ("Australia/Sydney", "AEST"),
    ("Pacific/Auckland", "NZST"),
];

/// Short display name for a zone; unknown identifiers are echoed back.
pub fn abbreviation(timezone: &str, at: DateTime<Utc>) -> String {
    if let Some((_, abbr)) = KNOWN_ABBREVIATIONS.iter().find(|(id, _)| *id == timezone) {
        return abbr.to_string();
    }
    match resolve_timezone(timezone) {
        Ok(tz) => {
            let name = at.with_timezone(&tz).format("%Z").to_string();
            if name.is_empty() { timezone.to_string() } else { name }
        }
        Err(_) => timezone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn table_wins_over_database() {
        let summer = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        assert_eq!(abbreviation("America/New_York", summer), "EST");
        assert_eq!(abbreviation("Asia/Calcutta", summer), "IST");
    }

    #[test]
    fn database_abbreviation_follows_dst() {
        let winter = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2026, 7, 15, 0, 0, 0).unwrap();
        assert_eq!(abbreviation("Europe/Berlin", winter), "CET");
        assert_eq!(abbreviation("Europe/Berlin", summer), "CEST");
    }

    #[test]
    fn unknown_zone_is_echoed() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(abbreviation("Mars/Olympus", now), "Mars/Olympus");
    }
}
