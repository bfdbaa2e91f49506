use std::fmt;

use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time of day held as minutes past midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTime(u32);

impl CanonicalTime {
    pub const MIDNIGHT: CanonicalTime = CanonicalTime(0);

    pub const fn at_hour(hour: u32) -> Self {
        Self((hour % 24) * 60)
    }

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Wraps any signed minute count onto the clock face.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(minutes.rem_euclid(i64::from(MINUTES_PER_DAY)) as u32)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    pub fn shifted(self, delta_minutes: i32) -> Self {
        Self::from_minutes(i64::from(self.0) + i64::from(delta_minutes))
    }

    /// Shortest distance around the clock face, in minutes.
    pub fn distance(self, other: CanonicalTime) -> u32 {
        let forward = (other.0 + MINUTES_PER_DAY - self.0) % MINUTES_PER_DAY;
        forward.min(MINUTES_PER_DAY - forward)
    }
}

impl fmt::Display for CanonicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(*self, true))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("empty time string")]
    Empty,
    #[error("malformed time: {0}")]
    Malformed(String),
    #[error("hour out of range: {0}")]
    HourOutOfRange(u32),
    #[error("minute out of range: {0}")]
    MinuteOutOfRange(u32),
    #[error("ambiguous time without AM/PM: {0}")]
    Ambiguous(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Am,
    Pm,
}

/// Parses "2pm", "2:30 PM", "14:00" or a bare hour like "9".
pub fn parse(text: &str) -> Result<CanonicalTime, TimeParseError> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let (clock, period) = split_period(&lower);
    let clock = clock.trim_end();

    let (hour_text, minute_text) = match clock.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (clock, None),
    };

    let hour = parse_digits(hour_text, 1..=2, text)?;
    let minute = match minute_text {
        Some(m) => parse_digits(m, 2..=2, text)?,
        None => 0,
    };
    if minute > 59 {
        return Err(TimeParseError::MinuteOutOfRange(minute));
    }

    let hour = match period {
        Some(period) => {
            if hour > 12 {
                return Err(TimeParseError::HourOutOfRange(hour));
            }
            match (period, hour) {
                (Period::Am, 12) => 0,
                (Period::Am, h) => h,
                (Period::Pm, 12) => 12,
                (Period::Pm, h) => h + 12,
            }
        }
        None => {
            if hour > 23 {
                return Err(TimeParseError::HourOutOfRange(hour));
            }
            if hour == 12 && minute_text.is_none() {
                return Err(TimeParseError::Ambiguous(text.trim().to_string()));
            }
            hour
        }
    };

    CanonicalTime::new(hour, minute).ok_or_else(|| TimeParseError::Malformed(text.to_string()))
}

/// Renders `h:mm AM/PM` or zero-padded `HH:MM`.
pub fn format(value: CanonicalTime, twelve_hour: bool) -> String {
    let hour = value.hour();
    let minute = value.minute();
    if twelve_hour {
        let period = if hour >= 12 { "PM" } else { "AM" };
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour12, minute, period)
    } else {
        format!("{:02}:{:02}", hour, minute)
    }
}

fn split_period(lower: &str) -> (&str, Option<Period>) {
    let candidates = [
        ("a.m.", Period::Am),
        ("p.m.", Period::Pm),
        ("am", Period::Am),
        ("pm", Period::Pm),
    ];
    for (suffix, period) in candidates {
        if let Some(rest) = lower.strip_suffix(suffix) {
            return (rest, Some(period));
        }
    }
    (lower, None)
}

fn parse_digits(
    part: &str,
    width: std::ops::RangeInclusive<usize>,
    original: &str,
) -> Result<u32, TimeParseError> {
    let malformed = || TimeParseError::Malformed(original.trim().to_string());
    if !width.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    part.parse::<u32>().map_err(|_| malformed())
}
