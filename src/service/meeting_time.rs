use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::meeting::{BusinessHours, LocalTime, Location, MeetingSuggestion, SlotChoice};
use crate::service::time_codec::{self, CanonicalTime, MINUTES_PER_DAY};
use crate::service::timezone_offset::{self, InvalidTimezone};

pub const SLOT_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeetingTimeError {
    #[error(transparent)]
    InvalidTimezone(#[from] InvalidTimezone),
    #[error("at least two locations are required, got {0}")]
    InsufficientLocations(usize),
    #[error("location {index} is missing its {field}")]
    InvalidLocation { index: usize, field: &'static str },
    #[error("location label {0:?} is used more than once")]
    DuplicateLabel(String),
}

/// Finds a common meeting slot across participants' timezones.
///
/// The first location is the reference zone: candidate slots are its half hours
/// and every other zone is reached by adding its offset delta at `at`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeetingTimeResolver {
    hours: BusinessHours,
}

struct Participant<'a> {
    location: &'a Location,
    delta_minutes: i32,
}

impl MeetingTimeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn business_hours(&self) -> BusinessHours {
        self.hours
    }

    pub fn resolve(
        &self,
        locations: &[Location],
        preferred_time: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<MeetingSuggestion, MeetingTimeError> {
        let participants = participants(locations, at)?;

        let suitable: Vec<CanonicalTime> = candidate_slots()
            .filter(|slot| self.is_suitable(&participants, *slot))
            .collect();

        // A preference that fails to parse is simply no preference.
        let preferred = preferred_time.and_then(|text| time_codec::parse(text).ok());

        let (time, choice) = match (preferred, suitable.first()) {
            (Some(wanted), Some(_)) if self.is_suitable(&participants, wanted) => {
                (wanted, SlotChoice::Preferred)
            }
            (Some(wanted), Some(_)) => (closest_slot(&suitable, wanted), SlotChoice::ClosestToPreferred),
            (None, Some(earliest)) => (*earliest, SlotChoice::EarliestCommon),
            (_, None) => (CanonicalTime::MIDNIGHT, SlotChoice::Fallback),
        };

        let mut suggestion = self.build(&participants, time, choice);
        suggestion.explanation = explain(&suggestion, preferred, self.hours);
        Ok(suggestion)
    }

    /// Evaluates a slot chosen elsewhere (e.g. by an assistant) against the same rules.
    pub fn evaluate(
        &self,
        locations: &[Location],
        time: CanonicalTime,
        at: DateTime<Utc>,
    ) -> Result<MeetingSuggestion, MeetingTimeError> {
        let participants = participants(locations, at)?;
        Ok(self.build(&participants, time, SlotChoice::Assistant))
    }

    fn is_suitable(&self, participants: &[Participant<'_>], slot: CanonicalTime) -> bool {
        participants
            .iter()
            .all(|p| self.hours.contains(slot.shifted(p.delta_minutes)))
    }

    fn build(
        &self,
        participants: &[Participant<'_>],
        time: CanonicalTime,
        choice: SlotChoice,
    ) -> MeetingSuggestion {
        let local_times: Vec<LocalTime> = participants
            .iter()
            .map(|p| {
                let local = time.shifted(p.delta_minutes);
                LocalTime {
                    label: p.location.label.clone(),
                    timezone: p.location.timezone.clone(),
                    time: local,
                    within_business_hours: self.hours.contains(local),
                }
            })
            .collect();
        let is_outside_business_hours = local_times.iter().any(|l| !l.within_business_hours);

        MeetingSuggestion {
            time,
            reference_timezone: participants[0].location.timezone.clone(),
            local_times,
            is_outside_business_hours,
            choice,
            explanation: String::new(),
        }
    }
}

fn participants(
    locations: &[Location],
    at: DateTime<Utc>,
) -> Result<Vec<Participant<'_>>, MeetingTimeError> {
    if locations.len() < 2 {
        return Err(MeetingTimeError::InsufficientLocations(locations.len()));
    }
    for (index, location) in locations.iter().enumerate() {
        if location.timezone.trim().is_empty() {
            return Err(MeetingTimeError::InvalidLocation { index, field: "timezone" });
        }
        if location.label.trim().is_empty() {
            return Err(MeetingTimeError::InvalidLocation { index, field: "label" });
        }
        if locations[..index].iter().any(|earlier| earlier.label == location.label) {
            return Err(MeetingTimeError::DuplicateLabel(location.label.clone()));
        }
    }

    let offsets = locations
        .iter()
        .map(|location| timezone_offset::utc_offset_minutes(&location.timezone, at))
        .collect::<Result<Vec<i32>, InvalidTimezone>>()?;
    let reference = offsets[0];

    Ok(locations
        .iter()
        .zip(offsets)
        .map(|(location, offset)| Participant {
            location,
            delta_minutes: offset - reference,
        })
        .collect())
}

fn candidate_slots() -> impl Iterator<Item = CanonicalTime> {
    (0..MINUTES_PER_DAY)
        .step_by(SLOT_MINUTES as usize)
        .map(|minutes| CanonicalTime::from_minutes(i64::from(minutes)))
}

/// Nearest slot on the clock face; equal distances go to the slot before `wanted`.
fn closest_slot(slots: &[CanonicalTime], wanted: CanonicalTime) -> CanonicalTime {
    slots
        .iter()
        .copied()
        .min_by_key(|slot| {
            let distance = slot.distance(wanted);
            let before = (wanted.minutes() + MINUTES_PER_DAY - slot.minutes()) % MINUTES_PER_DAY == distance;
            (distance, !before, slot.minutes())
        })
        .unwrap_or(wanted)
}

fn explain(suggestion: &MeetingSuggestion, preferred: Option<CanonicalTime>, hours: BusinessHours) -> String {
    let window = format!(
        "{} - {}",
        time_codec::format(hours.start, true),
        time_codec::format(hours.end, true)
    );
    match suggestion.choice {
        SlotChoice::Preferred => format!(
            "Your preferred time of {} falls within business hours ({}) for all participants.",
            suggestion.time, window
        ),
        SlotChoice::ClosestToPreferred => format!(
            "Your preferred time of {} is outside business hours ({}) for at least one participant; {} is the closest time that works for everyone.",
            preferred.unwrap_or(suggestion.time),
            window,
            suggestion.time
        ),
        SlotChoice::EarliestCommon => format!(
            "{} is the earliest time within business hours ({}) for all participants.",
            suggestion.time, window
        ),
        SlotChoice::Fallback | SlotChoice::Assistant if suggestion.is_outside_business_hours => {
            let outside: Vec<&str> = suggestion
                .local_times
                .iter()
                .filter(|l| !l.within_business_hours)
                .map(|l| l.label.as_str())
                .collect();
            format!(
                "No time falls within business hours ({}) for every participant. {} is a compromise outside business hours for: {}.",
                window,
                suggestion.time,
                outside.join(", ")
            )
        }
        SlotChoice::Fallback | SlotChoice::Assistant => format!(
            "{} falls within business hours ({}) for all participants.",
            suggestion.time, window
        ),
    }
}

pub(crate) fn describe(suggestion: &MeetingSuggestion, hours: BusinessHours) -> String {
    explain(suggestion, None, hours)
}
