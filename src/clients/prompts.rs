use chrono::{DateTime, Utc};

use crate::service::llm_service::PromptKind;

pub fn system_message(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::TimeQuery => {
            "You are a timezone expert. Extract location and time information from queries. Reply ONLY with a single JSON object, with no markdown, no backticks, and no extra text."
        }
        PromptKind::MeetingTime => {
            "You are a meeting scheduling assistant. Reply ONLY with a single JSON object, with no markdown, no backticks, and no extra text."
        }
    }
}

pub fn build_prompt(input: &str, kind: PromptKind, now: DateTime<Utc>) -> String {
    match kind {
        PromptKind::TimeQuery => format!(
            "Current date and time (UTC): {now}\n\
             Given the query \"{query}\", extract the following information.\n\
             The JSON shape must be exactly:\n\
             {{\"hasTime\":<bool>,\"time\":\"<h:mm AM/PM>\"|null,\"location\":\"<string>\",\"timezone\":\"<IANA id>\",\
             \"date\":\"<string>\"|null,\"currentLocationTime\":\"<h:mm AM/PM>\"|null,\"secondLocation\":\"<string>\"|null,\
             \"secondTimezone\":\"<IANA id>\"|null,\"secondLocationTime\":\"<h:mm AM/PM>\"|null}}\n\
             Rules:\n\
             1. Always use IANA timezone identifiers (e.g. \"Asia/Tokyo\").\n\
             2. Format times in 12-hour format with AM/PM.\n\
             3. If no specific time is mentioned, set hasTime to false and time to null.\n\
             4. If two locations are mentioned, include both.\n\
             5. Handle time formats like \"2pm\", \"4am\", \"3:00 PM\".\n\
             6. Keep dates as written: \"tomorrow\", \"28 May\", \"next Monday\".\n\
             Example for \"4am on 28 May in Tokyo, Singapore\":\n\
             {{\"hasTime\":true,\"time\":\"4:00 AM\",\"location\":\"Tokyo, Japan\",\"timezone\":\"Asia/Tokyo\",\"date\":\"28 May\",\
             \"currentLocationTime\":null,\"secondLocation\":\"Singapore\",\"secondTimezone\":\"Asia/Singapore\",\"secondLocationTime\":\"3:00 AM\"}}",
            now = now.to_rfc3339(),
            query = input
        ),
        PromptKind::MeetingTime => format!(
            "Current date and time (UTC): {now}\n\
             Task: suggest one meeting time for the participants below. Prefer a time between 9:00 AM and 8:00 PM local time for everyone. \
             If the request names a time, honor it when it works for everyone.\n\
             The suggested time is expressed in the FIRST participant's timezone.\n\
             The JSON shape must be exactly:\n\
             {{\"time\":\"<h:mm AM/PM>\",\"explanation\":\"<one sentence>\"}}\n\
             {details}",
            now = now.to_rfc3339(),
            details = input
        ),
    }
}
