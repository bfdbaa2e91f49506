use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tyme::models::meeting::{Location, SlotChoice};
use tyme::service::llm_service::{LlmClient, LlmError, PromptKind};
use tyme::service::meeting_time::MeetingTimeError;
use tyme::service::meeting_time_service::{MeetingTimeService, Strategy};
use tyme::service::time_codec::CanonicalTime;
use tyme::service::time_query_service::{TimeQueryError, TimeQueryService};

/// Replays canned replies; `None` means the provider call fails.
struct ScriptedLlm {
    replies: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
    kinds: Mutex<Vec<PromptKind>>,
}

impl ScriptedLlm {
    fn new(replies: Vec<Option<&str>>) -> Arc<Self> {
        let mut replies: Vec<Option<String>> = replies.into_iter().map(|r| r.map(str::to_string)).collect();
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
            kinds: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn provider(&self) -> &'static str {
        "scripted"
    }

    async fn generate_prompt(&self, _input: &str, kind: PromptKind) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.kinds.lock().unwrap().push(kind);
        match self.replies.lock().unwrap().pop().flatten() {
            Some(reply) => Ok(reply),
            None => Err(LlmError::Status { provider: "scripted", status: 503 }),
        }
    }
}

fn january() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

fn hm(h: u32, m: u32) -> CanonicalTime {
    CanonicalTime::new(h, m).unwrap()
}

fn london_athens() -> Vec<Location> {
    vec![Location::new("Europe/London", "London"), Location::new("Europe/Athens", "Athens")]
}

#[tokio::test]
async fn time_query_reads_fenced_reply_and_repairs_zones() {
    let llm = ScriptedLlm::new(vec![Some(
        "```json\n{\"hasTime\":true,\"time\":\"2:00 PM\",\"location\":\"Tokyo\",\"timezone\":\"Asia/Tokyo\",\
         \"secondLocation\":\"Mumbai\",\"secondTimezone\":\"Asia/Calcutta\"}\n```",
    )]);
    let service = TimeQueryService::new(llm.clone());

    let result = service.parse_query("2pm in Tokyo, Mumbai").await.unwrap();
    assert!(result.has_time);
    assert_eq!(result.time.as_deref(), Some("2:00 PM"));
    assert_eq!(result.timezone, "Asia/Tokyo");
    assert_eq!(result.second_timezone.as_deref(), Some("Asia/Kolkata"));
    assert_eq!(*llm.kinds.lock().unwrap(), vec![PromptKind::TimeQuery]);
}

#[tokio::test]
async fn time_query_substitutes_city_zone_for_bad_identifier() {
    let llm = ScriptedLlm::new(vec![Some(
        r#"{"hasTime":false,"time":"9:00 AM","location":"Downtown Chicago","timezone":"Central Time"}"#,
    )]);
    let result = TimeQueryService::new(llm).parse_query("what time is it in chicago").await.unwrap();
    assert_eq!(result.timezone, "America/Chicago");
    assert_eq!(result.time, None);
}

#[tokio::test]
async fn time_query_errors_are_typed() {
    let llm = ScriptedLlm::new(vec![None, Some("I could not tell"), Some("{}")]);
    let service = TimeQueryService::new(llm.clone());

    assert!(matches!(service.parse_query("   ").await, Err(TimeQueryError::EmptyQuery)));
    assert_eq!(llm.calls(), 0);

    assert!(matches!(service.parse_query("2pm Tokyo").await, Err(TimeQueryError::Llm(_))));
    assert!(matches!(service.parse_query("2pm Tokyo").await, Err(TimeQueryError::InvalidReply(_))));
    assert!(matches!(service.parse_query("2pm Tokyo").await, Err(TimeQueryError::MissingLocation)));
}

#[tokio::test]
async fn local_strategy_honours_time_in_query() {
    let service = MeetingTimeService::new(None);
    let suggestion = service
        .suggest(&london_athens(), Some("can we do 10:00 am?"), Strategy::Local, january())
        .await
        .unwrap();
    assert_eq!(suggestion.time, hm(10, 0));
    assert_eq!(suggestion.choice, SlotChoice::Preferred);
}

#[tokio::test]
async fn assistant_time_is_rechecked_against_business_hours() {
    let llm = ScriptedLlm::new(vec![Some(r#"{"time":"7:00 PM","explanation":"End of day for both."}"#)]);
    let service = MeetingTimeService::new(Some(llm.clone()));

    let suggestion = service
        .suggest(&london_athens(), Some("sometime today"), Strategy::Ai, january())
        .await
        .unwrap();
    assert_eq!(suggestion.choice, SlotChoice::Assistant);
    assert_eq!(suggestion.time, hm(19, 0));
    assert_eq!(suggestion.local_time("Athens"), Some(hm(21, 0)));
    assert!(suggestion.is_outside_business_hours);
    assert_eq!(suggestion.explanation, "End of day for both.");
    assert_eq!(*llm.kinds.lock().unwrap(), vec![PromptKind::MeetingTime]);
}

#[tokio::test]
async fn unusable_assistant_falls_back_to_local_resolver() {
    let llm = ScriptedLlm::new(vec![None, Some("no idea"), Some(r#"{"time":"teatime"}"#)]);
    let service = MeetingTimeService::new(Some(llm.clone()));

    for _ in 0..3 {
        let suggestion = service
            .suggest(&london_athens(), None, Strategy::Ai, january())
            .await
            .unwrap();
        assert_eq!(suggestion.choice, SlotChoice::EarliestCommon);
        assert_eq!(suggestion.time, hm(9, 0));
        assert_eq!(suggestion.local_time("Athens"), Some(hm(11, 0)));
    }
    assert_eq!(llm.calls(), 3);
}

#[tokio::test]
async fn ai_strategy_without_model_uses_local_resolver() {
    let service = MeetingTimeService::new(None);
    let suggestion = service
        .suggest(&london_athens(), None, Strategy::Ai, january())
        .await
        .unwrap();
    assert_eq!(suggestion.choice, SlotChoice::EarliestCommon);
}

#[tokio::test]
async fn invalid_locations_fail_before_the_model_is_asked() {
    let llm = ScriptedLlm::new(vec![Some(r#"{"time":"10:00 AM"}"#)]);
    let service = MeetingTimeService::new(Some(llm.clone()));

    let bad = vec![Location::new("Europe/London", "London"), Location::new("Not/AZone", "X")];
    let err = service.suggest(&bad, None, Strategy::Ai, january()).await.unwrap_err();
    assert!(matches!(err, MeetingTimeError::InvalidTimezone(_)));

    let lonely = vec![Location::new("Europe/London", "London")];
    let err = service.suggest(&lonely, None, Strategy::Ai, january()).await.unwrap_err();
    assert_eq!(err, MeetingTimeError::InsufficientLocations(1));
    assert_eq!(llm.calls(), 0);
}
