use std::sync::Arc;

use crate::clients::google_calendar::CalendarClient;
use crate::clients::google_maps::GoogleMapsClient;
use crate::clients::mailer::InviteMailer;
use crate::clients::openweather::OpenWeatherClient;
use crate::service::meeting_time_service::MeetingTimeService;
use crate::service::time_query_service::TimeQueryService;

/// Everything a request handler may reach; `None` means the feature is not configured.
#[derive(Clone)]
pub struct AppState {
    pub meeting_times: Arc<MeetingTimeService>,
    pub time_queries: Option<Arc<TimeQueryService>>,
    pub calendar: Option<Arc<dyn CalendarClient>>,
    pub mailer: Option<Arc<dyn InviteMailer>>,
    pub mail_from: Option<String>,
    pub maps: Option<Arc<GoogleMapsClient>>,
    pub weather: Option<Arc<OpenWeatherClient>>,
}

impl AppState {
    pub fn new(meeting_times: Arc<MeetingTimeService>) -> Self {
        Self {
            meeting_times,
            time_queries: None,
            calendar: None,
            mailer: None,
            mail_from: None,
            maps: None,
            weather: None,
        }
    }
}
