use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::clients::LookupError;
use crate::models::geo::GeoTimezone;
use crate::service::time_query_service::normalize_timezone_id;
use crate::service::timezone_names;

const TIMEZONE_URL: &str = "https://maps.googleapis.com/maps/api/timezone/json";
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimezoneResponse {
    status: String,
    #[serde(default)]
    time_zone_id: String,
    #[serde(default)]
    time_zone_name: String,
    #[serde(default)]
    raw_offset: i64,
    #[serde(default)]
    dst_offset: i64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

pub struct GoogleMapsClient {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleMapsClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    pub async fn timezone_at(&self, latitude: f64, longitude: f64, at: DateTime<Utc>) -> Result<GeoTimezone, LookupError> {
        if self.api_key.trim().is_empty() {
            return Err(LookupError::NotConfigured("Google Maps"));
        }
        let position = format!("{},{}", latitude, longitude);
        let timestamp = at.timestamp().to_string();

        let timezone: TimezoneResponse = self
            .get_json(TIMEZONE_URL, &[("location", position.as_str()), ("timestamp", timestamp.as_str())])
            .await?;
        if timezone.status != "OK" {
            return Err(LookupError::Api(format!("Timezone API error: {}", timezone.status)));
        }

        let geocode: GeocodeResponse = self.get_json(GEOCODE_URL, &[("latlng", position.as_str())]).await?;
        let location = city_and_country(&geocode).unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        debug!(timezone = %timezone.time_zone_id, %location, "resolved coordinates");

        let time_zone_id = normalize_timezone_id(&timezone.time_zone_id);
        Ok(GeoTimezone {
            abbreviation: timezone_names::abbreviation(&time_zone_id, at),
            time_zone_id,
            time_zone_name: timezone.time_zone_name,
            raw_offset: timezone.raw_offset,
            dst_offset: timezone.dst_offset,
            location,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T, LookupError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}

fn city_and_country(geocode: &GeocodeResponse) -> Option<String> {
    let components = &geocode.results.first()?.address_components;
    let find = |kind: &str| {
        components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.long_name.clone())
    };
    match (find("locality"), find("country")) {
        (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
        _ => None,
    }
}
