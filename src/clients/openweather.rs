use tracing::debug;

use crate::clients::LookupError;
use crate::models::geo::Weather;

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    /// Current conditions in metric units; a fixed sample when no key is set.
    pub async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather, LookupError> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            debug!("no OpenWeather key configured, serving sample weather");
            return Ok(Weather::mock());
        };

        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let response = self
            .http
            .get(CURRENT_WEATHER_URL)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric"), ("appid", api_key)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        Ok(response.json::<Weather>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_sample_without_key() {
        let client = OpenWeatherClient::new(reqwest::Client::new(), None);
        let weather = client.current(51.5, -0.12).await.unwrap();
        assert_eq!(weather, Weather::mock());
    }

    #[test]
    fn decodes_openweather_payload() {
        let weather: Weather = serde_json::from_str(
            r#"{"weather":[{"id":800,"main":"Clear","description":"clear sky","icon":"01n"}],
                "main":{"temp":11.2,"feels_like":10.1,"humidity":80,"pressure":1012},
                "wind":{"speed":2.1,"deg":200},"name":"London","cod":200}"#,
        )
        .unwrap();
        assert_eq!(weather.name, "London");
        assert_eq!(weather.main.humidity, 80);
    }
}
