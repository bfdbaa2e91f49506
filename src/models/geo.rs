use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoTimezone {
    pub time_zone_id: String,
    pub time_zone_name: String,
    pub raw_offset: i64,
    pub dst_offset: i64,
    pub location: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// Current conditions, kept in OpenWeather's own shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub weather: Vec<WeatherCondition>,
    pub main: WeatherMain,
    pub wind: Wind,
    pub name: String,
}

impl Weather {
    pub fn mock() -> Self {
        Self {
            weather: vec![WeatherCondition {
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
            main: WeatherMain {
                temp: 22.0,
                feels_like: 21.0,
                humidity: 65,
            },
            wind: Wind { speed: 3.5 },
            name: "Your Location".to_string(),
        }
    }
}
