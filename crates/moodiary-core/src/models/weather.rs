use serde::{Deserialize, Serialize};

/// Weather condition as reported by `GET /weather`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    #[serde(rename = "Clear sky")]
    ClearSky,
    #[serde(rename = "Partly cloudy")]
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 9] = [
        WeatherCondition::ClearSky,
        WeatherCondition::PartlyCloudy,
        WeatherCondition::Cloudy,
        WeatherCondition::Fog,
        WeatherCondition::Drizzle,
        WeatherCondition::Rain,
        WeatherCondition::Snow,
        WeatherCondition::Thunderstorm,
        WeatherCondition::Unknown,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            WeatherCondition::ClearSky => "Clear sky",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Unknown => "Unknown",
        }
    }

    /// Korean display label, as the web client shows it
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::ClearSky => "맑음",
            WeatherCondition::PartlyCloudy => "구름 조금",
            WeatherCondition::Cloudy => "흐림",
            WeatherCondition::Fog => "안개",
            WeatherCondition::Drizzle => "이슬비",
            WeatherCondition::Rain => "비",
            WeatherCondition::Snow => "눈",
            WeatherCondition::Thunderstorm => "뇌우",
            WeatherCondition::Unknown => "알 수 없음",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherCondition::ClearSky => "☀️",
            WeatherCondition::PartlyCloudy => "⛅",
            WeatherCondition::Cloudy => "☁️",
            WeatherCondition::Fog => "🌫️",
            WeatherCondition::Drizzle => "🌦️",
            WeatherCondition::Rain => "🌧️",
            WeatherCondition::Snow => "❄️",
            WeatherCondition::Thunderstorm => "⚡",
            WeatherCondition::Unknown => "❓",
        }
    }

    /// Parse a server condition string. Anything unrecognized maps to `Unknown`.
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|w| w.value().eq_ignore_ascii_case(value))
            .unwrap_or(WeatherCondition::Unknown)
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji(), self.value())
    }
}

/// Suggested weather for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WeatherReport {
    pub lat: f64,
    pub lon: f64,
    pub condition: String,
}

impl WeatherReport {
    pub fn kind(&self) -> WeatherCondition {
        WeatherCondition::from_value(&self.condition)
    }
}
