use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{convert::TryFrom, fmt};

use crate::error::WidgetError;

/// Temperature unit. The symbol doubles as the `unit` query token and the
/// displayed suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [Unit] {
        &[Unit::Celsius, Unit::Fahrenheit]
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Unit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "°c" | "c" | "celsius" | "metric" => Ok(Unit::Celsius),
            "°f" | "f" | "fahrenheit" | "imperial" => Ok(Unit::Fahrenheit),
            _ => Err(anyhow::anyhow!("Unknown unit '{value}'. Supported units: °C, °F.")),
        }
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Unit::try_from(s.as_str()).map_err(serde::de::Error::custom)
    }
}

/// Raw values as currently held by the form, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub city: String,
    pub unit: Unit,
    pub days: u8,
}

/// Validated query for one outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    city: String,
    pub unit: Unit,
    pub days: u8,
}

impl QueryParams {
    /// Trims `city` and rejects it when nothing is left.
    pub fn new(city: &str, unit: Unit, days: u8) -> Result<Self, WidgetError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WidgetError::Validation);
        }

        Ok(Self {
            city: city.to_string(),
            unit,
            days,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

impl TryFrom<&FormValues> for QueryParams {
    type Error = WidgetError;

    fn try_from(form: &FormValues) -> Result<Self, Self::Error> {
        QueryParams::new(&form.city, form.unit, form.days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub condition: String,
    pub humidity: f64,
    pub wind_kph: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub condition: String,
    pub min_temp: f64,
    pub max_temp: f64,
    #[serde(default)]
    pub chance_of_rain: f64,
}

/// Successful endpoint payload.
///
/// On the wire the conditions are nested:
/// `{"summary": "...", "weather_data": {"current": {...}, "forecast": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireResponse", into = "WireResponse")]
pub struct WeatherResponse {
    pub summary: String,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireWeatherData {
    current: CurrentConditions,
    forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireResponse {
    #[serde(default)]
    summary: String,
    weather_data: WireWeatherData,
}

impl From<WireResponse> for WeatherResponse {
    fn from(wire: WireResponse) -> Self {
        Self {
            summary: wire.summary,
            current: wire.weather_data.current,
            forecast: wire.weather_data.forecast,
        }
    }
}

impl From<WeatherResponse> for WireResponse {
    fn from(resp: WeatherResponse) -> Self {
        Self {
            summary: resp.summary,
            weather_data: WireWeatherData {
                current: resp.current,
                forecast: resp.forecast,
            },
        }
    }
}

/// Error body returned by the endpoint on a non-success status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

/// Text shown in the error block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub text: String,
}

impl ErrorMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
