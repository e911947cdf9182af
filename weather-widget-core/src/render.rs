//! HTML views written into the output region.
//!
//! Every interpolated value is escaped; nothing from the form or the endpoint
//! reaches the markup raw.

use chrono::NaiveDate;
use std::fmt::{self, Write};
use tracing::warn;

use crate::model::{ErrorMessage, ForecastDay, Unit, WeatherResponse};

pub const INVALID_DATE: &str = "Invalid Date";

/// Rendered markup for the output region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html(String);

impl Html {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escaped text, usable directly in `format!`.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                _ => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// Prints a number the way it appears in JSON: `20`, `20.5`, `-3`.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// `"2024-03-05"` -> `"Mar 5"`.
pub fn format_date(date_str: &str) -> String {
    match NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d").to_string(),
        Err(e) => {
            warn!(date = date_str, error = %e, "Unparseable forecast date");
            INVALID_DATE.to_string()
        }
    }
}

pub fn render_loading() -> Html {
    Html(r#"<div class="loading">Loading weather data...</div>"#.to_string())
}

pub fn render_error(message: &ErrorMessage) -> Html {
    Html(format!(
        "<div class=\"error\">\n    <strong>Error:</strong> {}\n</div>\n",
        Escaped(&message.text)
    ))
}

/// Full result view. `city` and `unit` are the caller's, not echoed from the
/// response.
pub fn render_weather(data: &WeatherResponse, city: &str, unit: Unit) -> Html {
    let unit = Escaped(unit.as_str());
    let current = &data.current;
    let days: String = data.forecast.iter().map(|day| forecast_day(day, &unit)).collect();

    Html(format!(
        r#"<div class="weather-result">
    <h2>Weather for {city}</h2>

    <div class="current-weather">
        <h3>Current Conditions</h3>
        <p><strong>Temperature:</strong> {temp}{unit}</p>
        <p><strong>Condition:</strong> {condition}</p>
        <p><strong>Humidity:</strong> {humidity}%</p>
        <p><strong>Wind Speed:</strong> {wind} km/h</p>
    </div>

    <div class="forecast">
        <h3>{count}-Day Forecast</h3>
        <div class="forecast-grid">
{days}        </div>
    </div>

    <div class="ai-summary">
        <h3>AI Summary</h3>
        <p>{summary}</p>
    </div>
</div>
"#,
        city = Escaped(city),
        temp = Num(current.temperature),
        condition = Escaped(&current.condition),
        humidity = Num(current.humidity),
        wind = Num(current.wind_kph),
        count = data.forecast.len(),
        summary = Escaped(&data.summary),
    ))
}

fn forecast_day(day: &ForecastDay, unit: &Escaped<'_>) -> String {
    format!(
        r#"            <div class="forecast-day">
                <p class="date">{date}</p>
                <p class="condition">{condition}</p>
                <p class="temps">{min} - {max}{unit}</p>
                <p class="rain">{rain}%</p>
            </div>
"#,
        date = Escaped(&format_date(&day.date)),
        condition = Escaped(&day.condition),
        min = Num(day.min_temp),
        max = Num(day.max_temp),
        rain = Num(day.chance_of_rain),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurrentConditions;

    fn sample() -> WeatherResponse {
        WeatherResponse {
            summary: "Mild with showers later in the week.".into(),
            current: CurrentConditions {
                temperature: 14.0,
                condition: "Partly cloudy".into(),
                humidity: 62.0,
                wind_kph: 11.2,
            },
            forecast: vec![
                ForecastDay {
                    date: "2024-03-05".into(),
                    condition: "Sunny".into(),
                    min_temp: 6.0,
                    max_temp: 15.5,
                    chance_of_rain: 0.0,
                },
                ForecastDay {
                    date: "2024-03-06".into(),
                    condition: "Patchy rain".into(),
                    min_temp: 7.0,
                    max_temp: 12.0,
                    chance_of_rain: 85.0,
                },
                ForecastDay {
                    date: "2024-02-29".into(),
                    condition: "Overcast".into(),
                    min_temp: -1.0,
                    max_temp: 4.0,
                    chance_of_rain: 20.0,
                },
            ],
        }
    }

    #[test]
    fn format_date_short_month_and_day() {
        assert_eq!(format_date("2024-03-05"), "Mar 5");
        assert_eq!(format_date("2024-12-31"), "Dec 31");
        assert_eq!(format_date("2023-01-01"), "Jan 1");
    }

    #[test]
    fn format_date_invalid_input() {
        assert_eq!(format_date("not a date"), INVALID_DATE);
        assert_eq!(format_date("2024-02-30"), INVALID_DATE);
        assert_eq!(format_date(""), INVALID_DATE);
    }

    #[test]
    fn numbers_print_like_json() {
        assert_eq!(Num(20.0).to_string(), "20");
        assert_eq!(Num(20.5).to_string(), "20.5");
        assert_eq!(Num(-3.0).to_string(), "-3");
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            Escaped(r#"<script>alert("x" & 'y')</script>"#).to_string(),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn weather_view_has_one_block_per_day_in_order() {
        let html = render_weather(&sample(), "Lisbon", Unit::Celsius).into_string();

        assert_eq!(html.matches(r#"<div class="forecast-day">"#).count(), 3);
        assert!(html.contains("<h3>3-Day Forecast</h3>"));

        let mar5 = html.find("Mar 5").unwrap();
        let mar6 = html.find("Mar 6").unwrap();
        let feb29 = html.find("Feb 29").unwrap();
        assert!(mar5 < mar6 && mar6 < feb29);

        assert!(html.contains(r#"<p class="temps">6 - 15.5°C</p>"#));
        assert!(html.contains(r#"<p class="rain">85%</p>"#));
        assert!(html.contains(r#"<p class="condition">Patchy rain</p>"#));
    }

    #[test]
    fn weather_view_current_and_summary() {
        let html = render_weather(&sample(), "Lisbon", Unit::Fahrenheit).into_string();

        assert!(html.contains("<h2>Weather for Lisbon</h2>"));
        assert!(html.contains("<strong>Temperature:</strong> 14°F"));
        assert!(html.contains("<strong>Humidity:</strong> 62%"));
        assert!(html.contains("<strong>Wind Speed:</strong> 11.2 km/h"));
        assert!(html.contains("<p>Mild with showers later in the week.</p>"));
    }

    #[test]
    fn weather_view_with_empty_forecast() {
        let mut data = sample();
        data.forecast.clear();

        let html = render_weather(&data, "Lisbon", Unit::Celsius).into_string();
        assert!(html.contains("<h3>0-Day Forecast</h3>"));
        assert!(!html.contains("forecast-day"));
    }

    #[test]
    fn weather_view_escapes_untrusted_text() {
        let mut data = sample();
        data.summary = "<img src=x onerror=alert(1)>".into();
        data.forecast[0].condition = "<b>Sunny</b>".into();

        let html = render_weather(&data, "<Lisbon>", Unit::Celsius).into_string();
        assert!(!html.contains("<img"));
        assert!(!html.contains("<b>Sunny"));
        assert!(html.contains("Weather for &lt;Lisbon&gt;"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn error_view_escapes_message() {
        let html = render_error(&ErrorMessage::new("City <x> not found")).into_string();
        assert!(html.contains(r#"<div class="error">"#));
        assert!(html.contains("<strong>Error:</strong> City &lt;x&gt; not found"));
    }

    #[test]
    fn loading_view() {
        assert_eq!(
            render_loading().as_str(),
            r#"<div class="loading">Loading weather data...</div>"#
        );
    }
}
