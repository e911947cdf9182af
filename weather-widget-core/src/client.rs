use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, instrument, warn};

use crate::{
    config::EndpointConfig,
    error::WidgetError,
    model::{ErrorPayload, QueryParams, WeatherResponse},
};

/// One outbound call to the weather/summary endpoint.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, params: &QueryParams) -> Result<WeatherResponse, WidgetError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    endpoint: EndpointConfig,
    http: Client,
}

impl HttpWeatherClient {
    pub fn new(endpoint: EndpointConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = endpoint.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Only the city is percent-encoded; unit and days go through as-is.
    pub fn request_url(&self, params: &QueryParams) -> String {
        format!(
            "{}?city={}&unit={}&days={}",
            self.endpoint.url,
            urlencoding::encode(params.city()),
            params.unit,
            params.days,
        )
    }
}

#[async_trait]
impl WeatherClient for HttpWeatherClient {
    #[instrument(skip(self), fields(city = params.city()))]
    async fn fetch(&self, params: &QueryParams) -> Result<WeatherResponse, WidgetError> {
        let url = self.request_url(params);
        debug!(%url, "Sending weather request");

        let res = self.http.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Weather endpoint unreachable");
            WidgetError::Transport(e.to_string())
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            warn!(error = %e, %status, "Failed to read weather response body");
            WidgetError::Transport(e.to_string())
        })?;

        // The body must be JSON on both branches; anything else counts as
        // "no usable response".
        let json: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                %status,
                body = %truncate_body(&body),
                "Weather response is not JSON"
            );
            WidgetError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            if json.is_null() {
                warn!(%status, "Weather error response has a null body");
                return Err(WidgetError::Transport(format!("{status} with null body")));
            }

            let payload: ErrorPayload = serde_json::from_value(json).unwrap_or_default();
            debug!(%status, error = ?payload.error, "Weather endpoint reported an error");
            return Err(WidgetError::Application(payload.error.filter(|e| !e.is_empty())));
        }

        serde_json::from_value(json).map_err(|e| {
            warn!(error = %e, "Weather response has unexpected shape");
            WidgetError::Transport(e.to_string())
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;

    fn client(url: &str) -> HttpWeatherClient {
        HttpWeatherClient::new(EndpointConfig::with_url(url)).expect("client should build")
    }

    #[test]
    fn request_url_encodes_city_only() {
        let client = client("http://127.0.0.1:5000/weather");
        let params = QueryParams::new(" São Paulo & Co ", Unit::Celsius, 5).unwrap();

        assert_eq!(
            client.request_url(&params),
            "http://127.0.0.1:5000/weather?city=S%C3%A3o%20Paulo%20%26%20Co&unit=°C&days=5"
        );
    }

    #[test]
    fn request_url_passes_unit_and_days_verbatim() {
        let client = client("http://weather.local/weather");
        let params = QueryParams::new("Oslo", Unit::Fahrenheit, 10).unwrap();

        let url = client.request_url(&params);
        assert!(url.ends_with("&unit=°F&days=10"), "{url}");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn timeout_is_optional() {
        let mut endpoint = EndpointConfig::default();
        assert!(HttpWeatherClient::new(endpoint.clone()).is_ok());

        endpoint.timeout_secs = Some(5);
        let client = HttpWeatherClient::new(endpoint).unwrap();
        assert_eq!(client.endpoint().timeout_secs, Some(5));
    }
}
