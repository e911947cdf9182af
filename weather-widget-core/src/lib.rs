//! Core library for the weather widget.
//!
//! This crate defines:
//! - Form values, query parameters and endpoint payload models
//! - The HTTP client for the weather/summary endpoint
//! - HTML rendering of results and errors
//! - The `WeatherWidget` controller wiring them to a host page
//! - Configuration handling
//!
//! It is used by `weather-widget-cli`, but any host that implements [`Page`]
//! can drive it.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod widget;

pub use client::{HttpWeatherClient, WeatherClient};
pub use config::{Config, Defaults, EndpointConfig};
pub use error::WidgetError;
pub use model::{
    CurrentConditions, ErrorMessage, ErrorPayload, ForecastDay, FormValues, QueryParams, Unit,
    WeatherResponse,
};
pub use render::{Html, format_date};
pub use widget::{Page, WeatherWidget};
