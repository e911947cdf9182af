use thiserror::Error;

use crate::model::ErrorMessage;

pub const VALIDATION_MESSAGE: &str = "Please enter a city name.";
pub const APPLICATION_FALLBACK_MESSAGE: &str = "An error occurred while fetching weather data.";
pub const TRANSPORT_MESSAGE: &str = "Not connected to the server.";

/// Failure kinds of a single submit. Each one ends the submit with a
/// rendered error block.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// City was empty after trimming. Raised before any I/O.
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    /// The endpoint answered with a non-success status.
    #[error("{}", application_text(.0))]
    Application(Option<String>),

    /// No usable response: connection, body read or JSON parse failure.
    /// The cause is kept for logs only.
    #[error("{}", TRANSPORT_MESSAGE)]
    Transport(String),
}

fn application_text(text: &Option<String>) -> &str {
    text.as_deref().filter(|s| !s.is_empty()).unwrap_or(APPLICATION_FALLBACK_MESSAGE)
}

impl WidgetError {
    pub fn message(&self) -> ErrorMessage {
        ErrorMessage::new(self.to_string())
    }
}
