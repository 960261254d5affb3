//! Error types for configuration and remote agent round trips.

use thiserror::Error;
use weather_relay_a2a::A2aError;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Missing required environment variable '{0}'")]
    MissingEnvVar(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Failure of one remote agent round trip, tagged with the step that failed
#[derive(Debug, Error)]
pub enum RoundTripError {
    /// Agent card could not be fetched or was invalid
    #[error("agent card discovery failed: {0}")]
    Discovery(#[source] A2aError),

    /// HTTP client or A2A client could not be built
    #[error("client setup failed: {0}")]
    Client(#[source] A2aError),

    /// `message/send` failed
    #[error("send failed: {0}")]
    Send(#[source] A2aError),

    /// The returned event stream failed while being read
    #[error("reading the response failed: {0}")]
    Aggregate(#[source] A2aError),
}

impl RoundTripError {
    /// The underlying protocol error
    pub fn a2a_error(&self) -> &A2aError {
        match self {
            Self::Discovery(e) | Self::Client(e) | Self::Send(e) | Self::Aggregate(e) => e,
        }
    }
}
