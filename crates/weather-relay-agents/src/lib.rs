//! # weather-relay-agents
//!
//! The two programs of the weather relay, as libraries:
//!
//! - **Provider** ([`weather`]): a [`WeatherAgent`] with one tool,
//!   `get_weather`, served over A2A by [`WeatherAgentExecutor`] under the
//!   card from [`weather_agent_card`].
//! - **Consumer** ([`remote`], [`orchestrator`]): an [`Orchestrator`] whose
//!   only tool, `call_weather_agent`, discovers the provider, sends one
//!   message and returns the concatenated reply text.
//!
//! Both read their settings from the environment through [`config`].

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod remote;
pub mod weather;

pub use config::{ConsumerConfig, LlmSettings, ProviderConfig, RemoteAgentSettings};
pub use error::{ConfigError, RoundTripError};
pub use orchestrator::Orchestrator;
pub use remote::{CallWeatherAgentTool, RemoteAgentProxy};
pub use weather::{WeatherAgent, WeatherAgentExecutor, WeatherTool, get_weather, weather_agent_card};
