//! Subcommand implementations.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use weather_relay_a2a::server::A2aServer;
use weather_relay_a2a::{A2aError, CardResolver};
use weather_relay_agents::config::env_with_overrides;
use weather_relay_agents::{
    ConfigError, ConsumerConfig, LlmSettings, Orchestrator, ProviderConfig, RemoteAgentSettings,
    WeatherAgent, WeatherAgentExecutor, get_weather, weather_agent_card,
};
use weather_relay_llm::{AgentError, LlmProvider, OpenAiProvider};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    A2a(#[from] A2aError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

fn openai(settings: &LlmSettings) -> Arc<dyn LlmProvider> {
    Arc::new(OpenAiProvider::new(settings.openai_config()))
}

/// Serve the weather agent until Ctrl+C
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    public_url: Option<String>,
) -> Result<(), CliError> {
    let overrides = [
        ("WEATHER_AGENT_HOST", host),
        ("WEATHER_AGENT_PORT", port.map(|p| p.to_string())),
        ("WEATHER_AGENT_PUBLIC_URL", public_url),
    ];
    let config = ProviderConfig::from_lookup(env_with_overrides(flags(overrides)))?;

    let executor = WeatherAgentExecutor::new(WeatherAgent::new(openai(&config.llm)));
    let server = A2aServer::new(weather_agent_card(config.public_url()), executor);

    info!(
        model = %config.llm.model,
        public_url = %config.public_url(),
        "Starting weather agent"
    );
    server
        .serve_with_shutdown(&config.bind_addr(), shutdown_signal())
        .await?;
    Ok(())
}

/// Ask the orchestrator one question and print its answer
pub async fn run_ask(question: &str, agent_url: Option<String>) -> Result<(), CliError> {
    let overrides = [("WEATHER_AGENT_URL", agent_url)];
    let config = ConsumerConfig::from_lookup(env_with_overrides(flags(overrides)))?;

    let orchestrator = Orchestrator::from_config(openai(&config.llm), &config);
    info!(agent_url = %config.remote.base_url, "Asking orchestrator");

    let answer = orchestrator.ask(question).await?;
    println!("{}", answer);
    Ok(())
}

/// Print the remote agent's card as JSON
pub async fn run_card(agent_url: Option<String>) -> Result<(), CliError> {
    let overrides = [("WEATHER_AGENT_URL", agent_url)];
    let settings = RemoteAgentSettings::from_lookup(env_with_overrides(flags(overrides)))?;

    let http = reqwest::Client::builder()
        .timeout(settings.timeout())
        .build()?;
    let card = CardResolver::new(http, &settings.base_url)
        .get_agent_card()
        .await?;

    println!("{}", serde_json::to_string_pretty(&card)?);
    Ok(())
}

/// Run the weather agent locally and print its answer
pub async fn run_invoke(query: &str) -> Result<(), CliError> {
    let settings = LlmSettings::from_env()?;
    let agent = WeatherAgent::new(openai(&settings));

    let answer = agent.invoke(query).await?;
    println!("{}", answer);
    Ok(())
}

pub fn run_weather(city: &str) {
    println!("{}", get_weather(city));
}

/// Flags that were given on the command line
fn flags<const N: usize>(
    values: [(&'static str, Option<String>); N],
) -> Vec<(&'static str, String)> {
    values
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_keep_only_given_values() {
        let overrides = flags([
            ("WEATHER_AGENT_HOST", None),
            ("WEATHER_AGENT_PORT", Some("8080".to_string())),
        ]);
        assert_eq!(overrides, vec![("WEATHER_AGENT_PORT", "8080".to_string())]);
    }

    #[test]
    fn test_port_flag_wins_over_environment() {
        let env = |key: &str| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "WEATHER_AGENT_PORT" => Some("not-a-port".to_string()),
            _ => None,
        };

        assert!(ProviderConfig::from_lookup(env).is_err());

        let overrides = flags([("WEATHER_AGENT_PORT", Some(8080.to_string()))]);
        let config = ProviderConfig::from_lookup(weather_relay_agents::config::with_overrides(
            overrides, env,
        ))
        .unwrap();
        assert_eq!(config.port, 8080);
    }
}
