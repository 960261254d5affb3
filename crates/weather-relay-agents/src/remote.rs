//! Consumer side of the relay: one remote call per tool invocation.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};
use weather_relay_a2a::{A2aClient, CardResolver, ClientConfig, Message, aggregate_text};
use weather_relay_llm::{Tool, ToolError, required_str};

use crate::config::RemoteAgentSettings;
use crate::error::RoundTripError;

/// Prefix of the text returned when a round trip fails
pub const REMOTE_ERROR_PREFIX: &str = "Error contacting remote weather agent: ";

/// Sends one message to the remote weather agent and collects its reply.
///
/// Every round trip builds its own HTTP client, so nothing is shared
/// between calls and the client is released whichever way the call ends.
#[derive(Debug, Clone)]
pub struct RemoteAgentProxy {
    settings: RemoteAgentSettings,
}

impl RemoteAgentProxy {
    pub fn new(settings: RemoteAgentSettings) -> Self {
        Self { settings }
    }

    /// Discover the agent, send `message`, and concatenate the reply text
    pub async fn round_trip(&self, message: &str) -> Result<String, RoundTripError> {
        let http = reqwest::Client::builder()
            .timeout(self.settings.timeout())
            .build()
            .map_err(|e| RoundTripError::Client(e.into()))?;

        let card = CardResolver::new(http.clone(), &self.settings.base_url)
            .get_agent_card()
            .await
            .map_err(RoundTripError::Discovery)?;

        let client = A2aClient::from_card(card, ClientConfig::default(), http)
            .map_err(RoundTripError::Client)?;

        let request = Message::user(message);
        debug!(
            message_id = %request.message_id,
            endpoint = %client.endpoint(),
            "Sending message to remote agent"
        );

        let events = client
            .send_message(request)
            .await
            .map_err(RoundTripError::Send)?;

        aggregate_text(events)
            .await
            .map_err(RoundTripError::Aggregate)
    }

    /// Round trip that never fails: errors are returned as text
    pub async fn call(&self, message: &str) -> String {
        match self.round_trip(message).await {
            Ok(reply) => {
                info!(reply_len = reply.len(), "Remote agent replied");
                reply
            }
            Err(e) => {
                warn!(url = %self.settings.base_url, error = %e, "Remote agent call failed");
                format!("{}{}", REMOTE_ERROR_PREFIX, e)
            }
        }
    }
}

/// `call_weather_agent(message)` exposed to the orchestrator model
#[derive(Debug, Clone)]
pub struct CallWeatherAgentTool {
    proxy: RemoteAgentProxy,
}

impl CallWeatherAgentTool {
    pub fn new(proxy: RemoteAgentProxy) -> Self {
        Self { proxy }
    }
}

#[async_trait]
impl Tool for CallWeatherAgentTool {
    fn name(&self) -> &str {
        "call_weather_agent"
    }

    fn description(&self) -> &str {
        "Send a message to the remote weather agent and return its reply."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Question for the weather agent"
                }
            },
            "required": ["message"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let message = required_str(self.name(), &arguments, "message")?;
        Ok(self.proxy.call(message).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    /// A loopback URL with nothing listening on it
    fn dead_url() -> String {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        format!("http://127.0.0.1:{}/", port)
    }

    #[tokio::test]
    async fn test_unreachable_agent_is_discovery_error() {
        let proxy = RemoteAgentProxy::new(RemoteAgentSettings::default().with_base_url(dead_url()));

        let err = proxy.round_trip("weather?").await.unwrap_err();
        assert!(matches!(err, RoundTripError::Discovery(_)));
    }

    #[tokio::test]
    async fn test_call_formats_failure_once() {
        let proxy = RemoteAgentProxy::new(RemoteAgentSettings::default().with_base_url(dead_url()));

        let text = proxy.call("weather?").await;
        assert!(text.starts_with(REMOTE_ERROR_PREFIX));
        assert_eq!(text.matches("Error contacting").count(), 1);
    }

    #[tokio::test]
    async fn test_tool_requires_message() {
        let tool = CallWeatherAgentTool::new(RemoteAgentProxy::new(RemoteAgentSettings::default()));

        let err = tool.execute(json!({"city": "Paris"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert_eq!(tool.parameters_schema()["required"], json!(["message"]));
    }
}
