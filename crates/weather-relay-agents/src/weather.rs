//! The weather capability provider: tool, agent, executor and card.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};
use weather_relay_a2a::server::{AgentExecutor, EventQueue, RequestContext};
use weather_relay_a2a::{A2aError, A2aResult, AgentCard, AgentSkill, Message};
use weather_relay_llm::{AgentError, LlmProvider, Tool, ToolAgent, ToolError, required_str};

pub const WEATHER_AGENT_NAME: &str = "WeatherAgent";

pub const WEATHER_AGENT_INSTRUCTIONS: &str =
    "You are a helpful assistant that returns weather information using the available tool.";

/// Canned forecast for `city`
pub fn get_weather(city: &str) -> String {
    format!("Current weather in {} is 80 Fahrenheit and sunny.", city)
}

/// `get_weather(city)` exposed to the model
#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "Name of the city"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let city = required_str(self.name(), &arguments, "city")?;
        debug!(city = %city, "Looking up weather");
        Ok(get_weather(city))
    }
}

/// LLM agent that answers weather questions with [`WeatherTool`]
#[derive(Debug)]
pub struct WeatherAgent {
    agent: ToolAgent,
}

impl WeatherAgent {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            agent: ToolAgent::new(WEATHER_AGENT_NAME, WEATHER_AGENT_INSTRUCTIONS, provider)
                .with_tool(Arc::new(WeatherTool)),
        }
    }

    pub async fn invoke(&self, query: &str) -> Result<String, AgentError> {
        self.agent.invoke(query).await
    }
}

/// Serves [`WeatherAgent`] over A2A.
///
/// Each message produces exactly one agent message. Agent failures are
/// reported in that message as `"Error: ..."` text rather than as a
/// protocol error.
#[derive(Debug)]
pub struct WeatherAgentExecutor {
    agent: WeatherAgent,
}

impl WeatherAgentExecutor {
    pub fn new(agent: WeatherAgent) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl AgentExecutor for WeatherAgentExecutor {
    async fn execute(&self, context: RequestContext, queue: &EventQueue) -> A2aResult<()> {
        let query = context.user_input();
        info!(task_id = %context.task_id, "Weather request received");

        let text = match self.agent.invoke(&query).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(task_id = %context.task_id, error = %e, "Weather agent failed");
                format!("Error: {}", e)
            }
        };

        queue.enqueue(
            Message::agent(text)
                .with_task_id(context.task_id)
                .with_context_id(context.context_id),
        )
    }

    async fn cancel(&self, context: RequestContext, _queue: &EventQueue) -> A2aResult<()> {
        debug!(task_id = %context.task_id, "Refusing cancel");
        Err(A2aError::unsupported("cancel not implemented"))
    }
}

/// Agent card advertised by the weather provider
pub fn weather_agent_card(public_url: impl Into<String>) -> AgentCard {
    let skill = AgentSkill::new("Weather Agent", "Returns the weather in a given city")
        .with_description("Provides weather information.")
        .with_tag("weather")
        .with_example("what is the weather in San Francisco?");

    AgentCard::new("Weather Agent", public_url)
        .with_description("Just a weather agent")
        .with_version("1.0.0")
        .with_modes(&["text"], &["text"])
        .with_streaming(false)
        .with_authenticated_extended_card()
        .with_skill(skill)
}
