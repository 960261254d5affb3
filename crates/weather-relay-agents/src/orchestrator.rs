//! The orchestrating consumer agent.

use std::sync::Arc;
use weather_relay_llm::{AgentError, LlmProvider, ToolAgent};

use crate::config::{ConsumerConfig, RemoteAgentSettings};
use crate::remote::{CallWeatherAgentTool, RemoteAgentProxy};

pub const ORCHESTRATOR_NAME: &str = "Orchestrator";

pub const ORCHESTRATOR_SYSTEM_PROMPT: &str = "You are a orchestrator agent and have access to a weather tool that you can call for realtime weather.";

/// LLM agent whose only tool calls the remote weather agent
#[derive(Debug)]
pub struct Orchestrator {
    agent: ToolAgent,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, remote: RemoteAgentSettings) -> Self {
        let tool = CallWeatherAgentTool::new(RemoteAgentProxy::new(remote));
        Self {
            agent: ToolAgent::new(ORCHESTRATOR_NAME, ORCHESTRATOR_SYSTEM_PROMPT, provider)
                .with_tool(Arc::new(tool)),
        }
    }

    /// Orchestrator with the remote target and sampling taken from `config`
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &ConsumerConfig) -> Self {
        Self::new(provider, config.remote.clone())
            .with_sampling(Some(config.llm.max_tokens), Some(config.llm.temperature))
    }

    pub fn with_sampling(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        self.agent = self.agent.with_sampling(max_tokens, temperature);
        self
    }

    pub async fn ask(&self, query: &str) -> Result<String, AgentError> {
        self.agent.invoke(query).await
    }
}
