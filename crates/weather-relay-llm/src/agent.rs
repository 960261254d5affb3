//! Tool-calling agent loop.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::provider::{ChatMessage, LlmProvider, ToolCall, ToolCompletionRequest};
use crate::tool::{Tool, ToolRegistry};

/// Default bound on model round trips per invocation
pub const DEFAULT_MAX_TURNS: usize = 8;

/// An LLM with instructions and tools.
///
/// Each [`invoke`](ToolAgent::invoke) starts a fresh transcript: system
/// instructions, then the query. The model is called repeatedly; every tool
/// call it makes is executed and its output appended, until it answers
/// without calling a tool.
pub struct ToolAgent {
    name: String,
    instructions: String,
    provider: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    max_turns: usize,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl ToolAgent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            provider,
            tools: ToolRegistry::new(),
            max_turns: DEFAULT_MAX_TURNS,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Sampling parameters sent with every completion
    pub fn with_sampling(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer `query`, calling tools as the model requests
    pub async fn invoke(&self, query: &str) -> Result<String, AgentError> {
        let mut messages = vec![
            ChatMessage::system(&self.instructions),
            ChatMessage::user(query),
        ];
        let tools = self.tools.tool_definitions();

        info!(agent = %self.name, model = %self.provider.model_name(), "Invoking agent");

        for turn in 1..=self.max_turns {
            let request = ToolCompletionRequest {
                messages: messages.clone(),
                tools: tools.clone(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                tool_choice: Some("auto".to_string()),
            };

            let response = self.provider.complete_with_tools(request).await?;
            debug!(
                agent = %self.name,
                turn,
                tool_calls = response.tool_calls.len(),
                finish_reason = ?response.finish_reason,
                "Model turn complete"
            );

            if response.tool_calls.is_empty() {
                return Ok(response.content.unwrap_or_default());
            }

            messages.push(ChatMessage::assistant_tool_calls(
                response.content,
                response.tool_calls.clone(),
            ));
            for call in &response.tool_calls {
                let output = self.run_tool(call).await;
                messages.push(ChatMessage::tool_result(&call.id, &call.name, output));
            }
        }

        warn!(agent = %self.name, max_turns = self.max_turns, "Turn limit reached");
        Err(AgentError::MaxTurnsExceeded {
            agent: self.name.clone(),
            max_turns: self.max_turns,
        })
    }

    /// Tool failures become result text so the model can react to them
    async fn run_tool(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.get(&call.name) else {
            warn!(agent = %self.name, tool = %call.name, "Model called unknown tool");
            return format!("Error: unknown tool '{}'", call.name);
        };

        debug!(agent = %self.name, tool = %call.name, arguments = %call.arguments, "Calling tool");
        match tool.execute(call.arguments.clone()).await {
            Ok(output) => output,
            Err(e) => {
                warn!(agent = %self.name, tool = %call.name, error = %e, "Tool failed");
                format!("Error: {}", e)
            }
        }
    }
}

impl std::fmt::Debug for ToolAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolAgent")
            .field("name", &self.name)
            .field("model", &self.provider.model_name())
            .field("tools", &self.tools)
            .field("max_turns", &self.max_turns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LlmError, ToolError};
    use crate::provider::{Role, ToolCompletionResponse};
    use crate::testing::ScriptedProvider;
    use async_trait::async_trait;
    use serde_json::json;

    struct ReverseTool;

    #[async_trait]
    impl Tool for ReverseTool {
        fn name(&self) -> &str {
            "reverse"
        }

        fn description(&self) -> &str {
            "Reverses text"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
            let text = crate::tool::required_str(self.name(), &arguments, "text")?;
            Ok(text.chars().rev().collect())
        }
    }

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: format!("call_{}", name),
            name: name.to_string(),
            arguments,
        }
    }

    fn agent(provider: Arc<ScriptedProvider>) -> ToolAgent {
        ToolAgent::new("Tester", "Be terse.", provider).with_tool(Arc::new(ReverseTool))
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let provider = Arc::new(ScriptedProvider::new(vec![ToolCompletionResponse::text(
            "hello",
        )]));
        let answer = agent(provider.clone()).invoke("hi").await.unwrap();

        assert_eq!(answer, "hello");
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(requests[0].messages[0].content.as_deref(), Some("Be terse."));
        assert_eq!(requests[0].tools[0].name, "reverse");
        assert_eq!(requests[0].tool_choice.as_deref(), Some("auto"));
    }

    #[tokio::test]
    async fn test_tool_result_is_fed_back() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_use(vec![call("reverse", json!({"text": "abc"}))]),
            ToolCompletionResponse::text("done"),
        ]));
        let answer = agent(provider.clone()).invoke("reverse abc").await.unwrap();
        assert_eq!(answer, "done");

        let second = &provider.requests()[1];
        let assistant = &second.messages[2];
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(assistant.tool_calls.len(), 1);

        let result = &second.messages[3];
        assert_eq!(result.role, Role::Tool);
        assert_eq!(result.tool_call_id.as_deref(), Some("call_reverse"));
        assert_eq!(result.content.as_deref(), Some("cba"));
    }

    #[tokio::test]
    async fn test_tool_errors_become_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ToolCompletionResponse::tool_use(vec![
                call("reverse", json!({})),
                call("teleport", json!({"to": "Mars"})),
            ]),
            ToolCompletionResponse::text("sorry"),
        ]));
        agent(provider.clone()).invoke("break things").await.unwrap();

        let second = &provider.requests()[1];
        let bad_args = second.messages[3].content.as_deref().unwrap();
        assert!(bad_args.starts_with("Error: invalid arguments for reverse"));
        assert_eq!(
            second.messages[4].content.as_deref(),
            Some("Error: unknown tool 'teleport'")
        );
    }

    #[tokio::test]
    async fn test_turn_limit() {
        let looping = (0..3)
            .map(|_| ToolCompletionResponse::tool_use(vec![call("reverse", json!({"text": "x"}))]))
            .collect();
        let provider = Arc::new(ScriptedProvider::new(looping));

        let err = agent(provider)
            .with_max_turns(2)
            .invoke("loop")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::MaxTurnsExceeded { max_turns: 2, .. }));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::failing(LlmError::RequestFailed {
            provider: "scripted".to_string(),
            reason: "quota exceeded".to_string(),
        }));

        let err = agent(provider).invoke("hi").await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_sampling_is_forwarded() {
        let provider = Arc::new(ScriptedProvider::new(vec![ToolCompletionResponse::text("ok")]));
        agent(provider.clone())
            .with_sampling(Some(1000), Some(0.7))
            .invoke("hi")
            .await
            .unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.max_tokens, Some(1000));
        assert_eq!(request.temperature, Some(0.7));
    }
}
