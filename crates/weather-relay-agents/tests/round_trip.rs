//! End-to-end tests of the weather relay
//!
//! A real weather provider runs on a loopback port; the consumer side
//! discovers it, sends a message and aggregates the reply. Model calls are
//! served by deterministic providers or by a mocked OpenAI endpoint.

use async_trait::async_trait;
use serde_json::json;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use weather_relay_a2a::error::codes;
use weather_relay_a2a::server::{A2aServer, InMemoryTaskStore, TaskStore};
use weather_relay_a2a::{
    A2aClient, A2aError, CardResolver, ClientConfig, Message, Task, TaskState, aggregate_text,
};
use weather_relay_agents::{
    Orchestrator, RemoteAgentProxy, RemoteAgentSettings, RoundTripError, WeatherAgent,
    WeatherAgentExecutor, weather_agent_card,
};
use weather_relay_llm::testing::ScriptedProvider;
use weather_relay_llm::{
    LlmError, LlmProvider, OpenAiConfig, OpenAiProvider, Role, ToolCall, ToolCompletionRequest,
    ToolCompletionResponse,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Providers
// =============================================================================

/// Calls one tool with fixed arguments, then answers with the tool's output
struct RelayingProvider {
    tool: &'static str,
    arguments: serde_json::Value,
}

impl RelayingProvider {
    fn new(tool: &'static str, arguments: serde_json::Value) -> Arc<Self> {
        Arc::new(Self { tool, arguments })
    }
}

#[async_trait]
impl LlmProvider for RelayingProvider {
    fn model_name(&self) -> &str {
        "relaying"
    }

    async fn complete_with_tools(
        &self,
        request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse, LlmError> {
        match request.messages.last() {
            Some(last) if last.role == Role::Tool => Ok(ToolCompletionResponse::text(
                last.content.clone().unwrap_or_default(),
            )),
            _ => Ok(ToolCompletionResponse::tool_use(vec![ToolCall {
                id: "call_1".to_string(),
                name: self.tool.to_string(),
                arguments: self.arguments.clone(),
            }])),
        }
    }
}

/// Holds the first model call until released, then answers directly
struct GatedProvider {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl LlmProvider for GatedProvider {
    fn model_name(&self) -> &str {
        "gated"
    }

    async fn complete_with_tools(
        &self,
        _request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse, LlmError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(ToolCompletionResponse::text("Sunny in Seattle."))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// A loopback URL with nothing listening on it
fn unreachable_url() -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{}/", port)
}

/// Start a weather provider backed by `provider` and return its base URL
async fn start_weather_server(provider: Arc<dyn LlmProvider>) -> String {
    start_weather_server_with_store(provider, Arc::new(InMemoryTaskStore::new())).await
}

async fn start_weather_server_with_store(
    provider: Arc<dyn LlmProvider>,
    store: Arc<dyn TaskStore>,
) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());

    let executor = WeatherAgentExecutor::new(WeatherAgent::new(provider));
    let router =
        A2aServer::with_task_store(weather_agent_card(&base_url), executor, store).router();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    base_url
}

fn seattle_weather_provider() -> Arc<dyn LlmProvider> {
    RelayingProvider::new("get_weather", json!({"city": "Seattle"}))
}

fn proxy(base_url: &str) -> RemoteAgentProxy {
    RemoteAgentProxy::new(RemoteAgentSettings::default().with_base_url(base_url))
}

// =============================================================================
// Tests: Round Trip
// =============================================================================

#[tokio::test]
async fn test_round_trip_returns_agent_text() {
    let base_url = start_weather_server(seattle_weather_provider()).await;

    let reply = proxy(&base_url)
        .round_trip("What is the weather in Seattle?")
        .await
        .unwrap();

    assert_eq!(reply, "Current weather in Seattle is 80 Fahrenheit and sunny.");
}

#[tokio::test]
async fn test_provider_agent_failure_arrives_as_error_text() {
    let failing = Arc::new(ScriptedProvider::failing(LlmError::RequestFailed {
        provider: "openai".to_string(),
        reason: "Rate limit reached".to_string(),
    }));
    let base_url = start_weather_server(failing).await;

    let reply = proxy(&base_url).round_trip("weather?").await.unwrap();

    assert!(reply.starts_with("Error: "));
    assert!(reply.contains("Rate limit reached"));
}

#[tokio::test]
async fn test_unreachable_provider() {
    let proxy = proxy(&unreachable_url());

    let err = proxy.round_trip("weather?").await.unwrap_err();
    assert!(matches!(err, RoundTripError::Discovery(_)));

    let text = proxy.call("weather?").await;
    assert!(text.starts_with("Error contacting remote weather agent: "));
}

#[tokio::test]
async fn test_concurrent_round_trips() {
    let base_url = start_weather_server(seattle_weather_provider()).await;
    let proxy = proxy(&base_url);

    let calls = (0..8).map(|i| {
        let proxy = proxy.clone();
        async move { proxy.round_trip(&format!("request {}", i)).await }
    });

    for reply in futures::future::join_all(calls).await {
        assert_eq!(
            reply.unwrap(),
            "Current weather in Seattle is 80 Fahrenheit and sunny."
        );
    }
}

// =============================================================================
// Tests: Orchestrator
// =============================================================================

#[tokio::test]
async fn test_orchestrator_seattle_scenario() {
    let base_url = start_weather_server(seattle_weather_provider()).await;
    let orchestrator_llm = RelayingProvider::new(
        "call_weather_agent",
        json!({"message": "What is the weather in Seattle?"}),
    );

    let orchestrator = Orchestrator::new(
        orchestrator_llm,
        RemoteAgentSettings::default().with_base_url(&base_url),
    );
    let answer = orchestrator.ask("How is Seattle today?").await.unwrap();

    assert_eq!(answer, "Current weather in Seattle is 80 Fahrenheit and sunny.");
}

#[tokio::test]
async fn test_orchestrator_sees_unreachable_agent_as_tool_text() {
    let orchestrator_llm = RelayingProvider::new(
        "call_weather_agent",
        json!({"message": "What is the weather in Seattle?"}),
    );
    let orchestrator = Orchestrator::new(
        orchestrator_llm,
        RemoteAgentSettings::default().with_base_url(unreachable_url()),
    );

    let answer = orchestrator.ask("How is Seattle today?").await.unwrap();
    assert!(answer.starts_with("Error contacting remote weather agent: "));
}

// =============================================================================
// Tests: Provider Protocol Surface
// =============================================================================

#[tokio::test]
async fn test_served_card_matches_weather_card() {
    let base_url = start_weather_server(seattle_weather_provider()).await;

    let card = CardResolver::new(reqwest::Client::new(), &base_url)
        .get_agent_card()
        .await
        .unwrap();

    assert_eq!(card, weather_agent_card(&base_url));
}

#[tokio::test]
async fn test_cancel_in_flight_is_refused() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let provider = Arc::new(GatedProvider {
        started: Arc::clone(&started),
        release: Arc::clone(&release),
    });

    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    store.save(Task::new("weather-task", "weather-ctx")).await;
    let base_url = start_weather_server_with_store(provider, Arc::clone(&store)).await;

    let http = reqwest::Client::new();
    let card = CardResolver::new(http.clone(), &base_url)
        .get_agent_card()
        .await
        .unwrap();
    let client = Arc::new(A2aClient::from_card(card, ClientConfig::default(), http).unwrap());

    let sender = Arc::clone(&client);
    let send = tokio::spawn(async move {
        match sender
            .send_message(Message::user("weather in Seattle?").with_task_id("weather-task"))
            .await
        {
            Ok(events) => aggregate_text(events).await,
            Err(e) => Err(e),
        }
    });

    started.notified().await;
    let err = client.cancel_task("weather-task").await.unwrap_err();
    assert!(matches!(err, A2aError::Rpc { .. }));
    assert_eq!(err.rpc_code(), codes::UNSUPPORTED_OPERATION);

    release.notify_one();
    assert_eq!(send.await.unwrap().unwrap(), "Sunny in Seattle.");

    let task = client.get_task("weather-task").await.unwrap();
    assert_eq!(task.state(), TaskState::Completed);
}

// =============================================================================
// Tests: OpenAI Wire Format
// =============================================================================

#[tokio::test]
async fn test_weather_agent_against_mock_openai() {
    let server = MockServer::start().await;

    // Second turn: the tool result is in the transcript
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"role\":\"tool\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Seattle: 80F and sunny."},
                "finish_reason": "stop"
            }]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    // First turn: the model asks for the tool
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"city\":\"Seattle\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(
        OpenAiConfig::new("sk-test", "gpt-4o").with_base_url(server.uri()),
    );
    let agent = WeatherAgent::new(Arc::new(provider));

    let answer = agent.invoke("What's the weather in Seattle?").await.unwrap();
    assert_eq!(answer, "Seattle: 80F and sunny.");

    let requests = server.received_requests().await.unwrap();
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["messages"][3]["role"], "tool");
    assert_eq!(second["messages"][3]["tool_call_id"], "call_abc");
    assert_eq!(
        second["messages"][3]["content"],
        "Current weather in Seattle is 80 Fahrenheit and sunny."
    );
}
