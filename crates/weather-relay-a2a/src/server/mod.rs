//! A2A Protocol Server
//!
//! This module exposes an [`AgentExecutor`] over HTTP: the agent card is
//! served at the well-known discovery paths and every protocol method is a
//! JSON-RPC 2.0 call posted to `/`.
//!
//! # Example
//!
//! ```rust,ignore
//! use weather_relay_a2a::server::{A2aServer, AgentExecutor, EventQueue, RequestContext};
//! use weather_relay_a2a::{A2aError, A2aResult, AgentCard, Message};
//!
//! struct EchoAgent;
//!
//! #[async_trait::async_trait]
//! impl AgentExecutor for EchoAgent {
//!     async fn execute(&self, context: RequestContext, queue: &EventQueue) -> A2aResult<()> {
//!         queue.enqueue(Message::agent(context.user_input()))
//!     }
//!
//!     async fn cancel(&self, _context: RequestContext, _queue: &EventQueue) -> A2aResult<()> {
//!         Err(A2aError::unsupported("cancel not implemented"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let card = AgentCard::new("Echo", "http://localhost:9999/");
//!     A2aServer::new(card, EchoAgent).serve("0.0.0.0:9999").await.unwrap();
//! }
//! ```

mod executor;
mod handler;
mod store;

pub use executor::{AgentExecutor, EventQueue, EventReceiver, RequestContext};
pub use handler::DefaultRequestHandler;
pub use store::{InMemoryTaskStore, TaskStore};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::{A2aError, A2aResult, ErrorResponse, codes};
use crate::types::{
    AGENT_CARD_PATH, AgentCard, JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse,
    LEGACY_AGENT_CARD_PATH, RequestId, methods,
};

/// Shared application state
struct AppState<E: AgentExecutor> {
    card: Arc<AgentCard>,
    handler: DefaultRequestHandler<E>,
}

impl<E: AgentExecutor> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            card: Arc::clone(&self.card),
            handler: self.handler.clone(),
        }
    }
}

/// A2A Protocol Server
///
/// Serves one agent card and routes JSON-RPC calls to a
/// [`DefaultRequestHandler`] wrapping the executor.
pub struct A2aServer<E: AgentExecutor> {
    card: Arc<AgentCard>,
    handler: DefaultRequestHandler<E>,
}

impl<E: AgentExecutor> A2aServer<E> {
    /// Create a server backed by an in-memory task store
    pub fn new(card: AgentCard, executor: E) -> Self {
        Self::with_task_store(card, executor, Arc::new(InMemoryTaskStore::new()))
    }

    /// Create a server backed by the given task store
    pub fn with_task_store(card: AgentCard, executor: E, store: Arc<dyn TaskStore>) -> Self {
        Self {
            card: Arc::new(card),
            handler: DefaultRequestHandler::new(executor, store),
        }
    }

    /// The advertised agent card
    pub fn agent_card(&self) -> &AgentCard {
        &self.card
    }

    /// Build the Axum router for this server
    pub fn router(&self) -> Router {
        let state = AppState {
            card: Arc::clone(&self.card),
            handler: self.handler.clone(),
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route(AGENT_CARD_PATH, get(get_agent_card::<E>))
            .route(LEGACY_AGENT_CARD_PATH, get(get_agent_card::<E>))
            .route("/", post(handle_jsonrpc::<E>))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Serve until the process is stopped
    pub async fn serve(self, addr: &str) -> A2aResult<()> {
        self.serve_with_shutdown(addr, std::future::pending()).await
    }

    /// Serve until `signal` resolves
    pub async fn serve_with_shutdown<F>(self, addr: &str, signal: F) -> A2aResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| A2aError::internal_error(format!("Failed to bind to {}: {}", addr, e)))?;

        info!(
            name = %self.card.name,
            url = %self.card.url,
            address = %addr,
            "A2A server starting"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| A2aError::internal_error(format!("Server error: {}", e)))?;

        info!("A2A server stopped");
        Ok(())
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /.well-known/agent-card.json - Agent card discovery
async fn get_agent_card<E: AgentExecutor>(State(state): State<AppState<E>>) -> Json<AgentCard> {
    debug!(name = %state.card.name, "Serving agent card");
    Json(state.card.as_ref().clone())
}

/// POST / - JSON-RPC entry point.
///
/// Protocol failures are reported in the JSON-RPC error object with HTTP 200.
async fn handle_jsonrpc<E: AgentExecutor>(
    State(state): State<AppState<E>>,
    body: Bytes,
) -> Json<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Unparseable JSON-RPC request");
            let error = if e.is_syntax() || e.is_eof() {
                ErrorResponse::new(codes::PARSE_ERROR, format!("Parse error: {}", e))
            } else {
                ErrorResponse::new(codes::INVALID_REQUEST, format!("Invalid request: {}", e))
            };
            return Json(JsonRpcResponse::failure(RequestId::Null, error));
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return Json(JsonRpcResponse::failure(
            request.id,
            ErrorResponse::new(
                codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version '{}'", request.jsonrpc),
            ),
        ));
    }

    let id = request.id.clone();
    debug!(method = %request.method, "Dispatching JSON-RPC call");

    match dispatch(&state.handler, request).await {
        Ok(result) => Json(JsonRpcResponse::success(id, result)),
        Err(e) => {
            debug!(error = %e, code = e.rpc_code(), "JSON-RPC call failed");
            Json(JsonRpcResponse::failure(id, e.into()))
        }
    }
}

async fn dispatch<E: AgentExecutor>(
    handler: &DefaultRequestHandler<E>,
    request: JsonRpcRequest,
) -> A2aResult<serde_json::Value> {
    match request.method.as_str() {
        methods::MESSAGE_SEND => {
            let event = handler.on_message_send(parse_params(request.params)?).await?;
            Ok(serde_json::to_value(event)?)
        }
        methods::TASKS_GET => {
            let task = handler.on_get_task(parse_params(request.params)?).await?;
            Ok(serde_json::to_value(task)?)
        }
        methods::TASKS_CANCEL => {
            let task = handler.on_cancel_task(parse_params(request.params)?).await?;
            Ok(serde_json::to_value(task)?)
        }
        methods::MESSAGE_STREAM => Err(A2aError::unsupported(
            "message/stream: streaming is not enabled on this agent",
        )),
        other => Err(A2aError::MethodNotFound {
            method: other.to_string(),
        }),
    }
}

fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> A2aResult<T> {
    serde_json::from_value(params).map_err(|e| A2aError::invalid_params(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentSkill, Message, MessageSendParams};
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoExecutor;

    #[async_trait]
    impl AgentExecutor for EchoExecutor {
        async fn execute(&self, context: RequestContext, queue: &EventQueue) -> A2aResult<()> {
            queue.enqueue(Message::agent(format!("Echo: {}", context.user_input())))
        }

        async fn cancel(&self, _context: RequestContext, _queue: &EventQueue) -> A2aResult<()> {
            Err(A2aError::unsupported("cancel not implemented"))
        }
    }

    fn test_server() -> A2aServer<EchoExecutor> {
        let card = AgentCard::new("Test Agent", "http://localhost:3000/")
            .with_skill(AgentSkill::new("echo", "Echo"));
        A2aServer::new(card, EchoExecutor)
    }

    async fn call(server: &A2aServer<EchoExecutor>, body: &str) -> JsonRpcResponse {
        let state = AppState {
            card: Arc::clone(&server.card),
            handler: server.handler.clone(),
        };
        let Json(response) = handle_jsonrpc(State(state), Bytes::from(body.to_string())).await;
        response
    }

    #[test]
    fn test_server_creation() {
        let server = test_server();
        assert_eq!(server.agent_card().name, "Test Agent");
        let _router = server.router();
    }

    #[tokio::test]
    async fn test_router_serves_card_on_both_paths() {
        use axum::body::{Body, to_bytes};
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        for path in [AGENT_CARD_PATH, LEGACY_AGENT_CARD_PATH] {
            let response = test_server()
                .router()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let card: AgentCard = serde_json::from_slice(&body).unwrap();
            assert_eq!(card.name, "Test Agent");
        }
    }

    #[tokio::test]
    async fn test_router_answers_rpc_errors_with_ok_status() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode, header};
        use tower::ServiceExt;

        let request = Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{broken"))
            .unwrap();
        let response = test_server().router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_message_send_dispatch() {
        let server = test_server();
        let params = serde_json::to_value(MessageSendParams::new(Message::user("hi"))).unwrap();
        let body = json!({"jsonrpc": "2.0", "id": 7, "method": "message/send", "params": params});

        let response = call(&server, &body.to_string()).await;
        assert_eq!(response.id, RequestId::Number(7));
        assert!(response.error.is_none());

        let result = response.result.unwrap();
        assert_eq!(result["kind"], "message");
        assert_eq!(result["parts"][0]["text"], "Echo: hi");
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = call(&test_server(), "{not json").await;
        assert_eq!(response.id, RequestId::Null);
        assert_eq!(response.error.unwrap().code, codes::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let body = json!({"jsonrpc": "2.0", "id": "a", "method": "tasks/explode", "params": {}});
        let response = call(&test_server(), &body.to_string()).await;
        assert_eq!(response.error.unwrap().code, codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let body = json!({"jsonrpc": "2.0", "id": "a", "method": "message/send", "params": {"nope": 1}});
        let response = call(&test_server(), &body.to_string()).await;
        assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_wrong_version() {
        let body = json!({"jsonrpc": "1.0", "id": "a", "method": "tasks/get", "params": {"id": "x"}});
        let response = call(&test_server(), &body.to_string()).await;
        assert_eq!(response.error.unwrap().code, codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_stream_is_unsupported() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "message/stream", "params": {}});
        let response = call(&test_server(), &body.to_string()).await;
        assert_eq!(response.error.unwrap().code, codes::UNSUPPORTED_OPERATION);
    }

    #[tokio::test]
    async fn test_task_not_found() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "tasks/get", "params": {"id": "missing"}});
        let response = call(&test_server(), &body.to_string()).await;
        assert_eq!(response.error.unwrap().code, codes::TASK_NOT_FOUND);
    }
}
