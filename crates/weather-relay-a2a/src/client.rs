//! A2A Protocol Client
//!
//! This module provides the calling side of the A2A protocol: discovering a
//! remote agent through its card and exchanging JSON-RPC calls with it.
//!
//! # Overview
//!
//! - [`CardResolver`] fetches the agent card from the well-known path
//! - [`A2aClient`] is built from a card and sends messages, fetches and
//!   cancels tasks
//!
//! # Connection Behavior
//!
//! Timeouts and pooling are whatever the supplied [`reqwest::Client`] is
//! configured with; the client adds none of its own. There are no retries:
//! every failure is surfaced to the caller as an [`A2aError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use weather_relay_a2a::client::{A2aClient, CardResolver, ClientConfig};
//! use weather_relay_a2a::Message;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = reqwest::Client::new();
//!     let card = CardResolver::new(http.clone(), "http://localhost:9999/")
//!         .get_agent_card()
//!         .await?;
//!
//!     let client = A2aClient::from_card(card, ClientConfig::default(), http)?;
//!     let mut events = client.send_message(Message::user("weather in Paris?")).await?;
//!     while let Some(event) = events.next().await {
//!         println!("{}", event?.kind());
//!     }
//!     Ok(())
//! }
//! ```

use futures::Stream;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{A2aError, A2aResult};
use crate::types::{
    AGENT_CARD_PATH, AgentCard, Event, JsonRpcRequest, JsonRpcResponse, LEGACY_AGENT_CARD_PATH,
    Message, MessageSendConfiguration, MessageSendParams, SendMessageResult, Task, TaskIdParams,
    methods,
};

/// Events produced in response to one sent message, in delivery order
pub type EventStream = Pin<Box<dyn Stream<Item = A2aResult<Event>> + Send>>;

/// Fetches an agent card from the well-known location under a base URL
#[derive(Debug, Clone)]
pub struct CardResolver {
    http: Client,
    base_url: String,
}

impl CardResolver {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Base URL the card is resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn card_url(&self, path: &str) -> A2aResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    /// Fetch and validate the agent card.
    ///
    /// Falls back to the legacy path when the current one answers 404.
    pub async fn get_agent_card(&self) -> A2aResult<AgentCard> {
        let card = match self.fetch(AGENT_CARD_PATH).await? {
            Some(card) => card,
            None => self.fetch(LEGACY_AGENT_CARD_PATH).await?.ok_or_else(|| {
                A2aError::protocol_error(format!("No agent card found at {}", self.base_url))
            })?,
        };

        card.validate()?;

        info!(
            name = %card.name,
            url = %card.url,
            skills = card.skills.len(),
            "Fetched agent card"
        );

        Ok(card)
    }

    async fn fetch(&self, path: &str) -> A2aResult<Option<AgentCard>> {
        let url = self.card_url(path)?;
        debug!(url = %url, "Fetching agent card");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2aError::protocol_error(format!(
                "Agent card request failed with HTTP {}: {}",
                status, body
            )));
        }

        let card = response
            .json::<AgentCard>()
            .await
            .map_err(|e| A2aError::invalid_agent_card(format!("Failed to parse agent card: {}", e)))?;
        Ok(Some(card))
    }
}

/// Client-side preferences applied to every call
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Request streamed responses. Not supported by this client.
    pub streaming: bool,
    /// Output modes advertised to the server on each send
    pub accepted_output_modes: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            streaming: false,
            accepted_output_modes: vec!["text".to_string()],
        }
    }
}

/// A2A protocol client bound to one remote agent
#[derive(Clone)]
pub struct A2aClient {
    http: Client,
    card: Arc<AgentCard>,
    endpoint: Url,
    config: ClientConfig,
}

impl std::fmt::Debug for A2aClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2aClient")
            .field("agent", &self.card.name)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl A2aClient {
    /// Build a client for the agent described by `card`
    pub fn from_card(card: AgentCard, config: ClientConfig, http: Client) -> A2aResult<Self> {
        card.validate()?;

        if config.streaming {
            return Err(A2aError::unsupported("streaming client"));
        }
        if !card.accepts_input("text") {
            warn!(
                name = %card.name,
                modes = ?card.default_input_modes,
                "Remote agent does not list text input"
            );
        }

        let endpoint = card.endpoint()?;
        Ok(Self {
            http,
            card: Arc::new(card),
            endpoint,
            config,
        })
    }

    /// Card the client was built from
    pub fn agent_card(&self) -> &AgentCard {
        &self.card
    }

    /// JSON-RPC endpoint of the remote agent
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send a message and return the response events.
    ///
    /// The call completes the remote round trip before returning; the stream
    /// then yields the buffered events in order.
    pub async fn send_message(&self, message: Message) -> A2aResult<EventStream> {
        message.validate()?;
        debug!(message_id = %message.message_id, agent = %self.card.name, "Sending message");

        let mut params = MessageSendParams::new(message);
        params.configuration = Some(MessageSendConfiguration {
            accepted_output_modes: self.config.accepted_output_modes.clone(),
            blocking: Some(true),
            history_length: None,
        });

        let result: SendMessageResult = self.rpc_call(methods::MESSAGE_SEND, &params).await?;
        let events = result.into_events();
        debug!(events = events.len(), "Received response events");

        Ok(Box::pin(futures::stream::iter(events.into_iter().map(Ok))))
    }

    /// Fetch a task by id
    pub async fn get_task(&self, task_id: impl Into<String>) -> A2aResult<Task> {
        self.rpc_call(methods::TASKS_GET, &TaskIdParams::new(task_id))
            .await
    }

    /// Request cancellation of a task
    pub async fn cancel_task(&self, task_id: impl Into<String>) -> A2aResult<Task> {
        let task: Task = self
            .rpc_call(methods::TASKS_CANCEL, &TaskIdParams::new(task_id))
            .await?;
        info!(task_id = %task.id, state = %task.state(), "Task cancelled");
        Ok(task)
    }

    async fn rpc_call<P, R>(&self, method: &str, params: &P) -> A2aResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest::new(
            Uuid::new_v4().to_string(),
            method,
            serde_json::to_value(params)?,
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2aError::protocol_error(format!(
                "{} failed with HTTP {}: {}",
                method, status, body
            )));
        }

        let body: JsonRpcResponse = response.json().await.map_err(|e| {
            A2aError::protocol_error(format!("Failed to parse JSON-RPC response: {}", e))
        })?;

        if let Some(error) = body.error {
            debug!(method, code = error.code, message = %error.message, "Remote returned error");
            return Err(error.into());
        }

        let result = body.result.ok_or_else(|| {
            A2aError::protocol_error(format!("{} response has neither result nor error", method))
        })?;

        serde_json::from_value(result)
            .map_err(|e| A2aError::protocol_error(format!("Unexpected {} result: {}", method, e)))
    }
}
