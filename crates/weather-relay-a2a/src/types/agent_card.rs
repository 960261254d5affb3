//! Agent Card types for capability discovery in the A2A protocol.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{A2aError, A2aResult};

/// Protocol version advertised by cards built here
pub const PROTOCOL_VERSION: &str = "0.3.0";

/// Transport advertised by cards built here
pub const PREFERRED_TRANSPORT: &str = "JSONRPC";

/// Well-known path of the agent card, relative to the agent base URL
pub const AGENT_CARD_PATH: &str = "/.well-known/agent-card.json";

/// Pre-0.3 agent card path, still served and probed for older peers
pub const LEGACY_AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Agent Card for capability discovery
///
/// The Agent Card is a JSON document that describes an agent's identity,
/// supported content modes, and skills. It is served at
/// `/.well-known/agent-card.json` and is immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Human-readable name of the agent
    pub name: String,

    /// Description of the agent
    pub description: String,

    /// Base URL of the agent's JSON-RPC endpoint
    pub url: String,

    /// Version of the agent
    pub version: String,

    /// A2A protocol version
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,

    /// Transport expected at `url`
    #[serde(default = "default_transport")]
    pub preferred_transport: String,

    /// Content kinds accepted as input, in preference order
    #[serde(default)]
    pub default_input_modes: Vec<String>,

    /// Content kinds produced as output, in preference order
    #[serde(default)]
    pub default_output_modes: Vec<String>,

    /// Agent capabilities
    #[serde(default)]
    pub capabilities: AgentCapabilities,

    /// Skills the agent can perform
    #[serde(default)]
    pub skills: Vec<AgentSkill>,

    /// Whether an extended card is available to authenticated callers
    #[serde(default)]
    pub supports_authenticated_extended_card: bool,
}

fn default_protocol_version() -> String {
    PROTOCOL_VERSION.to_string()
}

fn default_transport() -> String {
    PREFERRED_TRANSPORT.to_string()
}

impl AgentCard {
    /// Create a new agent card with required fields and text in/out modes
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: url.into(),
            version: "1.0.0".to_string(),
            protocol_version: default_protocol_version(),
            preferred_transport: default_transport(),
            default_input_modes: vec!["text".to_string()],
            default_output_modes: vec!["text".to_string()],
            capabilities: AgentCapabilities::default(),
            skills: Vec::new(),
            supports_authenticated_extended_card: false,
        }
    }

    /// Add a skill to the agent card
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the agent version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replace the default input and output modes
    pub fn with_modes(mut self, input: &[&str], output: &[&str]) -> Self {
        self.default_input_modes = input.iter().map(|m| m.to_string()).collect();
        self.default_output_modes = output.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Set the streaming capability flag
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.capabilities.streaming = streaming;
        self
    }

    /// Advertise an authenticated extended card
    pub fn with_authenticated_extended_card(mut self) -> Self {
        self.supports_authenticated_extended_card = true;
        self
    }

    /// Parsed endpoint URL
    pub fn endpoint(&self) -> A2aResult<Url> {
        Ok(Url::parse(&self.url)?)
    }

    /// Check the fields a client relies on
    pub fn validate(&self) -> A2aResult<()> {
        if self.name.trim().is_empty() {
            return Err(A2aError::invalid_agent_card("name must not be empty"));
        }
        Url::parse(&self.url)
            .map_err(|e| A2aError::invalid_agent_card(format!("url '{}': {}", self.url, e)))?;
        if self.default_input_modes.is_empty() || self.default_output_modes.is_empty() {
            return Err(A2aError::invalid_agent_card(
                "input and output modes must not be empty",
            ));
        }
        Ok(())
    }

    /// Whether the agent accepts the given input content kind
    pub fn accepts_input(&self, mode: &str) -> bool {
        self.default_input_modes.iter().any(|m| m == mode)
    }
}

/// Agent capabilities
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Whether the agent supports streaming responses
    #[serde(default)]
    pub streaming: bool,

    /// Whether the agent supports push notifications
    #[serde(default)]
    pub push_notifications: bool,

    /// Whether the agent records task state history
    #[serde(default)]
    pub state_transition_history: bool,
}

/// A skill that the agent can perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Unique identifier for the skill
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Description of what the skill does
    pub description: String,

    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,

    /// Example utterances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,

    /// Input modes, when they differ from the card defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_modes: Option<Vec<String>>,

    /// Output modes, when they differ from the card defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_modes: Option<Vec<String>>,
}

impl AgentSkill {
    /// Create a new skill
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            examples: Vec::new(),
            input_modes: None,
            output_modes: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add an example utterance
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}
