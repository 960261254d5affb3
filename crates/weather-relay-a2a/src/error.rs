//! A2A Protocol Error Types
//!
//! This module defines error types for the A2A protocol implementation and
//! their mapping onto JSON-RPC 2.0 error codes.

use thiserror::Error;

/// Result type for A2A operations
pub type A2aResult<T> = Result<T, A2aError>;

/// JSON-RPC 2.0 and A2A-specific error codes
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const TASK_NOT_FOUND: i32 = -32001;
    pub const TASK_NOT_CANCELABLE: i32 = -32002;
    pub const UNSUPPORTED_OPERATION: i32 = -32004;
}

/// Errors that can occur in A2A protocol operations
#[derive(Debug, Error)]
pub enum A2aError {
    /// Task not found
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// Task is in a terminal state and cannot be canceled
    #[error("Task {task_id} cannot be canceled in state {state}")]
    TaskNotCancelable { task_id: String, state: String },

    /// Agent card validation failed
    #[error("Invalid agent card: {reason}")]
    InvalidAgentCard { reason: String },

    /// Message validation failed
    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },

    /// Request parameters were rejected
    #[error("Invalid params: {reason}")]
    InvalidParams { reason: String },

    /// The JSON-RPC method is not known to the server
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    /// The operation exists in the protocol but is not implemented here
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    /// Connection error
    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    /// Request timeout
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Protocol error
    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    /// Error object returned by a remote JSON-RPC endpoint
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP error (when client feature is enabled)
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),

    /// Internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl A2aError {
    /// Create a task not found error
    pub fn task_not_found(task_id: impl Into<String>) -> Self {
        Self::TaskNotFound {
            task_id: task_id.into(),
        }
    }

    /// Create a task not cancelable error
    pub fn task_not_cancelable(task_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self::TaskNotCancelable {
            task_id: task_id.into(),
            state: state.into(),
        }
    }

    /// Create an invalid agent card error
    pub fn invalid_agent_card(reason: impl Into<String>) -> Self {
        Self::InvalidAgentCard {
            reason: reason.into(),
        }
    }

    /// Create an invalid message error
    pub fn invalid_message(reason: impl Into<String>) -> Self {
        Self::InvalidMessage {
            reason: reason.into(),
        }
    }

    /// Create an invalid params error
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    /// Create a connection error
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// JSON-RPC error code used when this error is returned by the server
    pub fn rpc_code(&self) -> i32 {
        match self {
            A2aError::TaskNotFound { .. } => codes::TASK_NOT_FOUND,
            A2aError::TaskNotCancelable { .. } => codes::TASK_NOT_CANCELABLE,
            A2aError::UnsupportedOperation { .. } => codes::UNSUPPORTED_OPERATION,
            A2aError::MethodNotFound { .. } => codes::METHOD_NOT_FOUND,
            A2aError::InvalidMessage { .. }
            | A2aError::InvalidParams { .. }
            | A2aError::InvalidAgentCard { .. }
            | A2aError::UrlError(_) => codes::INVALID_PARAMS,
            A2aError::SerializationError(_) => codes::PARSE_ERROR,
            A2aError::Rpc { code, .. } => *code,
            A2aError::ConnectionError { .. }
            | A2aError::Timeout { .. }
            | A2aError::ProtocolError { .. }
            | A2aError::InternalError { .. } => codes::INTERNAL_ERROR,
            #[cfg(feature = "client")]
            A2aError::HttpError(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Rebuild an error from a JSON-RPC error object received over the wire
    pub fn from_rpc(code: i32, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for A2aError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2aError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            A2aError::connection_error(err.to_string())
        } else {
            A2aError::HttpError(err)
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<A2aError> for ErrorResponse {
    fn from(err: A2aError) -> Self {
        ErrorResponse::new(err.rpc_code(), err.to_string())
    }
}

impl From<ErrorResponse> for A2aError {
    fn from(err: ErrorResponse) -> Self {
        A2aError::from_rpc(err.code, err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = A2aError::task_not_found("task-123");
        assert!(matches!(err, A2aError::TaskNotFound { .. }));
        assert_eq!(err.to_string(), "Task not found: task-123");
    }

    #[test]
    fn test_rpc_codes() {
        assert_eq!(A2aError::task_not_found("t").rpc_code(), -32001);
        assert_eq!(A2aError::task_not_cancelable("t", "completed").rpc_code(), -32002);
        assert_eq!(A2aError::unsupported("cancel").rpc_code(), -32004);
        assert_eq!(A2aError::invalid_message("empty").rpc_code(), -32602);
        assert_eq!(A2aError::internal_error("boom").rpc_code(), -32603);
    }

    #[test]
    fn test_error_response_conversion() {
        let err = A2aError::task_not_found("task-123");
        let response: ErrorResponse = err.into();

        assert_eq!(response.code, codes::TASK_NOT_FOUND);
        assert!(response.message.contains("task-123"));
    }

    #[test]
    fn test_remote_error_keeps_code() {
        let err: A2aError = ErrorResponse::new(-32004, "cancel not implemented").into();
        assert_eq!(err.rpc_code(), -32004);
        assert_eq!(err.to_string(), "JSON-RPC error -32004: cancel not implemented");
    }
}
