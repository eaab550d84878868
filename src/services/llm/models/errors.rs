use crate::document::DocumentError;

/// Errors raised while talking to the chat endpoint.
#[derive(Debug)]
pub enum ModelClientError {
    /// Local validation failed before anything was sent.
    Construction(String),
    /// The request body could not be shaped.
    Build(DocumentError),
    /// The connection failed or the response body could not be read.
    Request(String),
    /// The endpoint answered with a non-success status. Only raised by
    /// transports opted in through `HttpTransport::error_on_status`.
    Api { status: u16, body: String },
    /// The response body was empty or not JSON.
    Parse(String),
    /// The request body could not be encoded.
    Serialization(String),
}

impl ModelClientError {
    /// `true` for failures that happened on the wire rather than while parsing.
    pub fn is_transport(&self) -> bool {
        matches!(self, ModelClientError::Request(_) | ModelClientError::Api { .. })
    }
}

impl std::fmt::Display for ModelClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelClientError::Construction(s) => write!(f, "Construction Error: {s}"),
            ModelClientError::Build(e) => write!(f, "Request Build Error: {e}"),
            ModelClientError::Request(s) => write!(f, "Request Error: {s}"),
            ModelClientError::Api { status, body } => write!(f, "API Error: {status} - {body}"),
            ModelClientError::Parse(s) => write!(f, "Parse Error: {s}"),
            ModelClientError::Serialization(s) => write!(f, "Serialization Error: {s}"),
        }
    }
}

impl std::error::Error for ModelClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelClientError::Build(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ModelClientError {
    fn from(err: reqwest::Error) -> Self {
        ModelClientError::Request(err.to_string())
    }
}

impl From<DocumentError> for ModelClientError {
    fn from(err: DocumentError) -> Self {
        ModelClientError::Build(err)
    }
}

impl From<MessageError> for ModelClientError {
    fn from(err: MessageError) -> Self {
        ModelClientError::Construction(err.to_string())
    }
}

/// Errors raised while constructing a [`Message`](super::Message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    EmptyRole,
}

impl std::fmt::Display for MessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageError::EmptyRole => write!(f, "Message role cannot be empty."),
        }
    }
}

impl std::error::Error for MessageError {}
