use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{document::Document, services::llm::models::errors::ModelClientError};

/// Typed view over a `/api/chat` reply.
///
/// The client hands back the raw [`Document`]; this struct is an opt-in way to
/// read the common fields.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChatResponse {
    pub model: String,
    #[serde(default)]
    pub created_at: String,
    pub message: ResponseMessage,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_duration: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ResponseMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

/// Represents a tool call requested by the model.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolCall {
    pub function: ToolCallFunction,
}

/// Contains the name and arguments for a function call.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolCallFunction {
    pub name: String,
    pub arguments: Value,
}

impl ChatResponse {
    pub fn from_document(doc: &Document) -> Result<Self, ModelClientError> {
        doc.deserialize_into().map_err(|e| {
            ModelClientError::Parse(format!("Response does not look like a chat reply: {e}"))
        })
    }

    /// Parses the message content as JSON, for replies to structured requests.
    pub fn structured_content(&self) -> Result<Document, ModelClientError> {
        Document::parse(&self.message.content)
            .map_err(|e| ModelClientError::Parse(format!("Content is not JSON: {e}")))
    }
}

impl TryFrom<&Document> for ChatResponse {
    type Error = ModelClientError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        Self::from_document(doc)
    }
}
