use tokio::runtime::{Builder, Runtime};

use crate::{
    document::Document,
    services::llm::{dispatch::Context, transport::Transport, ModelClientError, OllamaClient},
    Message,
};

/// Synchronous front for [`OllamaClient`].
///
/// Owns a single-threaded runtime and blocks the calling thread until each
/// exchange completes. Must not be used from inside an async context.
#[derive(Debug)]
pub struct BlockingOllamaClient<T = crate::HttpTransport> {
    inner: OllamaClient<T>,
    runtime: Runtime,
}

impl BlockingOllamaClient {
    pub fn new(
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ModelClientError> {
        Self::from_client(OllamaClient::new(model, endpoint)?)
    }
}

impl<T: Transport> BlockingOllamaClient<T> {
    pub fn from_client(inner: OllamaClient<T>) -> Result<Self, ModelClientError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ModelClientError::Construction(format!("Failed to start runtime: {e}")))?;
        Ok(Self { inner, runtime })
    }

    pub fn client(&self) -> &OllamaClient<T> {
        &self.inner
    }

    /// Blocking [`OllamaClient::send`].
    pub fn send(
        &self,
        messages: &[Message],
        context: Option<&Context>,
    ) -> Result<Document, ModelClientError> {
        self.runtime.block_on(self.inner.send(messages, context))
    }

    pub fn chat(&self, messages: &[Message]) -> Result<Document, ModelClientError> {
        self.runtime.block_on(self.inner.chat(messages))
    }

    pub fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: &Document,
    ) -> Result<Document, ModelClientError> {
        self.runtime.block_on(self.inner.chat_with_tools(messages, tools))
    }

    pub fn chat_with_structure(
        &self,
        messages: &[Message],
        schema: &Document,
    ) -> Result<Document, ModelClientError> {
        self.runtime.block_on(self.inner.chat_with_structure(messages, schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTransport;

    impl Transport for EchoTransport {
        async fn post(&self, _url: &str, body: Document) -> Result<Document, ModelClientError> {
            Ok(body)
        }
    }

    #[test]
    fn send_blocks_until_reply() {
        let inner = OllamaClient::with_transport("m", "http://x/api/chat", EchoTransport).unwrap();
        let client = BlockingOllamaClient::from_client(inner).unwrap();
        let echoed = client.send(&[Message::user("hi")], None).unwrap();
        assert_eq!(echoed.get("model").and_then(Document::as_str), Some("m"));
        assert_eq!(echoed.get("stream").and_then(Document::as_bool), Some(false));
    }

    #[test]
    fn constructor_validates_arguments() {
        assert!(BlockingOllamaClient::new("", "http://x").is_err());
    }
}
