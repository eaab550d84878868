use std::collections::HashMap;

use crate::services::llm::{ModelClientError, OllamaClient};

/// Default chat endpoint of a local Ollama server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/chat";

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub extra_headers: Option<HashMap<String, String>>,
}

pub trait ClientBuilder {
    fn model(self, model: impl Into<String>) -> Self;
    fn endpoint(self, endpoint: Option<impl Into<String>>) -> Self;
    fn extra_headers(self, extra_headers: Option<HashMap<String, String>>) -> Self;
    fn build(self) -> Result<OllamaClient, ModelClientError>;
}

impl ClientBuilder for ClientConfig {
    fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn endpoint(mut self, endpoint: Option<impl Into<String>>) -> Self {
        self.endpoint = endpoint.map(|s| s.into());
        self
    }

    fn extra_headers(mut self, extra_headers: Option<HashMap<String, String>>) -> Self {
        self.extra_headers = extra_headers;
        self
    }

    /// Builds the client. A missing endpoint falls back to
    /// [`DEFAULT_ENDPOINT`]; a missing model is an error.
    fn build(self) -> Result<OllamaClient, ModelClientError> {
        OllamaClient::try_from(ClientConfig {
            model: self.model,
            endpoint: self.endpoint.or(Some(DEFAULT_ENDPOINT.into())),
            extra_headers: self.extra_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults_endpoint() {
        let client = ClientConfig::default().model("qwen3:8b").build().unwrap();
        assert_eq!(client.model(), "qwen3:8b");
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn build_without_model_fails() {
        let err = ClientConfig::default().build().unwrap_err();
        assert!(matches!(err, ModelClientError::Construction(_)));
    }

    #[test]
    fn explicit_endpoint_is_kept() {
        let client = ClientConfig::default()
            .model("m")
            .endpoint(Some("http://10.0.0.2:11434/api/chat"))
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "http://10.0.0.2:11434/api/chat");
    }

    #[test]
    fn bad_extra_header_fails_build() {
        let mut headers = HashMap::new();
        headers.insert("X-Trace".to_string(), "line\nbreak".to_string());
        let err = ClientConfig::default()
            .model("m")
            .extra_headers(Some(headers))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelClientError::Construction(_)));
    }
}
